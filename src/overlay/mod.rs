//! Turns pattern detections into chart annotations.

mod blueprint;

pub use blueprint::{Blueprint, Guide, blueprint};

use eframe::egui::Color32;

use crate::chart::{Chart, ChartPoint, EntityId, LabelStyle, LineKind, ShapeGeometry, ShapeStyle};
use crate::config::{DF, PLOT_CONFIG};
use crate::domain::{HIGH_CONFIDENCE, PatternRecord};

use blueprint::to_chart;

/// Stroke color for a detection: alert at or above the high-confidence mark, warning below.
pub fn stroke_color(confidence: f64) -> Color32 {
    if confidence >= HIGH_CONFIDENCE {
        PLOT_CONFIG.pattern_alert_color
    } else {
        PLOT_CONFIG.pattern_warning_color
    }
}

/// e.g. `H&S (85.0%)`
pub fn label_text(code: &str, confidence: f64) -> String {
    format!("{} ({:.1}%)", code, confidence * 100.0)
}

/// Owns every annotation drawn for the current pattern list.
///
/// Each [`PatternOverlay::draw_patterns`] replaces the previous picture
/// wholesale: all handles from the last pass are removed before anything new
/// is created, and only handles this overlay created are ever removed.
#[derive(Debug, Default)]
pub struct PatternOverlay {
    patterns: Vec<PatternRecord>,
    lines: Vec<EntityId>,
    labels: Vec<EntityId>,
}

impl PatternOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear<C: Chart + ?Sized>(&mut self, chart: &mut C) {
        for id in self.lines.drain(..).chain(self.labels.drain(..)) {
            chart.remove_entity(id);
        }
    }

    pub fn draw_patterns<C: Chart + ?Sized>(&mut self, chart: &mut C, patterns: &[PatternRecord]) {
        self.clear(chart);
        self.patterns = patterns.to_vec();

        crate::trace_time!("Draw pattern overlay", 2000, {
            for pattern in patterns {
                self.draw_pattern(chart, pattern);
            }

            // One label per drawn record.
            #[cfg(debug_assertions)]
            if DF.log_overlay {
                log::info!(
                    "Overlay: drew {}/{} patterns ({} lines)",
                    self.label_count(),
                    patterns.len(),
                    self.lines.len()
                );
            }
        });
    }

    /// Skips (with a debug log) anything it cannot draw.
    fn draw_pattern<C: Chart + ?Sized>(&mut self, chart: &mut C, pattern: &PatternRecord) {
        let Some(pattern_type) = pattern.known_type() else {
            #[cfg(debug_assertions)]
            if DF.log_overlay {
                log::debug!("Overlay: ignoring unknown pattern type '{}'", pattern.pattern_type);
            }
            return;
        };

        let bp = blueprint(pattern_type);
        if pattern.points.len() < bp.min_points {
            #[cfg(debug_assertions)]
            if DF.log_overlay {
                log::debug!(
                    "Overlay: {} {} has {} points, needs {}",
                    pattern.symbol,
                    pattern_type,
                    pattern.points.len(),
                    bp.min_points
                );
            }
            return;
        }

        let points = &pattern.points[..bp.min_points];
        if points.iter().any(|p| !p.price.is_finite()) {
            log::debug!("Overlay: {} {} has a non-finite vertex", pattern.symbol, pattern_type);
            return;
        }

        let color = stroke_color(pattern.confidence);
        let solid = ShapeStyle {
            color,
            width: PLOT_CONFIG.pattern_line_width,
            kind: LineKind::Solid,
        };
        let dashed = ShapeStyle {
            kind: LineKind::Dashed,
            ..solid
        };

        self.lines.reserve(bp.segment_count());

        // 1. Swing path
        for pair in bp.path.windows(2) {
            let geometry = ShapeGeometry::Segment {
                from: to_chart(points[pair[0]]),
                to: to_chart(points[pair[1]]),
            };
            self.lines.push(chart.create_shape(geometry, solid));
        }

        // 2. Necklines / trendlines
        for guide in bp.guides {
            let (from, to) = guide.resolve(points);
            self.lines
                .push(chart.create_shape(ShapeGeometry::Segment { from, to }, dashed));
        }

        // 3. Label
        let anchor: ChartPoint = to_chart(points[bp.anchor]);
        self.labels.push(chart.create_label(
            anchor,
            LabelStyle {
                text: label_text(bp.code, pattern.confidence),
                color,
                size: PLOT_CONFIG.pattern_label_size,
            },
        ));
    }

    /// Records passed to the most recent draw.
    pub fn patterns(&self) -> &[PatternRecord] {
        &self.patterns
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn annotation_count(&self) -> usize {
        self.lines.len() + self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::mock::{ChartCall, MockChart};
    use crate::chart::Entity;
    use crate::domain::{PatternPoint, PatternType};
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    fn zigzag(n: usize) -> Vec<PatternPoint> {
        (0..n)
            .map(|i| {
                let price = if i % 2 == 0 { 100.0 } else { 110.0 } + i as f64;
                PatternPoint::new(1_700_000_000 + i as i64 * 3600, price)
            })
            .collect()
    }

    fn record(t: PatternType, confidence: f64, n: usize) -> PatternRecord {
        PatternRecord::new(t, confidence, zigzag(n))
    }

    fn expected_segments(t: PatternType) -> usize {
        match t {
            PatternType::HeadAndShoulders => 5,
            PatternType::DoubleTop | PatternType::DoubleBottom => 4,
            PatternType::TripleTop | PatternType::TripleBottom => 6,
            PatternType::SymmetricTriangle
            | PatternType::AscendingTriangle
            | PatternType::DescendingTriangle
            | PatternType::RisingWedge
            | PatternType::FallingWedge
            | PatternType::BullFlag
            | PatternType::BearFlag => 5,
        }
    }

    #[test]
    fn head_and_shoulders_geometry() {
        let mut chart = MockChart::new();
        let mut overlay = PatternOverlay::new();
        let rec = record(PatternType::HeadAndShoulders, 0.85, 5);
        overlay.draw_patterns(&mut chart, std::slice::from_ref(&rec));

        let shapes = chart.shapes();
        assert_eq!(shapes.len(), 5);
        let solid = shapes.iter().filter(|(_, s)| s.kind == LineKind::Solid).count();
        assert_eq!(solid, 4);

        let (neckline, style) = shapes[4];
        assert_eq!(style.kind, LineKind::Dashed);
        assert_eq!(
            neckline,
            ShapeGeometry::Segment {
                from: to_chart(rec.points[0]),
                to: to_chart(rec.points[4]),
            }
        );

        let labels = chart.labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].0, to_chart(rec.points[2]));
        assert_eq!(labels[0].1.text, "H&S (85.0%)");
        assert_eq!(labels[0].1.color, PLOT_CONFIG.pattern_alert_color);
        assert_eq!(labels[0].1.size, PLOT_CONFIG.pattern_label_size);
    }

    #[test]
    fn double_top_geometry() {
        let mut chart = MockChart::new();
        let mut overlay = PatternOverlay::new();
        let rec = record(PatternType::DoubleTop, 0.75, 4);
        overlay.draw_patterns(&mut chart, std::slice::from_ref(&rec));

        let shapes = chart.shapes();
        assert_eq!(shapes.len(), 4);
        assert_eq!(
            shapes[3].0,
            ShapeGeometry::Segment {
                from: to_chart(rec.points[0]),
                to: to_chart(rec.points[2]),
            }
        );
        assert!(shapes.iter().all(|(_, s)| s.color == PLOT_CONFIG.pattern_warning_color));

        let labels = chart.labels();
        assert_eq!(labels[0].0, to_chart(rec.points[1]));
        assert_eq!(labels[0].1.text, "DT (75.0%)");
    }

    #[test]
    fn every_type_draws_fixed_segments_and_one_label() {
        for t in PatternType::iter() {
            let mut chart = MockChart::new();
            let mut overlay = PatternOverlay::new();
            let min = blueprint(t).min_points;
            overlay.draw_patterns(&mut chart, &[record(t, 0.9, min + 2)]);

            assert_eq!(blueprint(t).segment_count(), expected_segments(t), "{t}");
            assert_eq!(chart.shapes().len(), blueprint(t).segment_count(), "{t}");
            assert_eq!(chart.labels().len(), 1, "{t}");
            assert_eq!(overlay.annotation_count(), expected_segments(t) + 1);
        }
    }

    #[test]
    fn short_records_are_skipped_without_stopping_the_batch() {
        let mut chart = MockChart::new();
        let mut overlay = PatternOverlay::new();
        let batch = vec![
            record(PatternType::HeadAndShoulders, 0.9, 4),
            record(PatternType::TripleBottom, 0.9, 0),
            record(PatternType::DoubleTop, 0.9, 4),
        ];
        overlay.draw_patterns(&mut chart, &batch);

        assert_eq!(chart.shapes().len(), 4);
        assert_eq!(chart.labels().len(), 1);
        assert!(chart.labels()[0].1.text.starts_with("DT"));
        assert_eq!(overlay.patterns().len(), 3);
        // Only the drawable record counts as drawn.
        assert_eq!(overlay.label_count(), 1);
    }

    #[test]
    fn unknown_types_and_bad_prices_are_ignored() {
        let mut chart = MockChart::new();
        let mut overlay = PatternOverlay::new();
        let mut unknown = record(PatternType::DoubleTop, 0.9, 4);
        unknown.pattern_type = "cup_and_handle".to_string().into();
        let mut nan = record(PatternType::DoubleTop, 0.9, 4);
        nan.points[1].price = f64::NAN;

        overlay.draw_patterns(&mut chart, &[unknown, nan]);
        assert!(chart.store.is_empty());
        assert_eq!(overlay.annotation_count(), 0);
    }

    #[test]
    fn redraw_is_idempotent_and_releases_old_handles() {
        let mut chart = MockChart::new();
        let mut overlay = PatternOverlay::new();
        let batch: Vec<_> = PatternType::iter()
            .map(|t| record(t, 0.7, blueprint(t).min_points))
            .collect();

        overlay.draw_patterns(&mut chart, &batch);
        let first = chart.creations_since(0);
        let live_after_first = chart.store.len();

        let mark = chart.calls.len();
        overlay.draw_patterns(&mut chart, &batch);
        let removed = chart.calls[mark..]
            .iter()
            .filter(|c| matches!(c, ChartCall::Remove(_)))
            .count();

        assert_eq!(removed, live_after_first);
        assert_eq!(chart.creations_since(mark), first);
        assert_eq!(chart.store.len(), live_after_first);
    }

    #[test]
    fn clear_leaves_foreign_entities_alone() {
        let mut chart = MockChart::new();
        let foreign = chart.create_label(
            ChartPoint::new(0, 1.0),
            LabelStyle {
                text: "mine".into(),
                color: Color32::WHITE,
                size: 10.0,
            },
        );
        let mut overlay = PatternOverlay::new();
        overlay.draw_patterns(&mut chart, &[record(PatternType::BullFlag, 0.9, 4)]);
        overlay.clear(&mut chart);

        assert_eq!(chart.store.len(), 1);
        assert!(matches!(chart.store.get(foreign), Some(Entity::Label(..))));
        assert_eq!(overlay.annotation_count(), 0);
    }

    #[test]
    fn confidence_boundary_is_inclusive() {
        assert_eq!(stroke_color(0.8), PLOT_CONFIG.pattern_alert_color);
        assert_eq!(stroke_color(0.799_999), PLOT_CONFIG.pattern_warning_color);
    }

    proptest! {
        #[test]
        fn every_annotation_uses_the_confidence_color(
            confidence in 0.0f64..=1.0,
            type_idx in 0usize..12,
        ) {
            let t = PatternType::iter().nth(type_idx).unwrap();
            let mut chart = MockChart::new();
            let mut overlay = PatternOverlay::new();
            overlay.draw_patterns(&mut chart, &[record(t, confidence, blueprint(t).min_points)]);

            let expected = if confidence >= 0.8 {
                PLOT_CONFIG.pattern_alert_color
            } else {
                PLOT_CONFIG.pattern_warning_color
            };
            prop_assert!(chart.shapes().iter().all(|(_, s)| s.color == expected));
            prop_assert!(chart.labels().iter().all(|(_, l)| l.color == expected));
        }
    }
}
