use eframe::egui::{Align2, Color32, RichText};
use egui_plot::{HLine, Line, LineStyle, PlotPoint, PlotPoints, PlotUi, Polygon, Text};

use crate::chart::{Entity, EntityStore, LineKind, ShapeGeometry, ShapeStyle};
use crate::config::plot::PLOT_CONFIG;
use crate::domain::{Candle, CandleType};

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub candles: &'a [Candle],
    pub entities: &'a EntityStore,
    /// Candle spacing in seconds; x is unix seconds.
    pub interval_secs: f64,
    pub last_close: Option<f64>,
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. CANDLES
// ============================================================================
pub struct CandlestickLayer;

impl PlotLayer for CandlestickLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for candle in ctx.candles {
            let color = match candle.get_type() {
                CandleType::Bullish => PLOT_CONFIG.candle_bullish_color,
                CandleType::Bearish => PLOT_CONFIG.candle_bearish_color,
            };
            let x = candle.open_time as f64;

            if candle.high_price > candle.low_price {
                draw_wick_line(plot_ui, x, candle.high_price, candle.low_price, color);
            }

            let (body_bot, body_top) = candle.body_range();
            // Doji check
            let body_top = if (body_top - body_bot).abs() < f64::EPSILON {
                body_bot * 1.0001
            } else {
                body_top
            };
            draw_body_rect(plot_ui, x, body_top, body_bot, ctx.interval_secs, color);
        }
    }
}

#[inline]
fn draw_wick_line(ui: &mut PlotUi, x: f64, top: f64, bottom: f64, color: Color32) {
    ui.line(
        Line::new("", PlotPoints::new(vec![[x, bottom], [x, top]]))
            .color(color)
            .width(PLOT_CONFIG.candle_wick_width),
    );
}

#[inline]
fn draw_body_rect(ui: &mut PlotUi, x: f64, top: f64, bottom: f64, interval: f64, color: Color32) {
    let half_w = interval * PLOT_CONFIG.candle_width_pct / 2.0;
    let pts = vec![
        [x - half_w, bottom],
        [x + half_w, bottom],
        [x + half_w, top],
        [x - half_w, top],
    ];

    // No stroke: thin candles blur with one.
    ui.polygon(
        Polygon::new("", PlotPoints::new(pts))
            .fill_color(color)
            .stroke(eframe::egui::Stroke::NONE),
    );
}

// ============================================================================
// 2. LAST CLOSE
// ============================================================================
pub struct LastPriceLayer;

impl PlotLayer for LastPriceLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if let Some(price) = ctx.last_close {
            plot_ui.hline(
                HLine::new("Last Close", price)
                    .color(PLOT_CONFIG.color_text_subdued)
                    .width(1.0)
                    .style(LineStyle::dashed_loose()),
            );
        }
    }
}

// ============================================================================
// 3. ANNOTATIONS (pattern overlay + price levels)
// ============================================================================
/// Draws whatever the overlay and the price level tool created on the chart.
pub struct AnnotationLayer;

impl PlotLayer for AnnotationLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        // Lines first so labels stay readable on top.
        for (_, entity) in ctx.entities.iter() {
            if let Entity::Shape(geometry, style) = entity {
                draw_shape(plot_ui, geometry, style);
            }
        }

        for (_, entity) in ctx.entities.iter() {
            if let Entity::Label(at, label) = entity {
                let text = RichText::new(&label.text)
                    .color(label.color)
                    .size(label.size)
                    .strong();
                plot_ui.text(
                    Text::new("", PlotPoint::new(at.time as f64, at.price), text)
                        .anchor(Align2::LEFT_BOTTOM),
                );
            }
        }
    }
}

fn line_style(kind: LineKind) -> LineStyle {
    match kind {
        LineKind::Solid => LineStyle::Solid,
        LineKind::Dotted => LineStyle::Dotted {
            spacing: PLOT_CONFIG.level_dot_spacing,
        },
        LineKind::Dashed => LineStyle::Dashed {
            length: PLOT_CONFIG.guide_dash_length,
        },
    }
}

fn draw_shape(plot_ui: &mut PlotUi, geometry: &ShapeGeometry, style: &ShapeStyle) {
    match geometry {
        ShapeGeometry::Segment { from, to } => {
            let pts = vec![
                [from.time as f64, from.price],
                [to.time as f64, to.price],
            ];
            plot_ui.line(
                Line::new("", PlotPoints::new(pts))
                    .color(style.color)
                    .width(style.width)
                    .style(line_style(style.kind)),
            );
        }
        ShapeGeometry::HorizontalLine { at } => {
            plot_ui.hline(
                HLine::new("", at.price)
                    .color(style.color)
                    .width(style.width)
                    .style(line_style(style.kind)),
            );
        }
    }
}
