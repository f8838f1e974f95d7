//! Per-pattern geometry: which vertices form the swing path, which guide
//! lines sit on top of it, and where the label goes.

use crate::chart::ChartPoint;
use crate::domain::{PatternPoint, PatternType};

/// A dashed reference line derived from the pattern's vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guide {
    /// Straight from vertex `.0` to vertex `.1` (necklines, trendlines).
    Through(usize, usize),
    /// Horizontal at `from`'s price, spanning `from`'s time to `to`'s time.
    Level { from: usize, to: usize },
    /// Through `origin`, parallel to `a -> b`, spanning `a`'s time to `b`'s time.
    Parallel { origin: usize, a: usize, b: usize },
}

#[derive(Debug)]
pub struct Blueprint {
    /// Abbreviation shown on the label
    pub code: &'static str,
    pub min_points: usize,
    /// Vertices joined in order by solid segments
    pub path: &'static [usize],
    pub guides: &'static [Guide],
    /// Vertex the label is pinned to
    pub anchor: usize,
}

impl Blueprint {
    pub fn segment_count(&self) -> usize {
        self.path.len().saturating_sub(1) + self.guides.len()
    }
}

// --- REVERSALS ---
// [base, peak, trough, peak]-style zig-zags with a neckline through the outer lows (or highs).

const HEAD_AND_SHOULDERS: Blueprint = Blueprint {
    code: "H&S",
    min_points: 5,
    path: &[0, 1, 2, 3, 4],
    guides: &[Guide::Through(0, 4)],
    anchor: 2,
};

const DOUBLE_TOP: Blueprint = Blueprint {
    code: "DT",
    min_points: 4,
    path: &[0, 1, 2, 3],
    guides: &[Guide::Through(0, 2)],
    anchor: 1,
};

const DOUBLE_BOTTOM: Blueprint = Blueprint {
    code: "DB",
    min_points: 4,
    path: &[0, 1, 2, 3],
    guides: &[Guide::Through(0, 2)],
    anchor: 1,
};

const TRIPLE_TOP: Blueprint = Blueprint {
    code: "TT",
    min_points: 6,
    path: &[0, 1, 2, 3, 4, 5],
    guides: &[Guide::Through(0, 4)],
    anchor: 3,
};

const TRIPLE_BOTTOM: Blueprint = Blueprint {
    code: "TB",
    min_points: 6,
    path: &[0, 1, 2, 3, 4, 5],
    guides: &[Guide::Through(0, 4)],
    anchor: 3,
};

// --- CONVERGENCE ---
// Vertices alternate [high0, low0, high1, low1].

const SYMMETRIC_TRIANGLE: Blueprint = Blueprint {
    code: "SYM TRI",
    min_points: 4,
    path: &[0, 1, 2, 3],
    guides: &[Guide::Through(0, 2), Guide::Through(1, 3)],
    anchor: 0,
};

const ASCENDING_TRIANGLE: Blueprint = Blueprint {
    code: "ASC TRI",
    min_points: 4,
    path: &[0, 1, 2, 3],
    guides: &[Guide::Level { from: 0, to: 3 }, Guide::Through(1, 3)],
    anchor: 0,
};

const DESCENDING_TRIANGLE: Blueprint = Blueprint {
    code: "DESC TRI",
    min_points: 4,
    path: &[0, 1, 2, 3],
    guides: &[Guide::Through(0, 2), Guide::Level { from: 1, to: 3 }],
    anchor: 0,
};

// --- CHANNELS ---

const RISING_WEDGE: Blueprint = Blueprint {
    code: "RW",
    min_points: 4,
    path: &[0, 1, 2, 3],
    guides: &[Guide::Through(0, 2), Guide::Through(1, 3)],
    anchor: 0,
};

const FALLING_WEDGE: Blueprint = Blueprint {
    code: "FW",
    min_points: 4,
    path: &[0, 1, 2, 3],
    guides: &[Guide::Through(0, 2), Guide::Through(1, 3)],
    anchor: 0,
};

// Flags: [pole base, pole tip, counter swing, second swing]
const BULL_FLAG: Blueprint = Blueprint {
    code: "BULL FLAG",
    min_points: 4,
    path: &[0, 1, 2, 3],
    guides: &[
        Guide::Through(1, 3),
        Guide::Parallel {
            origin: 2,
            a: 1,
            b: 3,
        },
    ],
    anchor: 1,
};

const BEAR_FLAG: Blueprint = Blueprint {
    code: "BEAR FLAG",
    min_points: 4,
    path: &[0, 1, 2, 3],
    guides: &[
        Guide::Through(1, 3),
        Guide::Parallel {
            origin: 2,
            a: 1,
            b: 3,
        },
    ],
    anchor: 1,
};

pub fn blueprint(pattern_type: PatternType) -> &'static Blueprint {
    match pattern_type {
        PatternType::HeadAndShoulders => &HEAD_AND_SHOULDERS,
        PatternType::DoubleTop => &DOUBLE_TOP,
        PatternType::DoubleBottom => &DOUBLE_BOTTOM,
        PatternType::TripleTop => &TRIPLE_TOP,
        PatternType::TripleBottom => &TRIPLE_BOTTOM,
        PatternType::SymmetricTriangle => &SYMMETRIC_TRIANGLE,
        PatternType::AscendingTriangle => &ASCENDING_TRIANGLE,
        PatternType::DescendingTriangle => &DESCENDING_TRIANGLE,
        PatternType::RisingWedge => &RISING_WEDGE,
        PatternType::FallingWedge => &FALLING_WEDGE,
        PatternType::BullFlag => &BULL_FLAG,
        PatternType::BearFlag => &BEAR_FLAG,
    }
}

#[inline]
pub(crate) fn to_chart(p: PatternPoint) -> ChartPoint {
    ChartPoint::new(p.time, p.price)
}

impl Guide {
    /// Endpoints of the guide. Caller guarantees every index is in bounds.
    pub fn resolve(self, points: &[PatternPoint]) -> (ChartPoint, ChartPoint) {
        match self {
            Guide::Through(a, b) => (to_chart(points[a]), to_chart(points[b])),
            Guide::Level { from, to } => {
                let price = points[from].price;
                (
                    ChartPoint::new(points[from].time, price),
                    ChartPoint::new(points[to].time, price),
                )
            }
            Guide::Parallel { origin, a, b } => {
                let (pa, pb, po) = (points[a], points[b], points[origin]);
                // Differences in f64; i64 subtraction overflows on far-apart timestamps.
                let dt = pb.time as f64 - pa.time as f64;
                let slope = if dt == 0.0 { 0.0 } else { (pb.price - pa.price) / dt };
                let at = |time: i64| po.price + slope * (time as f64 - po.time as f64);
                (
                    ChartPoint::new(pa.time, at(pa.time)),
                    ChartPoint::new(pb.time, at(pb.time)),
                )
            }
        }
    }

    fn max_index(self) -> usize {
        match self {
            Guide::Through(a, b) => a.max(b),
            Guide::Level { from, to } => from.max(to),
            Guide::Parallel { origin, a, b } => origin.max(a).max(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_index_fits_the_minimum() {
        for t in PatternType::iter() {
            let bp = blueprint(t);
            assert!(bp.anchor < bp.min_points, "{t}: anchor");
            assert!(bp.path.iter().all(|&i| i < bp.min_points), "{t}: path");
            assert!(
                bp.guides.iter().all(|g| g.max_index() < bp.min_points),
                "{t}: guides"
            );
            assert_eq!(bp.path.len(), bp.min_points, "{t}: path walks every vertex");
        }
    }

    #[test]
    fn parallel_guide_keeps_slope() {
        let pts = [
            PatternPoint::new(0, 10.0),
            PatternPoint::new(100, 20.0),
            PatternPoint::new(150, 17.0),
            PatternPoint::new(200, 18.0),
        ];
        let (from, to) = Guide::Parallel {
            origin: 2,
            a: 1,
            b: 3,
        }
        .resolve(&pts);
        assert_eq!(from.time, 100);
        assert_eq!(to.time, 200);
        // slope of 1->3 is -0.02 per second
        assert!((from.price - 18.0).abs() < 1e-9);
        assert!((to.price - 16.0).abs() < 1e-9);
    }

    #[test]
    fn level_guide_is_flat() {
        let pts = [
            PatternPoint::new(0, 50.0),
            PatternPoint::new(10, 40.0),
            PatternPoint::new(20, 49.0),
            PatternPoint::new(30, 45.0),
        ];
        let (from, to) = Guide::Level { from: 0, to: 3 }.resolve(&pts);
        assert_eq!(from, ChartPoint::new(0, 50.0));
        assert_eq!(to, ChartPoint::new(30, 50.0));
    }

    #[test]
    fn parallel_guide_survives_extreme_timestamps() {
        let pts = [
            PatternPoint::new(i64::MIN, 10.0),
            PatternPoint::new(i64::MAX, 20.0),
            PatternPoint::new(0, 15.0),
        ];
        let (from, to) = Guide::Parallel {
            origin: 2,
            a: 0,
            b: 1,
        }
        .resolve(&pts);
        assert_eq!((from.time, to.time), (i64::MIN, i64::MAX));
        assert!(from.price.is_finite() && to.price.is_finite());
        assert!((from.price - 10.0).abs() < 1e-6);
        assert!((to.price - 20.0).abs() < 1e-6);
    }
}
