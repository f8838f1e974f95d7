// Domain types and value objects
mod candle;
mod pattern;
mod price_level;

pub use candle::{Candle, CandleType};
pub use pattern::{
    ConfidenceTier, HIGH_CONFIDENCE, MEDIUM_CONFIDENCE, PatternFeed, PatternKind,
    PatternPoint, PatternRecord, PatternStats, PatternType, RetestStatus,
};
pub use price_level::{
    LevelRole, PriceLevelSet, RiskReward, TradeDirection, normalize_level,
};
