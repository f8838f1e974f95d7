use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Confidence at or above which a pattern is treated as a high-confidence detection.
pub const HIGH_CONFIDENCE: f64 = 0.8;
/// Lower bound of the "medium" confidence tier used by the pattern list.
pub const MEDIUM_CONFIDENCE: f64 = 0.6;

/// The closed set of chart formations the backend can report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PatternType {
    HeadAndShoulders,
    DoubleTop,
    DoubleBottom,
    TripleTop,
    TripleBottom,
    SymmetricTriangle,
    AscendingTriangle,
    DescendingTriangle,
    RisingWedge,
    FallingWedge,
    BullFlag,
    BearFlag,
}

impl PatternType {
    /// Wire tag, e.g. `head_and_shoulders`.
    pub fn as_tag(self) -> &'static str {
        self.into()
    }

    /// Human title, e.g. `Head And Shoulders`.
    pub fn title(self) -> String {
        self.as_tag()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Pattern tag as received. Unrecognised tags are kept so one odd record
/// never fails the whole feed; the overlay simply ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PatternKind {
    Known(PatternType),
    Unknown(String),
}

impl From<String> for PatternKind {
    fn from(tag: String) -> Self {
        match tag.parse::<PatternType>() {
            Ok(known) => Self::Known(known),
            Err(_) => Self::Unknown(tag),
        }
    }
}

impl From<PatternKind> for String {
    fn from(kind: PatternKind) -> Self {
        match kind {
            PatternKind::Known(t) => t.as_tag().to_string(),
            PatternKind::Unknown(tag) => tag,
        }
    }
}

impl From<PatternType> for PatternKind {
    fn from(t: PatternType) -> Self {
        Self::Known(t)
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(t) => write!(f, "{}", t),
            Self::Unknown(tag) => write!(f, "{}", tag),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, EnumString, IntoStaticStr,
)]
#[serde(from = "String", into = "&'static str")]
#[strum(serialize_all = "snake_case")]
pub enum RetestStatus {
    Confirmed,
    Failed,
    Pending,
    #[default]
    None,
}

impl From<String> for RetestStatus {
    fn from(tag: String) -> Self {
        tag.parse().unwrap_or_default()
    }
}

/// One anchor vertex of a detection. `time` is unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternPoint {
    pub time: i64,
    pub price: f64,
}

impl PatternPoint {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

/// A detected formation as served by `/api/patterns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
    pub pattern_type: PatternKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: Vec<PatternPoint>,

    // Retest information
    #[serde(default, deserialize_with = "null_as_default")]
    pub retest_status: RetestStatus,
    #[serde(default)]
    pub retest_description: Option<String>,
    #[serde(default)]
    pub retest_price: Option<f64>,
    #[serde(default)]
    pub retest_timestamp: Option<NaiveDateTime>,

    // Suggested trade levels
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    #[serde(default)]
    pub risk_reward_ratio: Option<f64>,
}

impl PatternRecord {
    /// Minimal record, mostly useful for tests and demo data.
    pub fn new(pattern_type: impl Into<PatternKind>, confidence: f64, points: Vec<PatternPoint>) -> Self {
        Self {
            id: None,
            symbol: String::new(),
            pattern_type: pattern_type.into(),
            price: 0.0,
            confidence,
            timestamp: None,
            description: String::new(),
            points,
            retest_status: RetestStatus::None,
            retest_description: None,
            retest_price: None,
            retest_timestamp: None,
            entry_price: None,
            stop_loss: None,
            take_profit: None,
            risk_reward_ratio: None,
        }
    }

    pub fn known_type(&self) -> Option<PatternType> {
        match self.pattern_type {
            PatternKind::Known(t) => Some(t),
            PatternKind::Unknown(_) => None,
        }
    }

    pub fn confidence_tier(&self) -> ConfidenceTier {
        if self.confidence >= HIGH_CONFIDENCE {
            ConfidenceTier::High
        } else if self.confidence >= MEDIUM_CONFIDENCE {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    /// e.g. `85.0%`
    pub fn confidence_label(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    /// Entry / stop / target suggested by the backend, if it sent any.
    pub fn suggested_levels(&self) -> Option<(Option<f64>, Option<f64>, Option<f64>)> {
        if self.entry_price.is_none() && self.stop_loss.is_none() && self.take_profit.is_none() {
            return None;
        }
        Some((self.entry_price, self.stop_loss, self.take_profit))
    }
}

/// Aggregate numbers the backend computes over the last 24h.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternStats {
    pub total_patterns: u64,
    pub recent_patterns: u64,
    pub active_coins: u64,
    pub accuracy_rate: f64,
}

/// Body of `GET /api/patterns`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternFeed {
    #[serde(default, deserialize_with = "null_as_default")]
    pub patterns: Vec<PatternRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: PatternStats,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_backend_payload_with_gaps() {
        let json = r#"{
            "patterns": [
                {
                    "id": 7,
                    "symbol": "BTCUSDT",
                    "pattern_type": "double_top",
                    "price": 65000.5,
                    "confidence": 0.82,
                    "timestamp": "2025-03-31T23:51:00.123456",
                    "description": "Two peaks",
                    "entry_price": null,
                    "retest_status": "pending",
                    "retest_timestamp": null
                },
                {
                    "symbol": "ETHUSDT",
                    "pattern_type": "cup_and_handle",
                    "confidence": 0.5,
                    "description": null,
                    "retest_status": null,
                    "points": [{"time": 1700000000, "price": 2000.0}]
                }
            ],
            "stats": {"total_patterns": 12, "recent_patterns": 2, "active_coins": 2, "accuracy_rate": 0.5}
        }"#;

        let feed: PatternFeed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.patterns.len(), 2);

        let first = &feed.patterns[0];
        assert_eq!(first.known_type(), Some(PatternType::DoubleTop));
        assert!(first.points.is_empty());
        assert_eq!(first.retest_status, RetestStatus::Pending);
        assert!(first.timestamp.is_some());
        assert_eq!(first.suggested_levels(), None);

        let second = &feed.patterns[1];
        assert_eq!(second.pattern_type, PatternKind::Unknown("cup_and_handle".into()));
        assert_eq!(second.retest_status, RetestStatus::None);
        assert_eq!(second.description, "");
        assert_eq!(second.points, vec![PatternPoint::new(1_700_000_000, 2000.0)]);

        assert_eq!(feed.stats.total_patterns, 12);
        assert_eq!(feed.stats.accuracy_rate, 0.5);
    }

    #[test]
    fn missing_stats_default_to_zero() {
        let feed: PatternFeed = serde_json::from_str(r#"{"patterns": []}"#).unwrap();
        assert_eq!(feed.stats, PatternStats::default());
    }

    #[test]
    fn every_tag_round_trips_through_kind() {
        for t in PatternType::iter() {
            let kind = PatternKind::from(t.as_tag().to_string());
            assert_eq!(kind, PatternKind::Known(t));
        }
    }

    #[test]
    fn twelve_distinct_tags() {
        let tags: Vec<&str> = PatternType::iter().map(PatternType::as_tag).collect();
        assert_eq!(tags.len(), 12);
        assert!(tags.iter().all(|t| t.chars().all(|c| c.is_ascii_lowercase() || c == '_')));
        assert_eq!(PatternType::BearFlag.as_tag(), "bear_flag");
    }

    #[test]
    fn titles_and_tiers() {
        assert_eq!(PatternType::HeadAndShoulders.title(), "Head And Shoulders");
        let mut rec = PatternRecord::new(PatternType::BullFlag, 0.8, vec![]);
        assert_eq!(rec.confidence_tier(), ConfidenceTier::High);
        assert_eq!(rec.confidence_label(), "80.0%");
        rec.confidence = 0.6;
        assert_eq!(rec.confidence_tier(), ConfidenceTier::Medium);
        rec.confidence = 0.59;
        assert_eq!(rec.confidence_tier(), ConfidenceTier::Low);
    }
}
