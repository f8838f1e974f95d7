use chrono::{DateTime, NaiveDateTime};

/// Monotonic clock that also works in the browser.
pub type AppInstant = web_time::Instant;

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const S_IN_MIN: i64 = 60;
    pub const S_IN_H: i64 = Self::S_IN_MIN * 60;
    pub const S_IN_D: i64 = Self::S_IN_H * 24;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
    pub const AXIS_TIME_FORMAT: &str = "%m-%d %H:%M";

    /// Binance shorthand (`1h`, `4h`, `1d`...) to seconds.
    pub fn interval_to_secs(interval: &str) -> Option<i64> {
        match interval {
            "1m" => Some(Self::S_IN_MIN),
            "5m" => Some(Self::S_IN_MIN * 5),
            "15m" => Some(Self::S_IN_MIN * 15),
            "30m" => Some(Self::S_IN_MIN * 30),
            "1h" => Some(Self::S_IN_H),
            "4h" => Some(Self::S_IN_H * 4),
            "1d" => Some(Self::S_IN_D),
            "1w" => Some(Self::S_IN_D * 7),
            _ => None,
        }
    }
}

// Used for display purposes
pub fn epoch_sec_to_label(epoch_sec: i64, format: &str) -> String {
    match DateTime::from_timestamp(epoch_sec, 0) {
        Some(dt) => dt.format(format).to_string(),
        None => String::new(),
    }
}

pub fn naive_to_label(dt: &NaiveDateTime) -> String {
    dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(epoch_sec_to_label(0, TimeUtils::STANDARD_TIME_FORMAT), "1970-01-01 00:00");
        assert_eq!(TimeUtils::interval_to_secs("4h"), Some(14_400));
        assert_eq!(TimeUtils::interval_to_secs("7m"), None);
    }
}
