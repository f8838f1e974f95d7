use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Which of the three linked markers a value or annotation belongs to.
/// Declaration order is also the drag hit-test priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum LevelRole {
    Entry,
    StopLoss,
    TakeProfit,
}

impl LevelRole {
    /// Short prefix shown on the chart label.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Entry => "Entry",
            Self::StopLoss => "SL",
            Self::TakeProfit => "TP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Long,
    Short,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "LONG"),
            TradeDirection::Short => write!(f, "SHORT"),
        }
    }
}

/// Zero, NaN and infinities all mean "not placed".
#[inline]
pub fn normalize_level(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

/// Entry / stop-loss / take-profit, each independently optional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceLevelSet {
    pub entry: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl PriceLevelSet {
    pub fn new(entry: Option<f64>, stop_loss: Option<f64>, take_profit: Option<f64>) -> Self {
        Self {
            entry: normalize_level(entry),
            stop_loss: normalize_level(stop_loss),
            take_profit: normalize_level(take_profit),
        }
    }

    pub fn get(&self, role: LevelRole) -> Option<f64> {
        match role {
            LevelRole::Entry => self.entry,
            LevelRole::StopLoss => self.stop_loss,
            LevelRole::TakeProfit => self.take_profit,
        }
    }

    pub fn set(&mut self, role: LevelRole, value: Option<f64>) {
        let value = normalize_level(value);
        match role {
            LevelRole::Entry => self.entry = value,
            LevelRole::StopLoss => self.stop_loss = value,
            LevelRole::TakeProfit => self.take_profit = value,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.entry.is_some() && self.stop_loss.is_some() && self.take_profit.is_some()
    }

    /// Derived risk/reward, only defined once all three levels are placed.
    pub fn risk_reward(&self) -> Option<RiskReward> {
        let (entry, stop, target) = (self.entry?, self.stop_loss?, self.take_profit?);
        Some(RiskReward::compute(entry, stop, target))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskReward {
    pub risk: f64,
    pub reward: f64,
    /// `None` when entry and stop coincide.
    pub ratio: Option<f64>,
    pub direction: TradeDirection,
}

impl RiskReward {
    pub fn compute(entry: f64, stop: f64, target: f64) -> Self {
        let risk = (entry - stop).abs();
        let reward = (entry - target).abs();
        let ratio = (risk > 0.0).then(|| reward / risk);
        let direction = if target > entry {
            TradeDirection::Long
        } else {
            TradeDirection::Short
        };
        Self {
            risk,
            reward,
            ratio,
            direction,
        }
    }

    /// Ratio to two decimals, e.g. `2.00`.
    pub fn ratio_string(&self) -> Option<String> {
        self.ratio.map(|r| format!("{:.2}", r))
    }

    /// Display form, e.g. `1:2.00`.
    pub fn ratio_text(&self) -> String {
        match self.ratio_string() {
            Some(r) => format!("1:{}", r),
            None => "1:--".to_string(),
        }
    }
}
