use crate::domain::{PriceLevelSet, TradeDirection};

/// Read-out shown beside the chart once entry, stop and target are all placed.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskRewardPanel {
    pub direction: TradeDirection,
    pub risk: f64,
    pub reward: f64,
    pub ratio: Option<f64>,
    /// `1:2.00`, or `1:--` when entry sits on the stop
    pub ratio_text: String,
    /// Signed % from the last close to the entry. Positive means entry is above market.
    pub entry_distance_pct: Option<f64>,
}

impl RiskRewardPanel {
    pub fn build(levels: &PriceLevelSet, last_close: f64) -> Option<Self> {
        let rr = levels.risk_reward()?;
        let entry = levels.entry?;

        let entry_distance_pct = (last_close.is_finite() && last_close != 0.0)
            .then(|| (entry - last_close) / last_close * 100.0);

        Some(Self {
            direction: rr.direction,
            risk: rr.risk,
            reward: rr.reward,
            ratio: rr.ratio,
            ratio_text: rr.ratio_text(),
            entry_distance_pct,
        })
    }
}
