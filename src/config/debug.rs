//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Log every pattern feed poll (start, size of payload).
    pub log_feed_polls: bool,

    /// Log each overlay draw pass and every skipped record.
    pub log_overlay: bool,

    /// Log price level redraws and drag transitions.
    pub log_price_levels: bool,

    /// Log raw pointer events as they reach the price level tool. Very noisy while dragging.
    pub log_pointer_events: bool,

    pub log_alerts: bool,

    pub log_klines: bool,

    /// Activate trace_time macro (scope-level timing)
    pub log_performance: bool,
}

pub const DF: LogFlags = LogFlags {
    log_feed_polls: true,
    log_alerts: true,

    log_overlay: false,
    log_price_levels: false,
    log_pointer_events: false,
    log_klines: false,
    log_performance: false,
};
