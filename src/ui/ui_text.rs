use std::sync::LazyLock;

pub struct UiText {
    pub app_title: String,

    // --- Left panel ---
    pub lp_patterns_heading: String,
    pub lp_search_hint: String,
    pub lp_type_filter: String,
    pub lp_retest_filter: String,
    pub lp_all: String,
    pub lp_no_patterns: String,
    pub lp_count_suffix: String,

    // --- Stats ---
    pub stats_total: String,
    pub stats_recent: String,
    pub stats_active_coins: String,
    pub stats_accuracy: String,

    // --- PLOT LABELS ---
    pub plot_x_axis: String,
    pub plot_y_axis: String,
    pub plot_loading: String,
    pub plot_select_pattern: String,

    // --- Price levels ---
    pub pl_heading: String,
    pub pl_show: String,
    pub pl_hide: String,
    pub pl_reset: String,
    pub pl_alert_button: String,
    pub pl_ratio_prefix: String,
    pub pl_incomplete: String,
    pub pl_entry_distance: String,

    // --- Status bar ---
    pub sb_fetching: String,
    pub sb_next_poll: String,
    pub sb_feed_error: String,
    pub sb_alerts_pending: String,

    // --- Pattern details ---
    pub pd_confidence: String,
    pub pd_retest: String,
    pub pd_detected: String,
    pub pd_vertices: String,

    pub label_long: String,
    pub label_short: String,
    pub label_dismiss: String,
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    app_title: "Pattern Scope".to_string(),

    lp_patterns_heading: "Detected Patterns".to_string(),
    lp_search_hint: "Search symbol or description".to_string(),
    lp_type_filter: "Type".to_string(),
    lp_retest_filter: "Retest".to_string(),
    lp_all: "All".to_string(),
    lp_no_patterns: "No patterns match the current filters.".to_string(),
    lp_count_suffix: "shown".to_string(),

    stats_total: "Total (24h)".to_string(),
    stats_recent: "Last hour".to_string(),
    stats_active_coins: "Active coins".to_string(),
    stats_accuracy: "Accuracy".to_string(),

    plot_x_axis: "Time (UTC)".to_string(),
    plot_y_axis: "Price".to_string(),
    plot_loading: "Loading candles...".to_string(),
    plot_select_pattern: "Select a pattern to load its chart.".to_string(),

    pl_heading: "Price Levels".to_string(),
    pl_show: "Show levels".to_string(),
    pl_hide: "Hide levels".to_string(),
    pl_reset: "Use suggested levels".to_string(),
    pl_alert_button: "Alert".to_string(),
    pl_ratio_prefix: "R/R:".to_string(),
    pl_incomplete: "Place entry, stop loss and take profit to see risk/reward.".to_string(),
    pl_entry_distance: "Entry vs last close".to_string(),

    sb_fetching: "Fetching patterns...".to_string(),
    sb_next_poll: "Next refresh in".to_string(),
    sb_feed_error: "Feed error:".to_string(),
    sb_alerts_pending: "alerts in flight".to_string(),

    pd_confidence: "Confidence".to_string(),
    pd_retest: "Retest".to_string(),
    pd_detected: "Detected".to_string(),
    pd_vertices: "Vertices".to_string(),

    label_long: "LONG".to_string(),
    label_short: "SHORT".to_string(),
    label_dismiss: "Dismiss".to_string(),
});
