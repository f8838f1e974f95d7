//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    // --- PATTERN OVERLAY ---
    /// Stroke for detections at or above the high-confidence threshold
    pub pattern_alert_color: Color32,
    /// Stroke for everything below it
    pub pattern_warning_color: Color32,
    pub pattern_line_width: f32,
    /// Dash length (screen px) for necklines and trendlines
    pub guide_dash_length: f32,
    pub pattern_label_size: f32,

    // --- PRICE LEVELS ---
    pub entry_color: Color32,
    pub stop_loss_color: Color32,
    pub take_profit_color: Color32,
    pub level_line_width: f32,
    pub level_dot_spacing: f32,
    pub level_label_size: f32,

    // --- CANDLESTICKS ---
    pub candle_bullish_color: Color32,
    pub candle_bearish_color: Color32,
    pub candle_width_pct: f64, // 0.0 to 1.0 (relative to candle interval)
    pub candle_wick_width: f32,

    pub plot_y_padding_pct: f64,

    // --- SEMANTIC COLORS ---
    pub color_long: Color32,
    pub color_short: Color32,
    pub color_info: Color32,
    pub color_warning: Color32,
    pub color_confidence_high: Color32,
    pub color_confidence_medium: Color32,
    pub color_confidence_low: Color32,

    pub color_text_neutral: Color32,
    pub color_text_subdued: Color32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    pattern_alert_color: Color32::from_rgb(242, 54, 69), // #f23645
    pattern_warning_color: Color32::from_rgb(255, 165, 0), // #ffa500
    pattern_line_width: 2.0,
    guide_dash_length: 8.0,
    pattern_label_size: 12.0,

    entry_color: Color32::from_rgb(255, 215, 0),      // Gold
    stop_loss_color: Color32::from_rgb(242, 54, 69),  // TradingView Red
    take_profit_color: Color32::from_rgb(8, 153, 129), // TradingView Green
    level_line_width: 2.0,
    level_dot_spacing: 4.0,
    level_label_size: 11.0,

    candle_bullish_color: Color32::from_rgb(38, 166, 154),
    candle_bearish_color: Color32::from_rgb(239, 83, 80),
    candle_width_pct: 0.8, // leaves a small gap between candles
    candle_wick_width: 1.0,

    plot_y_padding_pct: 0.05,

    color_long: Color32::from_rgb(25, 135, 84),
    color_short: Color32::from_rgb(220, 53, 69),
    color_info: Color32::from_rgb(173, 216, 230),
    color_warning: Color32::from_rgb(255, 193, 7),
    color_confidence_high: Color32::from_rgb(100, 255, 100),
    color_confidence_medium: Color32::from_rgb(255, 193, 7),
    color_confidence_low: Color32::from_rgb(255, 80, 80),

    color_text_neutral: Color32::LIGHT_GRAY,
    color_text_subdued: Color32::GRAY,
};
