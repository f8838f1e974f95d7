use eframe::egui::{Context, Visuals};

use crate::ui::ui_config::UI_CONFIG;

/// Sets up custom visuals for the entire application
pub fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();

    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;

    // Make the widgets stand out a bit more
    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;

    ctx.set_visuals(visuals);
}

/// Formats a price with "Trader Precision".
/// - Large (>1000): 2 decimals ($95,123.50)
/// - Medium (1-1000): 4 decimals ($12.4829)
/// - Small (<1): 5-8 decimals ($0.00000231)
pub fn format_price(price: f64) -> String {
    if price == 0.0 {
        return "$0.00".to_string();
    }

    let abs_price = price.abs();
    if abs_price >= 1000.0 {
        format!("${:.2}", price)
    } else if abs_price >= 1.0 {
        format!("${:.4}", price)
    } else if abs_price >= 0.01 {
        format!("${:.5}", price)
    } else {
        format!("${:.8}", price)
    }
}

/// `+1.25%` / `-0.40%`
pub fn format_signed_pct(pct: f64) -> String {
    format!("{:+.2}%", pct)
}

pub fn format_countdown(secs: u64) -> String {
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trader_precision() {
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(65000.5), "$65000.50");
        assert_eq!(format_price(12.48291), "$12.4829");
        assert_eq!(format_price(0.0000023), "$0.00000230");
    }

    #[test]
    fn small_formatters() {
        assert_eq!(format_signed_pct(1.25), "+1.25%");
        assert_eq!(format_signed_pct(-0.4), "-0.40%");
        assert_eq!(format_countdown(59), "59s");
        assert_eq!(format_countdown(61), "1m 01s");
    }
}
