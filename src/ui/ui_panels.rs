use eframe::egui::{
    Align, Align2, Button, ComboBox, Context, FontId, Frame, Layout, RichText, ScrollArea, Stroke,
    TextEdit, Ui, Window,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::config::PLOT_CONFIG;
use crate::data::AlertOutcome;
use crate::domain::{PatternRecord, PatternStats, PatternType, RetestStatus, TradeDirection};
use crate::levels::PriceLevels;
use crate::ui::styles::{SemanticColor, UiStyleExt};
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::{format_price, format_signed_pct};
use crate::utils::naive_to_label;

/// Search box plus the two dropdowns above the pattern list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternFilter {
    pub search: String,
    pub pattern_type: Option<PatternType>,
    pub retest: Option<RetestStatus>,
}

impl PatternFilter {
    /// Case-insensitive substring on symbol or description; exact match on the dropdowns.
    pub fn matches(&self, pattern: &PatternRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || pattern.symbol.to_lowercase().contains(&needle)
            || pattern.description.to_lowercase().contains(&needle);

        let matches_type = self
            .pattern_type
            .is_none_or(|t| pattern.known_type() == Some(t));
        let matches_retest = self.retest.is_none_or(|r| pattern.retest_status == r);

        matches_search && matches_type && matches_retest
    }
}

/// Highest confidence first; ties keep feed order.
pub fn filter_patterns<'a>(
    patterns: &'a [PatternRecord],
    filter: &PatternFilter,
) -> Vec<&'a PatternRecord> {
    patterns
        .iter()
        .filter(|p| filter.matches(p))
        .sorted_by(|a, b| b.confidence.total_cmp(&a.confidence))
        .collect()
}

/// Symbols with the most detections, most first, alphabetical on ties.
pub fn top_symbols(patterns: &[PatternRecord], limit: usize) -> Vec<(String, usize)> {
    patterns
        .iter()
        .map(|p| p.symbol.clone())
        .counts()
        .into_iter()
        .sorted_by(|(sa, ca), (sb, cb)| cb.cmp(ca).then_with(|| sa.cmp(sb)))
        .take(limit)
        .collect()
}

pub fn retest_label(status: RetestStatus) -> &'static str {
    match status {
        RetestStatus::Confirmed => "Retested",
        RetestStatus::Failed => "Retest failed",
        RetestStatus::Pending => "Awaiting retest",
        RetestStatus::None => "No retest",
    }
}

fn pattern_title(pattern: &PatternRecord) -> String {
    match pattern.known_type() {
        Some(t) => t.title(),
        None => pattern.pattern_type.to_string(),
    }
}

pub(crate) fn render_stats(ui: &mut Ui, stats: &PatternStats) {
    ui.horizontal_wrapped(|ui| {
        let neutral = PLOT_CONFIG.color_text_neutral;
        ui.metric(&UI_TEXT.stats_total, &stats.total_patterns.to_string(), neutral);
        ui.separator();
        ui.metric(&UI_TEXT.stats_recent, &stats.recent_patterns.to_string(), neutral);
        ui.separator();
        ui.metric(&UI_TEXT.stats_active_coins, &stats.active_coins.to_string(), neutral);
        ui.separator();
        ui.metric(
            &UI_TEXT.stats_accuracy,
            &format!("{:.1}%", stats.accuracy_rate * 100.0),
            PLOT_CONFIG.color_info,
        );
    });
}

pub(crate) fn render_top_symbols(ui: &mut Ui, top: &[(String, usize)]) {
    if top.is_empty() {
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for (symbol, count) in top {
            ui.label_subdued(format!("{} ×{}", symbol, count));
        }
    });
}

pub(crate) fn render_filters(ui: &mut Ui, filter: &mut PatternFilter) {
    ui.add(
        TextEdit::singleline(&mut filter.search)
            .hint_text(UI_TEXT.lp_search_hint.as_str())
            .desired_width(f32::INFINITY),
    );

    ui.horizontal(|ui| {
        let type_text = filter
            .pattern_type
            .map_or_else(|| UI_TEXT.lp_all.clone(), |t| t.title());
        ComboBox::from_label(UI_TEXT.lp_type_filter.as_str())
            .selected_text(type_text)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter.pattern_type, None, UI_TEXT.lp_all.as_str());
                for t in PatternType::iter() {
                    ui.selectable_value(&mut filter.pattern_type, Some(t), t.title());
                }
            });

        let retest_text = filter
            .retest
            .map_or(UI_TEXT.lp_all.as_str(), retest_label);
        ComboBox::from_label(UI_TEXT.lp_retest_filter.as_str())
            .selected_text(retest_text)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter.retest, None, UI_TEXT.lp_all.as_str());
                for status in RetestStatus::iter() {
                    ui.selectable_value(&mut filter.retest, Some(status), retest_label(status));
                }
            });
    });
}

/// Returns the row the user clicked this frame.
pub(crate) fn render_pattern_list(
    ui: &mut Ui,
    rows: &[&PatternRecord],
    selected: Option<&PatternRecord>,
) -> Option<PatternRecord> {
    ui.label_subdued(format!("{} {}", rows.len(), UI_TEXT.lp_count_suffix));

    if rows.is_empty() {
        ui.label_subdued(UI_TEXT.lp_no_patterns.as_str());
        return None;
    }

    let mut clicked = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show_rows(ui, UI_CONFIG.list_row_height, rows.len(), |ui, range| {
            for pattern in &rows[range] {
                let is_selected = selected.is_some_and(|s| s == *pattern);
                let text = format!(
                    "{}  {}  {}",
                    pattern.symbol,
                    pattern_title(pattern),
                    pattern.confidence_label()
                );
                let response = ui.interactive_label(
                    &text,
                    is_selected,
                    pattern.confidence_tier().color(),
                    FontId::proportional(13.0),
                );
                ui.horizontal(|ui| {
                    let status = pattern.retest_status;
                    ui.label(RichText::new(retest_label(status)).small().color(status.color()));
                    if let Some(ts) = &pattern.timestamp {
                        ui.label_subdued(naive_to_label(ts));
                    }
                });
                if response.clicked() {
                    clicked = Some((*pattern).clone());
                }
            }
        });
    clicked
}

pub(crate) fn render_pattern_details(ui: &mut Ui, pattern: &PatternRecord) {
    ui.label_subheader(format!("{} · {}", pattern.symbol, pattern_title(pattern)));
    if !pattern.description.is_empty() {
        ui.label(RichText::new(&pattern.description).small());
    }
    ui.metric(
        &UI_TEXT.pd_confidence,
        &pattern.confidence_label(),
        pattern.confidence_tier().color(),
    );

    let retest = match &pattern.retest_description {
        Some(desc) if !desc.is_empty() => desc.clone(),
        _ => retest_label(pattern.retest_status).to_string(),
    };
    ui.metric(&UI_TEXT.pd_retest, &retest, pattern.retest_status.color());

    if let Some(ts) = &pattern.timestamp {
        ui.metric(&UI_TEXT.pd_detected, &naive_to_label(ts), PLOT_CONFIG.color_text_neutral);
    }
    ui.metric(
        &UI_TEXT.pd_vertices,
        &pattern.points.len().to_string(),
        PLOT_CONFIG.color_text_neutral,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelsAction {
    SendAlert,
    ToggleVisibility,
    UseSuggested,
}

pub(crate) fn render_levels_panel(
    ui: &mut Ui,
    levels: &PriceLevels,
    has_suggestion: bool,
) -> Option<LevelsAction> {
    let mut action = None;

    ui.label_subheader(UI_TEXT.pl_heading.as_str());
    ui.horizontal(|ui| {
        let toggle = if levels.is_visible() {
            &UI_TEXT.pl_hide
        } else {
            &UI_TEXT.pl_show
        };
        if ui.small_button(toggle.as_str()).clicked() {
            action = Some(LevelsAction::ToggleVisibility);
        }
        if ui
            .add_enabled(has_suggestion, Button::new(UI_TEXT.pl_reset.as_str()).small())
            .clicked()
        {
            action = Some(LevelsAction::UseSuggested);
        }
    });

    let set = levels.levels();
    for (label, value, color) in [
        ("Entry", set.entry, PLOT_CONFIG.entry_color),
        ("SL", set.stop_loss, PLOT_CONFIG.stop_loss_color),
        ("TP", set.take_profit, PLOT_CONFIG.take_profit_color),
    ] {
        let text = value.map_or_else(|| "--".to_string(), format_price);
        ui.metric(label, &text, color);
    }

    let Some(panel) = levels.panel() else {
        ui.label_subdued(UI_TEXT.pl_incomplete.as_str());
        return action;
    };

    Frame::group(ui.style())
        .stroke(Stroke::new(1.0, PLOT_CONFIG.color_warning))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let direction = match panel.direction {
                    TradeDirection::Long => &UI_TEXT.label_long,
                    TradeDirection::Short => &UI_TEXT.label_short,
                };
                ui.badge(direction, panel.direction.color());
                ui.label(
                    RichText::new(format!("{} {}", UI_TEXT.pl_ratio_prefix, panel.ratio_text))
                        .color(PLOT_CONFIG.color_warning),
                );
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button(UI_TEXT.pl_alert_button.as_str()).clicked() {
                        action = Some(LevelsAction::SendAlert);
                    }
                });
            });
            if let Some(pct) = panel.entry_distance_pct {
                ui.metric(
                    &UI_TEXT.pl_entry_distance,
                    &format_signed_pct(pct),
                    PLOT_CONFIG.color_text_neutral,
                );
            }
        });

    action
}

/// Floating notice for the last resolved alert. Returns true when dismissed.
pub(crate) fn render_alert_notification(ctx: &Context, outcome: &AlertOutcome) -> bool {
    let mut dismissed = false;
    let color = if outcome.is_success() {
        PLOT_CONFIG.color_long
    } else {
        PLOT_CONFIG.color_short
    };

    Window::new("alert_notification")
        .title_bar(false)
        .resizable(false)
        .anchor(Align2::RIGHT_TOP, [-16.0, 56.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(outcome.message()).color(color));
            if ui.small_button(UI_TEXT.label_dismiss.as_str()).clicked() {
                dismissed = true;
            }
        });
    dismissed
}
