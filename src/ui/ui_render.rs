use eframe::egui::{CentralPanel, Context, RichText, ScrollArea, SidePanel, TopBottomPanel, Ui};

use crate::app::DashboardApp;
use crate::config::plot::PLOT_CONFIG;
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_panels::{
    filter_patterns, render_alert_notification, render_filters, render_levels_panel,
    render_pattern_details, render_pattern_list, render_stats, render_top_symbols, top_symbols,
};
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::{format_countdown, format_price};

/// Number of symbols in the "most active" strip.
const TOP_SYMBOLS: usize = 5;

impl DashboardApp {
    pub(crate) fn render_top_panel(&mut self, ctx: &Context) {
        TopBottomPanel::top("top_toolbar")
            .frame(UI_CONFIG.top_panel_frame())
            .min_height(30.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new(&UI_TEXT.app_title).color(UI_CONFIG.colors.heading));
                    ui.separator();
                    render_stats(ui, &self.stats);
                });
            });
    }

    pub(crate) fn render_status_panel(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status_panel")
            .frame(UI_CONFIG.bottom_panel_frame())
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    self.render_status_feed(ui);
                    ui.separator();
                    self.render_status_chart(ui);

                    let pending = self.alerts.pending();
                    if pending > 0 {
                        ui.separator();
                        ui.label_subdued(format!("{} {}", pending, UI_TEXT.sb_alerts_pending));
                    }
                });
            });
    }

    fn render_status_feed(&self, ui: &mut Ui) {
        if self.feed.is_fetching() {
            ui.spinner();
            ui.label_subdued(UI_TEXT.sb_fetching.as_str());
        } else {
            let secs = self.feed.time_until_next().as_secs();
            ui.label_subdued(format!("{} {}", UI_TEXT.sb_next_poll, format_countdown(secs)));
        }

        if let Some(err) = self.feed.last_error() {
            ui.separator();
            ui.label(
                RichText::new(format!("{} {}", UI_TEXT.sb_feed_error, err))
                    .small()
                    .color(PLOT_CONFIG.color_short),
            );
        }
    }

    fn render_status_chart(&self, ui: &mut Ui) {
        let symbol = self.canvas.symbol();
        if symbol.is_empty() {
            return;
        }
        ui.label(RichText::new(symbol).small().strong());
        if let Some(last) = self.canvas.candles().last() {
            ui.label(
                RichText::new(format_price(last.close_price))
                    .small()
                    .color(PLOT_CONFIG.color_warning),
            );
        }
        ui.label_subdued(format!("{} annotations", self.overlay.annotation_count()));
    }

    pub(crate) fn render_left_panel(&mut self, ctx: &Context) {
        let mut clicked = None;

        SidePanel::left("left_panel")
            .default_width(UI_CONFIG.side_panel_width)
            .resizable(true)
            .frame(UI_CONFIG.side_panel_frame())
            .show(ctx, |ui| {
                ui.label_subheader(UI_TEXT.lp_patterns_heading.as_str());
                render_top_symbols(ui, &top_symbols(&self.patterns, TOP_SYMBOLS));
                render_filters(ui, &mut self.view.filter);
                ui.separator();

                let rows = filter_patterns(&self.patterns, &self.view.filter);
                clicked = render_pattern_list(ui, &rows, self.selected.as_ref());
            });

        if let Some(pattern) = clicked {
            self.select_pattern(pattern);
        }
    }

    pub(crate) fn render_right_panel(&mut self, ctx: &Context) {
        let mut action = None;

        SidePanel::right("right_panel")
            .min_width(220.0)
            .resizable(false)
            .frame(UI_CONFIG.side_panel_frame())
            .show(ctx, |ui| {
                ScrollArea::vertical().id_salt("right_panel").show(ui, |ui| {
                    if let Some(pattern) = &self.selected {
                        render_pattern_details(ui, pattern);
                        ui.separator();
                    }
                    let has_suggestion = self
                        .selected
                        .as_ref()
                        .is_some_and(|p| p.suggested_levels().is_some());
                    action = render_levels_panel(ui, &self.levels, has_suggestion);
                });
            });

        if let Some(action) = action {
            self.handle_levels_action(action);
        }
    }

    pub(crate) fn render_central_panel(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(UI_CONFIG.central_panel_frame())
            .show(ctx, |ui| {
                if self.canvas.candles().is_empty() {
                    ui.centered_and_justified(|ui| {
                        if self.candles.is_loading() {
                            ui.label(UI_TEXT.plot_loading.as_str());
                        } else {
                            ui.label(UI_TEXT.plot_select_pattern.as_str());
                        }
                    });
                    return;
                }
                self.canvas.show(ui);
            });
    }

    pub(crate) fn render_notification(&mut self, ctx: &Context) {
        let Some(outcome) = self.alerts.latest() else {
            return;
        };
        if render_alert_notification(ctx, outcome) {
            self.alerts.dismiss();
        }
    }
}
