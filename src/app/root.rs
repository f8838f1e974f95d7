use std::sync::Arc;
use std::time::Duration;

use eframe::{
    Frame, Storage,
    egui::{Context, FontFamily, FontId, TextStyle},
};

use crate::{
    Cli,
    app::PersistedView,
    data::{
        AlertDispatch, AlertRequest, AlertSender, BinanceKlines, CandleLoader, FeedPoller,
        HttpBackend, KlineSource, PatternSource, build_http_client,
    },
    domain::{PatternFeed, PatternRecord, PatternStats},
    levels::PriceLevels,
    overlay::PatternOverlay,
    ui::{LevelsAction, PlotCanvas, setup_custom_visuals},
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Repaint cadence while a request is out, so finished promises get picked up.
const IN_FLIGHT_REPAINT: Duration = Duration::from_millis(100);

pub struct DashboardApp {
    pub(crate) view: PersistedView,
    pub(crate) canvas: PlotCanvas,
    pub(crate) overlay: PatternOverlay,
    pub(crate) levels: PriceLevels,
    pub(crate) feed: FeedPoller,
    pub(crate) alerts: AlertDispatch,
    pub(crate) candles: CandleLoader,
    pub(crate) patterns: Vec<PatternRecord>,
    pub(crate) stats: PatternStats,
    pub(crate) selected: Option<PatternRecord>,
}

impl DashboardApp {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        let mut view: PersistedView = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        if let Some(symbol) = args.symbol {
            view.symbol = Some(symbol.to_uppercase());
        }

        Self::configure_text_styles(&cc.egui_ctx);
        setup_custom_visuals(&cc.egui_ctx);

        let client = build_http_client().unwrap_or_else(|e| {
            log::error!("Falling back to default HTTP client: {:#}", e);
            reqwest::Client::new()
        });
        let backend = Arc::new(HttpBackend::new(client.clone(), args.api_base));
        log::info!("Pattern backend at {}", backend.base_url());
        let klines = Arc::new(BinanceKlines::new(client));

        Self::with_sources(view, backend.clone(), backend, klines)
    }

    pub(crate) fn with_sources(
        view: PersistedView,
        patterns: Arc<dyn PatternSource>,
        alerts: Arc<dyn AlertSender>,
        klines: Arc<dyn KlineSource>,
    ) -> Self {
        let mut canvas = PlotCanvas::new();
        let levels = PriceLevels::new(&mut canvas);

        let mut app = Self {
            view,
            canvas,
            overlay: PatternOverlay::new(),
            levels,
            feed: FeedPoller::new(patterns),
            alerts: AlertDispatch::new(alerts),
            candles: CandleLoader::new(klines),
            patterns: Vec::new(),
            stats: PatternStats::default(),
            selected: None,
        };

        if let Some(symbol) = app.view.symbol.clone() {
            app.candles.request(&symbol);
        }
        app
    }

    fn configure_text_styles(ctx: &Context) {
        ctx.style_mut(|style| {
            style
                .text_styles
                .insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
            style.interaction.selectable_labels = false;
        });
    }

    /// Symbol the chart is showing, or about to show once candles land.
    pub(crate) fn current_symbol(&self) -> Option<&str> {
        self.view.symbol.as_deref()
    }

    /// Patterns detected on the charted symbol.
    fn chart_patterns(&self) -> Vec<PatternRecord> {
        let symbol = self.canvas.symbol();
        if symbol.is_empty() {
            return Vec::new();
        }
        self.patterns
            .iter()
            .filter(|p| p.symbol == symbol)
            .cloned()
            .collect()
    }

    pub(crate) fn redraw_overlay(&mut self) {
        let patterns = self.chart_patterns();
        self.overlay.draw_patterns(&mut self.canvas, &patterns);
    }

    pub(crate) fn apply_feed(&mut self, feed: PatternFeed) {
        #[cfg(debug_assertions)]
        if DF.log_feed_polls {
            log::info!(
                "Feed: {} patterns, {} active coins",
                feed.patterns.len(),
                feed.stats.active_coins
            );
        }

        self.stats = feed.stats;
        self.patterns = feed.patterns;

        // Keep the details panel in step with the newest copy of the selection.
        if let Some(id) = self.selected.as_ref().and_then(|s| s.id) {
            if let Some(fresh) = self.patterns.iter().find(|p| p.id == Some(id)) {
                self.selected = Some(fresh.clone());
            }
        }
        self.redraw_overlay();
    }

    fn tick_candles(&mut self) {
        let Some((symbol, candles)) = self.candles.poll() else {
            return;
        };
        if self.current_symbol() != Some(symbol.as_str()) {
            return;
        }

        #[cfg(debug_assertions)]
        if DF.log_klines {
            log::info!("Loaded {} candles for {}", candles.len(), symbol);
        }

        self.canvas.set_candles(symbol, candles);
        self.redraw_overlay();
        self.levels.draw(&mut self.canvas);
    }

    pub(crate) fn select_pattern(&mut self, pattern: PatternRecord) {
        let symbol = pattern.symbol.clone();
        if self.canvas.symbol() != symbol {
            self.view.symbol = Some(symbol.clone());
            self.candles.request(&symbol);
        }
        if let Some((entry, stop_loss, take_profit)) = pattern.suggested_levels() {
            self.levels
                .set_levels(&mut self.canvas, entry, stop_loss, take_profit);
        }
        self.selected = Some(pattern);
    }

    pub(crate) fn handle_levels_action(&mut self, action: LevelsAction) {
        match action {
            LevelsAction::ToggleVisibility => {
                if self.levels.is_visible() {
                    self.levels.hide(&mut self.canvas);
                } else {
                    self.levels.show(&mut self.canvas);
                }
            }
            LevelsAction::UseSuggested => {
                if let Some((entry, stop_loss, take_profit)) =
                    self.selected.as_ref().and_then(|p| p.suggested_levels())
                {
                    self.levels
                        .set_levels(&mut self.canvas, entry, stop_loss, take_profit);
                }
            }
            LevelsAction::SendAlert => {
                let Some(symbol) = self.current_symbol() else {
                    log::warn!("Alert requested with no symbol on the chart");
                    return;
                };
                let request = AlertRequest::new(symbol, self.levels.levels());
                self.alerts.send(request);
            }
        }
    }

    fn next_repaint(&self) -> Duration {
        if self.feed.is_fetching() || self.candles.is_loading() || self.alerts.pending() > 0 {
            IN_FLIGHT_REPAINT
        } else {
            self.feed.time_until_next()
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        if let Some(feed) = self.feed.poll() {
            self.apply_feed(feed);
        }
        self.tick_candles();
        self.alerts.poll();

        self.render_top_panel(ctx);
        self.render_status_panel(ctx);
        self.render_left_panel(ctx);
        self.render_right_panel(ctx);
        self.render_central_panel(ctx);
        self.render_notification(ctx);

        // Pointer events published by the canvas this frame.
        self.levels.pump(&mut self.canvas);

        ctx.request_repaint_after(self.next_repaint());
    }

    fn save(&mut self, storage: &mut dyn Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.view);
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        self.levels.cleanup(&mut self.canvas);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::data::AlertResponse;
    use crate::domain::{Candle, PatternPoint, PatternType, TradeDirection};
    use anyhow::Result;
    use async_trait::async_trait;

    struct Offline;

    #[async_trait]
    impl PatternSource for Offline {
        async fn fetch_patterns(&self) -> Result<PatternFeed> {
            Ok(PatternFeed::default())
        }
    }

    #[async_trait]
    impl AlertSender for Offline {
        async fn send_alert(&self, _request: &AlertRequest) -> Result<AlertResponse> {
            Ok(AlertResponse {
                success: true,
                error: None,
            })
        }
    }

    #[async_trait]
    impl KlineSource for Offline {
        async fn fetch_candles(&self, _symbol: &str) -> Result<Vec<Candle>> {
            Ok(Vec::new())
        }
    }

    fn app() -> DashboardApp {
        let offline = Arc::new(Offline);
        DashboardApp::with_sources(
            PersistedView::default(),
            offline.clone(),
            offline.clone(),
            offline,
        )
    }

    fn double_top(symbol: &str, id: i64) -> PatternRecord {
        let points = (0..4)
            .map(|i| PatternPoint::new(1_700_000_000 + i * 3600, 100.0 + (i % 2) as f64 * 10.0))
            .collect();
        let mut p = PatternRecord::new(PatternType::DoubleTop, 0.82, points);
        p.symbol = symbol.to_string();
        p.id = Some(id);
        p
    }

    fn chart_btc(app: &mut DashboardApp) {
        app.view.symbol = Some("BTCUSDT".into());
        app.canvas.set_candles(
            "BTCUSDT",
            vec![Candle::new(1_700_000_000, 100.0, 112.0, 98.0, 105.0)],
        );
    }

    #[test]
    fn overlay_only_draws_the_charted_symbol() {
        let mut app = app();
        chart_btc(&mut app);
        app.apply_feed(PatternFeed {
            patterns: vec![
                double_top("BTCUSDT", 1),
                double_top("ETHUSDT", 2),
                double_top("BTCUSDT", 3),
            ],
            stats: PatternStats {
                total_patterns: 3,
                ..Default::default()
            },
        });

        assert_eq!(app.patterns.len(), 3);
        assert_eq!(app.stats.total_patterns, 3);
        assert_eq!(app.overlay.patterns().len(), 2);
        assert_eq!(app.overlay.label_count(), 2);
    }

    #[test]
    fn new_feed_refreshes_the_selection() {
        let mut app = app();
        chart_btc(&mut app);
        app.select_pattern(double_top("BTCUSDT", 7));

        let mut updated = double_top("BTCUSDT", 7);
        updated.confidence = 0.91;
        app.apply_feed(PatternFeed {
            patterns: vec![updated],
            stats: PatternStats::default(),
        });
        assert_eq!(app.selected.as_ref().map(|p| p.confidence), Some(0.91));
    }

    #[test]
    fn selecting_a_pattern_applies_its_suggested_levels() {
        let mut app = app();
        chart_btc(&mut app);

        let mut p = double_top("ETHUSDT", 4);
        p.entry_price = Some(100.0);
        p.stop_loss = Some(110.0);
        p.take_profit = Some(80.0);
        app.select_pattern(p);

        assert_eq!(app.current_symbol(), Some("ETHUSDT"));
        assert!(app.candles.is_loading());
        let rr = app.levels.risk_reward().unwrap();
        assert_eq!(rr.direction, TradeDirection::Short);
        assert_eq!(rr.ratio_text(), "1:2.00");
    }

    #[test]
    fn toggle_and_alert_actions() {
        let mut app = app();
        app.handle_levels_action(LevelsAction::SendAlert);
        assert_eq!(app.alerts.pending(), 0);

        chart_btc(&mut app);
        app.levels
            .set_levels(&mut app.canvas, Some(100.0), Some(90.0), Some(120.0));
        let drawn = app.canvas.entities().len();
        assert!(drawn > 0);

        app.handle_levels_action(LevelsAction::ToggleVisibility);
        assert!(!app.levels.is_visible());
        assert_eq!(app.levels.annotation_count(), 0);

        app.handle_levels_action(LevelsAction::ToggleVisibility);
        assert!(app.levels.is_visible());
        assert_eq!(app.canvas.entities().len(), drawn);

        app.handle_levels_action(LevelsAction::SendAlert);
        assert_eq!(app.alerts.pending(), 1);
    }

    #[test]
    fn cleanup_releases_the_pointer_subscription() {
        let mut app = app();
        assert!(app.levels.is_attached());
        app.levels.cleanup(&mut app.canvas);
        assert!(!app.levels.is_attached());
        assert_eq!(app.canvas.entities().subscriber_count(), 0);
        // Drop runs cleanup again on an already detached app.
        drop(app);
    }
}
