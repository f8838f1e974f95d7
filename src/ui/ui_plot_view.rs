use eframe::egui::{Pos2, Ui, Vec2, Vec2b};
use egui_plot::{AxisHints, HPlacement, Plot, PlotBounds, PlotTransform, VPlacement};

use crate::chart::{
    Chart, ChartPoint, Entity, EntityId, EntityStore, LabelStyle, PointerEvent, ShapeGeometry,
    ShapeStyle, SubscriptionId,
};
use crate::config::{API, plot::PLOT_CONFIG};
use crate::domain::Candle;
use crate::ui::plot_layers::{
    AnnotationLayer, CandlestickLayer, LastPriceLayer, LayerContext, PlotLayer,
};
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::format_price;
use crate::utils::{TimeUtils, epoch_sec_to_label};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Extra candle slots to the right of the last bar, room for level labels.
const RIGHT_MARGIN_CANDLES: f64 = 8.0;

/// The dashboard's chart: candles on an `egui_plot`, plus every entity the
/// overlay and price level tool created through the [`Chart`] trait.
pub struct PlotCanvas {
    store: EntityStore,
    symbol: String,
    candles: Vec<Candle>,
    interval_secs: f64,
    /// Last frame's screen <-> data mapping, for `coords_to_price`.
    transform: Option<PlotTransform>,
}

impl Default for PlotCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotCanvas {
    pub fn new() -> Self {
        let interval_secs = TimeUtils::interval_to_secs(API.klines.interval)
            .unwrap_or(TimeUtils::S_IN_H) as f64;
        Self {
            store: EntityStore::new(),
            symbol: String::new(),
            candles: Vec::new(),
            interval_secs,
            transform: None,
        }
    }

    pub fn set_candles(&mut self, symbol: impl Into<String>, candles: Vec<Candle>) {
        self.symbol = symbol.into();
        self.candles = candles;
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn entities(&self) -> &EntityStore {
        &self.store
    }

    /// Union of candle ranges and pattern segments. Horizontal lines are left
    /// out so dragging a level never rescales the view under the pointer.
    fn data_bounds(&self) -> Option<PlotBounds> {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        let mut extend = |time: f64, low: f64, high: f64| {
            x = (x.0.min(time), x.1.max(time));
            y = (y.0.min(low), y.1.max(high));
        };

        for c in &self.candles {
            extend(c.open_time as f64, c.low_price, c.high_price);
        }
        for (_, entity) in self.store.iter() {
            if let Entity::Shape(ShapeGeometry::Segment { from, to }, _) = entity {
                extend(from.time as f64, from.price, from.price);
                extend(to.time as f64, to.price, to.price);
            }
        }

        if !(x.0.is_finite() && y.0.is_finite()) {
            return None;
        }

        let pad = ((y.1 - y.0) * PLOT_CONFIG.plot_y_padding_pct).max(y.1.abs() * 0.001);
        Some(PlotBounds::from_min_max(
            [x.0 - self.interval_secs, y.0 - pad],
            [x.1 + self.interval_secs * RIGHT_MARGIN_CANDLES, y.1 + pad],
        ))
    }

    pub fn show(&mut self, ui: &mut Ui) {
        let bounds = self.data_bounds();
        let last_close = self.candles.last().map(|c| c.close_price);

        let ctx = LayerContext {
            candles: &self.candles,
            entities: &self.store,
            interval_secs: self.interval_secs,
            last_close,
        };

        let layers: [&dyn PlotLayer; 3] = [&CandlestickLayer, &LastPriceLayer, &AnnotationLayer];

        let response = crate::trace_time!("Render chart", 4000, {
            Plot::new("pattern_chart")
                .custom_x_axes(vec![create_time_axis()])
                .custom_y_axes(vec![create_y_axis(&self.symbol)])
                .label_formatter(|_, _| String::new())
                .allow_double_click_reset(false)
                .allow_scroll(false)
                .allow_drag(Vec2b { x: false, y: false })
                .allow_zoom(Vec2b { x: false, y: false })
                .show(ui, |plot_ui| {
                    if let Some(bounds) = bounds {
                        plot_ui.set_plot_bounds(bounds);
                    }
                    for layer in layers {
                        layer.render(plot_ui, &ctx);
                    }
                })
        });

        self.transform = Some(response.transform);
        self.publish_pointer(ui, &response.response, &response.transform);
    }

    /// Turns this frame's raw input into [`PointerEvent`]s for every subscriber.
    fn publish_pointer(
        &mut self,
        ui: &Ui,
        response: &eframe::egui::Response,
        transform: &PlotTransform,
    ) {
        let (pressed, released, pos, delta) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos().or(i.pointer.hover_pos()),
                i.pointer.delta(),
            )
        });

        let mut events = Vec::with_capacity(3);
        if let Some(pos) = pos {
            if pressed && response.hovered() {
                let value = transform.value_from_position(pos);
                events.push(PointerEvent::Down {
                    time: value.x as i64,
                    price: value.y,
                });
            }
            if delta != Vec2::ZERO {
                events.push(PointerEvent::Move { pixel_y: pos.y });
            }
        }
        if released {
            events.push(PointerEvent::Up);
        }

        for event in events {
            #[cfg(debug_assertions)]
            if DF.log_pointer_events {
                log::info!("Chart pointer: {:?}", event);
            }
            self.store.publish(event);
        }
    }
}

impl Chart for PlotCanvas {
    fn create_shape(&mut self, geometry: ShapeGeometry, style: ShapeStyle) -> EntityId {
        self.store.insert(Entity::Shape(geometry, style))
    }

    fn create_label(&mut self, at: ChartPoint, label: LabelStyle) -> EntityId {
        self.store.insert(Entity::Label(at, label))
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.store.remove(id);
    }

    fn coords_to_price(&self, pixel_y: f32) -> Option<f64> {
        let transform = self.transform.as_ref()?;
        let x = transform.frame().left();
        Some(transform.value_from_position(Pos2::new(x, pixel_y)).y)
    }

    fn last_close(&self) -> f64 {
        self.candles.last().map_or(0.0, |c| c.close_price)
    }

    fn last_time(&self) -> i64 {
        self.candles.last().map_or(0, |c| c.open_time)
    }

    fn subscribe_pointer(&mut self) -> SubscriptionId {
        self.store.subscribe()
    }

    fn unsubscribe_pointer(&mut self, id: SubscriptionId) {
        self.store.unsubscribe(id);
    }

    fn drain_pointer_events(&mut self, id: SubscriptionId) -> Vec<PointerEvent> {
        self.store.drain(id)
    }
}

fn create_time_axis() -> AxisHints<'static> {
    AxisHints::new_x()
        .label(UI_TEXT.plot_x_axis.as_str())
        .formatter(|mark, _range| epoch_sec_to_label(mark.value as i64, TimeUtils::AXIS_TIME_FORMAT))
        .placement(VPlacement::Bottom)
}

fn create_y_axis(symbol: &str) -> AxisHints<'static> {
    let label = format!("{}  {}", symbol, UI_TEXT.plot_y_axis);
    AxisHints::new_y()
        .label(label)
        .formatter(|grid_mark, _range| format_price(grid_mark.value))
        .placement(HPlacement::Right)
}
