//! Entry / stop-loss / take-profit markers the user can drag on the chart.

mod panel;

pub use panel::RiskRewardPanel;

use eframe::egui::Color32;
use strum::IntoEnumIterator;

use crate::chart::{
    Chart, ChartPoint, EntityId, LabelStyle, LineKind, PointerEvent, ShapeGeometry, ShapeStyle,
    SubscriptionId,
};
use crate::config::{DF, PLOT_CONFIG};
use crate::domain::{LevelRole, PriceLevelSet, RiskReward, normalize_level};

/// Relative distance from a level's price within which a press grabs it.
pub const LEVEL_HIT_THRESHOLD: f64 = 0.001;

/// True when `price` is within [`LEVEL_HIT_THRESHOLD`] of `level`, relative to the level.
pub fn is_near(price: f64, level: f64) -> bool {
    level != 0.0 && (price - level).abs() / level.abs() < LEVEL_HIT_THRESHOLD
}

pub fn role_color(role: LevelRole) -> Color32 {
    match role {
        LevelRole::Entry => PLOT_CONFIG.entry_color,
        LevelRole::StopLoss => PLOT_CONFIG.stop_loss_color,
        LevelRole::TakeProfit => PLOT_CONFIG.take_profit_color,
    }
}

/// e.g. `SL: 90.00`
pub fn level_text(role: LevelRole, price: f64) -> String {
    format!("{}: {:.2}", role.abbreviation(), price)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(LevelRole),
}

/// Line and label drawn for one level; always created and removed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LevelAnnotations {
    line: EntityId,
    label: EntityId,
}

/// One slot per role.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RoleMap<T> {
    entry: T,
    stop_loss: T,
    take_profit: T,
}

impl<T> RoleMap<T> {
    fn get(&self, role: LevelRole) -> &T {
        match role {
            LevelRole::Entry => &self.entry,
            LevelRole::StopLoss => &self.stop_loss,
            LevelRole::TakeProfit => &self.take_profit,
        }
    }

    fn get_mut(&mut self, role: LevelRole) -> &mut T {
        match role {
            LevelRole::Entry => &mut self.entry,
            LevelRole::StopLoss => &mut self.stop_loss,
            LevelRole::TakeProfit => &mut self.take_profit,
        }
    }
}

pub struct PriceLevels {
    levels: PriceLevelSet,
    annotations: RoleMap<Option<LevelAnnotations>>,
    visible: bool,
    drag: DragState,
    panel: Option<RiskRewardPanel>,
    /// `None` once cleaned up.
    subscription: Option<SubscriptionId>,
}

impl PriceLevels {
    /// Starts visible with no levels placed, listening to the chart's pointer.
    pub fn new<C: Chart + ?Sized>(chart: &mut C) -> Self {
        Self {
            levels: PriceLevelSet::default(),
            annotations: RoleMap::default(),
            visible: true,
            drag: DragState::Idle,
            panel: None,
            subscription: Some(chart.subscribe_pointer()),
        }
    }

    pub fn set_levels<C: Chart + ?Sized>(
        &mut self,
        chart: &mut C,
        entry: Option<f64>,
        stop_loss: Option<f64>,
        take_profit: Option<f64>,
    ) {
        self.levels = PriceLevelSet::new(entry, stop_loss, take_profit);

        #[cfg(debug_assertions)]
        if DF.log_price_levels {
            log::info!("Price levels set: {:?}", self.levels);
        }
        self.draw(chart);
    }

    pub fn show<C: Chart + ?Sized>(&mut self, chart: &mut C) {
        self.visible = true;
        self.draw(chart);
    }

    /// Drops every annotation but keeps the numbers for the next `show`.
    pub fn hide<C: Chart + ?Sized>(&mut self, chart: &mut C) {
        self.visible = false;
        self.drag = DragState::Idle;
        self.clear(chart);
        self.panel = None;
    }

    /// Removes this tool's own lines and labels. Leaves the panel as is.
    pub fn clear<C: Chart + ?Sized>(&mut self, chart: &mut C) {
        for role in LevelRole::iter() {
            if let Some(ann) = self.annotations.get_mut(role).take() {
                chart.remove_entity(ann.line);
                chart.remove_entity(ann.label);
            }
        }
    }

    pub fn draw<C: Chart + ?Sized>(&mut self, chart: &mut C) {
        if !self.visible {
            return;
        }
        self.clear(chart);

        let time = chart.last_time();
        for role in LevelRole::iter() {
            let Some(price) = self.levels.get(role) else {
                continue;
            };
            let color = role_color(role);
            let at = ChartPoint::new(time, price);

            let line = chart.create_shape(
                ShapeGeometry::HorizontalLine { at },
                ShapeStyle {
                    color,
                    width: PLOT_CONFIG.level_line_width,
                    kind: LineKind::Dotted,
                },
            );
            let label = chart.create_label(
                at,
                LabelStyle {
                    text: level_text(role, price),
                    color,
                    size: PLOT_CONFIG.level_label_size,
                },
            );
            *self.annotations.get_mut(role) = Some(LevelAnnotations { line, label });
        }

        // At most one panel; a partial set removes it.
        self.panel = RiskRewardPanel::build(&self.levels, chart.last_close());
    }

    /// Applies everything the chart queued for us since the last frame, oldest first.
    pub fn pump<C: Chart + ?Sized>(&mut self, chart: &mut C) {
        let Some(id) = self.subscription else {
            return;
        };
        for event in chart.drain_pointer_events(id) {
            self.handle_pointer(chart, event);
        }
    }

    pub fn handle_pointer<C: Chart + ?Sized>(&mut self, chart: &mut C, event: PointerEvent) {
        if self.subscription.is_none() {
            return;
        }

        #[cfg(debug_assertions)]
        if DF.log_pointer_events {
            log::info!("Price levels pointer: {:?} ({:?})", event, self.drag);
        }

        match (self.drag, event) {
            // A press always starts over; a release lost off-canvas must not leave a stale drag.
            (_, PointerEvent::Down { price, .. }) => {
                self.drag = DragState::Idle;
                if !self.visible {
                    return;
                }
                if let Some(role) = self.hit_test(price) {
                    self.drag = DragState::Dragging(role);

                    #[cfg(debug_assertions)]
                    if DF.log_price_levels {
                        log::info!("Dragging {:?} from {:.2}", role, price);
                    }
                }
            }
            (DragState::Dragging(role), PointerEvent::Move { pixel_y }) => {
                let Some(price) = normalize_level(chart.coords_to_price(pixel_y)) else {
                    return;
                };
                self.levels.set(role, Some(price));
                self.draw(chart);
            }
            (_, PointerEvent::Up) => {
                self.drag = DragState::Idle;
            }
            _ => {}
        }
    }

    /// First level within threshold, in entry, stop, target order.
    fn hit_test(&self, price: f64) -> Option<LevelRole> {
        LevelRole::iter().find(|&role| {
            self.levels
                .get(role)
                .is_some_and(|level| is_near(price, level))
        })
    }

    /// Detaches from the chart's pointer stream. Safe to call more than once.
    pub fn cleanup<C: Chart + ?Sized>(&mut self, chart: &mut C) {
        if let Some(id) = self.subscription.take() {
            chart.unsubscribe_pointer(id);
        }
        self.drag = DragState::Idle;
    }

    pub fn levels(&self) -> &PriceLevelSet {
        &self.levels
    }

    pub fn risk_reward(&self) -> Option<RiskReward> {
        self.levels.risk_reward()
    }

    pub fn panel(&self) -> Option<&RiskRewardPanel> {
        self.panel.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn annotation_count(&self) -> usize {
        LevelRole::iter()
            .filter(|&role| self.annotations.get(role).is_some())
            .count()
            * 2
    }
}
