//! The drawing surface both annotation components talk to.
//!
//! Anything that can create/remove entities, convert a screen row into a
//! price and queue pointer input per subscriber can host the overlay and the
//! price level tool. The dashboard uses [`crate::ui::PlotCanvas`]; tests use
//! a recording mock.

use std::collections::{BTreeMap, VecDeque};

use eframe::egui::Color32;

#[cfg(test)]
pub(crate) mod mock;

/// Handle to one shape or label living on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Handle returned by [`Chart::subscribe_pointer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// A position in data space: unix seconds on x, price on y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub time: i64,
    pub price: f64,
}

impl ChartPoint {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    /// Straight line between two anchors.
    Segment { from: ChartPoint, to: ChartPoint },
    /// Full-width line at `at.price`; `at.time` only anchors it.
    HorizontalLine { at: ChartPoint },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineKind {
    #[default]
    Solid,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub color: Color32,
    pub width: f32,
    pub kind: LineKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub text: String,
    pub color: Color32,
    /// Font size in points
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Shape(ShapeGeometry, ShapeStyle),
    Label(ChartPoint, LabelStyle),
}

/// Raw pointer input as the chart reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Press inside the plot; already converted to data space.
    Down { time: i64, price: f64 },
    /// Pointer moved; screen row in points, converted via [`Chart::coords_to_price`].
    Move { pixel_y: f32 },
    Up,
}

pub trait Chart {
    fn create_shape(&mut self, geometry: ShapeGeometry, style: ShapeStyle) -> EntityId;
    fn create_label(&mut self, at: ChartPoint, label: LabelStyle) -> EntityId;
    /// Unknown ids are ignored.
    fn remove_entity(&mut self, id: EntityId);

    /// `None` until the chart has been laid out at least once.
    fn coords_to_price(&self, pixel_y: f32) -> Option<f64>;
    /// Close of the most recent candle, 0.0 when there are none.
    fn last_close(&self) -> f64;
    /// Open time of the most recent candle, 0 when there are none.
    fn last_time(&self) -> i64;

    fn subscribe_pointer(&mut self) -> SubscriptionId;
    fn unsubscribe_pointer(&mut self, id: SubscriptionId);
    /// Takes everything queued for `id` since the last call, oldest first.
    fn drain_pointer_events(&mut self, id: SubscriptionId) -> Vec<PointerEvent>;
}

/// Id allocation plus per-subscriber event queues; the bookkeeping every
/// [`Chart`] implementation needs.
#[derive(Debug, Default)]
pub struct EntityStore {
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    next_subscription: u64,
    subscribers: BTreeMap<SubscriptionId, VecDeque<PointerEvent>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.entities.insert(id, entity);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// In creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &Entity)> {
        self.entities.iter()
    }

    pub fn subscribe(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.insert(id, VecDeque::new());
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.remove(&id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Fan an event out to every live subscriber.
    pub fn publish(&mut self, event: PointerEvent) {
        for queue in self.subscribers.values_mut() {
            queue.push_back(event);
        }
    }

    pub fn drain(&mut self, id: SubscriptionId) -> Vec<PointerEvent> {
        match self.subscribers.get_mut(&id) {
            Some(queue) => queue.drain(..).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut store = EntityStore::new();
        let label = Entity::Label(
            ChartPoint::new(0, 1.0),
            LabelStyle {
                text: "x".into(),
                color: Color32::WHITE,
                size: 10.0,
            },
        );
        let a = store.insert(label.clone());
        store.remove(a);
        let b = store.insert(label);
        assert_ne!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn events_only_reach_live_subscribers() {
        let mut store = EntityStore::new();
        let a = store.subscribe();
        let b = store.subscribe();
        store.publish(PointerEvent::Up);
        store.unsubscribe(b);
        store.publish(PointerEvent::Move { pixel_y: 3.0 });

        assert_eq!(
            store.drain(a),
            vec![PointerEvent::Up, PointerEvent::Move { pixel_y: 3.0 }]
        );
        assert!(store.drain(a).is_empty());
        assert!(store.drain(b).is_empty());
    }
}
