use super::{
    Chart, ChartPoint, Entity, EntityId, EntityStore, LabelStyle, PointerEvent, ShapeGeometry,
    ShapeStyle, SubscriptionId,
};

/// Every call the components made, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ChartCall {
    Shape(ShapeGeometry, ShapeStyle),
    Label(ChartPoint, LabelStyle),
    Remove(EntityId),
}

/// In-memory chart. Screen row `y` maps to `top_price - y * price_per_pixel`.
pub(crate) struct MockChart {
    pub store: EntityStore,
    pub calls: Vec<ChartCall>,
    pub top_price: f64,
    pub price_per_pixel: f64,
    pub last_close: f64,
    pub last_time: i64,
    /// Number of `unsubscribe_pointer` calls received.
    pub unsubscribes: usize,
}

impl MockChart {
    pub fn new() -> Self {
        Self {
            store: EntityStore::new(),
            calls: Vec::new(),
            top_price: 200.0,
            price_per_pixel: 0.5,
            last_close: 100.0,
            last_time: 1_700_000_000,
            unsubscribes: 0,
        }
    }

    /// Screen row that maps back to `price`.
    pub fn row_for(&self, price: f64) -> f32 {
        ((self.top_price - price) / self.price_per_pixel) as f32
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.store.publish(event);
    }

    pub fn shapes(&self) -> Vec<(ShapeGeometry, ShapeStyle)> {
        self.store
            .iter()
            .filter_map(|(_, e)| match e {
                Entity::Shape(g, s) => Some((*g, *s)),
                Entity::Label(..) => None,
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<(ChartPoint, LabelStyle)> {
        self.store
            .iter()
            .filter_map(|(_, e)| match e {
                Entity::Label(p, l) => Some((*p, l.clone())),
                Entity::Shape(..) => None,
            })
            .collect()
    }

    /// Calls made since `mark`, minus the removals.
    pub fn creations_since(&self, mark: usize) -> Vec<ChartCall> {
        self.calls[mark..]
            .iter()
            .filter(|c| !matches!(c, ChartCall::Remove(_)))
            .cloned()
            .collect()
    }
}

impl Chart for MockChart {
    fn create_shape(&mut self, geometry: ShapeGeometry, style: ShapeStyle) -> EntityId {
        self.calls.push(ChartCall::Shape(geometry, style));
        self.store.insert(Entity::Shape(geometry, style))
    }

    fn create_label(&mut self, at: ChartPoint, label: LabelStyle) -> EntityId {
        self.calls.push(ChartCall::Label(at, label.clone()));
        self.store.insert(Entity::Label(at, label))
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.calls.push(ChartCall::Remove(id));
        self.store.remove(id);
    }

    fn coords_to_price(&self, pixel_y: f32) -> Option<f64> {
        Some(self.top_price - pixel_y as f64 * self.price_per_pixel)
    }

    fn last_close(&self) -> f64 {
        self.last_close
    }

    fn last_time(&self) -> i64 {
        self.last_time
    }

    fn subscribe_pointer(&mut self) -> SubscriptionId {
        self.store.subscribe()
    }

    fn unsubscribe_pointer(&mut self, id: SubscriptionId) {
        self.unsubscribes += 1;
        self.store.unsubscribe(id);
    }

    fn drain_pointer_events(&mut self, id: SubscriptionId) -> Vec<PointerEvent> {
        self.store.drain(id)
    }
}
