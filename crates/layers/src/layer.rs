use runtime::MapEvent;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct LayerId(pub u64);

/// Something drawn over the base map that the host drives through map events.
pub trait Layer {
    fn id(&self) -> LayerId;

    /// Clears and redraws the layer's surface from current state.
    fn redraw(&mut self);

    fn on_map_event(&mut self, event: MapEvent);
}
