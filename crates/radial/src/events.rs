use sectors::{ItemId, Point, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// New bounding box of the ring, in client coordinates.
    Resize(Rect),
    DragStart(ItemId),
    /// Pointer position in client coordinates.
    PointerMove(Point),
    DragEnd,
    SwitchMenu(usize),
    AddMenu,
    DeleteMenu(usize),
    ConfigReload,
    /// Periodic wake-up so throttled measurements are not held back.
    Tick,
}
