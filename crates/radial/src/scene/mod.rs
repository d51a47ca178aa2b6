pub mod model;
pub mod theme;

pub use model::{LabelView, OverlayView, RingView, Scene, SectorView};
pub use theme::SceneColors;

/// Sector labels sit at this fraction of the ring radius.
pub const LABEL_RADIUS_FRACTION: f64 = 0.7;
/// Alpha of an item's accent colour when used as a sector fill.
pub const ITEM_FILL_ALPHA: f64 = 0.85;
