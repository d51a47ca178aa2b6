//! Geometry and interaction kernel for radial menus.
//!
//! Everything here is pure: sector partitioning and path descriptions,
//! angular hit-testing, outward label layout and drag overlay modifiers.

pub mod macros;

pub mod collision;
pub mod geometry;
pub mod item;
pub mod layout;
pub mod modifiers;

pub use collision::{
    CollisionTarget, SectorCollisionDetector, SectorDescriptor, TRASH_ID, ring_sectors,
};
pub use geometry::{ArcSweep, PathCommand, PathData, Point, Rect, SectorSpan, Size};
pub use item::{CommandToken, IconName, ItemColor, ItemId, Label, MenuConfiguration, MenuItem};
pub use layout::{LabelAnchor, LabelLayout};
pub use modifiers::{Modifier, OverlayTransform};
