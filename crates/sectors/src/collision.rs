use crate::geometry::{
    ANGLE_EPSILON, FULL_TURN, Point, SectorSpan, normalize_degrees, pointer_angle,
};
use crate::item::{ItemId, MenuItem};
use std::fmt;

/// Reserved drop target id of the central delete zone.
pub const TRASH_ID: &str = "trashBin";

/// Hit-test shape of one live ring sector. Each sector carries its own
/// center and span so a list can be rebuilt mid-drag after the ring order
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorDescriptor {
    pub item_id: ItemId,
    pub center: Point,
    pub radius: f64,
    pub span: SectorSpan,
}

impl SectorDescriptor {
    /// Half-open membership test `[start, end)` on the folded circle. Spans
    /// crossing the 0°/360° seam are tested as two intervals.
    pub fn contains_angle(&self, angle_deg: f64) -> bool {
        let extent = self.span.extent();
        if extent >= FULL_TURN - ANGLE_EPSILON {
            return true;
        }
        if extent <= 0.0 {
            return false;
        }

        let angle = fold_seam(normalize_degrees(angle_deg));
        let start = fold_seam(normalize_degrees(self.span.start_deg));
        let end = start + extent;

        if end <= FULL_TURN {
            in_half_open(angle, start, end)
        } else {
            in_half_open(angle, start, FULL_TURN) || in_half_open(angle, 0.0, end - FULL_TURN)
        }
    }

    pub fn contains(&self, pointer: Point) -> bool {
        pointer.distance_to(self.center) <= self.radius
            && self.contains_angle(pointer_angle(self.center, pointer))
    }
}

// Angles within epsilon of a bound count as sitting on it, so a boundary
// always belongs to the sector that starts there.
fn in_half_open(angle: f64, start: f64, end: f64) -> bool {
    angle >= start - ANGLE_EPSILON && angle < end - ANGLE_EPSILON
}

fn fold_seam(angle: f64) -> f64 {
    if angle > FULL_TURN - ANGLE_EPSILON {
        0.0
    } else {
        angle
    }
}

/// Sector descriptors for `items` laid out evenly around `center`.
pub fn ring_sectors(items: &[MenuItem], center: Point, radius: f64) -> Vec<SectorDescriptor> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            SectorSpan::for_index(i, items.len()).map(|span| SectorDescriptor {
                item_id: item.id.clone(),
                center,
                radius,
                span,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionTarget {
    Sector(ItemId),
    Trash,
}

impl CollisionTarget {
    pub fn id(&self) -> &str {
        match self {
            Self::Sector(id) => id.as_str(),
            Self::Trash => TRASH_ID,
        }
    }

    pub fn sector_id(&self) -> Option<&ItemId> {
        match self {
            Self::Sector(id) => Some(id),
            Self::Trash => None,
        }
    }

    pub fn is_trash(&self) -> bool {
        matches!(self, Self::Trash)
    }
}

impl fmt::Display for CollisionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Angular hit-testing for pie-shaped drop targets, replacing rectangle
/// overlap tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorCollisionDetector {
    /// Radius of the central exclusion disk that acts as the trash target.
    pub trash_radius: f64,
}

impl SectorCollisionDetector {
    pub fn new(trash_radius: f64) -> Self {
        Self { trash_radius }
    }

    pub fn detect(&self, pointer: Point, sectors: &[SectorDescriptor]) -> Option<CollisionTarget> {
        if sectors.is_empty() {
            return None;
        }

        if sectors
            .iter()
            .any(|s| pointer.distance_to(s.center) <= self.trash_radius)
        {
            return Some(CollisionTarget::Trash);
        }

        let hit = sectors
            .iter()
            .find(|s| s.contains(pointer))
            .map(|s| CollisionTarget::Sector(s.item_id.clone()));

        log::trace!(
            "collision at ({:.1}, {:.1}) -> {}",
            pointer.x,
            pointer.y,
            hit.as_ref().map_or("none", CollisionTarget::id)
        );
        hit
    }
}
