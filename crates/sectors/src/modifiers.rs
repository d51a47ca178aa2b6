use crate::geometry::{Point, polar_to_cartesian, pointer_angle};
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

/// Clamps `point` into the disk of `max_radius` around `center`, keeping its
/// direction.
pub fn radius_constraint(point: Point, center: Point, max_radius: f64) -> Point {
    let distance = point.distance_to(center);
    if distance <= max_radius || distance == 0.0 {
        return point;
    }
    let scale = max_radius.max(0.0) / distance;
    Point::new(
        center.x + (point.x - center.x) * scale,
        center.y + (point.y - center.y) * scale,
    )
}

/// Rotates `point` about `center` onto the nearest multiple of `step_deg`,
/// keeping its distance.
pub fn angular_snap(point: Point, center: Point, step_deg: f64) -> Point {
    let distance = point.distance_to(center);
    if step_deg <= 0.0 || distance == 0.0 {
        return point;
    }
    let snapped = (pointer_angle(center, point) / step_deg).round() * step_deg;
    polar_to_cartesian(center, distance, snapped)
}

/// Rotation that points an overlay along the pointer's direction from the
/// ring center (0° at north, clockwise).
pub fn rotation_alignment(point: Point, center: Point) -> f64 {
    if point == center {
        0.0
    } else {
        pointer_angle(center, point)
    }
}

/// Where and how the drag overlay is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OverlayTransform {
    pub position: Point,
    pub rotation_deg: f64,
}

impl OverlayTransform {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            rotation_deg: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, StrumDisplay)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Modifier {
    RadiusClamp { max_radius: f64 },
    AngularSnap { step_deg: f64 },
    RotateAlign,
}

impl Modifier {
    pub fn apply(&self, transform: OverlayTransform, center: Point) -> OverlayTransform {
        match *self {
            Self::RadiusClamp { max_radius } => OverlayTransform {
                position: radius_constraint(transform.position, center, max_radius),
                ..transform
            },
            Self::AngularSnap { step_deg } => OverlayTransform {
                position: angular_snap(transform.position, center, step_deg),
                ..transform
            },
            Self::RotateAlign => OverlayTransform {
                rotation_deg: rotation_alignment(transform.position, center),
                ..transform
            },
        }
    }
}

/// Runs `modifiers` in order over the raw pointer position.
pub fn apply_all(modifiers: &[Modifier], pointer: Point, center: Point) -> OverlayTransform {
    modifiers
        .iter()
        .fold(OverlayTransform::at(pointer), |t, m| m.apply(t, center))
}
