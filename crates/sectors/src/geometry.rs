use serde::{Deserialize, Serialize};
use serde_with::SerializeDisplay;
use std::fmt;

pub const FULL_TURN: f64 = 360.0;
pub const HALF_TURN: f64 = 180.0;
/// Angles closer than this (in degrees) are considered equal.
pub const ANGLE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A measured bounding box in host (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Translates a client point into coordinates relative to this box.
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.x, client.y - self.y)
    }
}

/// Converts a polar coordinate to cartesian, with 0° pointing straight up and
/// angles increasing clockwise (screen y grows downwards).
pub fn polar_to_cartesian(center: Point, radius: f64, angle_deg: f64) -> Point {
    let rad = (angle_deg - 90.0).to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// Folds any angle into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(FULL_TURN);
    // rem_euclid may round tiny negatives up to exactly 360
    if d >= FULL_TURN { 0.0 } else { d }
}

/// Angle of `point` around `center`, in the same north/clockwise convention as
/// [`polar_to_cartesian`], normalised into `[0, 360)`.
pub fn pointer_angle(center: Point, point: Point) -> f64 {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    normalize_degrees(dx.atan2(-dy).to_degrees())
}

/// Angular extent of one ring sector, in degrees. `end_deg` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorSpan {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl SectorSpan {
    pub fn new(start_deg: f64, end_deg: f64) -> Self {
        Self { start_deg, end_deg }
    }

    /// Span of sector `index` out of `count`, centred on `index * 360 / count`.
    pub fn for_index(index: usize, count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let angle = step_angle(count);
        let start = index as f64 * angle - angle / 2.0;
        Some(Self::new(start, start + angle))
    }

    pub fn extent(&self) -> f64 {
        self.end_deg - self.start_deg
    }
}

/// Angle covered by each of `count` equal sectors. Zero sectors cover nothing.
pub fn step_angle(count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        FULL_TURN / count as f64
    }
}

/// Partitions the full turn into `count` half-open spans.
pub fn sector_spans(count: usize) -> Vec<SectorSpan> {
    (0..count)
        .filter_map(|i| SectorSpan::for_index(i, count))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcSweep {
    Short,
    Long,
}

impl ArcSweep {
    pub fn for_span(start_deg: f64, end_deg: f64) -> Self {
        if end_deg - start_deg > HALF_TURN {
            Self::Long
        } else {
            Self::Short
        }
    }
}

impl fmt::Display for ArcSweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => f.write_str("0"),
            Self::Long => f.write_str("1"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Arc {
        radius: f64,
        sweep: ArcSweep,
        to: Point,
    },
    Close,
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo(p) => write!(f, "M {} {}", p.x, p.y),
            Self::LineTo(p) => write!(f, "L {} {}", p.x, p.y),
            Self::Arc { radius, sweep, to } => {
                write!(f, "A {radius} {radius} 0 {sweep} 0 {} {}", to.x, to.y)
            }
            Self::Close => f.write_str("Z"),
        }
    }
}

/// A path description the rendering layer draws verbatim. Serialises as an
/// SVG path string.
#[derive(Debug, Clone, PartialEq, Default, SerializeDisplay)]
pub struct PathData(Vec<PathCommand>);

impl PathData {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self(commands)
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.0
    }

    /// Polyline through `points`, the first one being the pen-down position.
    pub fn polyline(points: &[Point]) -> Self {
        Self(
            points
                .iter()
                .enumerate()
                .map(|(i, &p)| {
                    if i == 0 {
                        PathCommand::MoveTo(p)
                    } else {
                        PathCommand::LineTo(p)
                    }
                })
                .collect(),
        )
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}

/// Closed pie slice: center, out to the end angle, arc back to the start.
pub fn describe_wedge_path(center: Point, radius: f64, start_deg: f64, end_deg: f64) -> PathData {
    let start = polar_to_cartesian(center, radius, end_deg);
    let end = polar_to_cartesian(center, radius, start_deg);
    PathData::new(vec![
        PathCommand::MoveTo(center),
        PathCommand::LineTo(start),
        PathCommand::Arc {
            radius,
            sweep: ArcSweep::for_span(start_deg, end_deg),
            to: end,
        },
        PathCommand::Close,
    ])
}

/// The two radii bounding a wedge, joined at the center.
pub fn describe_chord_path(center: Point, radius: f64, start_deg: f64, end_deg: f64) -> PathData {
    let start = polar_to_cartesian(center, radius, end_deg);
    let end = polar_to_cartesian(center, radius, start_deg);
    PathData::new(vec![
        PathCommand::MoveTo(start),
        PathCommand::LineTo(center),
        PathCommand::LineTo(end),
    ])
}

/// Open arc along the rim of a wedge.
pub fn describe_arc_path(center: Point, radius: f64, start_deg: f64, end_deg: f64) -> PathData {
    let start = polar_to_cartesian(center, radius, end_deg);
    let end = polar_to_cartesian(center, radius, start_deg);
    PathData::new(vec![
        PathCommand::MoveTo(start),
        PathCommand::Arc {
            radius,
            sweep: ArcSweep::for_span(start_deg, end_deg),
            to: end,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_polar_to_cartesian_is_clockwise_from_north() {
        let c = Point::new(100.0, 100.0);
        assert_close(polar_to_cartesian(c, 50.0, 0.0), Point::new(100.0, 50.0));
        assert_close(polar_to_cartesian(c, 50.0, 90.0), Point::new(150.0, 100.0));
        assert_close(polar_to_cartesian(c, 50.0, 180.0), Point::new(100.0, 150.0));
        assert_close(polar_to_cartesian(c, 50.0, 270.0), Point::new(50.0, 100.0));
    }

    #[test]
    fn test_pointer_angle_inverts_polar() {
        let c = Point::new(10.0, 20.0);
        for deg in [0.0, 30.0, 90.0, 135.0, 200.0, 315.0] {
            let p = polar_to_cartesian(c, 7.0, deg);
            assert!((pointer_angle(c, p) - deg).abs() < 1e-9, "{deg}");
        }
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-45.0), 315.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-20) < FULL_TURN);
    }

    #[test]
    fn test_sector_spans_partition_full_turn() {
        for n in 1..=12 {
            let spans = sector_spans(n);
            assert_eq!(spans.len(), n);
            let total: f64 = spans.iter().map(SectorSpan::extent).sum();
            assert!((total - FULL_TURN).abs() < 1e-9);
            for pair in spans.windows(2) {
                assert!((pair[0].end_deg - pair[1].start_deg).abs() < 1e-9);
            }
            assert!((spans[n - 1].end_deg - (spans[0].start_deg + FULL_TURN)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_sectors_never_divide() {
        assert!(sector_spans(0).is_empty());
        assert_eq!(SectorSpan::for_index(0, 0), None);
        assert_eq!(step_angle(0), 0.0);
    }

    #[test]
    fn test_arc_sweep_flag() {
        assert_eq!(ArcSweep::for_span(-45.0, 45.0), ArcSweep::Short);
        assert_eq!(ArcSweep::for_span(0.0, 180.0), ArcSweep::Short);
        assert_eq!(ArcSweep::for_span(-180.0, 180.0), ArcSweep::Long);
    }

    #[test]
    fn test_wedge_path_string() {
        let path = describe_wedge_path(Point::new(10.0, 10.0), 10.0, 0.0, 90.0);
        let cmds = path.commands();
        assert_eq!(cmds.len(), 4);
        assert_eq!(cmds[0], PathCommand::MoveTo(Point::new(10.0, 10.0)));
        assert_eq!(cmds[3], PathCommand::Close);
        let s = path.to_string();
        assert!(s.starts_with("M 10 10 L 20 10"), "{s}");
        assert!(s.contains(" A 10 10 0 0 0 "), "{s}");
        assert!(s.ends_with(" Z"), "{s}");
    }

    #[test]
    fn test_chord_and_arc_paths() {
        let c = Point::new(0.0, 0.0);
        let chord = describe_chord_path(c, 5.0, -90.0, 90.0);
        assert_eq!(chord.commands().len(), 3);
        assert_eq!(chord.commands()[1], PathCommand::LineTo(c));

        let arc = describe_arc_path(c, 5.0, -120.0, 120.0);
        match arc.commands()[1] {
            PathCommand::Arc { sweep, .. } => assert_eq!(sweep, ArcSweep::Long),
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_radius_paths_stay_finite() {
        let c = Point::new(10.0, 10.0);
        let paths = [
            describe_wedge_path(c, 0.0, -45.0, 45.0),
            describe_chord_path(c, 0.0, -45.0, 45.0),
            describe_arc_path(c, 0.0, 315.0, 405.0),
        ];
        for path in &paths {
            for cmd in path.commands() {
                match *cmd {
                    PathCommand::MoveTo(p) | PathCommand::LineTo(p) => {
                        assert!(p.is_finite(), "{path}");
                        assert_close(p, c);
                    }
                    PathCommand::Arc { radius, to, .. } => {
                        assert_eq!(radius, 0.0);
                        assert_close(to, c);
                    }
                    PathCommand::Close => {}
                }
            }
            assert!(!path.to_string().contains("NaN"), "{path}");
        }
        assert_eq!(paths[0].to_string(), "M 10 10 L 10 10 A 0 0 0 0 0 10 10 Z");
    }

    #[test]
    fn test_polyline_serializes_as_svg() {
        let path = PathData::polyline(&[
            Point::new(0.0, 0.0),
            Point::new(1.5, 2.0),
            Point::new(3.0, 2.0),
        ]);
        assert_eq!(
            serde_json::to_string(&path).unwrap(),
            "\"M 0 0 L 1.5 2 L 3 2\""
        );
    }

    #[test]
    fn test_rect_to_local() {
        let rect = Rect::new(100.0, 50.0, 310.0, 310.0);
        assert_eq!(rect.to_local(Point::new(110.0, 60.0)), Point::new(10.0, 10.0));
        assert_eq!(rect.size().center(), Point::new(155.0, 155.0));
    }
}
