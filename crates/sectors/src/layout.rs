use crate::geometry::{PathData, Point, Size, polar_to_cartesian, step_angle};
use crate::item::{ItemId, MenuItem};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

// Below this a label direction is treated as exactly horizontal.
const HORIZONTAL_EPSILON: f64 = 1e-12;

/// Parameters of the outward label layout.
///
/// Labels sit on the right half of the canvas from the top pole down to the
/// bottom pole and are mirrored onto the left half. Vertical positions come
/// from stacking the gaps between neighbouring ring points, so the labels keep
/// the ring's rhythm without piling up near the poles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelLayout {
    /// Radius of the circle the label directions are sampled on.
    pub radius: f64,
    /// Fixed extra space added between stacked labels.
    pub spacing: f64,
    /// 0 keeps the natural curvature spacing, 1 spaces every label at the
    /// widest gap.
    pub sparsity_ratio: f64,
    /// Horizontal extension of side labels beyond their mid point.
    pub extend_length: f64,
    /// Vertical extension of the two pole labels.
    pub pole_extend_length: f64,
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            radius: 155.0,
            spacing: 10.0,
            sparsity_ratio: 0.0,
            extend_length: 10.0,
            pole_extend_length: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelAnchor {
    pub item_id: ItemId,
    pub ring_index: usize,
    pub mid: Point,
    pub end: Point,
}

impl LabelAnchor {
    /// Three-point connector: canvas center, then the mid point, then out to
    /// the end point.
    pub fn connector(&self, center: Point) -> PathData {
        PathData::polyline(&[center, self.mid, self.end])
    }
}

impl LabelLayout {
    /// Computes one anchor per item, in ring order.
    pub fn anchors(&self, items: &[MenuItem], canvas: Size) -> Vec<LabelAnchor> {
        let count = items.len();
        if count == 0 {
            return Vec::new();
        }

        self.mid_points(count, canvas)
            .into_iter()
            .zip(items)
            .enumerate()
            .map(|(index, (mid, item))| LabelAnchor {
                item_id: item.id.clone(),
                ring_index: index,
                mid: Point::new(mid.x, mid.y.max(0.0)),
                end: self.end_point(index, count, mid, canvas),
            })
            .collect()
    }

    fn mid_points(&self, count: usize, canvas: Size) -> Vec<Point> {
        let right = self.right_half(count, canvas);
        // the bottom pole is shared between both halves for even counts
        let mirrored_to = if count % 2 == 0 {
            count / 2
        } else {
            count / 2 + 1
        };

        let left = right[1..mirrored_to]
            .iter()
            .rev()
            .map(|p| Point::new(canvas.width - p.x, p.y));

        right.iter().copied().chain(left).collect()
    }

    /// Mid points for indices `0..=count/2`, top pole first.
    fn right_half(&self, count: usize, canvas: Size) -> Vec<Point> {
        let center = canvas.center();
        let sector_deg = step_angle(count);
        let sector_rad = sector_deg.to_radians();
        let half = count / 2;

        let natural: Vec<f64> = (0..=half)
            .map(|i| {
                if i == 0 {
                    return 0.0;
                }
                let current = polar_to_cartesian(center, self.radius, i as f64 * sector_deg);
                let previous =
                    polar_to_cartesian(center, self.radius, (i - 1) as f64 * sector_deg);
                (current.y - previous.y).abs()
            })
            .collect();

        let max_gap = natural.iter().copied().fold(0.0, f64::max);
        let ratio = self.sparsity_ratio.clamp(0.0, 1.0);
        let gaps: Vec<f64> = natural
            .iter()
            .enumerate()
            .map(|(i, &gap)| {
                if i == 0 {
                    0.0
                } else {
                    gap + (max_gap - gap) * ratio
                }
            })
            .collect();

        let stack_height = gaps.iter().map(|g| g + self.spacing).sum::<f64>() - self.spacing;
        let first_y = center.y - centering_fraction(count) * stack_height;

        let mut y = first_y;
        gaps.iter()
            .enumerate()
            .map(|(i, gap)| {
                if i > 0 {
                    y += gap + self.spacing;
                }
                self.place(i, y, sector_rad, canvas)
            })
            .collect()
    }

    /// Recovers X from the stacked Y along the label's sector direction,
    /// keeping the point within the canvas half-width.
    fn place(&self, index: usize, raw_y: f64, sector_rad: f64, canvas: Size) -> Point {
        let (half_w, half_h) = (canvas.width / 2.0, canvas.height / 2.0);
        let y = raw_y.max(0.0).min(canvas.height);
        let direction = FRAC_PI_2 - index as f64 * sector_rad;

        let x_offset = if direction.abs() < HORIZONTAL_EPSILON {
            self.radius + self.spacing
        } else {
            (half_h - y) / direction.tan()
        };

        let y = if x_offset > half_w {
            half_h - direction.tan() * half_w
        } else {
            y
        };

        Point::new((half_w + x_offset.min(half_w)).round(), y.round())
    }

    fn end_point(&self, index: usize, count: usize, mid: Point, canvas: Size) -> Point {
        let is_top = index == 0;
        let is_bottom = count % 2 == 0 && index == count / 2;
        let is_left = index * 2 > count;

        if is_top {
            Point::new(
                canvas.width / 2.0,
                (mid.y - self.pole_extend_length).max(0.0),
            )
        } else if is_bottom {
            Point::new(
                canvas.width / 2.0,
                (mid.y + self.pole_extend_length).min(canvas.height),
            )
        } else if is_left {
            Point::new((mid.x - self.extend_length).max(0.0), mid.y)
        } else {
            Point::new((mid.x + self.extend_length).min(canvas.width), mid.y)
        }
    }
}

/// Share of the label stack placed above the vertical midpoint. Odd counts
/// have a single top pole and no bottom pole, so their stack sits lower.
fn centering_fraction(count: usize) -> f64 {
    if count % 2 == 0 {
        return 0.5;
    }
    let denominator = (PI / count as f64).cos() + 1.0;
    if denominator > f64::EPSILON {
        1.0 / denominator
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Size = Size {
        width: 600.0,
        height: 480.0,
    };

    fn items(n: usize) -> Vec<MenuItem> {
        (0..n)
            .map(|i| MenuItem::new(format!("radMenu-{i}"), format!("Item {i}")))
            .collect()
    }

    fn panel_layout() -> LabelLayout {
        LabelLayout {
            radius: 180.0,
            spacing: 20.0,
            sparsity_ratio: 0.2,
            extend_length: 1000.0,
            pole_extend_length: 0.0,
        }
    }

    fn mids(anchors: &[LabelAnchor]) -> Vec<(f64, f64)> {
        anchors.iter().map(|a| (a.mid.x, a.mid.y)).collect()
    }

    #[test]
    fn test_four_items() {
        let anchors = panel_layout().anchors(&items(4), CANVAS);
        assert_eq!(
            mids(&anchors),
            vec![(300.0, 40.0), (500.0, 240.0), (300.0, 440.0), (100.0, 240.0)]
        );
        let ends: Vec<_> = anchors.iter().map(|a| (a.end.x, a.end.y)).collect();
        assert_eq!(
            ends,
            vec![(300.0, 40.0), (600.0, 240.0), (300.0, 440.0), (0.0, 240.0)]
        );
    }

    #[test]
    fn test_three_items_sit_lower() {
        let anchors = panel_layout().anchors(&items(3), CANVAS);
        assert_eq!(
            mids(&anchors),
            vec![(300.0, 47.0), (467.0, 337.0), (133.0, 337.0)]
        );
    }

    #[test]
    fn test_small_counts_are_finite() {
        let layout = panel_layout();
        for n in 1..=4 {
            let anchors = layout.anchors(&items(n), CANVAS);
            assert_eq!(anchors.len(), n);
            for a in &anchors {
                assert!(a.mid.is_finite() && a.end.is_finite(), "n={n} {a:?}");
            }
        }

        let single = layout.anchors(&items(1), CANVAS);
        assert_eq!(single[0].mid, Point::new(300.0, 240.0));
        assert_eq!(single[0].end, Point::new(300.0, 240.0));

        let pair = layout.anchors(&items(2), CANVAS);
        assert_eq!(mids(&pair), vec![(300.0, 50.0), (300.0, 430.0)]);
    }

    #[test]
    fn test_empty_ring_has_no_anchors() {
        assert!(panel_layout().anchors(&[], CANVAS).is_empty());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let layout = panel_layout();
        for n in 0..=12 {
            let list = items(n);
            assert_eq!(layout.anchors(&list, CANVAS), layout.anchors(&list, CANVAS));
        }
    }

    #[test]
    fn test_left_half_mirrors_right_half() {
        let layout = panel_layout();
        for n in 2..=12 {
            let anchors = layout.anchors(&items(n), CANVAS);
            for k in 1..n {
                let (a, b) = (&anchors[k], &anchors[n - k]);
                assert_eq!(a.mid.x + b.mid.x, CANVAS.width, "n={n} k={k}");
                assert_eq!(a.mid.y, b.mid.y, "n={n} k={k}");
                assert_eq!(a.end.y, b.end.y, "n={n} k={k}");
                assert_eq!(a.end.x + b.end.x, CANVAS.width, "n={n} k={k}");
            }
        }
    }

    #[test]
    fn test_anchors_stay_on_canvas() {
        let layout = panel_layout();
        for n in 1..=12 {
            for a in layout.anchors(&items(n), CANVAS) {
                assert!((0.0..=CANVAS.width).contains(&a.mid.x), "n={n} {a:?}");
                assert!((0.0..=CANVAS.width).contains(&a.end.x), "n={n} {a:?}");
                assert!(a.mid.y >= 0.0, "n={n} {a:?}");
            }
        }
    }

    #[test]
    fn test_sparsity_ratio_evens_out_gaps() {
        let canvas = Size::new(1000.0, 1000.0);
        let uniform = LabelLayout {
            radius: 100.0,
            spacing: 10.0,
            sparsity_ratio: 1.0,
            ..LabelLayout::default()
        };
        let anchors = uniform.anchors(&items(8), canvas);
        let step = 100.0 * std::f64::consts::FRAC_1_SQRT_2 + 10.0;
        for pair in anchors[..=4].windows(2) {
            let diff = pair[1].mid.y - pair[0].mid.y;
            assert!((diff - step).abs() <= 1.0, "{diff} vs {step}");
        }

        let natural = LabelLayout {
            sparsity_ratio: 0.0,
            ..uniform
        };
        let anchors = natural.anchors(&items(8), canvas);
        let first = anchors[1].mid.y - anchors[0].mid.y;
        let second = anchors[2].mid.y - anchors[1].mid.y;
        assert!(first < second, "pole gap {first} should be tighter than {second}");
    }

    #[test]
    fn test_pole_extension() {
        let layout = LabelLayout {
            pole_extend_length: 15.0,
            ..panel_layout()
        };
        let anchors = layout.anchors(&items(4), CANVAS);
        assert_eq!(anchors[0].end, Point::new(300.0, 25.0));
        assert_eq!(anchors[2].end, Point::new(300.0, 455.0));
    }

    #[test]
    fn test_connector_path() {
        let anchors = panel_layout().anchors(&items(4), CANVAS);
        assert_eq!(
            anchors[1].connector(CANVAS.center()).to_string(),
            "M 300 240 L 500 240 L 600 240"
        );
    }
}
