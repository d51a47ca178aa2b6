use super::theme::{SceneColors, item_color};
use super::{ITEM_FILL_ALPHA, LABEL_RADIUS_FRACTION};
use crate::config::Config;
use crate::drag::{DragController, DragSource, array_move};
use crate::store::MenuStore;
use palette::Srgba;
use sectors::geometry::{
    FULL_TURN, HALF_TURN, describe_arc_path, describe_chord_path, describe_wedge_path,
    polar_to_cartesian, step_angle,
};
use sectors::{CollisionTarget, IconName, ItemId, Label, PathData, Point, Size};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingView {
    pub center: Point,
    pub radius: f64,
    pub sector_radius: f64,
    pub border_width: f64,
    pub trash_radius: f64,
    pub trash_hovered: bool,
    pub rim: Srgba<f64>,
    pub trash_fill: Srgba<f64>,
}

/// One ring sector. The paths describe the sector centred on north; the
/// renderer rotates the whole group by `rotation_deg` about the ring center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorView {
    pub item_id: ItemId,
    pub label: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconName>,
    pub index: usize,
    pub preview_index: usize,
    pub rotation_deg: f64,
    /// Keeps the label upright inside the rotated group.
    pub label_rotation_deg: f64,
    pub label_position: Point,
    pub wedge: PathData,
    pub chord: PathData,
    pub arc: PathData,
    pub fill: Srgba<f64>,
    pub divider: Srgba<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arc_stroke: Option<Srgba<f64>>,
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelView {
    pub item_id: ItemId,
    pub label: Label,
    pub render_key: u64,
    pub ring_index: usize,
    pub mid: Point,
    pub end: Point,
    pub connector: PathData,
    pub stroke: Srgba<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    pub label: Label,
    pub position: Point,
    pub rotation_deg: f64,
}

/// Everything a renderer needs to draw the editor, in ring-local (sectors)
/// and canvas (labels) coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub menu: String,
    pub canvas: Size,
    pub ring: RingView,
    pub sectors: Vec<SectorView>,
    pub labels: Vec<LabelView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayView>,
}

impl Scene {
    pub fn build(store: &MenuStore, drag: &DragController, config: &Config) -> Self {
        let colors = SceneColors::from_overrides(&config.theme);
        let ring = &config.ring;
        let center = ring.center();
        let session = drag.session();

        let trash_hovered = session
            .and_then(|s| s.over.as_ref())
            .is_some_and(CollisionTarget::is_trash);

        let sorted_id = session.and_then(|s| match &s.source {
            DragSource::Ring(item) => Some(&item.id),
            DragSource::Palette(_) => None,
        });

        let items = store.menu_items();
        let mut order: Vec<usize> = (0..items.len()).collect();
        if let Some((from, to)) = drag.preview_move(store) {
            array_move(&mut order, from, to);
        }

        let angle = step_angle(items.len());
        let sector_radius = ring.sector_radius();
        let wedge = describe_wedge_path(center, sector_radius, -angle / 2.0, angle / 2.0);
        let chord = describe_chord_path(center, sector_radius, -angle / 2.0, angle / 2.0);
        let arc = describe_arc_path(
            center,
            ring.radius - ring.border_width / 2.0,
            -angle / 2.0,
            angle / 2.0,
        );
        let label_position = polar_to_cartesian(center, ring.radius * LABEL_RADIUS_FRACTION, 0.0);

        let sectors = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let preview_index = order.iter().position(|&i| i == index).unwrap_or(index);
                let (rotation_deg, label_rotation_deg) = rotations(index, preview_index, angle);
                let dragging = sorted_id == Some(&item.id);

                let fill = match item.color {
                    _ if dragging => colors.sector_active,
                    Some(c) => item_color(c, ITEM_FILL_ALPHA),
                    None => colors.sector,
                };

                SectorView {
                    item_id: item.id.clone(),
                    label: item.label.clone(),
                    icon: item.icon.clone(),
                    index,
                    preview_index,
                    rotation_deg,
                    label_rotation_deg,
                    label_position,
                    wedge: wedge.clone(),
                    chord: chord.clone(),
                    arc: arc.clone(),
                    fill,
                    divider: colors.divider,
                    arc_stroke: dragging.then_some(colors.highlight),
                    dragging,
                }
            })
            .collect();

        let canvas_center = config.canvas.center();
        let mut labels: Vec<LabelView> = config
            .labels
            .anchors(items, config.canvas)
            .into_iter()
            .zip(items)
            .map(|(anchor, item)| LabelView {
                render_key: store.render_key(&anchor.item_id).unwrap_or(u64::MAX),
                connector: anchor.connector(canvas_center),
                label: item.label.clone(),
                item_id: anchor.item_id,
                ring_index: anchor.ring_index,
                mid: anchor.mid,
                end: anchor.end,
                stroke: colors.connector,
            })
            .collect();
        labels.sort_by_key(|l| l.render_key);

        let overlay = session.and_then(|s| {
            s.overlay.map(|t| OverlayView {
                label: s.overlay_label.clone(),
                position: t.position,
                rotation_deg: t.rotation_deg,
            })
        });

        Self {
            menu: store.active_menu().name.clone(),
            canvas: config.canvas,
            ring: RingView {
                center,
                radius: ring.radius,
                sector_radius,
                border_width: ring.border_width,
                trash_radius: ring.trash_radius,
                trash_hovered,
                rim: colors.sector,
                trash_fill: if trash_hovered {
                    colors.trash_hovered
                } else {
                    colors.trash
                },
            },
            sectors,
            labels,
            overlay,
        }
    }
}

/// Sector and label rotation for an item shown at `preview_index`. Sectors
/// travelling more than half a turn go the other way round.
fn rotations(index: usize, preview_index: usize, angle: f64) -> (f64, f64) {
    let rotation = preview_index as f64 * angle;
    let offset = (preview_index as f64 - index as f64) * angle;
    if offset.abs() <= HALF_TURN {
        (rotation, -rotation)
    } else if offset > 0.0 {
        (rotation - FULL_TURN, -rotation + FULL_TURN)
    } else {
        (rotation + FULL_TURN, -rotation - FULL_TURN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builtin;
    use crate::store::{PaletteGroup, RingPolicy};
    use sectors::{CommandToken, MenuConfiguration, MenuItem};

    fn store_with(ids: &[&str]) -> MenuStore {
        MenuStore::new(
            vec![MenuConfiguration {
                name: "Main".to_string(),
                command: CommandToken::new("radial: main"),
                items: ids.iter().map(|id| MenuItem::new(*id, id.to_uppercase())).collect(),
            }],
            vec![PaletteGroup {
                name: "Tools".to_string(),
                items: vec![MenuItem::new("p7", "P7")],
            }],
            vec![],
            RingPolicy::default(),
        )
    }

    fn controller() -> DragController {
        DragController::new(vec![], "radMenu-")
    }

    #[test]
    fn test_idle_scene() {
        let config = builtin();
        let store = store_with(&["m1", "m2", "m3", "m4"]);
        let scene = Scene::build(&store, &controller(), &config);

        let rotations: Vec<f64> = scene.sectors.iter().map(|s| s.rotation_deg).collect();
        assert_eq!(rotations, vec![0.0, 90.0, 180.0, 270.0]);
        assert_eq!(scene.sectors[1].label_rotation_deg, -90.0);
        assert!(scene.sectors.iter().all(|s| !s.dragging && s.arc_stroke.is_none()));
        assert!(scene.overlay.is_none());
        assert!(!scene.ring.trash_hovered);

        assert_eq!(scene.ring.center, Point::new(155.0, 155.0));
        assert_eq!(scene.ring.sector_radius, 143.0);
        assert!(scene.sectors[0].wedge.to_string().starts_with("M 155 155 L "));
        let label = scene.sectors[0].label_position;
        assert!((label.x - 155.0).abs() < 1e-9 && (label.y - 46.5).abs() < 1e-9);
        assert_eq!(scene.labels.len(), 4);
    }

    #[test]
    fn test_sort_preview_takes_short_way_round() {
        let config = builtin();
        let mut store = store_with(&["m1", "m2", "m3", "m4"]);
        let mut drag = controller();
        drag.start(&ItemId::from("m1"), &store);
        // m4 sits at 270°
        let pointer = polar_to_cartesian(config.ring.center(), 100.0, 270.0);
        drag.pointer_moved(pointer, &config.ring, &mut store);

        let scene = Scene::build(&store, &drag, &config);
        let previews: Vec<usize> = scene.sectors.iter().map(|s| s.preview_index).collect();
        assert_eq!(previews, vec![3, 0, 1, 2]);
        assert_eq!(scene.sectors[0].rotation_deg, -90.0);
        assert_eq!(scene.sectors[0].label_rotation_deg, 90.0);
        assert_eq!(scene.sectors[1].rotation_deg, 0.0);
        assert!(scene.sectors[0].dragging);
        assert_eq!(scene.sectors[0].arc_stroke, Some(SceneColors::default().highlight));
        assert_eq!(scene.sectors[0].fill, SceneColors::default().sector_active);
    }

    #[test]
    fn test_rotations() {
        assert_eq!(rotations(2, 2, 90.0), (180.0, -180.0));
        assert_eq!(rotations(3, 0, 90.0), (360.0, -360.0));
        assert_eq!(rotations(1, 3, 60.0), (180.0, -180.0));
        assert_eq!(rotations(0, 4, 60.0), (-120.0, 120.0));
    }

    #[test]
    fn test_trash_hover_and_overlay() {
        let config = builtin();
        let mut store = store_with(&["m1", "m2", "m3"]);
        let mut drag = controller();
        drag.start(&ItemId::from("m2"), &store);
        drag.pointer_moved(config.ring.center(), &config.ring, &mut store);

        let scene = Scene::build(&store, &drag, &config);
        assert!(scene.ring.trash_hovered);
        assert_eq!(scene.ring.trash_fill, SceneColors::default().trash_hovered);
        let overlay = scene.overlay.unwrap();
        assert_eq!(overlay.label.as_str(), "M2");
        assert_eq!(overlay.position, config.ring.center());
    }

    #[test]
    fn test_labels_follow_render_keys() {
        let config = builtin();
        let mut store = store_with(&["radMenu-10", "radMenu-2", "radMenu-3"]);
        store.set_menu_items(vec![
            MenuItem::new("radMenu-3", "Three"),
            MenuItem::new("radMenu-10", "Ten"),
            MenuItem::new("radMenu-2", "Two"),
        ]);
        let scene = Scene::build(&store, &controller(), &config);
        let ids: Vec<&str> = scene.labels.iter().map(|l| l.item_id.as_str()).collect();
        assert_eq!(ids, vec!["radMenu-10", "radMenu-2", "radMenu-3"]);
        let ring_indices: Vec<usize> = scene.labels.iter().map(|l| l.ring_index).collect();
        assert_eq!(ring_indices, vec![1, 2, 0]);
        assert_eq!(scene.labels[0].label.as_str(), "Ten");
    }

    #[test]
    fn test_item_colour_fills_sector() {
        let config = builtin();
        let mut store = store_with(&["m1", "m2"]);
        let mut items = store.menu_items().to_vec();
        items[1].color = Some("#ff0000".parse().unwrap());
        store.set_menu_items(items);
        let scene = Scene::build(&store, &controller(), &config);
        assert_eq!(scene.sectors[0].fill, SceneColors::default().sector);
        assert_eq!(scene.sectors[1].fill, Srgba::new(1.0, 0.0, 0.0, ITEM_FILL_ALPHA));
    }

    #[test]
    fn test_scene_serializes() {
        let config = builtin();
        let store = store_with(&["m1", "m2", "m3"]);
        let scene = Scene::build(&store, &controller(), &config);
        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["menu"], "Main");
        assert_eq!(json["sectors"].as_array().unwrap().len(), 3);
        assert!(json["labels"][0]["connector"].as_str().unwrap().starts_with("M 300 240"));
        assert!(json.get("overlay").is_none());
    }
}
