use crate::config::RingConfig;
use crate::store::MenuStore;
use derive_more::Display;
use sectors::modifiers::apply_all;
use sectors::{
    CollisionTarget, ItemId, Label, MenuItem, Modifier, OverlayTransform, Point,
    SectorCollisionDetector, ring_sectors,
};
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum SourceKind {
    Palette,
    Ring,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    Palette(MenuItem),
    Ring(MenuItem),
}

impl DragSource {
    pub fn item(&self) -> &MenuItem {
        match self {
            Self::Palette(item) | Self::Ring(item) => item,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Palette(_) => SourceKind::Palette,
            Self::Ring(_) => SourceKind::Ring,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub source: DragSource,
    /// Last pointer position in ring-local coordinates.
    pub pointer: Option<Point>,
    pub over: Option<CollisionTarget>,
    pub overlay_label: Label,
    pub overlay: Option<OverlayTransform>,
}

impl DragSession {
    pub fn dragged_id(&self) -> &ItemId {
        &self.source.item().id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum IgnoreReason {
    NotDragging,
    UnknownItem,
    NoTarget,
    UnknownTarget,
    RingFull,
    RingMinimum,
    SameSlot,
}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum DragOutcome {
    #[display("started {_0} drag")]
    Started(SourceKind),
    #[display("hovering {}", _0.as_ref().map_or("nothing", CollisionTarget::id))]
    Hovering(Option<CollisionTarget>),
    #[display("inserted {id} at {index}")]
    Inserted { id: ItemId, index: usize },
    #[display("moved {id} from {from} to {to}")]
    Moved { id: ItemId, from: usize, to: usize },
    #[display("deleted {_0}")]
    Deleted(ItemId),
    #[display("ignored ({_0})")]
    Ignored(IgnoreReason),
}

pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragController {
    modifiers: Vec<Modifier>,
    clone_prefix: String,
    state: DragState,
}

impl DragController {
    pub fn new(modifiers: Vec<Modifier>, clone_prefix: impl Into<String>) -> Self {
        Self {
            modifiers,
            clone_prefix: clone_prefix.into(),
            state: DragState::Idle,
        }
    }

    pub fn reconfigure(&mut self, modifiers: Vec<Modifier>, clone_prefix: impl Into<String>) {
        self.modifiers = modifiers;
        self.clone_prefix = clone_prefix.into();
    }

    pub fn clone_prefix(&self) -> &str {
        &self.clone_prefix
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session().is_some()
    }

    /// Palette ids win over ring ids, so a raw palette id left on the ring
    /// is dragged as a palette item and replaced by its copy.
    pub fn start(&mut self, active: &ItemId, store: &MenuStore) -> DragOutcome {
        let source = if let Some(item) = store.find_palette_item(active) {
            DragSource::Palette(item.clone())
        } else if let Some(item) = store.menu_items().iter().find(|i| &i.id == active) {
            DragSource::Ring(item.clone())
        } else {
            return log_outcome(DragOutcome::Ignored(IgnoreReason::UnknownItem));
        };

        let kind = source.kind();
        self.state = DragState::Dragging(DragSession {
            overlay_label: source.item().label.clone(),
            source,
            pointer: None,
            over: None,
            overlay: None,
        });
        log_outcome(DragOutcome::Started(kind))
    }

    /// `pointer` is ring-local.
    pub fn pointer_moved(
        &mut self,
        pointer: Point,
        ring: &RingConfig,
        store: &mut MenuStore,
    ) -> DragOutcome {
        let DragState::Dragging(session) = &mut self.state else {
            return DragOutcome::Ignored(IgnoreReason::NotDragging);
        };

        let center = ring.center();
        let sectors = ring_sectors(store.menu_items(), center, ring.sector_radius());
        let target = SectorCollisionDetector::new(ring.trash_radius).detect(pointer, &sectors);

        session.pointer = Some(pointer);
        session.overlay = Some(apply_all(&self.modifiers, pointer, center));
        self.over(target, store)
    }

    /// Records the current drop target. Palette drags copy their item onto
    /// the ring as soon as they hover a ring sector; the copy stays even if
    /// the drag is abandoned afterwards.
    pub fn over(&mut self, target: Option<CollisionTarget>, store: &mut MenuStore) -> DragOutcome {
        let DragState::Dragging(session) = &mut self.state else {
            return DragOutcome::Ignored(IgnoreReason::NotDragging);
        };
        session.over = target.clone();

        let DragSource::Palette(item) = &session.source else {
            return DragOutcome::Hovering(target);
        };
        let Some(over_index) = target
            .as_ref()
            .and_then(CollisionTarget::sector_id)
            .and_then(|id| store.active_menu().position(id))
        else {
            return DragOutcome::Hovering(target);
        };

        let copy = item.clone_for_ring(&self.clone_prefix);
        if store.active_menu().contains(&copy.id) {
            return DragOutcome::Hovering(target);
        }

        let mut items: Vec<MenuItem> = store
            .menu_items()
            .iter()
            .filter(|i| i.id != item.id)
            .cloned()
            .collect();
        if !store.policy().can_insert(items.len()) {
            return log_outcome(DragOutcome::Ignored(IgnoreReason::RingFull));
        }
        let index = over_index.min(items.len());
        let id = copy.id.clone();
        items.insert(index, copy);
        store.set_menu_items(items);

        log_outcome(DragOutcome::Inserted { id, index })
    }

    /// Ends the drag: a drop on the trash deletes, a drop on another sector
    /// reorders. The session is cleared in every case.
    pub fn end(&mut self, store: &mut MenuStore) -> DragOutcome {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return DragOutcome::Ignored(IgnoreReason::NotDragging);
        };
        let dragged = session.dragged_id().clone();

        let outcome = match session.over {
            None => DragOutcome::Ignored(IgnoreReason::NoTarget),
            Some(CollisionTarget::Trash) => delete(&dragged, store),
            Some(CollisionTarget::Sector(target)) => reorder(&dragged, &target, store),
        };
        log_outcome(outcome)
    }

    /// `(from, to)` of the reorder a drop would perform right now, used to
    /// preview the ring while a ring item is dragged.
    pub fn preview_move(&self, store: &MenuStore) -> Option<(usize, usize)> {
        let session = self.session()?;
        if !matches!(session.source, DragSource::Ring(_)) {
            return None;
        }
        let target = session.over.as_ref()?.sector_id()?;
        let menu = store.active_menu();
        let from = menu.position(session.dragged_id())?;
        let to = menu.position(target)?;
        (from != to).then_some((from, to))
    }
}

fn delete(dragged: &ItemId, store: &mut MenuStore) -> DragOutcome {
    if !store.policy().can_remove(store.menu_items().len()) {
        return DragOutcome::Ignored(IgnoreReason::RingMinimum);
    }
    if !store.active_menu().contains(dragged) {
        return DragOutcome::Ignored(IgnoreReason::UnknownItem);
    }
    let items = store
        .menu_items()
        .iter()
        .filter(|i| &i.id != dragged)
        .cloned()
        .collect();
    store.set_menu_items(items);
    DragOutcome::Deleted(dragged.clone())
}

fn reorder(dragged: &ItemId, target: &ItemId, store: &mut MenuStore) -> DragOutcome {
    if dragged == target {
        return DragOutcome::Ignored(IgnoreReason::SameSlot);
    }
    let menu = store.active_menu();
    let Some(from) = menu.position(dragged) else {
        return DragOutcome::Ignored(IgnoreReason::UnknownItem);
    };
    let Some(to) = menu.position(target) else {
        return DragOutcome::Ignored(IgnoreReason::UnknownTarget);
    };

    let mut items = store.menu_items().to_vec();
    array_move(&mut items, from, to);
    store.set_menu_items(items);
    DragOutcome::Moved {
        id: dragged.clone(),
        from,
        to,
    }
}

fn log_outcome(outcome: DragOutcome) -> DragOutcome {
    log::debug!("drag: {}", outcome);
    outcome
}
