use crate::config::{self, Config};
use crate::drag::{DragController, DragOutcome};
use crate::events::AppEvent;
use crate::measure::Throttle;
use crate::scene::Scene;
use crate::store::{MenuStore, StoreError};
use sectors::{ItemId, Point, Rect};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug)]
pub enum EditorMsg {
    Resize(Rect),
    DragStart(ItemId),
    PointerMove(Point),
    DragEnd,
    SwitchMenu(usize),
    AddMenu,
    DeleteMenu(usize),
    ConfigReload,
    Tick,
}

impl From<AppEvent> for EditorMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Resize(r) => EditorMsg::Resize(r),
            AppEvent::DragStart(id) => EditorMsg::DragStart(id),
            AppEvent::PointerMove(p) => EditorMsg::PointerMove(p),
            AppEvent::DragEnd => EditorMsg::DragEnd,
            AppEvent::SwitchMenu(i) => EditorMsg::SwitchMenu(i),
            AppEvent::AddMenu => EditorMsg::AddMenu,
            AppEvent::DeleteMenu(i) => EditorMsg::DeleteMenu(i),
            AppEvent::ConfigReload => EditorMsg::ConfigReload,
            AppEvent::Tick => EditorMsg::Tick,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorUpdate {
    Drag(DragOutcome),
    Measured(Rect),
    MenuSwitched(usize),
    MenuAdded(usize),
    MenuDeleted(usize),
    Reloaded,
    Rejected(String),
    Idle,
}

impl fmt::Display for EditorUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drag(outcome) => write!(f, "{outcome}"),
            Self::Measured(r) => write!(f, "measured {},{} {}x{}", r.x, r.y, r.width, r.height),
            Self::MenuSwitched(i) => write!(f, "switched to menu {i}"),
            Self::MenuAdded(i) => write!(f, "added menu {i}"),
            Self::MenuDeleted(i) => write!(f, "deleted menu {i}"),
            Self::Reloaded => f.write_str("config reloaded"),
            Self::Rejected(reason) => write!(f, "rejected: {reason}"),
            Self::Idle => f.write_str("idle"),
        }
    }
}

/// The editor shell: owns the menus and the drag machine and applies events
/// to them one at a time.
pub struct Editor {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub store: MenuStore,
    pub drag: DragController,
    measure: Throttle<Rect>,
    pub bounds: Rect,
}

impl Editor {
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let store = MenuStore::new(
            config.menus.clone(),
            config.palette.clone(),
            config.template.clone(),
            config.ring.policy(),
        );
        let drag = DragController::new(
            config.drag.modifiers.clone(),
            config.drag.clone_prefix.clone(),
        );
        let side = config.ring.radius * 2.0;

        Self {
            bounds: Rect::new(0.0, 0.0, side, side),
            config,
            config_path,
            store,
            drag,
            measure: Throttle::default(),
        }
    }

    pub fn scene(&self) -> Scene {
        Scene::build(&self.store, &self.drag, &self.config)
    }

    pub fn update(&mut self, msg: EditorMsg, now: Instant) -> EditorUpdate {
        match msg {
            EditorMsg::Resize(rect) => match self.measure.offer(rect, now) {
                Some(rect) => self.measured(rect),
                None => EditorUpdate::Idle,
            },
            EditorMsg::Tick => match self.measure.flush(now) {
                Some(rect) => self.measured(rect),
                None => EditorUpdate::Idle,
            },
            EditorMsg::DragStart(id) => EditorUpdate::Drag(self.drag.start(&id, &self.store)),
            EditorMsg::PointerMove(client) => {
                let local = self.bounds.to_local(client);
                EditorUpdate::Drag(
                    self.drag
                        .pointer_moved(local, &self.config.ring, &mut self.store),
                )
            }
            EditorMsg::DragEnd => EditorUpdate::Drag(self.drag.end(&mut self.store)),
            EditorMsg::SwitchMenu(index) => {
                let result = self.store.switch_active(index);
                self.store_result(result.map(|_| EditorUpdate::MenuSwitched(index)))
            }
            EditorMsg::AddMenu => EditorUpdate::MenuAdded(self.store.add_configuration()),
            EditorMsg::DeleteMenu(index) => {
                let result = self.store.delete_configuration(index);
                self.store_result(result.map(|_| EditorUpdate::MenuDeleted(index)))
            }
            EditorMsg::ConfigReload => {
                self.reload();
                EditorUpdate::Reloaded
            }
        }
    }

    fn measured(&mut self, rect: Rect) -> EditorUpdate {
        self.bounds = rect;
        EditorUpdate::Measured(rect)
    }

    fn store_result(&self, result: Result<EditorUpdate, StoreError>) -> EditorUpdate {
        result.unwrap_or_else(|e| {
            log::warn!("{}", e);
            EditorUpdate::Rejected(e.to_string())
        })
    }

    /// Re-reads the config file. Edited menus are kept; everything else is
    /// replaced.
    pub fn reload(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        let config = config::load_or_default(path);
        self.store.reconfigure(
            config.palette.clone(),
            config.template.clone(),
            config.ring.policy(),
        );
        self.drag.reconfigure(
            config.drag.modifiers.clone(),
            config.drag.clone_prefix.clone(),
        );
        log::debug!(
            "Drag modifiers: [{}]",
            config
                .drag
                .modifiers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.config = config;
        log::info!("Configuration reloaded");
    }

    pub fn ring_ids(&self) -> Vec<String> {
        self.store
            .menu_items()
            .iter()
            .map(|i| i.id.to_string())
            .collect()
    }
}
