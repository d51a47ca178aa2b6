use crate::events::AppEvent;
use crate::store::{PaletteGroup, RingPolicy};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use sectors::{ItemColor, LabelLayout, MenuConfiguration, MenuItem, Modifier, Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RingConfig {
    pub radius: f64,
    // subtracted from the sector radius
    pub border_width: f64,
    pub trash_radius: f64,
    pub min_items: usize,
    pub max_items: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            radius: 155.0,
            border_width: 12.0,
            trash_radius: 70.0,
            min_items: 2,
            max_items: 12,
        }
    }
}

impl RingConfig {
    pub fn center(&self) -> Point {
        Point::new(self.radius, self.radius)
    }

    pub fn sector_radius(&self) -> f64 {
        (self.radius - self.border_width).max(0.0)
    }

    pub fn policy(&self) -> RingPolicy {
        RingPolicy {
            min_items: self.min_items,
            max_items: self.max_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DragConfig {
    pub clone_prefix: String,
    pub modifiers: Vec<Modifier>,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            clone_prefix: "radMenu-".to_string(),
            modifiers: vec![Modifier::RotateAlign],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub ring: RingConfig,
    pub canvas: Size,
    pub labels: LabelLayout,
    pub drag: DragConfig,
    pub theme: HashMap<String, ItemColor>,
    pub template: Vec<MenuItem>,
    pub palette: Vec<PaletteGroup>,
    pub menus: Vec<MenuConfiguration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ring: RingConfig::default(),
            canvas: Size::new(600.0, 480.0),
            labels: LabelLayout::default(),
            drag: DragConfig::default(),
            theme: HashMap::new(),
            template: Vec::new(),
            palette: Vec::new(),
            menus: Vec::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "radial", "radial").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("RADIAL").separator("__")
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
        .add_source(config::File::from(path).required(false))
        .add_source(environment())
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Built-in configuration, used when no config file can be read.
pub fn builtin() -> Config {
    config::Config::builder()
        .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
        .build()
        .and_then(|s| s.try_deserialize())
        .unwrap_or_else(|e| {
            log::error!("Built-in config is invalid: {}", e);
            Config::default()
        })
}

pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        return builtin();
    }

    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            builtin()
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
