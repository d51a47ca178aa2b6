//! Radial menu editor: menu state, the drag reorder machine and the scene a
//! renderer draws, driven by replayable events.

pub mod config;
pub mod drag;
pub mod editor;
pub mod events;
pub mod measure;
pub mod scene;
pub mod script;
pub mod store;
pub mod sys;
