//! Persistence coordinator: snapshots window + config state into a
//! [`StateStore`] and replays it on explicit load.

pub mod store;

use serde::{Deserialize, Serialize};

use crate::config::ConfigRegistry;
use crate::window::{
    WindowManager, WindowOptions, decode_content, encode_content, generate_config_window,
};

pub use store::{FileStore, MemoryStore, StateStore};

/// Store key for the serialized config record.
pub const CONFIG_STORE_KEY: &str = "config";
/// Store key for the serialized window session record.
pub const SESSION_STORE_KEY: &str = "session";

/// One persisted window: displayed title, content in its text encoding,
/// live geometry, and every creation option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub title: String,
    pub content: String,
    pub width: u16,
    pub height: u16,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub resizable: bool,
    pub disable_title_stacking: bool,
    pub enable_ghost_button: bool,
    pub enable_close_button: bool,
    pub unique: bool,
    pub tag: String,
    pub id: String,
    pub is_config_window: bool,
}

/// Holds no state of its own beyond the enabled flag; reads from the
/// manager and registry at snapshot time and writes into them at restore.
pub struct PersistenceCoordinator {
    enabled: bool,
}

impl Default for PersistenceCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistenceCoordinator {
    pub fn new() -> Self {
        Self { enabled: false }
    }

    /// Whether the shutdown-triggered snapshot is armed. Set by
    /// [`PersistenceCoordinator::restore`].
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Write the composite record: every live window plus the registry's
    /// serialized config, in two store keys.
    pub fn snapshot(
        &self,
        manager: &WindowManager,
        registry: &ConfigRegistry,
        store: &mut dyn StateStore,
    ) {
        let mut snapshots = Vec::new();
        for key in manager.keys() {
            let Some(record) = manager.get(key) else {
                continue;
            };
            let options = record.options();
            let (x, y) = match record.position() {
                Some((x, y)) => (Some(x), Some(y)),
                None => (None, None),
            };
            let (width, height) = record.size();
            snapshots.push(WindowSnapshot {
                title: record.title().to_string(),
                content: encode_content(record.content()),
                width,
                height,
                x,
                y,
                resizable: options.resizable,
                disable_title_stacking: options.disable_title_stacking,
                enable_ghost_button: options.enable_ghost_button,
                enable_close_button: options.enable_close_button,
                unique: options.unique,
                tag: options.tag.clone(),
                id: options.id.clone(),
                is_config_window: record.is_config_window(),
            });
        }
        match serde_json::to_string(&snapshots) {
            Ok(text) => store.store(SESSION_STORE_KEY, &text),
            Err(error) => log::warn!("persist: session record failed to encode: {error}"),
        }
        store.store(CONFIG_STORE_KEY, &registry.serialize());
    }

    /// Mark persistence active and replay the stored record: config first,
    /// so values exist before any config window is rebuilt, then each
    /// window. Config-window snapshots rebuild through the config-window
    /// renderer; ordinary windows replay their recorded content inert.
    /// A missing or unparsable record restores nothing, silently.
    pub fn restore(
        &mut self,
        manager: &mut WindowManager,
        registry: &mut ConfigRegistry,
        store: &dyn StateStore,
    ) {
        self.enabled = true;

        if let Some(text) = store.load(CONFIG_STORE_KEY) {
            registry.deserialize(&text, false);
        }

        let Some(text) = store.load(SESSION_STORE_KEY) else {
            return;
        };
        let Ok(snapshots) = serde_json::from_str::<Vec<WindowSnapshot>>(&text) else {
            return;
        };
        for snapshot in snapshots {
            let options = WindowOptions {
                title: snapshot.title,
                width: snapshot.width,
                height: snapshot.height,
                x: snapshot.x,
                y: snapshot.y,
                resizable: snapshot.resizable,
                disable_title_stacking: snapshot.disable_title_stacking,
                enable_ghost_button: snapshot.enable_ghost_button,
                enable_close_button: snapshot.enable_close_button,
                unique: snapshot.unique,
                tag: snapshot.tag,
                id: snapshot.id,
            };
            if snapshot.is_config_window {
                generate_config_window(manager, registry, options);
            } else if let Some(key) = manager.create(options)
                && let Some(record) = manager.record_mut(key)
            {
                record.content = decode_content(&snapshot.content);
            }
        }
    }
}
