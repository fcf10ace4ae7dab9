//! Draggable overlay windows, typed settings, and key chords for ratatui
//! terminal UIs.
//!
//! Three cooperating stores make up the core: a [`ConfigRegistry`] of
//! typed, validated settings; a [`WindowManager`] owning the floating
//! window arena (stacking, dragging, content controls); and a
//! [`KeybindingDispatcher`] matching chorded key combos against held-key
//! state. A [`Toolkit`] wires them to crossterm events and a ratatui
//! frame, and a persistence coordinator snapshots windows + config into a
//! durable store on shutdown and replays them on opt-in load.

pub mod config;
pub mod input;
pub mod persist;
pub mod render;
pub mod toolkit;
pub mod window;

pub use config::{ConfigDescriptor, ConfigEntry, ConfigKind, ConfigRegistry, ConfigValue};
pub use input::{HandlerId, KeyCombo, KeybindingDispatcher};
pub use persist::{FileStore, MemoryStore, PersistenceCoordinator, StateStore, WindowSnapshot};
pub use render::{Theme, draw};
pub use toolkit::Toolkit;
pub use window::{
    ButtonSpec, CheckboxSpec, ColorSpec, Control, DropdownSpec, HotkeySpec, LabelSpec, NumberSpec,
    Region, RegionKind, TextSpec, UiEvent, WindowKey, WindowManager, WindowOptions,
    generate_config_window,
};
