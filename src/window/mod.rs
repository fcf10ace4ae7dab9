//! Floating window manager: lifecycle, stacking, drag interaction, and the
//! chained content-builder API.

pub mod config_window;
pub mod content;
pub mod manager;
pub mod options;

pub use config_window::{CONFIG_ELEMENT_TAG, generate_config_window, refresh_config_windows};
pub use content::{
    ButtonSpec, CheckboxSpec, ColorSpec, ContentBuilder, ContentItem, Control, ControlSnapshot,
    DropdownSpec, HotkeySpec, LabelSpec, NumberSpec, PressCallback, TextSpec, ValueCallback,
    decode_content, encode_content,
};
pub use manager::{Region, RegionKind, UiEvent, WindowKey, WindowManager, WindowRecord};
pub use options::WindowOptions;
