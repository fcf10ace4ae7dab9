use crate::config::{ConfigKind, ConfigRegistry, ConfigValue};

use super::content::{
    CheckboxSpec, ColorSpec, Control, DropdownSpec, HotkeySpec, LabelSpec, NumberSpec, TextSpec,
};
use super::manager::{WindowKey, WindowManager};
use super::options::WindowOptions;

/// Tag carried by every control a config window creates. Commits with this
/// tag are routed into the registry by the embedding layer.
pub const CONFIG_ELEMENT_TAG: &str = "config-element";

/// Materialize the registry as a window: one label + input pair per
/// registered entry, in registration order, each followed by a line break.
/// `Hidden` entries contribute their label only. Config windows are always
/// unique; asking for a second one is blocked by the title policy.
pub fn generate_config_window(
    manager: &mut WindowManager,
    registry: &ConfigRegistry,
    mut options: WindowOptions,
) -> Option<WindowKey> {
    options.unique = true;
    if options.title.is_empty() {
        options.title = "Settings".to_string();
    }
    let key = manager.create(options)?;
    if let Some(record) = manager.record_mut(key) {
        record.is_config_window = true;
    }

    for entry in registry.entries() {
        let tag = CONFIG_ELEMENT_TAG.to_string();
        let builder = manager.content(key)?.label(LabelSpec {
            text: entry.display.clone(),
            tooltip: entry.description.clone(),
            for_key: entry.key.clone(),
            tag: tag.clone(),
        });
        let builder = match &entry.kind {
            ConfigKind::Checkbox => builder.checkbox_input(CheckboxSpec {
                id: entry.key.clone(),
                value: entry.value.as_bool().unwrap_or(false),
                on_change: None,
                tag,
            }),
            ConfigKind::Color => builder.color_input(ColorSpec {
                id: entry.key.clone(),
                value: entry.value.to_text(),
                on_change: None,
                tag,
            }),
            ConfigKind::Hotkey { .. } => builder.hotkey_input(HotkeySpec {
                id: entry.key.clone(),
                value: entry.value.to_text(),
                on_change: None,
                tag,
            }),
            ConfigKind::Dropdown { options } => builder.dropdown_input(DropdownSpec {
                id: entry.key.clone(),
                value: entry.value.to_text(),
                options: options.clone(),
                on_change: None,
                tag,
            }),
            ConfigKind::Number { min, max, step } => builder.number_input(NumberSpec {
                id: entry.key.clone(),
                value: entry.value.as_number().unwrap_or(0.0),
                min: Some(*min),
                max: Some(*max),
                step: Some(*step),
                on_change: None,
                tag,
            }),
            ConfigKind::Text => builder.text_input(TextSpec {
                id: entry.key.clone(),
                value: entry.value.to_text(),
                on_change: None,
                tag,
            }),
            // Hidden entries get no input control.
            ConfigKind::Hidden => builder,
        };
        builder.newline();
    }

    refresh_config_windows(manager, registry);
    Some(key)
}

/// Re-sync every config window from the registry: control values are
/// reconciled, and each entry's visibility predicate is re-applied to the
/// input, its label, and the trailing line break. Runs after any config
/// change and after a config load.
pub fn refresh_config_windows(manager: &mut WindowManager, registry: &ConfigRegistry) {
    for key in manager.keys() {
        let Some(record) = manager.record_mut(key) else {
            continue;
        };
        if !record.is_config_window() {
            continue;
        }
        let len = record.content.len();
        for index in 0..len {
            let id = match &record.content[index].control {
                Control::Checkbox { id, tag, .. }
                | Control::Color { id, tag, .. }
                | Control::Hotkey { id, tag, .. }
                | Control::Dropdown { id, tag, .. }
                | Control::Number { id, tag, .. }
                | Control::Text { id, tag, .. }
                    if tag == CONFIG_ELEMENT_TAG =>
                {
                    id.clone()
                }
                _ => continue,
            };
            let Some(entry) = registry.entry(&id) else {
                continue;
            };

            match (&mut record.content[index].control, &entry.value) {
                (Control::Checkbox { value, .. }, ConfigValue::Bool(next)) => *value = *next,
                (Control::Number { value, .. }, ConfigValue::Number(next)) => *value = *next,
                (
                    Control::Color { value, .. }
                    | Control::Hotkey { value, .. }
                    | Control::Dropdown { value, .. }
                    | Control::Text { value, .. },
                    ConfigValue::Text(next),
                ) => *value = next.clone(),
                _ => {}
            }

            let hidden = !entry.visible();
            record.content[index].hidden = hidden;
            if index >= 1
                && let Control::Label { for_key, .. } = &record.content[index - 1].control
                && for_key == &id
            {
                record.content[index - 1].hidden = hidden;
            }
            if index + 1 < len
                && matches!(record.content[index + 1].control, Control::Newline)
            {
                record.content[index + 1].hidden = hidden;
            }
        }
    }
}
