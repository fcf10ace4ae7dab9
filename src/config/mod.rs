//! Typed configuration registry: validated key/value entries with change
//! callbacks, text serialization, and config-window materialization.

pub mod entry;

use std::collections::HashMap;

pub use entry::{
    ChangeCallback, ConfigDescriptor, ConfigEntry, ConfigKind, ConfigValue, HotkeyAction,
    VisibilityPredicate, validate,
};

use crate::input::KeyCombo;

/// Owned store of [`ConfigEntry`] records. Entries are registered once,
/// never removed, and mutated only through [`ConfigRegistry::set`], which
/// revalidates on every write. Registration order is preserved and drives
/// both serialization order and config-window layout.
///
/// All failures degrade to a logged no-op; nothing here panics or
/// propagates an error to the caller.
pub struct ConfigRegistry {
    entries: Vec<ConfigEntry>,
    index: HashMap<String, usize>,
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a new entry. Fails (logged, no panic) on a duplicate key or
    /// an initial value that does not validate for the descriptor's kind.
    /// Returns whether the entry was stored.
    pub fn register(&mut self, descriptor: ConfigDescriptor) -> bool {
        if self.index.contains_key(&descriptor.key) {
            log::error!("config: tried to register existing key '{}'", descriptor.key);
            return false;
        }
        if !validate(&descriptor.kind, &descriptor.value) {
            log::error!(
                "config: invalid initial {} value for '{}': {:?}",
                descriptor.kind.name(),
                descriptor.key,
                descriptor.value
            );
            return false;
        }

        let entry = ConfigEntry {
            key: descriptor.key,
            kind: descriptor.kind,
            value: descriptor.value,
            display: descriptor.display.unwrap_or_else(|| "Config Value".to_string()),
            description: descriptor
                .description
                .unwrap_or_else(|| "A configuration value".to_string()),
            callback: descriptor.callback,
            visible_when: descriptor.visible_when,
        };
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Current value of a key; unknown keys are a logged `None`.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self.entry(key) {
            Some(entry) => Some(&entry.value),
            None => {
                log::warn!("config: queried unknown key '{key}'");
                None
            }
        }
    }

    pub fn entry(&self, key: &str) -> Option<&ConfigEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Single mutation entry point. Revalidates against the entry's kind;
    /// an unknown key or invalid value leaves state unchanged (logged).
    /// When `notify` is set the entry's callback fires with the new value.
    pub fn set(&mut self, key: &str, value: ConfigValue, notify: bool) -> bool {
        let Some(&slot) = self.index.get(key) else {
            log::warn!("config: tried to set unregistered key '{key}'");
            return false;
        };
        let entry = &mut self.entries[slot];
        if !validate(&entry.kind, &value) {
            log::error!(
                "config: invalid {} value for '{}': {:?}",
                entry.kind.name(),
                key,
                value
            );
            return false;
        }

        entry.value = value;
        if notify && let Some(callback) = entry.callback.clone() {
            callback(&self.entries[slot].value);
        }
        true
    }

    /// Whether a key's config-window row should currently be shown.
    pub fn visible(&self, key: &str) -> bool {
        self.entry(key).is_none_or(ConfigEntry::visible)
    }

    /// JSON object mapping every key to its value coerced to text, in
    /// registration order.
    pub fn serialize(&self) -> String {
        self.serialize_inner(false)
    }

    /// Same record, indented for human eyes.
    pub fn serialize_pretty(&self) -> String {
        self.serialize_inner(true)
    }

    fn serialize_inner(&self, pretty: bool) -> String {
        let mut map = serde_json::Map::new();
        for entry in &self.entries {
            map.insert(
                entry.key.clone(),
                serde_json::Value::String(entry.value.to_text()),
            );
        }
        let value = serde_json::Value::Object(map);
        if pretty {
            serde_json::to_string_pretty(&value).unwrap_or_default()
        } else {
            value.to_string()
        }
    }

    /// Parse a serialized config record and replay it entry by entry.
    /// Unknown keys are skipped with a warning; per-kind coercion rejects
    /// malformed values individually; an unparsable record is a no-op.
    pub fn deserialize(&mut self, text: &str, notify: bool) {
        let Ok(record) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(text)
        else {
            log::warn!("config: stored record did not parse, skipping restore");
            return;
        };

        for (key, raw) in record {
            let Some(entry) = self.entry(&key) else {
                log::warn!("config: stored key '{key}' is not registered, skipping");
                continue;
            };
            let kind = entry.kind.clone();
            let text = match raw {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            match &kind {
                ConfigKind::Checkbox => match text.as_str() {
                    "true" => {
                        self.set(&key, ConfigValue::Bool(true), notify);
                    }
                    "false" => {
                        self.set(&key, ConfigValue::Bool(false), notify);
                    }
                    other => {
                        log::warn!("config: invalid checkbox value '{other}' for '{key}'");
                    }
                },
                ConfigKind::Number { .. } => match text.parse::<f64>() {
                    Ok(number) if !number.is_nan() => {
                        self.set(&key, ConfigValue::Number(number), notify);
                    }
                    _ => {
                        log::warn!("config: invalid number value '{text}' for '{key}'");
                    }
                },
                // Color and hotkey re-validate inside `set` against the same
                // patterns registration used.
                ConfigKind::Color
                | ConfigKind::Hotkey { .. }
                | ConfigKind::Dropdown { .. }
                | ConfigKind::Text
                | ConfigKind::Hidden => {
                    self.set(&key, ConfigValue::Text(text), notify);
                }
            }
        }
    }

    /// Actions of every hotkey entry whose stored value canonicalizes to
    /// `combo`, in registration order. Cloned out so the dispatcher can
    /// fire them without holding a registry borrow.
    pub fn hotkey_actions_for(&self, combo: &KeyCombo) -> Vec<HotkeyAction> {
        self.entries
            .iter()
            .filter_map(|entry| match (&entry.kind, &entry.value) {
                (ConfigKind::Hotkey { action }, ConfigValue::Text(value))
                    if &KeyCombo::parse(value) == combo =>
                {
                    Some(action.clone())
                }
                _ => None,
            })
            .collect()
    }
}
