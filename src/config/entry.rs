use std::rc::Rc;

use crossterm::event::KeyEvent;
use once_cell::sync::Lazy;
use regex::Regex;

/// Invoked by the registry after a successful `set`, with the new value.
pub type ChangeCallback = Rc<dyn Fn(&ConfigValue)>;
/// Fired by the keybinding dispatcher when a hotkey entry's combo matches.
pub type HotkeyAction = Rc<dyn Fn(&KeyEvent)>;
/// Controls whether an entry's row is shown in a config window.
pub type VisibilityPredicate = Rc<dyn Fn() -> bool>;

static COLOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})$").unwrap());
static HOTKEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:ctrl|alt|shift|meta|[a-z])(?:\+(?i:ctrl|alt|shift|meta|[a-z]))*$").unwrap()
});

/// A stored configuration value. Checkbox entries hold `Bool`, number
/// entries hold `Number`, everything else holds `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Text coercion used by the persisted config record.
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The kind of a config entry, carrying exactly the extras that kind
/// requires: a hotkey always has an action, a number always has its
/// min/max/step, a dropdown always has its option list.
#[derive(Clone)]
pub enum ConfigKind {
    Checkbox,
    Color,
    Hotkey { action: HotkeyAction },
    Dropdown { options: Vec<String> },
    Number { min: f64, max: f64, step: f64 },
    Text,
    Hidden,
}

impl ConfigKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Color => "color",
            Self::Hotkey { .. } => "hotkey",
            Self::Dropdown { .. } => "dropdown",
            Self::Number { .. } => "number",
            Self::Text => "text",
            Self::Hidden => "hidden",
        }
    }
}

/// Validate a value against a kind. Color and hotkey values are pattern
/// checked; number values only need to be a real number (min/max/step are
/// UI hints, not set-time constraints); dropdown/text/hidden accept any
/// text.
pub fn validate(kind: &ConfigKind, value: &ConfigValue) -> bool {
    match kind {
        ConfigKind::Checkbox => matches!(value, ConfigValue::Bool(_)),
        ConfigKind::Color => value
            .as_text()
            .is_some_and(|text| COLOR_PATTERN.is_match(text)),
        ConfigKind::Hotkey { .. } => value
            .as_text()
            .is_some_and(|text| HOTKEY_PATTERN.is_match(text)),
        ConfigKind::Number { .. } => value.as_number().is_some_and(|n| !n.is_nan()),
        ConfigKind::Dropdown { .. } | ConfigKind::Text | ConfigKind::Hidden => {
            matches!(value, ConfigValue::Text(_))
        }
    }
}

/// One registered setting.
pub struct ConfigEntry {
    pub key: String,
    pub kind: ConfigKind,
    pub value: ConfigValue,
    pub display: String,
    pub description: String,
    pub callback: Option<ChangeCallback>,
    pub visible_when: Option<VisibilityPredicate>,
}

impl ConfigEntry {
    /// Evaluate the visibility predicate; entries without one are visible.
    pub fn visible(&self) -> bool {
        self.visible_when.as_ref().is_none_or(|predicate| predicate())
    }
}

/// Registration descriptor. One constructor per kind so the required
/// extras cannot be forgotten; optional metadata chains on top.
pub struct ConfigDescriptor {
    pub(crate) key: String,
    pub(crate) kind: ConfigKind,
    pub(crate) value: ConfigValue,
    pub(crate) display: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) callback: Option<ChangeCallback>,
    pub(crate) visible_when: Option<VisibilityPredicate>,
}

impl ConfigDescriptor {
    fn new(key: impl Into<String>, kind: ConfigKind, value: ConfigValue) -> Self {
        Self {
            key: key.into(),
            kind,
            value,
            display: None,
            description: None,
            callback: None,
            visible_when: None,
        }
    }

    pub fn checkbox(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, ConfigKind::Checkbox, ConfigValue::Bool(value))
    }

    pub fn color(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, ConfigKind::Color, ConfigValue::Text(value.into()))
    }

    pub fn hotkey(
        key: impl Into<String>,
        value: impl Into<String>,
        action: impl Fn(&KeyEvent) + 'static,
    ) -> Self {
        Self::new(
            key,
            ConfigKind::Hotkey {
                action: Rc::new(action),
            },
            ConfigValue::Text(value.into()),
        )
    }

    pub fn dropdown(
        key: impl Into<String>,
        value: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        let value = value.into();
        // The initial value is always offered, whatever the option list says.
        let mut options = options;
        if !options.contains(&value) {
            options.insert(0, value.clone());
        }
        Self::new(
            key,
            ConfigKind::Dropdown { options },
            ConfigValue::Text(value),
        )
    }

    pub fn number(key: impl Into<String>, value: f64, min: f64, max: f64, step: f64) -> Self {
        Self::new(
            key,
            ConfigKind::Number { min, max, step },
            ConfigValue::Number(value),
        )
    }

    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, ConfigKind::Text, ConfigValue::Text(value.into()))
    }

    pub fn hidden(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, ConfigKind::Hidden, ConfigValue::Text(value.into()))
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn on_change(mut self, callback: impl Fn(&ConfigValue) + 'static) -> Self {
        self.callback = Some(Rc::new(callback));
        self
    }

    pub fn visible_when(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.visible_when = Some(Rc::new(predicate));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_checkbox() {
        assert!(validate(&ConfigKind::Checkbox, &ConfigValue::Bool(true)));
        assert!(!validate(&ConfigKind::Checkbox, &ConfigValue::Text("true".into())));
        assert!(!validate(&ConfigKind::Checkbox, &ConfigValue::Number(1.0)));
    }

    #[test]
    fn test_validate_color() {
        for good in ["#aabbcc", "#ABC", "#123456", "#fff"] {
            assert!(validate(&ConfigKind::Color, &ConfigValue::Text(good.into())), "{good}");
        }
        for bad in ["aabbcc", "#ab", "#12345", "#gggggg", ""] {
            assert!(!validate(&ConfigKind::Color, &ConfigValue::Text(bad.into())), "{bad}");
        }
    }

    #[test]
    fn test_validate_hotkey() {
        let kind = ConfigKind::Hotkey {
            action: Rc::new(|_| {}),
        };
        for good in ["Ctrl+S", "a", "Ctrl+Alt+Shift+Meta+z", "shift+Q"] {
            assert!(validate(&kind, &ConfigValue::Text(good.into())), "{good}");
        }
        for bad in ["Ctrl+", "+a", "Ctrl++s", "Ctrl+Enter", "ab", ""] {
            assert!(!validate(&kind, &ConfigValue::Text(bad.into())), "{bad}");
        }
    }

    #[test]
    fn test_validate_number_rejects_nan() {
        let kind = ConfigKind::Number {
            min: 0.0,
            max: 10.0,
            step: 1.0,
        };
        assert!(validate(&kind, &ConfigValue::Number(5.0)));
        // Out-of-range is allowed at set time; min/max are UI hints.
        assert!(validate(&kind, &ConfigValue::Number(-100.0)));
        assert!(!validate(&kind, &ConfigValue::Number(f64::NAN)));
        assert!(!validate(&kind, &ConfigValue::Text("5".into())));
    }

    #[test]
    fn test_dropdown_descriptor_offers_initial_value() {
        let descriptor =
            ConfigDescriptor::dropdown("mode", "fast", vec!["slow".into(), "safe".into()]);
        let ConfigKind::Dropdown { options } = &descriptor.kind else {
            panic!("expected dropdown kind");
        };
        assert_eq!(options, &["fast", "slow", "safe"]);

        // Already listed: not duplicated.
        let descriptor = ConfigDescriptor::dropdown("mode", "slow", vec!["slow".into()]);
        let ConfigKind::Dropdown { options } = &descriptor.kind else {
            panic!("expected dropdown kind");
        };
        assert_eq!(options, &["slow"]);
    }

    #[test]
    fn test_value_text_coercion() {
        assert_eq!(ConfigValue::Bool(true).to_text(), "true");
        assert_eq!(ConfigValue::Number(5.0).to_text(), "5");
        assert_eq!(ConfigValue::Number(0.5).to_text(), "0.5");
        assert_eq!(ConfigValue::Text("#fff".into()).to_text(), "#fff");
    }
}
