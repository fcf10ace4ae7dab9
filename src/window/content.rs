use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::ConfigValue;

/// Invoked when an input control commits a value.
pub type ValueCallback = Rc<dyn Fn(&ConfigValue)>;
/// Invoked when a button control is pressed.
pub type PressCallback = Rc<dyn Fn()>;

/// One content-area control. Each variant carries exactly its fields;
/// callbacks are optional and never serialized.
#[derive(Clone)]
pub enum Control {
    Label {
        text: String,
        tooltip: String,
        for_key: String,
        tag: String,
    },
    Checkbox {
        id: String,
        value: bool,
        on_change: Option<ValueCallback>,
        tag: String,
    },
    Color {
        id: String,
        value: String,
        on_change: Option<ValueCallback>,
        tag: String,
    },
    Hotkey {
        id: String,
        value: String,
        on_change: Option<ValueCallback>,
        tag: String,
    },
    Dropdown {
        id: String,
        value: String,
        options: Vec<String>,
        on_change: Option<ValueCallback>,
        tag: String,
    },
    Number {
        id: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
        on_change: Option<ValueCallback>,
        tag: String,
    },
    Text {
        id: String,
        value: String,
        on_change: Option<ValueCallback>,
        tag: String,
    },
    Button {
        id: String,
        text: String,
        on_press: Option<PressCallback>,
        tag: String,
    },
    Newline,
    Raw {
        markup: String,
    },
}

impl Control {
    /// User-assigned id, for input-like controls that carry one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Checkbox { id, .. }
            | Self::Color { id, .. }
            | Self::Hotkey { id, .. }
            | Self::Dropdown { id, .. }
            | Self::Number { id, .. }
            | Self::Text { id, .. }
            | Self::Button { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Label { tag, .. }
            | Self::Checkbox { tag, .. }
            | Self::Color { tag, .. }
            | Self::Hotkey { tag, .. }
            | Self::Dropdown { tag, .. }
            | Self::Number { tag, .. }
            | Self::Text { tag, .. }
            | Self::Button { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

/// A control plus its visibility flag (driven by config-window visibility
/// predicates; always shown otherwise).
#[derive(Clone)]
pub struct ContentItem {
    pub control: Control,
    pub hidden: bool,
}

impl ContentItem {
    pub fn new(control: Control) -> Self {
        Self {
            control,
            hidden: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder specs

/// Spec structs mirror the creation options of each control so call sites
/// can fill only what they need and default the rest.
#[derive(Clone, Default)]
pub struct LabelSpec {
    pub text: String,
    pub tooltip: String,
    pub for_key: String,
    pub tag: String,
}

#[derive(Clone, Default)]
pub struct CheckboxSpec {
    pub id: String,
    pub value: bool,
    pub on_change: Option<ValueCallback>,
    pub tag: String,
}

#[derive(Clone, Default)]
pub struct ColorSpec {
    pub id: String,
    pub value: String,
    pub on_change: Option<ValueCallback>,
    pub tag: String,
}

#[derive(Clone, Default)]
pub struct HotkeySpec {
    pub id: String,
    pub value: String,
    pub on_change: Option<ValueCallback>,
    pub tag: String,
}

#[derive(Clone, Default)]
pub struct DropdownSpec {
    pub id: String,
    pub value: String,
    pub options: Vec<String>,
    pub on_change: Option<ValueCallback>,
    pub tag: String,
}

#[derive(Clone, Default)]
pub struct NumberSpec {
    pub id: String,
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub on_change: Option<ValueCallback>,
    pub tag: String,
}

#[derive(Clone, Default)]
pub struct TextSpec {
    pub id: String,
    pub value: String,
    pub on_change: Option<ValueCallback>,
    pub tag: String,
}

#[derive(Clone, Default)]
pub struct ButtonSpec {
    pub id: String,
    pub text: String,
    pub on_press: Option<PressCallback>,
    pub tag: String,
}

/// Chained content construction: each call appends one control to the
/// window's content list and returns the builder. The resulting list is
/// plainly inspectable through [`super::WindowManager::controls`] so tests
/// never need to scrape the terminal buffer.
pub struct ContentBuilder<'a> {
    pub(crate) items: &'a mut Vec<ContentItem>,
}

impl ContentBuilder<'_> {
    fn push(self, control: Control) -> Self {
        self.items.push(ContentItem::new(control));
        self
    }

    pub fn label(self, spec: LabelSpec) -> Self {
        self.push(Control::Label {
            text: spec.text,
            tooltip: spec.tooltip,
            for_key: spec.for_key,
            tag: spec.tag,
        })
    }

    pub fn checkbox_input(self, spec: CheckboxSpec) -> Self {
        self.push(Control::Checkbox {
            id: spec.id,
            value: spec.value,
            on_change: spec.on_change,
            tag: spec.tag,
        })
    }

    pub fn color_input(self, spec: ColorSpec) -> Self {
        self.push(Control::Color {
            id: spec.id,
            value: spec.value,
            on_change: spec.on_change,
            tag: spec.tag,
        })
    }

    /// A hotkey input captures the next physical key combination when
    /// clicked: a one-shot capture, not a persistent binding.
    pub fn hotkey_input(self, spec: HotkeySpec) -> Self {
        self.push(Control::Hotkey {
            id: spec.id,
            value: spec.value,
            on_change: spec.on_change,
            tag: spec.tag,
        })
    }

    pub fn dropdown_input(self, spec: DropdownSpec) -> Self {
        let mut options = spec.options;
        if !options.contains(&spec.value) {
            options.push(spec.value.clone());
        }
        self.push(Control::Dropdown {
            id: spec.id,
            value: spec.value,
            options,
            on_change: spec.on_change,
            tag: spec.tag,
        })
    }

    pub fn number_input(self, spec: NumberSpec) -> Self {
        self.push(Control::Number {
            id: spec.id,
            value: spec.value,
            min: spec.min,
            max: spec.max,
            step: spec.step,
            on_change: spec.on_change,
            tag: spec.tag,
        })
    }

    pub fn text_input(self, spec: TextSpec) -> Self {
        self.push(Control::Text {
            id: spec.id,
            value: spec.value,
            on_change: spec.on_change,
            tag: spec.tag,
        })
    }

    pub fn button(self, spec: ButtonSpec) -> Self {
        self.push(Control::Button {
            id: spec.id,
            text: spec.text,
            on_press: spec.on_press,
            tag: spec.tag,
        })
    }

    pub fn newline(self) -> Self {
        self.push(Control::Newline)
    }

    /// Append a pre-rendered line verbatim.
    pub fn raw(self, markup: impl Into<String>) -> Self {
        self.push(Control::Raw {
            markup: markup.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Content snapshots

/// Serializable mirror of [`Control`] minus callbacks. Persisted windows
/// round-trip their content through this, so restored controls come back
/// inert (no callbacks), exactly like markup stored as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlSnapshot {
    Label {
        text: String,
        tooltip: String,
        for_key: String,
        tag: String,
    },
    Checkbox {
        id: String,
        value: bool,
        tag: String,
    },
    Color {
        id: String,
        value: String,
        tag: String,
    },
    Hotkey {
        id: String,
        value: String,
        tag: String,
    },
    Dropdown {
        id: String,
        value: String,
        options: Vec<String>,
        tag: String,
    },
    Number {
        id: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
        tag: String,
    },
    Text {
        id: String,
        value: String,
        tag: String,
    },
    Button {
        id: String,
        text: String,
        tag: String,
    },
    Newline,
    Raw {
        markup: String,
    },
}

impl From<&Control> for ControlSnapshot {
    fn from(control: &Control) -> Self {
        match control {
            Control::Label {
                text,
                tooltip,
                for_key,
                tag,
            } => Self::Label {
                text: text.clone(),
                tooltip: tooltip.clone(),
                for_key: for_key.clone(),
                tag: tag.clone(),
            },
            Control::Checkbox { id, value, tag, .. } => Self::Checkbox {
                id: id.clone(),
                value: *value,
                tag: tag.clone(),
            },
            Control::Color { id, value, tag, .. } => Self::Color {
                id: id.clone(),
                value: value.clone(),
                tag: tag.clone(),
            },
            Control::Hotkey { id, value, tag, .. } => Self::Hotkey {
                id: id.clone(),
                value: value.clone(),
                tag: tag.clone(),
            },
            Control::Dropdown {
                id,
                value,
                options,
                tag,
                ..
            } => Self::Dropdown {
                id: id.clone(),
                value: value.clone(),
                options: options.clone(),
                tag: tag.clone(),
            },
            Control::Number {
                id,
                value,
                min,
                max,
                step,
                tag,
                ..
            } => Self::Number {
                id: id.clone(),
                value: *value,
                min: *min,
                max: *max,
                step: *step,
                tag: tag.clone(),
            },
            Control::Text { id, value, tag, .. } => Self::Text {
                id: id.clone(),
                value: value.clone(),
                tag: tag.clone(),
            },
            Control::Button { id, text, tag, .. } => Self::Button {
                id: id.clone(),
                text: text.clone(),
                tag: tag.clone(),
            },
            Control::Newline => Self::Newline,
            Control::Raw { markup } => Self::Raw {
                markup: markup.clone(),
            },
        }
    }
}

impl ControlSnapshot {
    fn into_control(self) -> Control {
        match self {
            Self::Label {
                text,
                tooltip,
                for_key,
                tag,
            } => Control::Label {
                text,
                tooltip,
                for_key,
                tag,
            },
            Self::Checkbox { id, value, tag } => Control::Checkbox {
                id,
                value,
                on_change: None,
                tag,
            },
            Self::Color { id, value, tag } => Control::Color {
                id,
                value,
                on_change: None,
                tag,
            },
            Self::Hotkey { id, value, tag } => Control::Hotkey {
                id,
                value,
                on_change: None,
                tag,
            },
            Self::Dropdown {
                id,
                value,
                options,
                tag,
            } => Control::Dropdown {
                id,
                value,
                options,
                on_change: None,
                tag,
            },
            Self::Number {
                id,
                value,
                min,
                max,
                step,
                tag,
            } => Control::Number {
                id,
                value,
                min,
                max,
                step,
                on_change: None,
                tag,
            },
            Self::Text { id, value, tag } => Control::Text {
                id,
                value,
                on_change: None,
                tag,
            },
            Self::Button { id, text, tag } => Control::Button {
                id,
                text,
                on_press: None,
                tag,
            },
            Self::Newline => Control::Newline,
            Self::Raw { markup } => Control::Raw { markup },
        }
    }
}

/// Encode a content list as its persisted text form.
pub fn encode_content(items: &[ContentItem]) -> String {
    let snapshots: Vec<ControlSnapshot> = items.iter().map(|item| (&item.control).into()).collect();
    serde_json::to_string(&snapshots).unwrap_or_default()
}

/// Decode persisted content back into (inert) controls. Unparsable text
/// yields an empty content list.
pub fn decode_content(markup: &str) -> Vec<ContentItem> {
    let Ok(snapshots) = serde_json::from_str::<Vec<ControlSnapshot>>(markup) else {
        return Vec::new();
    };
    snapshots
        .into_iter()
        .map(|snapshot| ContentItem::new(snapshot.into_control()))
        .collect()
}
