use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

/// Canonical representation of a simultaneous key-press set: components
/// lowercased, alias-normalized, sorted, and joined with `+`.
///
/// Both stored combo strings ("Ctrl+S") and the live held-key set
/// ({s, control}) pass through the same routine, so the two sides always
/// compare equal when they describe the same chord.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo(String);

impl KeyCombo {
    /// Canonicalize a user-written combo string.
    pub fn parse(combo: &str) -> Self {
        let parts: BTreeSet<String> = combo
            .split('+')
            .map(|part| normalize_key(part.trim()))
            .filter(|part| !part.is_empty())
            .collect();
        Self(parts.into_iter().collect::<Vec<_>>().join("+"))
    }

    /// Canonicalize a set of held key names.
    pub fn from_held<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let parts: BTreeSet<String> = keys
            .into_iter()
            .map(normalize_key)
            .filter(|part| !part.is_empty())
            .collect();
        Self(parts.into_iter().collect::<Vec<_>>().join("+"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase a key name and collapse the aliases terminals and users mix
/// freely ("Control" vs "Ctrl", "Cmd" vs "Meta").
pub fn normalize_key(name: &str) -> String {
    let lower = name.to_lowercase();
    match lower.as_str() {
        "control" => "ctrl".to_string(),
        "cmd" | "command" | "super" | "win" | "windows" => "meta".to_string(),
        "option" => "alt".to_string(),
        "esc" => "escape".to_string(),
        "spacebar" | " " => "space".to_string(),
        "return" => "enter".to_string(),
        _ => lower,
    }
}

/// Name of the key carried by a key event, normalized for the held set.
/// Keys with no stable textual name (media keys etc.) return `None`.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => c.to_lowercase().to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        KeyCode::Modifier(m) => modifier_key_name(m).to_string(),
        _ => return None,
    };
    Some(normalize_key(&name))
}

fn modifier_key_name(code: ModifierKeyCode) -> &'static str {
    match code {
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "ctrl",
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => "shift",
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "alt",
        ModifierKeyCode::LeftSuper
        | ModifierKeyCode::RightSuper
        | ModifierKeyCode::LeftMeta
        | ModifierKeyCode::RightMeta
        | ModifierKeyCode::LeftHyper
        | ModifierKeyCode::RightHyper => "meta",
        ModifierKeyCode::IsoLevel3Shift | ModifierKeyCode::IsoLevel5Shift => "alt",
    }
}

/// Modifier names carried as flags on an event. Terminals without
/// key-release reporting never deliver separate modifier key-downs, so
/// these are folded into the held set when a combo is computed.
pub fn modifier_names(modifiers: KeyModifiers) -> Vec<&'static str> {
    let mut names = Vec::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        names.push("ctrl");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        names.push("shift");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        names.push("alt");
    }
    if modifiers.contains(KeyModifiers::SUPER) || modifiers.contains(KeyModifiers::META) {
        names.push("meta");
    }
    names
}

/// True when the event is a bare modifier press (Ctrl, Shift, Alt, Meta
/// alone). Hotkey capture ignores these and waits for a real key.
pub fn is_bare_modifier(event: &KeyEvent) -> bool {
    matches!(event.code, KeyCode::Modifier(_))
}

/// Display form used by the hotkey-capture input: `Ctrl+`/`Shift+`/`Alt+`
/// prefixes in that order, then the uppercased key name.
pub fn capture_display(event: &KeyEvent) -> Option<String> {
    let name = key_name(event.code)?;
    let mut combo = String::new();
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        combo.push_str("Ctrl+");
    }
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        combo.push_str("Shift+");
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        combo.push_str("Alt+");
    }
    combo.push_str(&name.to_uppercase());
    Some(combo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sorts_and_lowercases() {
        assert_eq!(KeyCombo::parse("Shift+Ctrl+A").as_str(), "a+ctrl+shift");
        assert_eq!(KeyCombo::parse("a+ctrl+shift").as_str(), "a+ctrl+shift");
    }

    #[test]
    fn test_aliases_collapse() {
        assert_eq!(KeyCombo::parse("Control+S"), KeyCombo::parse("Ctrl+s"));
        assert_eq!(KeyCombo::parse("Cmd+K"), KeyCombo::parse("meta+k"));
    }

    #[test]
    fn test_held_set_matches_stored_string() {
        let held = KeyCombo::from_held(["s", "control"]);
        assert_eq!(held, KeyCombo::parse("Ctrl+S"));
    }

    #[test]
    fn test_order_independent() {
        let a = KeyCombo::from_held(["shift", "ctrl", "a"]);
        let b = KeyCombo::from_held(["a", "shift", "ctrl"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_whitespace_and_empty_parts_dropped() {
        assert_eq!(KeyCombo::parse(" Ctrl + S ").as_str(), "ctrl+s");
        assert_eq!(KeyCombo::parse("++a").as_str(), "a");
    }

    #[test]
    fn test_key_name_normalizes() {
        assert_eq!(key_name(KeyCode::Char('S')).as_deref(), Some("s"));
        assert_eq!(key_name(KeyCode::Esc).as_deref(), Some("escape"));
        assert_eq!(
            key_name(KeyCode::Modifier(ModifierKeyCode::LeftControl)).as_deref(),
            Some("ctrl")
        );
    }

    #[test]
    fn test_capture_display_orders_prefixes() {
        let event = KeyEvent::new(
            KeyCode::Char('k'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        assert_eq!(capture_display(&event).as_deref(), Some("Ctrl+Shift+K"));
    }
}
