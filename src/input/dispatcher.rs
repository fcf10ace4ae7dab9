use std::collections::{BTreeSet, HashMap};

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::config::ConfigRegistry;

use super::combo::{self, KeyCombo};

/// Token handed out by [`KeybindingDispatcher::register`]; identifies one
/// handler within a combo so it can be deregistered later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type KeyHandler = Box<dyn FnMut(&KeyEvent)>;

/// Tracks currently-held keys and mouse buttons, and dispatches key-down
/// edges to registered handlers plus any hotkey-typed config entry whose
/// value canonicalizes to the held combo.
///
/// Explicit handlers fire before config matches; each group fires in
/// registration order. All dispatch is synchronous.
pub struct KeybindingDispatcher {
    bindings: HashMap<KeyCombo, Vec<(HandlerId, KeyHandler)>>,
    held: BTreeSet<String>,
    mouse_buttons: HashMap<MouseButton, bool>,
    mouse_position: (u16, u16),
    next_handler: u64,
}

impl Default for KeybindingDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingDispatcher {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            held: BTreeSet::new(),
            mouse_buttons: HashMap::new(),
            mouse_position: (0, 0),
            next_handler: 0,
        }
    }

    /// Register a handler for a combo string. The combo is canonicalized,
    /// so "Shift+Ctrl+A" and "ctrl+shift+a" land in the same slot.
    pub fn register(
        &mut self,
        combo: &str,
        handler: impl FnMut(&KeyEvent) + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.bindings
            .entry(KeyCombo::parse(combo))
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove one handler from a combo. Removing the last handler drops the
    /// combo entry entirely; an unknown combo or id is a no-op.
    pub fn deregister(&mut self, combo: &str, id: HandlerId) {
        let combo = KeyCombo::parse(combo);
        let Some(handlers) = self.bindings.get_mut(&combo) else {
            return;
        };
        handlers.retain(|(handler_id, _)| *handler_id != id);
        if handlers.is_empty() {
            self.bindings.remove(&combo);
        }
    }

    /// Key-down edge: remember the key as held, compute the canonical combo
    /// of everything currently held (event modifier flags folded in, since
    /// plain terminals never report modifier key-downs), and fire every
    /// match. Returns the number of handlers fired.
    pub fn key_down(&mut self, event: &KeyEvent, registry: &ConfigRegistry) -> usize {
        if let Some(name) = combo::key_name(event.code) {
            self.held.insert(name);
        }

        let mut held: BTreeSet<&str> = self.held.iter().map(String::as_str).collect();
        held.extend(combo::modifier_names(event.modifiers));
        let current = KeyCombo::from_held(held);
        if current.is_empty() {
            return 0;
        }

        let mut fired = 0;
        if let Some(handlers) = self.bindings.get_mut(&current) {
            for (_, handler) in handlers.iter_mut() {
                handler(event);
                fired += 1;
            }
        }
        for action in registry.hotkey_actions_for(&current) {
            action(event);
            fired += 1;
        }
        fired
    }

    /// Key-up removes that single key from the held set; the rest of the
    /// chord stays down.
    pub fn key_up(&mut self, event: &KeyEvent) {
        if let Some(name) = combo::key_name(event.code) {
            self.held.remove(&name);
        }
    }

    /// Clear the whole held set. Wired to terminal focus loss so chords do
    /// not stick after alt-tab.
    pub fn clear_held(&mut self) {
        self.held.clear();
    }

    /// Mirror of the pointer position and button state.
    pub fn observe_mouse(&mut self, event: &MouseEvent) {
        self.mouse_position = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(button) => {
                self.mouse_buttons.insert(button, true);
            }
            MouseEventKind::Up(button) => {
                self.mouse_buttons.insert(button, false);
            }
            _ => {}
        }
    }

    pub fn mouse_position(&self) -> (u16, u16) {
        self.mouse_position
    }

    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.mouse_buttons.get(&button).copied().unwrap_or(false)
    }

    pub fn held_keys(&self) -> impl Iterator<Item = &str> {
        self.held.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crossterm::event::{KeyCode, KeyModifiers};

    use crate::config::ConfigDescriptor;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_combo_fires_in_registration_order() {
        let mut dispatcher = KeybindingDispatcher::new();
        let registry = ConfigRegistry::new();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));

        let first = order.clone();
        dispatcher.register("Ctrl+S", move |_| first.borrow_mut().push(1));
        let second = order.clone();
        dispatcher.register("ctrl+s", move |_| second.borrow_mut().push(2));

        let fired = dispatcher.key_down(&key(KeyCode::Char('s'), KeyModifiers::CONTROL), &registry);
        assert_eq!(fired, 2);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_press_order_does_not_matter() {
        let mut dispatcher = KeybindingDispatcher::new();
        let registry = ConfigRegistry::new();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        dispatcher.register("Shift+Ctrl+A", move |_| counter.set(counter.get() + 1));

        // Modifiers arrive as flags on the final key press.
        dispatcher.key_down(
            &key(
                KeyCode::Char('a'),
                KeyModifiers::CONTROL | KeyModifiers::SHIFT,
            ),
            &registry,
        );
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_key_up_removes_single_key() {
        let mut dispatcher = KeybindingDispatcher::new();
        let registry = ConfigRegistry::new();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        dispatcher.register("a+b", move |_| counter.set(counter.get() + 1));

        dispatcher.key_down(&key(KeyCode::Char('a'), KeyModifiers::NONE), &registry);
        dispatcher.key_down(&key(KeyCode::Char('b'), KeyModifiers::NONE), &registry);
        assert_eq!(hits.get(), 1);

        // Release only `b`; `a` is still held, so pressing `b` again re-forms
        // the chord.
        dispatcher.key_up(&key(KeyCode::Char('b'), KeyModifiers::NONE));
        dispatcher.key_down(&key(KeyCode::Char('b'), KeyModifiers::NONE), &registry);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_focus_loss_clears_held_set() {
        let mut dispatcher = KeybindingDispatcher::new();
        let registry = ConfigRegistry::new();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        dispatcher.register("a+b", move |_| counter.set(counter.get() + 1));

        dispatcher.key_down(&key(KeyCode::Char('a'), KeyModifiers::NONE), &registry);
        dispatcher.clear_held();
        dispatcher.key_down(&key(KeyCode::Char('b'), KeyModifiers::NONE), &registry);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_deregister_last_handler_removes_combo() {
        let mut dispatcher = KeybindingDispatcher::new();
        let id = dispatcher.register("Ctrl+X", |_| {});
        dispatcher.deregister("ctrl+x", id);
        assert!(dispatcher.bindings.is_empty());

        // Unknown combo and stale id are both no-ops.
        dispatcher.deregister("ctrl+x", id);
        dispatcher.deregister("never+registered", HandlerId(99));
    }

    #[test]
    fn test_config_hotkey_fires_after_explicit_handlers() {
        let mut dispatcher = KeybindingDispatcher::new();
        let mut registry = ConfigRegistry::new();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));

        let from_config = order.clone();
        registry.register(ConfigDescriptor::hotkey("do-thing", "Ctrl+K", move |_| {
            from_config.borrow_mut().push("config")
        }));
        let explicit = order.clone();
        dispatcher.register("Ctrl+K", move |_| explicit.borrow_mut().push("explicit"));

        dispatcher.key_down(&key(KeyCode::Char('k'), KeyModifiers::CONTROL), &registry);
        assert_eq!(*order.borrow(), vec!["explicit", "config"]);
    }

    #[test]
    fn test_superset_combo_does_not_fire() {
        let mut dispatcher = KeybindingDispatcher::new();
        let mut registry = ConfigRegistry::new();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        registry.register(ConfigDescriptor::hotkey("do-thing", "Ctrl+K", move |_| {
            counter.set(counter.get() + 1)
        }));

        dispatcher.key_down(&key(KeyCode::Char('k'), KeyModifiers::CONTROL), &registry);
        assert_eq!(hits.get(), 1);

        // ctrl+k+l is a different combo entirely.
        dispatcher.key_down(&key(KeyCode::Char('l'), KeyModifiers::CONTROL), &registry);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_mouse_mirror() {
        let mut dispatcher = KeybindingDispatcher::new();
        dispatcher.observe_mouse(&MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(dispatcher.mouse_position(), (10, 4));
        assert!(dispatcher.is_button_held(MouseButton::Left));

        dispatcher.observe_mouse(&MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column: 11,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });
        assert!(!dispatcher.is_button_held(MouseButton::Left));
    }
}
