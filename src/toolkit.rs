use crossterm::event::{Event, KeyEventKind};
use ratatui::Frame;

use crate::config::{ConfigDescriptor, ConfigRegistry, ConfigValue};
use crate::input::{HandlerId, KeybindingDispatcher};
use crate::persist::{
    CONFIG_STORE_KEY, FileStore, MemoryStore, PersistenceCoordinator, StateStore,
};
use crate::render::{self, Theme};
use crate::window::{
    CONFIG_ELEMENT_TAG, UiEvent, WindowKey, WindowManager, WindowOptions, generate_config_window,
    refresh_config_windows,
};

/// Owns the registry, window manager, keybinding dispatcher, and
/// persistence coordinator, and routes host events between them:
/// key presses go to an active hotkey capture or text edit first, then to
/// the dispatcher; mouse events go to the button/drag/raise routing; focus
/// loss clears the held-key set.
///
/// Everything runs on the UI thread; the toolkit is deliberately `!Send`
/// (callbacks are plain `Rc` closures).
pub struct Toolkit {
    config: ConfigRegistry,
    windows: WindowManager,
    keys: KeybindingDispatcher,
    persistence: PersistenceCoordinator,
    store: Box<dyn StateStore>,
    theme: Theme,
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolkit {
    /// Toolkit backed by the platform data directory, or by a throwaway
    /// in-memory store when the platform does not report one.
    pub fn new() -> Self {
        let store: Box<dyn StateStore> = match FileStore::default_location() {
            Some(path) => Box::new(FileStore::open(path)),
            None => Box::new(MemoryStore::new()),
        };
        Self::with_store(store)
    }

    pub fn with_store(store: Box<dyn StateStore>) -> Self {
        Self {
            config: ConfigRegistry::new(),
            windows: WindowManager::new(),
            keys: KeybindingDispatcher::new(),
            persistence: PersistenceCoordinator::new(),
            store,
            theme: Theme::default(),
        }
    }

    pub fn config(&self) -> &ConfigRegistry {
        &self.config
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    pub fn theme_mut(&mut self) -> &mut Theme {
        &mut self.theme
    }

    // -- keybindings --------------------------------------------------------

    pub fn register_keybinding(
        &mut self,
        combo: &str,
        handler: impl FnMut(&crossterm::event::KeyEvent) + 'static,
    ) -> HandlerId {
        self.keys.register(combo, handler)
    }

    pub fn deregister_keybinding(&mut self, combo: &str, id: HandlerId) {
        self.keys.deregister(combo, id);
    }

    // -- configuration ------------------------------------------------------

    pub fn register_config_value(&mut self, descriptor: ConfigDescriptor) -> bool {
        self.config.register(descriptor)
    }

    pub fn query_config_key(&self, key: &str) -> Option<&ConfigValue> {
        self.config.get(key)
    }

    /// Set a config value through the registry's validating setter. On
    /// success every config window is re-synced; `persist` additionally
    /// triggers the full composite persistence write.
    pub fn set_config_value(
        &mut self,
        key: &str,
        value: ConfigValue,
        notify: bool,
        persist: bool,
    ) -> bool {
        let applied = self.config.set(key, value, notify);
        if applied {
            refresh_config_windows(&mut self.windows, &self.config);
            if persist {
                self.save_persistent_state();
            }
        }
        applied
    }

    /// Write only the config record to the store.
    pub fn save_config(&mut self) {
        self.store
            .store(CONFIG_STORE_KEY, &self.config.serialize());
    }

    /// Replay the stored config record; registration-time defaults stay in
    /// place for anything the record does not cover.
    pub fn load_config(&mut self) {
        if let Some(text) = self.store.load(CONFIG_STORE_KEY) {
            self.config.deserialize(&text, false);
        }
        refresh_config_windows(&mut self.windows, &self.config);
    }

    // -- windows ------------------------------------------------------------

    pub fn generate_modal_window(&mut self, options: WindowOptions) -> Option<WindowKey> {
        self.windows.create(options)
    }

    /// One window per session materializing the whole registry; see
    /// [`generate_config_window`].
    pub fn generate_config_window(&mut self, options: WindowOptions) -> Option<WindowKey> {
        generate_config_window(&mut self.windows, &self.config, options)
    }

    // -- persistence --------------------------------------------------------

    /// Opt in to persistence: restores the stored record (config first,
    /// then windows) and arms the shutdown snapshot. Nothing stored is not
    /// an error.
    pub fn load_persistent_state(&mut self) {
        self.persistence
            .restore(&mut self.windows, &mut self.config, &*self.store);
        refresh_config_windows(&mut self.windows, &self.config);
    }

    /// Write the full composite record (windows + config) immediately.
    pub fn save_persistent_state(&mut self) {
        self.persistence
            .snapshot(&self.windows, &self.config, &mut *self.store);
    }

    /// Snapshot on the way out, if persistence was opted into.
    pub fn shutdown(&mut self) {
        if self.persistence.enabled() {
            self.save_persistent_state();
        }
    }

    // -- event loop glue ----------------------------------------------------

    /// Route one host event through the toolkit.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    // An active hotkey capture or inline edit consumes the
                    // key; otherwise it feeds the chord dispatcher.
                    if let Some(events) = self.windows.handle_key(key) {
                        self.apply_ui_events(events);
                    } else {
                        self.keys.key_down(key, &self.config);
                    }
                }
                KeyEventKind::Release => self.keys.key_up(key),
            },
            Event::FocusLost => self.keys.clear_held(),
            Event::Mouse(mouse) => {
                self.keys.observe_mouse(mouse);
                let events = self.windows.handle_mouse(mouse);
                self.apply_ui_events(events);
            }
            _ => {}
        }
    }

    /// Paint the window set and rebuild hit regions.
    pub fn draw(&mut self, frame: &mut Frame) {
        render::draw(frame, &mut self.windows, &self.theme);
    }

    fn apply_ui_events(&mut self, events: Vec<UiEvent>) {
        let mut touched_config = false;
        for event in events {
            if let UiEvent::ControlCommitted { tag, id, value, .. } = event
                && tag == CONFIG_ELEMENT_TAG
            {
                self.config.set(&id, value, true);
                touched_config = true;
            }
        }
        // Re-sync even after a rejected commit so the control snaps back to
        // the registry's value.
        if touched_config {
            refresh_config_windows(&mut self.windows, &self.config);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::persist::SESSION_STORE_KEY;
    use crate::window::{Control, HotkeySpec, RegionKind};

    use super::*;

    fn toolkit() -> Toolkit {
        Toolkit::with_store(Box::new(MemoryStore::new()))
    }

    fn draw(toolkit: &mut Toolkit) {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| toolkit.draw(frame)).unwrap();
    }

    fn click(toolkit: &mut Toolkit, column: u16, row: u16) {
        toolkit.handle_event(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    fn control_region(toolkit: &Toolkit, index: usize) -> (u16, u16) {
        let region = toolkit
            .windows()
            .regions()
            .iter()
            .find(|region| region.kind == RegionKind::Control(index))
            .copied()
            .unwrap();
        (region.rect.x, region.rect.y)
    }

    #[test]
    fn test_config_window_click_round_trips_into_registry() {
        let mut toolkit = toolkit();
        toolkit.register_config_value(ConfigDescriptor::checkbox("enabled", false));
        let key = toolkit
            .generate_config_window(WindowOptions::default())
            .unwrap();
        draw(&mut toolkit);

        // label(0), checkbox(1), newline(2)
        let (x, y) = control_region(&toolkit, 1);
        click(&mut toolkit, x, y);

        assert_eq!(
            toolkit.query_config_key("enabled"),
            Some(&ConfigValue::Bool(true))
        );
        // And the window control was re-synced from the registry.
        let Control::Checkbox { value, .. } =
            &toolkit.windows().controls(key).unwrap()[1].control
        else {
            panic!("expected checkbox");
        };
        assert!(*value);
    }

    #[test]
    fn test_hotkey_capture_blocks_dispatcher_until_committed() {
        let mut toolkit = toolkit();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        toolkit.register_keybinding("Ctrl+P", move |_| counter.set(counter.get() + 1));

        let key = toolkit
            .generate_modal_window(WindowOptions::titled("Form"))
            .unwrap();
        toolkit
            .windows_mut()
            .content(key)
            .unwrap()
            .hotkey_input(HotkeySpec {
                id: "bind".into(),
                ..Default::default()
            });
        draw(&mut toolkit);

        let (x, y) = control_region(&toolkit, 0);
        click(&mut toolkit, x, y);
        assert!(toolkit.windows().capture_active());

        // Captured, not dispatched.
        let combo = Event::Key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL));
        toolkit.handle_event(&combo);
        assert_eq!(hits.get(), 0);
        assert!(!toolkit.windows().capture_active());
        let Control::Hotkey { value, .. } = &toolkit.windows().controls(key).unwrap()[0].control
        else {
            panic!("expected hotkey control");
        };
        assert_eq!(value, "Ctrl+P");

        // Capture is one-shot; the next press reaches the dispatcher.
        toolkit.handle_event(&combo);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_focus_loss_clears_chord_state() {
        let mut toolkit = toolkit();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        toolkit.register_keybinding("a+b", move |_| counter.set(counter.get() + 1));

        toolkit.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
        )));
        toolkit.handle_event(&Event::FocusLost);
        toolkit.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('b'),
            KeyModifiers::NONE,
        )));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_set_with_persist_writes_composite_record() {
        let mut toolkit = toolkit();
        toolkit.register_config_value(ConfigDescriptor::checkbox("enabled", false));
        toolkit.generate_modal_window(WindowOptions::titled("Notes"));

        assert!(toolkit.set_config_value("enabled", ConfigValue::Bool(true), false, true));

        let config = toolkit.store.load(CONFIG_STORE_KEY).unwrap();
        assert!(config.contains("\"enabled\":\"true\""));
        let session = toolkit.store.load(SESSION_STORE_KEY).unwrap();
        assert!(session.contains("\"title\":\"Notes\""));
    }

    #[test]
    fn test_load_persistent_state_on_empty_store() {
        let mut toolkit = toolkit();
        toolkit.register_config_value(ConfigDescriptor::checkbox("enabled", true));
        toolkit.load_persistent_state();
        assert_eq!(toolkit.windows().open_count(), 0);
        assert_eq!(
            toolkit.query_config_key("enabled"),
            Some(&ConfigValue::Bool(true))
        );

        // Opting in armed the shutdown snapshot.
        toolkit.shutdown();
        assert!(toolkit.store.load(CONFIG_STORE_KEY).is_some());
    }

    #[test]
    fn test_shutdown_without_opt_in_writes_nothing() {
        let mut toolkit = toolkit();
        toolkit.register_config_value(ConfigDescriptor::checkbox("enabled", true));
        toolkit.shutdown();
        assert!(toolkit.store.load(CONFIG_STORE_KEY).is_none());
    }

    #[test]
    fn test_session_survives_reload() {
        let mut first = Toolkit::with_store(Box::new(MemoryStore::new()));
        first.register_config_value(ConfigDescriptor::checkbox("enabled", false));
        first.load_persistent_state();
        first.generate_modal_window(WindowOptions::titled("Notes").at(4, 2));
        first.set_config_value("enabled", ConfigValue::Bool(true), false, false);
        first.shutdown();

        // Simulate a reload against the same backing state.
        let mut carried = MemoryStore::new();
        carried.store(SESSION_STORE_KEY, &first.store.load(SESSION_STORE_KEY).unwrap());
        carried.store(CONFIG_STORE_KEY, &first.store.load(CONFIG_STORE_KEY).unwrap());

        let mut second = Toolkit::with_store(Box::new(carried));
        second.register_config_value(ConfigDescriptor::checkbox("enabled", false));
        second.load_persistent_state();
        assert_eq!(
            second.query_config_key("enabled"),
            Some(&ConfigValue::Bool(true))
        );
        assert_eq!(second.windows().open_count(), 1);
        let key = second.windows().keys()[0];
        assert_eq!(second.windows().get(key).unwrap().title(), "Notes");
        assert_eq!(second.windows().get(key).unwrap().position(), Some((4, 2)));
    }
}
