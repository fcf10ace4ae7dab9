use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use slotmap::SlotMap;

use crate::config::ConfigValue;
use crate::input::combo;

use super::content::{ContentBuilder, ContentItem, Control};
use super::options::WindowOptions;

slotmap::new_key_type! {
    /// Arena handle for one live window.
    pub struct WindowKey;
}

/// One live window. Geometry evolves with dragging; `options` keeps the
/// creation-time record for persistence.
pub struct WindowRecord {
    pub(crate) title: String,
    pub(crate) original_title: String,
    pub(crate) options: WindowOptions,
    pub(crate) x: Option<i32>,
    pub(crate) y: Option<i32>,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) front: bool,
    pub(crate) ghosted: bool,
    pub(crate) is_config_window: bool,
    pub(crate) content: Vec<ContentItem>,
}

impl WindowRecord {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn original_title(&self) -> &str {
        &self.original_title
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        Some((self.x?, self.y?))
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn is_front(&self) -> bool {
        self.front
    }

    pub fn is_ghosted(&self) -> bool {
        self.ghosted
    }

    pub fn is_config_window(&self) -> bool {
        self.is_config_window
    }

    pub fn content(&self) -> &[ContentItem] {
        &self.content
    }
}

/// What a screen cell belongs to; produced by the renderer, consumed by
/// mouse routing. Later regions paint over earlier ones, so hit testing
/// walks the list in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Body,
    Header,
    GhostButton,
    CloseButton,
    Control(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub window: WindowKey,
    pub rect: Rect,
    pub kind: RegionKind,
}

/// Facts the manager reports back to the embedding layer after routing an
/// input event. Config windows are wired through these: a commit whose tag
/// marks it as a config element is applied to the registry by the facade.
#[derive(Clone)]
pub enum UiEvent {
    ControlCommitted {
        window: WindowKey,
        control: usize,
        id: String,
        tag: String,
        value: ConfigValue,
    },
    ButtonPressed {
        window: WindowKey,
        control: usize,
        id: String,
        tag: String,
    },
    WindowClosed {
        window: WindowKey,
    },
}

struct DragState {
    window: WindowKey,
    last: (i32, i32),
}

/// One-shot hotkey capture: the next non-modifier key-down commits into
/// the control and ends the subscription.
struct HotkeyCapture {
    window: WindowKey,
    control: usize,
}

struct TextEdit {
    window: WindowKey,
    control: usize,
    buffer: String,
}

/// Owns the live-window arena. Creation runs the duplicate-title policy,
/// close removes from the arena immediately (liveness is an O(1) lookup,
/// never an attachment check), and one drag/capture/edit can be active at
/// a time since there is a single pointer and a single keyboard.
pub struct WindowManager {
    windows: SlotMap<WindowKey, WindowRecord>,
    order: Vec<WindowKey>,
    /// Times each title was opened this session. Deliberately not
    /// decremented on close; reset only when no live window carries the
    /// title at creation time. Contract, not a bug (see DESIGN.md).
    title_open_counts: HashMap<String, u32>,
    drag: Option<DragState>,
    capture: Option<HotkeyCapture>,
    edit: Option<TextEdit>,
    regions: Vec<Region>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager {
    pub fn new() -> Self {
        Self {
            windows: SlotMap::with_key(),
            order: Vec::new(),
            title_open_counts: HashMap::new(),
            drag: None,
            capture: None,
            edit: None,
            regions: Vec::new(),
        }
    }

    /// Create a window. Applies the duplicate-title policy: a repeated
    /// title gets a " (N)" suffix, or blocks creation entirely when the
    /// options ask for a unique window. Returns `None` on a unique block.
    pub fn create(&mut self, options: WindowOptions) -> Option<WindowKey> {
        let requested = if options.title.is_empty() {
            "Window".to_string()
        } else {
            options.title.clone()
        };
        let mut title = requested.clone();

        if !options.disable_title_stacking || options.unique {
            let live_matches = self
                .windows
                .values()
                .filter(|window| window.original_title == requested)
                .count();
            if live_matches == 0 {
                self.title_open_counts.insert(requested.clone(), 0);
            }
            let count = self.title_open_counts.entry(requested.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                if options.unique {
                    log::info!("window: blocked duplicate unique window '{requested}'");
                    return None;
                }
                if !options.disable_title_stacking {
                    title = format!("{requested} ({count})");
                }
            }
        }

        let record = WindowRecord {
            title,
            original_title: requested,
            x: options.x,
            y: options.y,
            width: options.width,
            height: options.height,
            front: false,
            ghosted: false,
            is_config_window: false,
            content: Vec::new(),
            options,
        };
        let key = self.windows.insert(record);
        self.order.push(key);
        Some(key)
    }

    /// Remove a window from the arena. Any drag, capture, or edit attached
    /// to it dies with it; stale hit regions are pruned immediately.
    pub fn close(&mut self, key: WindowKey) {
        if self.windows.remove(key).is_none() {
            return;
        }
        self.order.retain(|k| *k != key);
        self.regions.retain(|region| region.window != key);
        if self.drag.as_ref().is_some_and(|drag| drag.window == key) {
            self.drag = None;
        }
        if self
            .capture
            .as_ref()
            .is_some_and(|capture| capture.window == key)
        {
            self.capture = None;
        }
        if self.edit.as_ref().is_some_and(|edit| edit.window == key) {
            self.edit = None;
        }
    }

    pub fn is_open(&self, key: WindowKey) -> bool {
        self.windows.contains_key(key)
    }

    pub fn open_count(&self) -> usize {
        self.order.len()
    }

    /// Live window keys in creation order.
    pub fn keys(&self) -> Vec<WindowKey> {
        self.order.clone()
    }

    pub fn get(&self, key: WindowKey) -> Option<&WindowRecord> {
        self.windows.get(key)
    }

    pub(crate) fn record_mut(&mut self, key: WindowKey) -> Option<&mut WindowRecord> {
        self.windows.get_mut(key)
    }

    /// Chained content construction for a window.
    pub fn content(&mut self, key: WindowKey) -> Option<ContentBuilder<'_>> {
        self.windows
            .get_mut(key)
            .map(|record| ContentBuilder {
                items: &mut record.content,
            })
    }

    pub fn controls(&self, key: WindowKey) -> Option<&[ContentItem]> {
        self.windows.get(key).map(|record| record.content.as_slice())
    }

    /// Clear every window's front marker, then mark the target. At most
    /// one window carries the marker at any time.
    pub fn bring_to_front(&mut self, key: WindowKey) {
        for window in self.windows.values_mut() {
            window.front = false;
        }
        if let Some(window) = self.windows.get_mut(key) {
            window.front = true;
        }
    }

    /// Back-to-front paint order: creation order, with the front-marked
    /// window moved last. Stable, so unmarked windows keep their relative
    /// stacking.
    pub fn paint_order(&self) -> Vec<WindowKey> {
        let mut keys = self.order.clone();
        keys.sort_by_key(|key| self.windows[*key].front);
        keys
    }

    /// Resolve default centered placement for windows that have not been
    /// positioned yet. Runs on every layout pass; explicit positions are
    /// left alone.
    pub fn resolve_geometry(&mut self, area: Rect) {
        for window in self.windows.values_mut() {
            if window.x.is_none() {
                window.x =
                    Some(area.x as i32 + (area.width.saturating_sub(window.width) / 2) as i32);
            }
            if window.y.is_none() {
                window.y =
                    Some(area.y as i32 + (area.height.saturating_sub(window.height) / 2) as i32);
            }
        }
    }

    pub fn set_regions(&mut self, regions: Vec<Region>) {
        self.regions = regions;
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    fn hit_test(&self, column: u16, row: u16) -> Option<(WindowKey, RegionKind)> {
        self.regions
            .iter()
            .rev()
            .find(|region| rect_contains(region.rect, column, row))
            .map(|region| (region.window, region.kind))
    }

    /// True while a hotkey input is waiting for its one-shot capture.
    pub fn capture_active(&self) -> bool {
        self.capture.is_some()
    }

    pub(crate) fn capturing_at(&self, key: WindowKey, control: usize) -> bool {
        self.capture
            .as_ref()
            .is_some_and(|capture| capture.window == key && capture.control == control)
    }

    /// Abandon a pending hotkey capture without committing.
    pub fn cancel_capture(&mut self) {
        self.capture = None;
    }

    pub(crate) fn editing_at(&self, key: WindowKey, control: usize) -> Option<&str> {
        self.edit
            .as_ref()
            .filter(|edit| edit.window == key && edit.control == control)
            .map(|edit| edit.buffer.as_str())
    }

    /// Route a mouse event. Press: header buttons, drag start, control
    /// interaction, raise. Move: translate an active drag by the delta
    /// from the previous pointer cell, so arbitrary intermediate moves sum
    /// correctly. Release of any button: end the drag.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> Vec<UiEvent> {
        let mut events = Vec::new();
        match event.kind {
            MouseEventKind::Down(button) => {
                let hit = self.hit_test(event.column, event.row);
                if let Some(edit) = &self.edit {
                    let same_control = matches!(
                        hit,
                        Some((key, RegionKind::Control(index)))
                            if key == edit.window && index == edit.control
                    );
                    if !same_control {
                        self.edit = None;
                    }
                }
                let Some((key, kind)) = hit else {
                    return events;
                };
                match kind {
                    RegionKind::CloseButton => {
                        self.close(key);
                        events.push(UiEvent::WindowClosed { window: key });
                    }
                    RegionKind::GhostButton => {
                        if let Some(window) = self.windows.get_mut(key) {
                            window.ghosted = !window.ghosted;
                        }
                    }
                    RegionKind::Header => {
                        self.bring_to_front(key);
                        self.drag = Some(DragState {
                            window: key,
                            last: (event.column as i32, event.row as i32),
                        });
                    }
                    RegionKind::Control(index) => {
                        self.bring_to_front(key);
                        self.control_click(key, index, button, &mut events);
                    }
                    RegionKind::Body => {
                        self.bring_to_front(key);
                    }
                }
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                if let Some(drag) = &mut self.drag {
                    let here = (event.column as i32, event.row as i32);
                    let delta = (here.0 - drag.last.0, here.1 - drag.last.1);
                    drag.last = here;
                    if let Some(window) = self.windows.get_mut(drag.window)
                        && let (Some(x), Some(y)) = (window.x, window.y)
                    {
                        window.x = Some(x + delta.0);
                        window.y = Some(y + delta.1);
                    }
                }
            }
            MouseEventKind::Up(_) => {
                self.drag = None;
            }
            _ => {}
        }
        events
    }

    /// Route a key-down. Returns `Some` when the manager consumed the
    /// event (an active hotkey capture or inline text edit), `None` when
    /// the event should flow on to the keybinding dispatcher.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<Vec<UiEvent>> {
        if let Some(capture) = &self.capture {
            // Bare modifiers keep the capture alive and wait for a real key.
            if combo::is_bare_modifier(event) {
                return Some(Vec::new());
            }
            let Some(display) = combo::capture_display(event) else {
                return Some(Vec::new());
            };
            let (window, control) = (capture.window, capture.control);
            self.capture = None;
            let mut events = Vec::new();
            self.commit_control(window, control, ConfigValue::Text(display), &mut events);
            return Some(events);
        }

        if let Some(edit) = &mut self.edit {
            match event.code {
                KeyCode::Char(c) => {
                    edit.buffer.push(c);
                    Some(Vec::new())
                }
                KeyCode::Backspace => {
                    edit.buffer.pop();
                    Some(Vec::new())
                }
                KeyCode::Esc => {
                    self.edit = None;
                    Some(Vec::new())
                }
                KeyCode::Enter => {
                    let mut events = Vec::new();
                    if let Some(edit) = self.edit.take() {
                        self.commit_control(
                            edit.window,
                            edit.control,
                            ConfigValue::Text(edit.buffer),
                            &mut events,
                        );
                    }
                    Some(events)
                }
                _ => Some(Vec::new()),
            }
        } else {
            None
        }
    }

    fn control_click(
        &mut self,
        key: WindowKey,
        index: usize,
        button: MouseButton,
        events: &mut Vec<UiEvent>,
    ) {
        let Some(record) = self.windows.get(key) else {
            return;
        };
        let Some(item) = record.content.get(index) else {
            return;
        };
        match &item.control {
            Control::Checkbox { value, .. } => {
                let toggled = !*value;
                self.commit_control(key, index, ConfigValue::Bool(toggled), events);
            }
            Control::Dropdown { value, options, .. } => {
                if options.is_empty() {
                    return;
                }
                let position = options.iter().position(|option| option == value).unwrap_or(0);
                let next = options[(position + 1) % options.len()].clone();
                self.commit_control(key, index, ConfigValue::Text(next), events);
            }
            Control::Number {
                value,
                min,
                max,
                step,
                ..
            } => {
                let step = step.unwrap_or(1.0);
                let mut next = match button {
                    MouseButton::Right => value - step,
                    _ => value + step,
                };
                if let Some(min) = min {
                    next = next.max(*min);
                }
                if let Some(max) = max {
                    next = next.min(*max);
                }
                self.commit_control(key, index, ConfigValue::Number(next), events);
            }
            Control::Hotkey { .. } => {
                self.edit = None;
                self.capture = Some(HotkeyCapture {
                    window: key,
                    control: index,
                });
            }
            Control::Text { value, .. } | Control::Color { value, .. } => {
                self.edit = Some(TextEdit {
                    window: key,
                    control: index,
                    buffer: value.clone(),
                });
            }
            Control::Button {
                id, tag, on_press, ..
            } => {
                let (id, tag, on_press) = (id.clone(), tag.clone(), on_press.clone());
                if let Some(on_press) = on_press {
                    on_press();
                }
                events.push(UiEvent::ButtonPressed {
                    window: key,
                    control: index,
                    id,
                    tag,
                });
            }
            Control::Label { .. } | Control::Newline | Control::Raw { .. } => {}
        }
    }

    /// Write a committed value into a control, fire its callback, and
    /// report the commit. The single path every input mutation flows
    /// through.
    fn commit_control(
        &mut self,
        window: WindowKey,
        index: usize,
        value: ConfigValue,
        events: &mut Vec<UiEvent>,
    ) {
        let Some(record) = self.windows.get_mut(window) else {
            return;
        };
        let Some(item) = record.content.get_mut(index) else {
            return;
        };
        let committed = match &mut item.control {
            Control::Checkbox {
                id,
                value: stored,
                on_change,
                tag,
            } => value.as_bool().map(|next| {
                *stored = next;
                (id.clone(), tag.clone(), on_change.clone())
            }),
            Control::Color {
                id,
                value: stored,
                on_change,
                tag,
            }
            | Control::Hotkey {
                id,
                value: stored,
                on_change,
                tag,
            }
            | Control::Text {
                id,
                value: stored,
                on_change,
                tag,
            }
            | Control::Dropdown {
                id,
                value: stored,
                on_change,
                tag,
                ..
            } => value.as_text().map(|next| {
                *stored = next.to_string();
                (id.clone(), tag.clone(), on_change.clone())
            }),
            Control::Number {
                id,
                value: stored,
                on_change,
                tag,
                ..
            } => value.as_number().map(|next| {
                *stored = next;
                (id.clone(), tag.clone(), on_change.clone())
            }),
            _ => None,
        };
        let Some((id, tag, callback)) = committed else {
            return;
        };
        if let Some(callback) = callback {
            callback(&value);
        }
        events.push(UiEvent::ControlCommitted {
            window,
            control: index,
            id,
            tag,
            value,
        });
    }
}

pub(crate) fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crossterm::event::KeyModifiers;

    use crate::window::content::{CheckboxSpec, HotkeySpec, TextSpec};

    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_title_stacking_suffixes() {
        let mut manager = WindowManager::new();
        let first = manager.create(WindowOptions::titled("Logs")).unwrap();
        let second = manager.create(WindowOptions::titled("Logs")).unwrap();
        let third = manager.create(WindowOptions::titled("Logs")).unwrap();
        assert_eq!(manager.get(first).unwrap().title(), "Logs");
        assert_eq!(manager.get(second).unwrap().title(), "Logs (2)");
        assert_eq!(manager.get(third).unwrap().title(), "Logs (3)");

        // The counter survives closes while any window with the title lives.
        manager.close(first);
        manager.close(second);
        let fourth = manager.create(WindowOptions::titled("Logs")).unwrap();
        assert_eq!(manager.get(fourth).unwrap().title(), "Logs (4)");

        // Once no live window carries the title, the counter resets.
        manager.close(third);
        manager.close(fourth);
        let fresh = manager.create(WindowOptions::titled("Logs")).unwrap();
        assert_eq!(manager.get(fresh).unwrap().title(), "Logs");
    }

    #[test]
    fn test_unique_blocks_second_window() {
        let mut manager = WindowManager::new();
        let first = manager
            .create(WindowOptions::titled("Settings").unique())
            .unwrap();
        assert!(manager
            .create(WindowOptions::titled("Settings").unique())
            .is_none());
        assert!(manager.is_open(first));
        assert_eq!(manager.open_count(), 1);
    }

    #[test]
    fn test_disable_stacking_skips_suffix() {
        let mut manager = WindowManager::new();
        let mut options = WindowOptions::titled("Raw");
        options.disable_title_stacking = true;
        manager.create(options.clone()).unwrap();
        let second = manager.create(options).unwrap();
        assert_eq!(manager.get(second).unwrap().title(), "Raw");
    }

    #[test]
    fn test_bring_to_front_marker_is_exclusive() {
        let mut manager = WindowManager::new();
        let a = manager.create(WindowOptions::titled("A")).unwrap();
        let b = manager.create(WindowOptions::titled("B")).unwrap();

        manager.bring_to_front(a);
        manager.bring_to_front(b);
        let marked: Vec<_> = manager
            .keys()
            .into_iter()
            .filter(|key| manager.get(*key).unwrap().is_front())
            .collect();
        assert_eq!(marked, vec![b]);
        assert_eq!(manager.paint_order().last(), Some(&b));
    }

    #[test]
    fn test_drag_moves_by_pointer_deltas() {
        let mut manager = WindowManager::new();
        let key = manager
            .create(WindowOptions::titled("Drag").at(20, 10))
            .unwrap();
        manager.set_regions(vec![Region {
            window: key,
            rect: Rect::new(20, 10, 48, 1),
            kind: RegionKind::Header,
        }]);

        manager.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 25, 10));
        manager.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 35, 15));
        manager.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 32, 17));
        manager.handle_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 32, 17));

        // Net movement (10, 5) + (-3, 2) = (7, 7).
        assert_eq!(manager.get(key).unwrap().position(), Some((27, 17)));

        // Moves after release do nothing.
        manager.handle_mouse(&mouse(MouseEventKind::Moved, 50, 30));
        assert_eq!(manager.get(key).unwrap().position(), Some((27, 17)));
    }

    #[test]
    fn test_close_button_removes_immediately() {
        let mut manager = WindowManager::new();
        let key = manager.create(WindowOptions::titled("Gone")).unwrap();
        manager.set_regions(vec![Region {
            window: key,
            rect: Rect::new(5, 5, 3, 1),
            kind: RegionKind::CloseButton,
        }]);

        let events = manager.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 6, 5));
        assert!(matches!(events[..], [UiEvent::WindowClosed { window }] if window == key));
        assert!(!manager.is_open(key));
        assert_eq!(manager.open_count(), 0);
    }

    #[test]
    fn test_ghost_button_toggles_visual_flag() {
        let mut manager = WindowManager::new();
        let key = manager.create(WindowOptions::titled("Ghost")).unwrap();
        manager.set_regions(vec![Region {
            window: key,
            rect: Rect::new(5, 5, 3, 1),
            kind: RegionKind::GhostButton,
        }]);

        manager.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 5));
        assert!(manager.get(key).unwrap().is_ghosted());
        manager.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 5));
        assert!(!manager.get(key).unwrap().is_ghosted());
    }

    #[test]
    fn test_checkbox_click_commits_and_fires_callback() {
        let mut manager = WindowManager::new();
        let key = manager.create(WindowOptions::titled("Form")).unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        manager.content(key).unwrap().checkbox_input(CheckboxSpec {
            id: "enabled".into(),
            value: false,
            on_change: Some(Rc::new(move |_| counter.set(counter.get() + 1))),
            tag: "form".into(),
        });
        manager.set_regions(vec![Region {
            window: key,
            rect: Rect::new(2, 2, 10, 1),
            kind: RegionKind::Control(0),
        }]);

        let events = manager.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 2));
        assert_eq!(hits.get(), 1);
        let [UiEvent::ControlCommitted { id, tag, value, .. }] = &events[..] else {
            panic!("expected one commit event");
        };
        assert_eq!(id, "enabled");
        assert_eq!(tag, "form");
        assert_eq!(value, &ConfigValue::Bool(true));
    }

    #[test]
    fn test_hotkey_capture_is_one_shot() {
        let mut manager = WindowManager::new();
        let key = manager.create(WindowOptions::titled("Form")).unwrap();
        manager.content(key).unwrap().hotkey_input(HotkeySpec {
            id: "bind".into(),
            value: "Ctrl+K".into(),
            ..Default::default()
        });
        manager.set_regions(vec![Region {
            window: key,
            rect: Rect::new(2, 2, 10, 1),
            kind: RegionKind::Control(0),
        }]);

        manager.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 2));
        assert!(manager.capture_active());

        // A bare modifier keeps the capture alive.
        let shift = KeyEvent::new(
            KeyCode::Modifier(crossterm::event::ModifierKeyCode::LeftShift),
            KeyModifiers::SHIFT,
        );
        assert!(manager.handle_key(&shift).unwrap().is_empty());
        assert!(manager.capture_active());

        let combo = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL);
        let events = manager.handle_key(&combo).unwrap();
        assert!(!manager.capture_active());
        let [UiEvent::ControlCommitted { value, .. }] = &events[..] else {
            panic!("expected one commit event");
        };
        assert_eq!(value, &ConfigValue::Text("Ctrl+P".into()));

        // Capture ended: further keys flow through to the dispatcher.
        assert!(manager.handle_key(&combo).is_none());
    }

    #[test]
    fn test_text_edit_commits_on_enter() {
        let mut manager = WindowManager::new();
        let key = manager.create(WindowOptions::titled("Form")).unwrap();
        manager.content(key).unwrap().text_input(TextSpec {
            id: "name".into(),
            value: "an".into(),
            ..Default::default()
        });
        manager.set_regions(vec![Region {
            window: key,
            rect: Rect::new(2, 2, 10, 1),
            kind: RegionKind::Control(0),
        }]);

        manager.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 2));
        for c in ['v', 'i', 'l'] {
            manager.handle_key(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        manager.handle_key(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        let events = manager
            .handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();

        let [UiEvent::ControlCommitted { value, .. }] = &events[..] else {
            panic!("expected one commit event");
        };
        assert_eq!(value, &ConfigValue::Text("anvi".into()));
        let Control::Text { value, .. } = &manager.controls(key).unwrap()[0].control else {
            panic!("expected text control");
        };
        assert_eq!(value, "anvi");
    }
}
