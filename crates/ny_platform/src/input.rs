//! Keyboard and mouse state tracking
//!
//! Backends feed every translated event through [`KeyboardState::update`] and
//! [`MouseState::update`] before delivering it, so the contexts always agree
//! with what handlers have seen.

use ny_core::{EventKind, KeyboardModifiers, Keycode, MouseButton};
use rustc_hash::FxHashSet;

use crate::context::{KeyboardContext, MouseContext};

#[derive(Debug, Default)]
pub struct KeyboardState {
    pressed: FxHashSet<Keycode>,
    modifiers: KeyboardModifiers,
    focus: Option<u64>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event delivered to `window`
    pub fn update(&mut self, window: Option<u64>, kind: &EventKind) {
        match kind {
            EventKind::Key {
                keycode,
                pressed,
                modifiers,
                ..
            } => {
                if *pressed {
                    self.pressed.insert(*keycode);
                } else {
                    self.pressed.remove(keycode);
                }
                self.modifiers = *modifiers;
            }
            EventKind::Focus { gained: true } => self.focus = window,
            EventKind::Focus { gained: false } => {
                if self.focus == window {
                    self.focus = None;
                    // Releases are not reported to unfocused windows.
                    self.pressed.clear();
                    self.modifiers = KeyboardModifiers::empty();
                }
            }
            EventKind::Destroy => self.forget(window),
            _ => {}
        }
    }

    /// Drop any reference to a destroyed window
    pub fn forget(&mut self, window: Option<u64>) {
        if window.is_some() && self.focus == window {
            self.focus = None;
            self.pressed.clear();
        }
    }
}

impl KeyboardContext for KeyboardState {
    fn pressed(&self, key: Keycode) -> bool {
        self.pressed.contains(&key)
    }

    fn modifiers(&self) -> KeyboardModifiers {
        self.modifiers
    }

    fn focus(&self) -> Option<u64> {
        self.focus
    }
}

#[derive(Debug, Default)]
pub struct MouseState {
    position: (i32, i32),
    pressed: FxHashSet<MouseButton>,
    over: Option<u64>,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event delivered to `window`
    pub fn update(&mut self, window: Option<u64>, kind: &EventKind) {
        match kind {
            EventKind::MouseMove { position, .. } => {
                self.position = *position;
                if self.over.is_none() {
                    self.over = window;
                }
            }
            EventKind::MouseButton {
                button,
                pressed,
                position,
            } => {
                self.position = *position;
                if *pressed {
                    self.pressed.insert(*button);
                } else {
                    self.pressed.remove(button);
                }
            }
            EventKind::MouseCross { entered, position } => {
                self.position = *position;
                if *entered {
                    self.over = window;
                } else if self.over == window {
                    self.over = None;
                }
            }
            EventKind::Destroy => self.forget(window),
            _ => {}
        }
    }

    pub fn forget(&mut self, window: Option<u64>) {
        if window.is_some() && self.over == window {
            self.over = None;
            self.pressed.clear();
        }
    }
}

impl MouseContext for MouseState {
    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    fn over(&self) -> Option<u64> {
        self.over
    }
}
