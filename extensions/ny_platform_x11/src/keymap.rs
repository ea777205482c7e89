//! X11 keycode, button and modifier tables

use ny_core::{KeyboardModifiers, Keycode, MouseButton};

use crate::event::mask;

/// X keycodes are evdev codes offset by 8
const EVDEV_OFFSET: u8 = 8;

pub fn keycode(detail: u8) -> Keycode {
    match detail.checked_sub(EVDEV_OFFSET) {
        Some(code) => Keycode::from_evdev(u32::from(code)),
        None => Keycode::Unknown,
    }
}

pub fn modifiers(state: u16) -> KeyboardModifiers {
    let mut modifiers = KeyboardModifiers::empty();
    if state & mask::SHIFT != 0 {
        modifiers |= KeyboardModifiers::SHIFT;
    }
    if state & mask::CONTROL != 0 {
        modifiers |= KeyboardModifiers::CTRL;
    }
    if state & mask::MOD1 != 0 {
        modifiers |= KeyboardModifiers::ALT;
    }
    if state & mask::MOD4 != 0 {
        modifiers |= KeyboardModifiers::SUPER;
    }
    if state & mask::LOCK != 0 {
        modifiers |= KeyboardModifiers::CAPS_LOCK;
    }
    if state & mask::MOD2 != 0 {
        modifiers |= KeyboardModifiers::NUM_LOCK;
    }
    modifiers
}

/// Core protocol pointer button
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Button {
    Press(MouseButton),
    /// Buttons 4-7 report scrolling, one line per press
    Wheel(f32, f32),
}

pub fn button(detail: u8) -> Button {
    match detail {
        1 => Button::Press(MouseButton::Left),
        2 => Button::Press(MouseButton::Middle),
        3 => Button::Press(MouseButton::Right),
        4 => Button::Wheel(0.0, 1.0),
        5 => Button::Wheel(0.0, -1.0),
        6 => Button::Wheel(-1.0, 0.0),
        7 => Button::Wheel(1.0, 0.0),
        8 => Button::Press(MouseButton::Custom1),
        9 => Button::Press(MouseButton::Custom2),
        _ => Button::Press(MouseButton::Unknown),
    }
}
