//! Pointer button, axis and modifier tables

use ny_core::{KeyboardModifiers, MouseButton};

use crate::event::Axis;

pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;
pub const BTN_MIDDLE: u32 = 0x112;
pub const BTN_SIDE: u32 = 0x113;
pub const BTN_EXTRA: u32 = 0x114;

/// Surface-local axis distance of one wheel click on common compositors
pub const AXIS_LINE: f64 = 10.0;

pub fn button(code: u32) -> MouseButton {
    match code {
        BTN_LEFT => MouseButton::Left,
        BTN_RIGHT => MouseButton::Right,
        BTN_MIDDLE => MouseButton::Middle,
        BTN_SIDE => MouseButton::Custom1,
        BTN_EXTRA => MouseButton::Custom2,
        _ => MouseButton::Unknown,
    }
}

/// Wheel value in lines, positive meaning up or right
pub fn wheel(axis: Axis, lines: f64) -> (f32, f32) {
    match axis {
        // Wayland's vertical axis grows downwards.
        Axis::VerticalScroll => (0.0, -lines as f32),
        Axis::HorizontalScroll => (lines as f32, 0.0),
    }
}

// Indices of the core modifiers in every xkb keymap in practice.
const XKB_SHIFT: u32 = 1 << 0;
const XKB_LOCK: u32 = 1 << 1;
const XKB_CONTROL: u32 = 1 << 2;
const XKB_MOD1: u32 = 1 << 3;
const XKB_MOD2: u32 = 1 << 4;
const XKB_MOD4: u32 = 1 << 6;

pub fn modifiers(depressed: u32, latched: u32, locked: u32) -> KeyboardModifiers {
    let active = depressed | latched;
    let mut modifiers = KeyboardModifiers::empty();
    modifiers.set(KeyboardModifiers::SHIFT, active & XKB_SHIFT != 0);
    modifiers.set(KeyboardModifiers::CTRL, active & XKB_CONTROL != 0);
    modifiers.set(KeyboardModifiers::ALT, active & XKB_MOD1 != 0);
    modifiers.set(KeyboardModifiers::SUPER, active & XKB_MOD4 != 0);
    modifiers.set(KeyboardModifiers::CAPS_LOCK, locked & XKB_LOCK != 0);
    modifiers.set(KeyboardModifiers::NUM_LOCK, locked & XKB_MOD2 != 0);
    modifiers
}
