//! Window message translation

use std::sync::Arc;

use ny_core::{DataOffer, EventKind, KeyboardModifiers, Keycode, MouseButton, ToplevelState};
use ny_platform::{Translated, Translator, WindowSettings};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::event::*;
use crate::keymap::{self, KeyboardLayout};

#[derive(Default)]
struct WindowState {
    size: (u32, u32),
    position: (i32, i32),
    state: ToplevelState,
    drag: Option<Arc<dyn DataOffer>>,
}

/// Stateful window message → portable event translator
///
/// Windows reports neither pointer enter nor modifier state with its
/// messages. Enter is synthesized from the first move over a window, and
/// modifiers are derived from the keys seen pressed.
pub struct WinapiTranslator {
    layout: Box<dyn KeyboardLayout>,
    windows: FxHashMap<Hwnd, WindowState>,
    pressed: FxHashSet<Keycode>,
    locks: KeyboardModifiers,
    hover: Option<Hwnd>,
    pointer: (i32, i32),
}

type Out = Vec<Translated<Hwnd>>;

impl WinapiTranslator {
    pub fn new(layout: Box<dyn KeyboardLayout>) -> Self {
        Self {
            layout,
            windows: FxHashMap::default(),
            pressed: FxHashSet::default(),
            locks: KeyboardModifiers::empty(),
            hover: None,
            pointer: (0, 0),
        }
    }

    fn window(&mut self, hwnd: Hwnd) -> &mut WindowState {
        self.windows.entry(hwnd).or_default()
    }

    fn modifiers(&self) -> KeyboardModifiers {
        self.pressed
            .iter()
            .fold(self.locks, |modifiers, key| modifiers | key.modifier())
    }

    fn key(&mut self, msg: Msg, pressed: bool, out: &mut Out) {
        let vk = msg.wparam as u32;
        let flags = KeyFlags(msg.lparam);
        let keycode = keymap::keycode(vk, flags);
        let repeat = pressed && flags.previously_down();
        if pressed {
            self.pressed.insert(keycode);
            if !repeat {
                match keycode {
                    Keycode::CapsLock => self.locks.toggle(KeyboardModifiers::CAPS_LOCK),
                    Keycode::NumLock => self.locks.toggle(KeyboardModifiers::NUM_LOCK),
                    _ => {}
                }
            }
        } else {
            self.pressed.remove(&keycode);
        }
        let modifiers = self.modifiers();
        let text = if pressed {
            let units = self.layout.to_unicode(vk, flags.scancode(), modifiers);
            keymap::decode_text(&units)
        } else {
            None
        };
        out.push(Translated::window(
            msg.hwnd,
            EventKind::Key {
                keycode,
                pressed,
                text,
                modifiers,
                repeat,
            },
        ));
    }

    fn button(&mut self, msg: Msg, button: MouseButton, pressed: bool, out: &mut Out) {
        let position = msg.point();
        self.pointer = position;
        out.push(Translated::window(
            msg.hwnd,
            EventKind::MouseButton {
                button,
                pressed,
                position,
            },
        ));
    }

    fn mouse_move(&mut self, msg: Msg, out: &mut Out) {
        let position = msg.point();
        let delta = if self.hover == Some(msg.hwnd) {
            (position.0 - self.pointer.0, position.1 - self.pointer.1)
        } else {
            self.hover = Some(msg.hwnd);
            out.push(Translated::window(
                msg.hwnd,
                EventKind::MouseCross {
                    entered: true,
                    position,
                },
            ));
            (0, 0)
        };
        self.pointer = position;
        out.push(Translated::window(
            msg.hwnd,
            EventKind::MouseMove { position, delta },
        ));
    }

    fn resized(&mut self, msg: Msg, out: &mut Out) {
        let hwnd = msg.hwnd;
        let size = msg.size();
        let window = self.window(hwnd);
        let next = match msg.wparam {
            SIZE_MINIMIZED => ToplevelState::Minimized,
            SIZE_MAXIMIZED => ToplevelState::Maximized,
            // Borderless fullscreen is a restored window covering the monitor.
            SIZE_RESTORED if window.state == ToplevelState::Fullscreen => ToplevelState::Fullscreen,
            SIZE_RESTORED => ToplevelState::Normal,
            other => {
                tracing::trace!(hwnd, kind = other, "ignoring WM_SIZE kind");
                return;
            }
        };
        // Minimized windows report a zero client area.
        if next != ToplevelState::Minimized && window.size != size {
            window.size = size;
            out.push(Translated::window(hwnd, EventKind::Size { size }));
        }
        if window.state != next {
            window.state = next;
            out.push(Translated::window(hwnd, EventKind::State { state: next }));
        }
    }

    fn message(&mut self, msg: Msg, out: &mut Out) {
        let hwnd = msg.hwnd;
        match msg.message {
            WM_KEYDOWN | WM_SYSKEYDOWN => self.key(msg, true, out),
            WM_KEYUP | WM_SYSKEYUP => self.key(msg, false, out),
            // Text is produced with the key down.
            WM_CHAR => {}
            WM_MOUSEMOVE => self.mouse_move(msg, out),
            WM_MOUSELEAVE => {
                if self.hover == Some(hwnd) {
                    self.hover = None;
                }
                out.push(Translated::window(
                    hwnd,
                    EventKind::MouseCross {
                        entered: false,
                        position: self.pointer,
                    },
                ));
            }
            WM_LBUTTONDOWN => self.button(msg, MouseButton::Left, true, out),
            WM_LBUTTONUP => self.button(msg, MouseButton::Left, false, out),
            WM_RBUTTONDOWN => self.button(msg, MouseButton::Right, true, out),
            WM_RBUTTONUP => self.button(msg, MouseButton::Right, false, out),
            WM_MBUTTONDOWN => self.button(msg, MouseButton::Middle, true, out),
            WM_MBUTTONUP => self.button(msg, MouseButton::Middle, false, out),
            WM_XBUTTONDOWN | WM_XBUTTONUP => {
                let button = match msg.xbutton() {
                    XBUTTON1 => MouseButton::Custom1,
                    XBUTTON2 => MouseButton::Custom2,
                    _ => MouseButton::Unknown,
                };
                self.button(msg, button, msg.message == WM_XBUTTONDOWN, out);
            }
            WM_MOUSEWHEEL | WM_MOUSEHWHEEL => {
                let lines = f32::from(msg.wheel_delta()) / f32::from(WHEEL_DELTA);
                let value = if msg.message == WM_MOUSEWHEEL {
                    (0.0, lines)
                } else {
                    (lines, 0.0)
                };
                out.push(Translated::window(hwnd, EventKind::MouseWheel { value }));
            }
            WM_SETFOCUS => out.push(Translated::window(hwnd, EventKind::Focus { gained: true })),
            WM_KILLFOCUS => {
                self.pressed.clear();
                out.push(Translated::window(hwnd, EventKind::Focus { gained: false }));
            }
            WM_SIZE => self.resized(msg, out),
            WM_MOVE => {
                let position = msg.point();
                let window = self.window(hwnd);
                if window.position != position {
                    window.position = position;
                    out.push(Translated::window(hwnd, EventKind::Position { position }));
                }
            }
            WM_SHOWWINDOW => out.push(Translated::window(
                hwnd,
                EventKind::Show {
                    shown: msg.wparam != 0,
                },
            )),
            WM_PAINT => out.push(Translated::window(hwnd, EventKind::Draw)),
            WM_CLOSE => out.push(Translated::window(hwnd, EventKind::Close)),
            WM_DESTROY => out.push(Translated::window(hwnd, EventKind::Destroy)),
            other => tracing::trace!(hwnd, message = other, "unhandled window message"),
        }
    }
}

impl Translator for WinapiTranslator {
    type Event = WinEvent;
    type Handle = Hwnd;

    fn translate(&mut self, event: WinEvent, out: &mut Out) {
        match event {
            WinEvent::Message(msg) => self.message(msg, out),
            WinEvent::Fullscreen { hwnd, enabled } => {
                let next = if enabled {
                    ToplevelState::Fullscreen
                } else {
                    ToplevelState::Normal
                };
                let window = self.window(hwnd);
                if window.state != next {
                    window.state = next;
                    out.push(Translated::window(hwnd, EventKind::State { state: next }));
                }
            }
            WinEvent::Clipboard { offer } => {
                if let Some(offer) = offer {
                    out.push(Translated::global(EventKind::DataOffer { offer }));
                }
            }
            WinEvent::DragEnter {
                hwnd,
                position,
                offer,
            } => {
                self.window(hwnd).drag = Some(offer.clone());
                out.push(Translated::window(
                    hwnd,
                    EventKind::DndEnter { position, offer },
                ));
            }
            WinEvent::DragOver { hwnd, position } => {
                if self.window(hwnd).drag.is_some() {
                    out.push(Translated::window(hwnd, EventKind::DndMove { position }));
                }
            }
            WinEvent::DragLeave { hwnd } => {
                if self.window(hwnd).drag.take().is_some() {
                    out.push(Translated::window(hwnd, EventKind::DndLeave));
                }
            }
            WinEvent::Drop { hwnd, position } => {
                if let Some(offer) = self.window(hwnd).drag.take() {
                    out.push(Translated::window(
                        hwnd,
                        EventKind::DndDrop { position, offer },
                    ));
                }
            }
        }
    }

    fn register(&mut self, hwnd: Hwnd, settings: &WindowSettings) {
        let window = self.window(hwnd);
        window.size = settings.size;
        window.position = settings.position.unwrap_or_default();
        window.state = settings.initial_state();
    }

    fn forget(&mut self, hwnd: Hwnd) {
        self.windows.remove(&hwnd);
        if self.hover == Some(hwnd) {
            self.hover = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{UsLayout, VK_SHIFT};

    fn translator() -> WinapiTranslator {
        WinapiTranslator::new(Box::new(UsLayout))
    }

    fn translate(translator: &mut WinapiTranslator, event: impl Into<WinEvent>) -> Vec<EventKind> {
        let mut out = Vec::new();
        translator.translate(event.into(), &mut out);
        out.into_iter().map(|translated| translated.kind).collect()
    }

    fn key(message: u32, vk: u32, scancode: u32, previously_down: bool) -> Msg {
        Msg::new(
            1,
            message,
            vk as usize,
            KeyFlags::with(scancode, false, previously_down).0,
        )
    }

    #[test]
    fn test_shifted_text_and_repeat() {
        let mut translator = translator();
        let shift = translate(&mut translator, key(WM_KEYDOWN, VK_SHIFT, 0x2A, false));
        assert!(matches!(
            &shift[..],
            [EventKind::Key { keycode: Keycode::LeftShift, text: None, modifiers, .. }]
                if *modifiers == KeyboardModifiers::SHIFT
        ));

        let first = translate(&mut translator, key(WM_KEYDOWN, 0x41, 0x1E, false));
        let held = translate(&mut translator, key(WM_KEYDOWN, 0x41, 0x1E, true));
        assert!(matches!(
            &first[..],
            [EventKind::Key { keycode: Keycode::A, repeat: false, text: Some(text), .. }] if text == "A"
        ));
        assert!(matches!(&held[..], [EventKind::Key { repeat: true, .. }]));

        translate(&mut translator, key(WM_KEYUP, VK_SHIFT, 0x2A, true));
        let released = translate(&mut translator, key(WM_KEYUP, 0x41, 0x1E, true));
        assert!(matches!(
            &released[..],
            [EventKind::Key { pressed: false, text: None, modifiers, .. }] if modifiers.is_empty()
        ));
    }

    #[test]
    fn test_caps_lock_toggles() {
        let mut translator = translator();
        translate(&mut translator, key(WM_KEYDOWN, 0x14, 0x3A, false));
        translate(&mut translator, key(WM_KEYUP, 0x14, 0x3A, true));
        let typed = translate(&mut translator, key(WM_KEYDOWN, 0x42, 0x30, false));
        assert!(matches!(
            &typed[..],
            [EventKind::Key { text: Some(text), modifiers, .. }]
                if text == "B" && *modifiers == KeyboardModifiers::CAPS_LOCK
        ));
    }

    #[test]
    fn test_first_move_synthesizes_enter() {
        let mut translator = translator();
        let first = translate(&mut translator, Msg::with_point(1, WM_MOUSEMOVE, 0, 10, 10));
        let second = translate(&mut translator, Msg::with_point(1, WM_MOUSEMOVE, 0, 14, 7));
        let left = translate(&mut translator, Msg::new(1, WM_MOUSELEAVE, 0, 0));

        assert!(matches!(
            &first[..],
            [
                EventKind::MouseCross { entered: true, position: (10, 10) },
                EventKind::MouseMove { position: (10, 10), delta: (0, 0) },
            ]
        ));
        assert!(matches!(
            &second[..],
            [EventKind::MouseMove { position: (14, 7), delta: (4, -3) }]
        ));
        assert!(matches!(
            &left[..],
            [EventKind::MouseCross { entered: false, position: (14, 7) }]
        ));
    }

    #[test]
    fn test_wheel_and_xbuttons() {
        let mut translator = translator();
        let down = translate(&mut translator, Msg::new(1, WM_MOUSEWHEEL, 0xFF88 << 16, 0));
        let right = translate(&mut translator, Msg::new(1, WM_MOUSEHWHEEL, 240 << 16, 0));
        let back = translate(
            &mut translator,
            Msg::with_point(1, WM_XBUTTONDOWN, (XBUTTON1 as usize) << 16, 3, 4),
        );

        assert!(matches!(&down[..], [EventKind::MouseWheel { value }] if *value == (0.0, -1.0)));
        assert!(matches!(&right[..], [EventKind::MouseWheel { value }] if *value == (2.0, 0.0)));
        assert!(matches!(
            &back[..],
            [EventKind::MouseButton { button: MouseButton::Custom1, pressed: true, position: (3, 4) }]
        ));
    }

    #[test]
    fn test_size_kinds() {
        let mut translator = translator();
        translator.register(1, &WindowSettings::default().with_size(640, 480));
        let size = |kind, width, height| {
            Msg::new(1, WM_SIZE, kind, make_lparam(width, height))
        };

        assert!(translate(&mut translator, size(SIZE_RESTORED, 640, 480)).is_empty());
        assert!(matches!(
            &translate(&mut translator, size(SIZE_MINIMIZED, 0, 0))[..],
            [EventKind::State { state: ToplevelState::Minimized }]
        ));
        assert!(matches!(
            &translate(&mut translator, size(SIZE_MAXIMIZED, 1920, 1040))[..],
            [EventKind::Size { size: (1920, 1040) }, EventKind::State { state: ToplevelState::Maximized }]
        ));

        translate(&mut translator, WinEvent::Fullscreen { hwnd: 1, enabled: true });
        let covered = translate(&mut translator, size(SIZE_RESTORED, 1920, 1080));
        assert!(matches!(&covered[..], [EventKind::Size { size: (1920, 1080) }]));
    }

    #[test]
    fn test_drop_requires_enter() {
        let mut translator = translator();
        assert!(translate(&mut translator, WinEvent::Drop { hwnd: 1, position: (0, 0) }).is_empty());
        assert!(translate(&mut translator, WinEvent::DragLeave { hwnd: 1 }).is_empty());
    }
}
