//! X11 event translation

use std::sync::Arc;

use ny_core::{DataOffer, EventKind, Keycode, ToplevelState};
use ny_platform::{Translated, Translator, WindowSettings};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::event::{X11Atoms, X11Event, XWindow};
use crate::keymap::{self, Button};

struct Drag {
    offer: Arc<dyn DataOffer>,
    /// Set by the first `XdndPosition`; enter is reported only then
    position: Option<(i32, i32)>,
}

#[derive(Default)]
struct WindowState {
    size: (u32, u32),
    position: (i32, i32),
    pointer: Option<(i32, i32)>,
    state: ToplevelState,
    drag: Option<Drag>,
}

/// Stateful X11 → portable event translator
///
/// X reports absolute geometry and pointer positions; this keeps the last
/// known values per window to report changes and motion deltas.
pub struct X11Translator {
    atoms: X11Atoms,
    windows: FxHashMap<XWindow, WindowState>,
    pressed: FxHashSet<Keycode>,
}

impl X11Translator {
    pub fn new(atoms: X11Atoms) -> Self {
        Self {
            atoms,
            windows: FxHashMap::default(),
            pressed: FxHashSet::default(),
        }
    }

    fn window(&mut self, window: XWindow) -> &mut WindowState {
        self.windows.entry(window).or_default()
    }
}

type Out = Vec<Translated<XWindow>>;

impl Translator for X11Translator {
    type Event = X11Event;
    type Handle = XWindow;

    fn translate(&mut self, event: X11Event, out: &mut Out) {
        match event {
            X11Event::KeyPress {
                window,
                detail,
                state,
                text,
            } => {
                let keycode = keymap::keycode(detail);
                // Detectable autorepeat: repeats arrive as presses without releases.
                let repeat = !self.pressed.insert(keycode);
                let text = text.filter(|text| !text.chars().all(char::is_control));
                out.push(Translated::window(
                    window,
                    EventKind::Key {
                        keycode,
                        pressed: true,
                        text,
                        // The mask describes the state before this event.
                        modifiers: keymap::modifiers(state) | keycode.modifier(),
                        repeat,
                    },
                ));
            }
            X11Event::KeyRelease {
                window,
                detail,
                state,
            } => {
                let keycode = keymap::keycode(detail);
                self.pressed.remove(&keycode);
                out.push(Translated::window(
                    window,
                    EventKind::Key {
                        keycode,
                        pressed: false,
                        text: None,
                        modifiers: keymap::modifiers(state) - keycode.modifier(),
                        repeat: false,
                    },
                ));
            }
            X11Event::ButtonPress {
                window, detail, x, y, ..
            } => {
                let kind = match keymap::button(detail) {
                    Button::Press(button) => EventKind::MouseButton {
                        button,
                        pressed: true,
                        position: (x.into(), y.into()),
                    },
                    Button::Wheel(dx, dy) => EventKind::MouseWheel { value: (dx, dy) },
                };
                out.push(Translated::window(window, kind));
            }
            X11Event::ButtonRelease {
                window, detail, x, y, ..
            } => {
                if let Button::Press(button) = keymap::button(detail) {
                    out.push(Translated::window(
                        window,
                        EventKind::MouseButton {
                            button,
                            pressed: false,
                            position: (x.into(), y.into()),
                        },
                    ));
                }
            }
            X11Event::MotionNotify { window, x, y, .. } => {
                let position = (i32::from(x), i32::from(y));
                let last = self.window(window).pointer.replace(position);
                let delta = last.map_or((0, 0), |(lx, ly)| (position.0 - lx, position.1 - ly));
                out.push(Translated::window(
                    window,
                    EventKind::MouseMove { position, delta },
                ));
            }
            X11Event::EnterNotify { window, x, y } => {
                let position = (i32::from(x), i32::from(y));
                self.window(window).pointer = Some(position);
                out.push(Translated::window(
                    window,
                    EventKind::MouseCross {
                        entered: true,
                        position,
                    },
                ));
            }
            X11Event::LeaveNotify { window, x, y } => {
                self.window(window).pointer = None;
                out.push(Translated::window(
                    window,
                    EventKind::MouseCross {
                        entered: false,
                        position: (x.into(), y.into()),
                    },
                ));
            }
            X11Event::FocusIn { window } => {
                out.push(Translated::window(window, EventKind::Focus { gained: true }));
            }
            X11Event::FocusOut { window } => {
                self.pressed.clear();
                out.push(Translated::window(window, EventKind::Focus { gained: false }));
            }
            X11Event::Expose { window, count } => {
                if count == 0 {
                    out.push(Translated::window(window, EventKind::Draw));
                }
            }
            X11Event::ConfigureNotify {
                window,
                x,
                y,
                width,
                height,
            } => {
                let size = (u32::from(width), u32::from(height));
                let position = (i32::from(x), i32::from(y));
                let state = self.window(window);
                if state.size != size {
                    state.size = size;
                    out.push(Translated::window(window, EventKind::Size { size }));
                }
                if state.position != position {
                    state.position = position;
                    out.push(Translated::window(window, EventKind::Position { position }));
                }
            }
            X11Event::MapNotify { window } => {
                out.push(Translated::window(window, EventKind::Show { shown: true }));
            }
            X11Event::UnmapNotify { window } => {
                out.push(Translated::window(window, EventKind::Show { shown: false }));
            }
            X11Event::DestroyNotify { window } => {
                out.push(Translated::window(window, EventKind::Destroy));
            }
            X11Event::ReparentNotify { window, parent } => {
                out.push(Translated::window(
                    window,
                    EventKind::Reparent {
                        parent: Some(u64::from(parent)),
                    },
                ));
            }
            X11Event::ClientMessage {
                window,
                message_type,
                data,
            } => {
                if message_type == self.atoms.wm_protocols && data[0] == self.atoms.wm_delete_window
                {
                    out.push(Translated::window(window, EventKind::Close));
                } else {
                    tracing::trace!(window, message_type, "ignoring client message");
                }
            }
            X11Event::NetWmState {
                window,
                maximized_horz,
                maximized_vert,
                fullscreen,
                hidden,
            } => {
                let next = if hidden {
                    ToplevelState::Minimized
                } else if fullscreen {
                    ToplevelState::Fullscreen
                } else if maximized_horz && maximized_vert {
                    ToplevelState::Maximized
                } else {
                    ToplevelState::Normal
                };
                let state = self.window(window);
                if state.state != next {
                    state.state = next;
                    out.push(Translated::window(window, EventKind::State { state: next }));
                }
            }
            X11Event::SelectionOwner { offer } => {
                if let Some(offer) = offer {
                    out.push(Translated::global(EventKind::DataOffer { offer }));
                }
            }
            X11Event::XdndEnter { window, offer } => {
                self.window(window).drag = Some(Drag {
                    offer,
                    position: None,
                });
            }
            X11Event::XdndPosition { window, x, y } => {
                let position = (i32::from(x), i32::from(y));
                let Some(drag) = self.window(window).drag.as_mut() else {
                    tracing::debug!(window, "XdndPosition without XdndEnter");
                    return;
                };
                let kind = match drag.position.replace(position) {
                    None => EventKind::DndEnter {
                        position,
                        offer: drag.offer.clone(),
                    },
                    Some(_) => EventKind::DndMove { position },
                };
                out.push(Translated::window(window, kind));
            }
            X11Event::XdndLeave { window } => {
                let entered = self
                    .window(window)
                    .drag
                    .take()
                    .is_some_and(|drag| drag.position.is_some());
                if entered {
                    out.push(Translated::window(window, EventKind::DndLeave));
                }
            }
            X11Event::XdndDrop { window } => {
                let Some(drag) = self.window(window).drag.take() else {
                    return;
                };
                if let Some(position) = drag.position {
                    out.push(Translated::window(
                        window,
                        EventKind::DndDrop {
                            position,
                            offer: drag.offer,
                        },
                    ));
                }
            }
        }
    }

    fn register(&mut self, window: XWindow, settings: &WindowSettings) {
        let state = self.window(window);
        state.size = settings.size;
        state.position = settings.position.unwrap_or_default();
        state.state = settings.initial_state();
    }

    fn forget(&mut self, window: XWindow) {
        self.windows.remove(&window);
    }
}

#[cfg(test)]
mod tests {
    use ny_core::{DataType, DataTypes, KeyboardModifiers, MouseButton};

    use super::*;
    use crate::event::mask;

    const ATOMS: X11Atoms = X11Atoms {
        wm_protocols: 100,
        wm_delete_window: 101,
        net_wm_ping: 102,
    };

    fn translate(translator: &mut X11Translator, event: X11Event) -> Vec<EventKind> {
        let mut out = Vec::new();
        translator.translate(event, &mut out);
        out.into_iter().map(|translated| translated.kind).collect()
    }

    struct Files;

    impl DataOffer for Files {
        fn types(&self) -> DataTypes {
            [DataType::FILE_PATHS].into_iter().collect()
        }

        fn data(&self, _ty: DataType, callback: ny_core::DataCallback) {
            callback(ny_core::DataValue::Empty);
        }
    }

    #[test]
    fn test_key_press_and_repeat() {
        let mut translator = X11Translator::new(ATOMS);
        let press = || X11Event::KeyPress {
            window: 1,
            detail: 38,
            state: mask::SHIFT,
            text: Some("A".to_string()),
        };

        let first = translate(&mut translator, press());
        let second = translate(&mut translator, press());
        assert!(matches!(
            &first[..],
            [EventKind::Key { keycode: Keycode::A, pressed: true, repeat: false, text: Some(text), modifiers }]
                if text == "A" && *modifiers == KeyboardModifiers::SHIFT
        ));
        assert!(matches!(&second[..], [EventKind::Key { repeat: true, .. }]));
    }

    #[test]
    fn test_modifier_keys_report_state_after_event() {
        let mut translator = X11Translator::new(ATOMS);
        // Left shift is X keycode 50.
        let pressed = translate(
            &mut translator,
            X11Event::KeyPress {
                window: 1,
                detail: 50,
                state: 0,
                text: None,
            },
        );
        let released = translate(
            &mut translator,
            X11Event::KeyRelease {
                window: 1,
                detail: 50,
                state: mask::SHIFT,
            },
        );
        assert!(matches!(&pressed[..], [EventKind::Key { modifiers, .. }] if *modifiers == KeyboardModifiers::SHIFT));
        assert!(matches!(&released[..], [EventKind::Key { modifiers, .. }] if modifiers.is_empty()));
    }

    #[test]
    fn test_control_characters_are_not_text() {
        let mut translator = X11Translator::new(ATOMS);
        let events = translate(
            &mut translator,
            X11Event::KeyPress {
                window: 1,
                detail: 22,
                state: 0,
                text: Some("\u{8}".to_string()),
            },
        );
        assert!(matches!(&events[..], [EventKind::Key { keycode: Keycode::Backspace, text: None, .. }]));
    }

    #[test]
    fn test_wheel_buttons_scroll_on_press_only() {
        let mut translator = X11Translator::new(ATOMS);
        let press = translate(
            &mut translator,
            X11Event::ButtonPress {
                window: 1,
                detail: 5,
                x: 0,
                y: 0,
                state: 0,
            },
        );
        let release = translate(
            &mut translator,
            X11Event::ButtonRelease {
                window: 1,
                detail: 5,
                x: 0,
                y: 0,
                state: 0,
            },
        );
        assert!(matches!(&press[..], [EventKind::MouseWheel { value }] if *value == (0.0, -1.0)));
        assert!(release.is_empty());

        let click = translate(
            &mut translator,
            X11Event::ButtonRelease {
                window: 1,
                detail: 1,
                x: 4,
                y: 5,
                state: 0,
            },
        );
        assert!(matches!(
            &click[..],
            [EventKind::MouseButton { button: MouseButton::Left, pressed: false, position: (4, 5) }]
        ));
    }

    #[test]
    fn test_motion_deltas() {
        let mut translator = X11Translator::new(ATOMS);
        let motion = |x, y| X11Event::MotionNotify {
            window: 1,
            x,
            y,
            state: 0,
        };
        translate(&mut translator, X11Event::EnterNotify { window: 1, x: 10, y: 10 });
        let moved = translate(&mut translator, motion(15, 8));
        assert!(matches!(
            &moved[..],
            [EventKind::MouseMove { position: (15, 8), delta: (5, -2) }]
        ));
    }

    #[test]
    fn test_configure_reports_only_changes() {
        let mut translator = X11Translator::new(ATOMS);
        translator.register(
            1,
            &WindowSettings {
                position: Some((10, 10)),
                ..WindowSettings::default().with_size(640, 480)
            },
        );
        let configure = |x, y, width, height| X11Event::ConfigureNotify {
            window: 1,
            x,
            y,
            width,
            height,
        };

        assert!(translate(&mut translator, configure(10, 10, 640, 480)).is_empty());
        assert!(matches!(
            &translate(&mut translator, configure(10, 10, 700, 480))[..],
            [EventKind::Size { size: (700, 480) }]
        ));
        assert!(matches!(
            &translate(&mut translator, configure(30, 40, 800, 600))[..],
            [EventKind::Size { size: (800, 600) }, EventKind::Position { position: (30, 40) }]
        ));
    }

    #[test]
    fn test_expose_waits_for_last_rectangle() {
        let mut translator = X11Translator::new(ATOMS);
        assert!(translate(&mut translator, X11Event::Expose { window: 1, count: 2 }).is_empty());
        assert!(matches!(
            &translate(&mut translator, X11Event::Expose { window: 1, count: 0 })[..],
            [EventKind::Draw]
        ));
    }

    #[test]
    fn test_wm_delete_window_is_close() {
        let mut translator = X11Translator::new(ATOMS);
        let close = translate(
            &mut translator,
            X11Event::ClientMessage {
                window: 1,
                message_type: ATOMS.wm_protocols,
                data: [ATOMS.wm_delete_window, 0, 0, 0, 0],
            },
        );
        let ping = translate(
            &mut translator,
            X11Event::ClientMessage {
                window: 1,
                message_type: ATOMS.wm_protocols,
                data: [ATOMS.net_wm_ping, 0, 0, 0, 0],
            },
        );
        assert!(matches!(&close[..], [EventKind::Close]));
        assert!(ping.is_empty());
    }

    #[test]
    fn test_net_wm_state() {
        let mut translator = X11Translator::new(ATOMS);
        let state = |horz, vert, fullscreen, hidden| X11Event::NetWmState {
            window: 1,
            maximized_horz: horz,
            maximized_vert: vert,
            fullscreen,
            hidden,
        };

        assert!(translate(&mut translator, state(true, false, false, false)).is_empty());
        assert!(matches!(
            &translate(&mut translator, state(true, true, false, false))[..],
            [EventKind::State { state: ToplevelState::Maximized }]
        ));
        assert!(matches!(
            &translate(&mut translator, state(true, true, false, true))[..],
            [EventKind::State { state: ToplevelState::Minimized }]
        ));
    }

    #[test]
    fn test_xdnd_sequence() {
        let mut translator = X11Translator::new(ATOMS);
        let offer: Arc<dyn DataOffer> = Arc::new(Files);

        assert!(translate(&mut translator, X11Event::XdndEnter { window: 1, offer }).is_empty());
        let enter = translate(&mut translator, X11Event::XdndPosition { window: 1, x: 3, y: 4 });
        let moved = translate(&mut translator, X11Event::XdndPosition { window: 1, x: 5, y: 6 });
        let drop = translate(&mut translator, X11Event::XdndDrop { window: 1 });
        let stray = translate(&mut translator, X11Event::XdndPosition { window: 1, x: 0, y: 0 });

        assert!(matches!(&enter[..], [EventKind::DndEnter { position: (3, 4), .. }]));
        assert!(matches!(&moved[..], [EventKind::DndMove { position: (5, 6) }]));
        assert!(matches!(&drop[..], [EventKind::DndDrop { position: (5, 6), .. }]));
        assert!(stray.is_empty());
    }
}
