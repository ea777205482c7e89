//! Android input and lifecycle translation

use ny_core::{event_types, CustomEvent, EventKind, EventType, MouseButton};
use ny_platform::{Translated, Translator, WindowSettings};

use crate::event::{
    key_action, motion_action, source, AndroidEvent, AppCommand, NativeKey, Pointer, WindowId,
};
use crate::keymap;

/// Custom event carrying a [`Lifecycle`] payload, sent to the app handler
pub const LIFECYCLE: EventType = event_types::CUSTOM_BEGIN;

/// Activity lifecycle transitions without a portable event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Start,
    Resume,
    Pause,
    Stop,
    SaveState,
    LowMemory,
    ConfigChanged,
    Destroy,
}

/// Build the custom event kind for `lifecycle`
pub fn lifecycle_event(lifecycle: Lifecycle) -> Option<EventKind> {
    match CustomEvent::new(LIFECYCLE, false, lifecycle) {
        Ok(custom) => Some(EventKind::Custom(custom)),
        Err(err) => {
            tracing::error!(%err, "failed to build lifecycle event");
            None
        }
    }
}

/// Stateful Android → portable event translator
///
/// An activity has at most one window, so every window event goes to the
/// registered one. Touch input drives the mouse: the first finger down is
/// the left button, later fingers are ignored until it lifts.
#[derive(Default)]
pub struct AndroidTranslator {
    window: Option<WindowId>,
    size: (u32, u32),
    touch: Option<i32>,
    pointer: (i32, i32),
    buttons: i32,
}

type Out = Vec<Translated<WindowId>>;

impl AndroidTranslator {
    fn push(&self, kind: EventKind, out: &mut Out) {
        match self.window {
            Some(window) => out.push(Translated::window(window, kind)),
            None => tracing::trace!(?kind, "no window for event"),
        }
    }

    fn moved(&mut self, position: (i32, i32), out: &mut Out) {
        let delta = (position.0 - self.pointer.0, position.1 - self.pointer.1);
        self.pointer = position;
        self.push(EventKind::MouseMove { position, delta }, out);
    }

    fn resized(&mut self, size: (u32, u32), out: &mut Out) {
        if self.size != size {
            self.size = size;
            self.push(EventKind::Size { size }, out);
        }
    }

    fn key(
        &mut self,
        action: i32,
        keycode: i32,
        meta_state: i32,
        repeat_count: i32,
        unicode: u32,
        out: &mut Out,
    ) {
        let pressed = match action {
            key_action::DOWN => true,
            key_action::UP => false,
            // Character strings from the IME; text input is not handled here.
            _ => return,
        };
        self.push(
            EventKind::Key {
                keycode: keymap::keycode(keycode),
                pressed,
                text: if pressed { keymap::text(unicode) } else { None },
                modifiers: keymap::modifiers(meta_state),
                repeat: pressed && repeat_count > 0,
            },
            out,
        );
    }

    fn touch(&mut self, action: i32, pointers: &[Pointer], out: &mut Out) {
        let masked = action & motion_action::MASK;
        let index = ((action >> motion_action::POINTER_INDEX_SHIFT) & 0xFF) as usize;
        match masked {
            motion_action::DOWN => {
                let Some(pointer) = pointers.first() else {
                    return;
                };
                self.touch = Some(pointer.id);
                self.moved(pointer.position(), out);
                self.push(
                    EventKind::MouseButton {
                        button: MouseButton::Left,
                        pressed: true,
                        position: self.pointer,
                    },
                    out,
                );
            }
            motion_action::MOVE => {
                let tracked = self
                    .touch
                    .and_then(|id| pointers.iter().find(|pointer| pointer.id == id));
                if let Some(pointer) = tracked {
                    let position = pointer.position();
                    if position != self.pointer {
                        self.moved(position, out);
                    }
                }
            }
            motion_action::UP | motion_action::CANCEL => self.lift(out),
            motion_action::POINTER_UP => {
                let lifted = pointers.get(index).map(|pointer| pointer.id);
                if lifted.is_some() && lifted == self.touch {
                    self.lift(out);
                }
            }
            motion_action::POINTER_DOWN => {}
            other => tracing::trace!(action = other, "ignoring touch action"),
        }
    }

    fn lift(&mut self, out: &mut Out) {
        if self.touch.take().is_some() {
            self.push(
                EventKind::MouseButton {
                    button: MouseButton::Left,
                    pressed: false,
                    position: self.pointer,
                },
                out,
            );
        }
    }

    fn mouse(&mut self, action: i32, button_state: i32, pointers: &[Pointer], out: &mut Out) {
        let Some(pointer) = pointers.first() else {
            return;
        };
        let position = pointer.position();
        match action & motion_action::MASK {
            motion_action::HOVER_ENTER => {
                self.pointer = position;
                self.push(
                    EventKind::MouseCross {
                        entered: true,
                        position,
                    },
                    out,
                );
            }
            motion_action::HOVER_EXIT => self.push(
                EventKind::MouseCross {
                    entered: false,
                    position,
                },
                out,
            ),
            motion_action::HOVER_MOVE | motion_action::MOVE => self.moved(position, out),
            motion_action::SCROLL => self.push(
                EventKind::MouseWheel {
                    value: (pointer.hscroll, pointer.vscroll),
                },
                out,
            ),
            motion_action::BUTTON_PRESS | motion_action::BUTTON_RELEASE => {
                self.pointer = position;
                for (button, pressed) in keymap::changed_buttons(self.buttons, button_state) {
                    self.push(
                        EventKind::MouseButton {
                            button,
                            pressed,
                            position,
                        },
                        out,
                    );
                }
                self.buttons = button_state;
            }
            // Button changes arrive as BUTTON_PRESS / BUTTON_RELEASE as well.
            motion_action::DOWN | motion_action::UP => {}
            other => tracing::trace!(action = other, "ignoring mouse action"),
        }
    }

    fn command(&mut self, command: AppCommand, out: &mut Out) {
        let lifecycle = match command {
            AppCommand::InitWindow { width, height } => {
                self.resized((width, height), out);
                self.push(EventKind::Show { shown: true }, out);
                return;
            }
            AppCommand::TermWindow => {
                self.push(EventKind::Show { shown: false }, out);
                return;
            }
            AppCommand::WindowResized { width, height } => {
                self.resized((width, height), out);
                return;
            }
            AppCommand::RedrawNeeded => {
                self.push(EventKind::Draw, out);
                return;
            }
            AppCommand::GainedFocus => {
                self.push(EventKind::Focus { gained: true }, out);
                return;
            }
            AppCommand::LostFocus => {
                self.push(EventKind::Focus { gained: false }, out);
                return;
            }
            AppCommand::Start => Lifecycle::Start,
            AppCommand::Resume => Lifecycle::Resume,
            AppCommand::Pause => Lifecycle::Pause,
            AppCommand::Stop => Lifecycle::Stop,
            AppCommand::SaveState => Lifecycle::SaveState,
            AppCommand::LowMemory => Lifecycle::LowMemory,
            AppCommand::ConfigChanged => Lifecycle::ConfigChanged,
            AppCommand::Destroy => {
                self.push(EventKind::Close, out);
                Lifecycle::Destroy
            }
        };
        if let Some(kind) = lifecycle_event(lifecycle) {
            out.push(Translated::global(kind));
        }
    }
}

impl Translator for AndroidTranslator {
    type Event = AndroidEvent;
    type Handle = WindowId;

    fn translate(&mut self, event: AndroidEvent, out: &mut Out) {
        match event {
            AndroidEvent::Key {
                action,
                keycode,
                meta_state,
                repeat_count,
                unicode,
            } => {
                let first = out.len();
                self.key(action, keycode, meta_state, repeat_count, unicode, out);
                let native = NativeKey {
                    keycode,
                    meta_state,
                    repeat_count,
                };
                for translated in &mut out[first..] {
                    translated.data = Some(Box::new(native));
                }
            }
            AndroidEvent::Motion {
                source: source::MOUSE,
                action,
                button_state,
                pointers,
            } => self.mouse(action, button_state, &pointers, out),
            AndroidEvent::Motion {
                action, pointers, ..
            } => self.touch(action, &pointers, out),
            AndroidEvent::Command(command) => self.command(command, out),
            AndroidEvent::Clipboard { offer } => {
                if let Some(offer) = offer {
                    out.push(Translated::global(EventKind::DataOffer { offer }));
                }
            }
        }
    }

    fn register(&mut self, window: WindowId, settings: &WindowSettings) {
        if let Some(previous) = self.window.replace(window) {
            tracing::warn!(previous, window, "activity window replaced");
        }
        self.size = settings.size;
    }

    fn forget(&mut self, window: WindowId) {
        if self.window == Some(window) {
            *self = Self::default();
        }
    }
}
