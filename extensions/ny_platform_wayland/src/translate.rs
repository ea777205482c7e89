//! Wayland event translation

use std::sync::Arc;

use ny_core::{DataOffer, EventKind, Keycode, KeyboardModifiers, ToplevelState};
use ny_platform::{Translated, Translator, WindowSettings};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::event::{Axis, SurfaceId, WaylandEvent, XdgState};
use crate::keymap;

#[derive(Default)]
struct SurfaceState {
    size: (u32, u32),
    state: ToplevelState,
    configured: bool,
}

/// Scroll collected between two pointer frames
#[derive(Default)]
struct PendingAxis {
    value: (f64, f64),
    discrete: (Option<i32>, Option<i32>),
}

impl PendingAxis {
    fn add(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::HorizontalScroll => self.value.0 += value,
            Axis::VerticalScroll => self.value.1 += value,
        }
    }

    fn add_discrete(&mut self, axis: Axis, discrete: i32) {
        let slot = match axis {
            Axis::HorizontalScroll => &mut self.discrete.0,
            Axis::VerticalScroll => &mut self.discrete.1,
        };
        *slot = Some(slot.unwrap_or(0) + discrete);
    }

    /// Wheel value in lines, preferring click counts over distances
    fn lines(&self, axis: Axis) -> f64 {
        let (discrete, value) = match axis {
            Axis::HorizontalScroll => (self.discrete.0, self.value.0),
            Axis::VerticalScroll => (self.discrete.1, self.value.1),
        };
        discrete.map_or(value / keymap::AXIS_LINE, f64::from)
    }

    fn take(&mut self) -> Option<(f32, f32)> {
        let horizontal = keymap::wheel(Axis::HorizontalScroll, self.lines(Axis::HorizontalScroll));
        let vertical = keymap::wheel(Axis::VerticalScroll, self.lines(Axis::VerticalScroll));
        *self = Self::default();
        let value = (horizontal.0, vertical.1);
        (value != (0.0, 0.0)).then_some(value)
    }
}

struct Drag {
    surface: SurfaceId,
    offer: Arc<dyn DataOffer>,
    position: (i32, i32),
}

/// Stateful Wayland → portable event translator
///
/// Wayland addresses pointer and keyboard events by focus rather than by
/// surface, and batches scroll into frames. This keeps both focuses, the
/// pending scroll, and the last configured size and state per surface.
#[derive(Default)]
pub struct WaylandTranslator {
    surfaces: FxHashMap<SurfaceId, SurfaceState>,
    pointer_focus: Option<SurfaceId>,
    pointer: (i32, i32),
    axis: PendingAxis,
    keyboard_focus: Option<SurfaceId>,
    pressed: FxHashSet<Keycode>,
    modifiers: KeyboardModifiers,
    drag: Option<Drag>,
}

fn position(x: f64, y: f64) -> (i32, i32) {
    (x.floor() as i32, y.floor() as i32)
}

fn toplevel_state(states: &[XdgState]) -> ToplevelState {
    if states.contains(&XdgState::Fullscreen) {
        ToplevelState::Fullscreen
    } else if states.contains(&XdgState::Maximized) {
        ToplevelState::Maximized
    } else {
        ToplevelState::Normal
    }
}

type Out = Vec<Translated<SurfaceId>>;

impl WaylandTranslator {
    fn surface(&mut self, surface: SurfaceId) -> &mut SurfaceState {
        self.surfaces.entry(surface).or_default()
    }

    fn pointer_event(&self, kind: EventKind, out: &mut Out) {
        match self.pointer_focus {
            Some(surface) => out.push(Translated::window(surface, kind)),
            None => tracing::trace!("pointer event without pointer focus"),
        }
    }

    fn key(&mut self, key: u32, pressed: bool, text: Option<String>, out: &mut Out) {
        let Some(surface) = self.keyboard_focus else {
            tracing::trace!(key, "key event without keyboard focus");
            return;
        };
        let keycode = Keycode::from_evdev(key);
        let (repeat, modifiers) = if pressed {
            (
                !self.pressed.insert(keycode),
                self.modifiers | keycode.modifier(),
            )
        } else {
            self.pressed.remove(&keycode);
            (false, self.modifiers - keycode.modifier())
        };
        let text = text
            .filter(|_| pressed)
            .filter(|text| !text.chars().all(char::is_control));
        out.push(Translated::window(
            surface,
            EventKind::Key {
                keycode,
                pressed,
                text,
                modifiers,
                repeat,
            },
        ));
    }

    fn configure(
        &mut self,
        surface: SurfaceId,
        width: i32,
        height: i32,
        states: &[XdgState],
        out: &mut Out,
    ) {
        let next = toplevel_state(states);
        let current = self.surface(surface);
        let size = if width > 0 && height > 0 {
            (width as u32, height as u32)
        } else {
            current.size
        };
        let first = !current.configured;
        current.configured = true;
        if current.size != size {
            current.size = size;
            out.push(Translated::window(surface, EventKind::Size { size }));
        }
        if current.state != next {
            current.state = next;
            out.push(Translated::window(surface, EventKind::State { state: next }));
        }
        // Mapping happens on the first acked configure.
        if first {
            out.push(Translated::window(surface, EventKind::Show { shown: true }));
        }
    }
}

impl Translator for WaylandTranslator {
    type Event = WaylandEvent;
    type Handle = SurfaceId;

    fn translate(&mut self, event: WaylandEvent, out: &mut Out) {
        match event {
            WaylandEvent::PointerEnter { surface, x, y } => {
                self.pointer_focus = Some(surface);
                self.pointer = position(x, y);
                out.push(Translated::window(
                    surface,
                    EventKind::MouseCross {
                        entered: true,
                        position: self.pointer,
                    },
                ));
            }
            WaylandEvent::PointerLeave { surface } => {
                if self.pointer_focus == Some(surface) {
                    self.pointer_focus = None;
                }
                self.axis = PendingAxis::default();
                out.push(Translated::window(
                    surface,
                    EventKind::MouseCross {
                        entered: false,
                        position: self.pointer,
                    },
                ));
            }
            WaylandEvent::PointerMotion { x, y } => {
                let next = position(x, y);
                let delta = (next.0 - self.pointer.0, next.1 - self.pointer.1);
                self.pointer = next;
                self.pointer_event(
                    EventKind::MouseMove {
                        position: next,
                        delta,
                    },
                    out,
                );
            }
            WaylandEvent::PointerButton { button, pressed } => {
                self.pointer_event(
                    EventKind::MouseButton {
                        button: keymap::button(button),
                        pressed,
                        position: self.pointer,
                    },
                    out,
                );
            }
            WaylandEvent::PointerAxis { axis, value } => self.axis.add(axis, value),
            WaylandEvent::PointerAxisDiscrete { axis, discrete } => {
                self.axis.add_discrete(axis, discrete)
            }
            WaylandEvent::PointerFrame => {
                if let Some(value) = self.axis.take() {
                    self.pointer_event(EventKind::MouseWheel { value }, out);
                }
            }
            WaylandEvent::KeyboardEnter { surface, keys } => {
                self.keyboard_focus = Some(surface);
                self.pressed = keys.into_iter().map(Keycode::from_evdev).collect();
                out.push(Translated::window(surface, EventKind::Focus { gained: true }));
            }
            WaylandEvent::KeyboardLeave { surface } => {
                if self.keyboard_focus == Some(surface) {
                    self.keyboard_focus = None;
                }
                self.pressed.clear();
                out.push(Translated::window(surface, EventKind::Focus { gained: false }));
            }
            WaylandEvent::Key { key, pressed, text } => self.key(key, pressed, text, out),
            WaylandEvent::Modifiers {
                depressed,
                latched,
                locked,
            } => self.modifiers = keymap::modifiers(depressed, latched, locked),
            WaylandEvent::XdgConfigure {
                surface,
                width,
                height,
                states,
            } => self.configure(surface, width, height, &states, out),
            WaylandEvent::XdgClose { surface } => {
                out.push(Translated::window(surface, EventKind::Close));
            }
            WaylandEvent::Frame { surface } => {
                out.push(Translated::window(surface, EventKind::Draw));
            }
            WaylandEvent::Selection { offer } => {
                if let Some(offer) = offer {
                    out.push(Translated::global(EventKind::DataOffer { offer }));
                }
            }
            WaylandEvent::DndEnter {
                surface,
                x,
                y,
                offer,
            } => {
                let Some(offer) = offer else {
                    tracing::debug!(surface, "drag without a known mime type");
                    self.drag = None;
                    return;
                };
                let position = position(x, y);
                self.drag = Some(Drag {
                    surface,
                    offer: offer.clone(),
                    position,
                });
                out.push(Translated::window(
                    surface,
                    EventKind::DndEnter { position, offer },
                ));
            }
            WaylandEvent::DndMotion { x, y } => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.position = position(x, y);
                    out.push(Translated::window(
                        drag.surface,
                        EventKind::DndMove {
                            position: drag.position,
                        },
                    ));
                }
            }
            WaylandEvent::DndLeave => {
                if let Some(drag) = self.drag.take() {
                    out.push(Translated::window(drag.surface, EventKind::DndLeave));
                }
            }
            WaylandEvent::DndDrop => {
                if let Some(drag) = self.drag.take() {
                    out.push(Translated::window(
                        drag.surface,
                        EventKind::DndDrop {
                            position: drag.position,
                            offer: drag.offer,
                        },
                    ));
                }
            }
        }
    }

    fn register(&mut self, surface: SurfaceId, settings: &WindowSettings) {
        let state = self.surface(surface);
        state.size = settings.size;
        state.state = settings.initial_state();
    }

    fn forget(&mut self, surface: SurfaceId) {
        self.surfaces.remove(&surface);
        if self.pointer_focus == Some(surface) {
            self.pointer_focus = None;
        }
        if self.keyboard_focus == Some(surface) {
            self.keyboard_focus = None;
            self.pressed.clear();
        }
        if self.drag.as_ref().is_some_and(|drag| drag.surface == surface) {
            self.drag = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use ny_core::MouseButton;

    use super::*;
    use crate::keymap::{BTN_LEFT, BTN_SIDE};

    fn translate(
        translator: &mut WaylandTranslator,
        event: WaylandEvent,
    ) -> Vec<Translated<SurfaceId>> {
        let mut out = Vec::new();
        translator.translate(event, &mut out);
        out
    }

    fn kinds(translator: &mut WaylandTranslator, event: WaylandEvent) -> Vec<EventKind> {
        translate(translator, event)
            .into_iter()
            .map(|translated| translated.kind)
            .collect()
    }

    #[test]
    fn test_pointer_events_follow_focus() {
        let mut translator = WaylandTranslator::default();
        assert!(kinds(
            &mut translator,
            WaylandEvent::PointerButton {
                button: BTN_LEFT,
                pressed: true
            }
        )
        .is_empty());

        translate(
            &mut translator,
            WaylandEvent::PointerEnter {
                surface: 7,
                x: 10.4,
                y: 20.9,
            },
        );
        let moved = translate(&mut translator, WaylandEvent::PointerMotion { x: 12.0, y: 18.0 });
        assert_eq!(moved[0].window, Some(7));
        assert!(matches!(
            moved[0].kind,
            EventKind::MouseMove {
                position: (12, 18),
                delta: (2, -2)
            }
        ));

        let clicked = kinds(
            &mut translator,
            WaylandEvent::PointerButton {
                button: BTN_SIDE,
                pressed: false,
            },
        );
        assert!(matches!(
            &clicked[..],
            [EventKind::MouseButton { button: MouseButton::Custom1, pressed: false, position: (12, 18) }]
        ));
    }

    #[test]
    fn test_axis_accumulates_until_frame() {
        let mut translator = WaylandTranslator::default();
        translate(
            &mut translator,
            WaylandEvent::PointerEnter {
                surface: 1,
                x: 0.0,
                y: 0.0,
            },
        );
        let axis = |value| WaylandEvent::PointerAxis {
            axis: Axis::VerticalScroll,
            value,
        };
        assert!(kinds(&mut translator, axis(10.0)).is_empty());
        assert!(kinds(&mut translator, axis(10.0)).is_empty());
        let frame = kinds(&mut translator, WaylandEvent::PointerFrame);
        assert!(matches!(&frame[..], [EventKind::MouseWheel { value }] if *value == (0.0, -2.0)));

        // Discrete clicks win over the distance in the same frame.
        translate(&mut translator, axis(-15.0));
        translate(
            &mut translator,
            WaylandEvent::PointerAxisDiscrete {
                axis: Axis::VerticalScroll,
                discrete: -1,
            },
        );
        let frame = kinds(&mut translator, WaylandEvent::PointerFrame);
        assert!(matches!(&frame[..], [EventKind::MouseWheel { value }] if *value == (0.0, 1.0)));

        assert!(kinds(&mut translator, WaylandEvent::PointerFrame).is_empty());
    }

    #[test]
    fn test_keys_use_focus_and_modifiers() {
        let mut translator = WaylandTranslator::default();
        let key = |key, pressed| WaylandEvent::Key {
            key,
            pressed,
            text: pressed.then(|| "a".to_string()),
        };
        assert!(kinds(&mut translator, key(30, true)).is_empty());

        let entered = translate(
            &mut translator,
            WaylandEvent::KeyboardEnter {
                surface: 3,
                keys: vec![30],
            },
        );
        assert!(matches!(entered[0].kind, EventKind::Focus { gained: true }));

        translate(
            &mut translator,
            WaylandEvent::Modifiers {
                depressed: 1 << 2,
                latched: 0,
                locked: 0,
            },
        );
        let held = translate(&mut translator, key(30, true));
        assert_eq!(held[0].window, Some(3));
        assert!(matches!(
            &held[0].kind,
            EventKind::Key { keycode: Keycode::A, repeat: true, text: Some(text), modifiers, .. }
                if text == "a" && *modifiers == KeyboardModifiers::CTRL
        ));

        let released = kinds(&mut translator, key(30, false));
        assert!(matches!(&released[..], [EventKind::Key { pressed: false, repeat: false, text: None, .. }]));
    }

    #[test]
    fn test_configure_reports_show_once() {
        let mut translator = WaylandTranslator::default();
        translator.register(4, &WindowSettings::default().with_size(640, 480));
        let configure = |width, height, states| WaylandEvent::XdgConfigure {
            surface: 4,
            width,
            height,
            states,
        };

        let first = kinds(&mut translator, configure(0, 0, vec![XdgState::Activated]));
        assert!(matches!(&first[..], [EventKind::Show { shown: true }]));

        let maximized = kinds(&mut translator, configure(1920, 1080, vec![XdgState::Maximized]));
        assert!(matches!(
            &maximized[..],
            [EventKind::Size { size: (1920, 1080) }, EventKind::State { state: ToplevelState::Maximized }]
        ));

        let restored = kinds(&mut translator, configure(1920, 1080, vec![]));
        assert!(matches!(&restored[..], [EventKind::State { state: ToplevelState::Normal }]));
    }

    #[test]
    fn test_drag_without_known_type_is_ignored() {
        let mut translator = WaylandTranslator::default();
        translate(
            &mut translator,
            WaylandEvent::DndEnter {
                surface: 2,
                x: 1.0,
                y: 1.0,
                offer: None,
            },
        );
        assert!(kinds(&mut translator, WaylandEvent::DndMotion { x: 2.0, y: 2.0 }).is_empty());
        assert!(kinds(&mut translator, WaylandEvent::DndDrop).is_empty());
    }

    #[test]
    fn test_forget_drops_focus() {
        let mut translator = WaylandTranslator::default();
        translate(
            &mut translator,
            WaylandEvent::PointerEnter {
                surface: 5,
                x: 0.0,
                y: 0.0,
            },
        );
        translator.forget(5);
        assert!(kinds(&mut translator, WaylandEvent::PointerMotion { x: 1.0, y: 1.0 }).is_empty());
    }
}
