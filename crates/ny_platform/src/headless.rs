//! Headless backend
//!
//! Runs without any display server. Native events are portable events
//! addressed to a window id, and an in-process compositor answers window
//! requests the way an asynchronous one would: sizes are clamped to the
//! window's limits and state changes come back as events.

use ny_core::{EventKind, ToplevelState};
use rustc_hash::FxHashMap;

use crate::backend::NativeBackend;
use crate::context::WindowRequest;
use crate::error::Result;
use crate::native::{
    Capabilities, LoopbackConnection, LoopbackInjector, NativeAppContext, Responder, Translated,
    Translator,
};
use crate::settings::{PlatformConfig, WindowSettings};

pub const NAME: &str = "headless";

/// Native event vocabulary of the headless backend
#[derive(Clone, Debug)]
pub enum HeadlessEvent {
    /// Event for one window
    Window { window: u64, kind: EventKind },
    /// Event not tied to a window
    Global(EventKind),
}

impl HeadlessEvent {
    pub fn window(window: u64, kind: EventKind) -> Self {
        Self::Window { window, kind }
    }
}

pub type HeadlessConnection = LoopbackConnection<HeadlessEvent, u64>;
pub type HeadlessAppContext = NativeAppContext<HeadlessConnection, HeadlessTranslator>;
pub type HeadlessBackend = NativeBackend<HeadlessConnection, HeadlessTranslator>;

#[derive(Debug, Default)]
pub struct HeadlessTranslator;

impl Translator for HeadlessTranslator {
    type Event = HeadlessEvent;
    type Handle = u64;

    fn translate(&mut self, event: HeadlessEvent, out: &mut Vec<Translated<u64>>) {
        out.push(match event {
            HeadlessEvent::Window { window, kind } => Translated::window(window, kind),
            HeadlessEvent::Global(kind) => Translated::global(kind),
        });
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Limits {
    size: (u32, u32),
    min: Option<(u32, u32)>,
    max: Option<(u32, u32)>,
    state: ToplevelState,
}

impl Limits {
    fn clamp(&self, (width, height): (u32, u32)) -> (u32, u32) {
        let (min_w, min_h) = self.min.unwrap_or((0, 0));
        let (max_w, max_h) = self.max.unwrap_or((u32::MAX, u32::MAX));
        (
            width.max(min_w).min(max_w.max(min_w)),
            height.max(min_h).min(max_h.max(min_h)),
        )
    }
}

/// In-process compositor answering headless window requests
#[derive(Debug, Default)]
pub struct HeadlessCompositor {
    windows: FxHashMap<u64, Limits>,
}

impl Responder<HeadlessEvent, u64> for HeadlessCompositor {
    fn created(&mut self, window: u64, settings: &WindowSettings) -> Vec<HeadlessEvent> {
        let limits = Limits {
            size: settings.size,
            min: settings.min_size,
            max: settings.max_size,
            state: settings.initial_state(),
        };
        let size = limits.clamp(settings.size);
        self.windows.insert(window, Limits { size, ..limits });

        let mut events = vec![HeadlessEvent::window(window, EventKind::Size { size })];
        if let Some(position) = settings.position {
            events.push(HeadlessEvent::window(window, EventKind::Position { position }));
        }
        if limits.state != ToplevelState::Normal {
            events.push(HeadlessEvent::window(
                window,
                EventKind::State {
                    state: limits.state,
                },
            ));
        }
        if settings.show {
            events.push(HeadlessEvent::window(window, EventKind::Show { shown: true }));
        }
        events
    }

    fn respond(&mut self, window: u64, request: &WindowRequest) -> Vec<HeadlessEvent> {
        let Some(limits) = self.windows.get_mut(&window) else {
            return Vec::new();
        };

        let kind = match request {
            WindowRequest::Show => EventKind::Show { shown: true },
            WindowRequest::Hide => EventKind::Show { shown: false },
            WindowRequest::Size(size) => {
                limits.size = limits.clamp(*size);
                EventKind::Size { size: limits.size }
            }
            WindowRequest::Position(position) => EventKind::Position {
                position: *position,
            },
            WindowRequest::MinSize(size) => {
                limits.min = Some(*size);
                return resize_to_limits(window, limits);
            }
            WindowRequest::MaxSize(size) => {
                limits.max = Some(*size);
                return resize_to_limits(window, limits);
            }
            WindowRequest::State(state) => {
                if limits.state == *state {
                    return Vec::new();
                }
                limits.state = *state;
                EventKind::State { state: *state }
            }
            WindowRequest::Destroy => {
                self.windows.remove(&window);
                EventKind::Destroy
            }
            WindowRequest::Title(_)
            | WindowRequest::Cursor(_)
            | WindowRequest::Droppable(_)
            | WindowRequest::Refresh => return Vec::new(),
        };
        vec![HeadlessEvent::window(window, kind)]
    }
}

fn resize_to_limits(window: u64, limits: &mut Limits) -> Vec<HeadlessEvent> {
    let size = limits.clamp(limits.size);
    if size == limits.size {
        return Vec::new();
    }
    limits.size = size;
    vec![HeadlessEvent::window(window, EventKind::Size { size })]
}

pub fn capabilities() -> Capabilities {
    Capabilities {
        keyboard: true,
        mouse: true,
        buffer: true,
        gl: false,
        vulkan: false,
    }
}

/// Open a headless app context and the injector feeding it native events
pub fn connect() -> (HeadlessAppContext, LoopbackInjector<HeadlessEvent>) {
    let (connection, injector) = HeadlessConnection::new(capabilities());
    let connection = connection.with_responder(HeadlessCompositor::default());
    (
        NativeAppContext::new(NAME, connection, HeadlessTranslator),
        injector,
    )
}

/// The headless backend, always available and chosen last
pub fn backend() -> HeadlessBackend {
    NativeBackend::new(
        NAME,
        0,
        || true,
        |_: &HeadlessConnection| HeadlessTranslator,
        |_config: &PlatformConfig| -> Result<HeadlessConnection> {
            let (connection, _injector) = HeadlessConnection::new(capabilities());
            Ok(connection.with_responder(HeadlessCompositor::default()))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_are_clamped() {
        let mut compositor = HeadlessCompositor::default();
        let settings = WindowSettings {
            min_size: Some((100, 100)),
            max_size: Some((400, 300)),
            ..WindowSettings::default()
        };
        let created = compositor.created(1, &settings);
        assert!(matches!(
            created[0],
            HeadlessEvent::Window {
                kind: EventKind::Size { size: (400, 300) },
                ..
            }
        ));

        let events = compositor.respond(1, &WindowRequest::Size((10, 1000)));
        assert!(matches!(
            events[0],
            HeadlessEvent::Window {
                kind: EventKind::Size { size: (100, 300) },
                ..
            }
        ));
    }

    #[test]
    fn test_repeated_state_request_is_silent() {
        let mut compositor = HeadlessCompositor::default();
        compositor.created(1, &WindowSettings::default());
        let first = compositor.respond(1, &WindowRequest::State(ToplevelState::Maximized));
        let second = compositor.respond(1, &WindowRequest::State(ToplevelState::Maximized));
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_unknown_window_requests_are_ignored() {
        let mut compositor = HeadlessCompositor::default();
        assert!(compositor.respond(9, &WindowRequest::Show).is_empty());
    }
}
