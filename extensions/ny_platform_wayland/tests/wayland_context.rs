//! Wayland translation through a full app context
//!
//! A loopback connection plays the compositor.

use std::sync::{Arc, Mutex};

use ny_core::{handler_ref, Event, EventHandler, EventKind, Keycode, MouseButton, ToplevelState};
use ny_platform::{
    AppContext, Backend, LoopbackConnection, LoopbackInjector, NativeAppContext, PlatformConfig,
    Responder, WindowRequest, WindowSettings,
};
use ny_platform_wayland::backend::{capabilities, VULKAN_EXTENSIONS};
use ny_platform_wayland::keymap::BTN_LEFT;
use ny_platform_wayland::{Axis, SurfaceId, WaylandEvent, WaylandTranslator, XdgState};

#[derive(Default)]
struct Recorder {
    kinds: Mutex<Vec<EventKind>>,
}

impl Recorder {
    fn take(&self) -> Vec<EventKind> {
        std::mem::take(&mut *self.kinds.lock().unwrap())
    }
}

impl EventHandler for Recorder {
    fn handle_event(&self, event: &Event) -> bool {
        self.kinds.lock().unwrap().push(event.kind.clone());
        true
    }
}

/// Compositor answering with xdg configures
#[derive(Default)]
struct Compositor {
    size: (i32, i32),
}

const OUTPUT: (i32, i32) = (1920, 1080);

impl Compositor {
    fn configure(surface: SurfaceId, size: (i32, i32), states: Vec<XdgState>) -> WaylandEvent {
        WaylandEvent::XdgConfigure {
            surface,
            width: size.0,
            height: size.1,
            states,
        }
    }
}

impl Responder<WaylandEvent, SurfaceId> for Compositor {
    fn created(&mut self, surface: SurfaceId, settings: &WindowSettings) -> Vec<WaylandEvent> {
        self.size = (settings.size.0 as i32, settings.size.1 as i32);
        vec![
            // The client picks its own size on the initial configure.
            Self::configure(surface, (0, 0), vec![XdgState::Activated]),
            WaylandEvent::Frame { surface },
        ]
    }

    fn respond(&mut self, surface: SurfaceId, request: &WindowRequest) -> Vec<WaylandEvent> {
        match request {
            WindowRequest::Size((width, height)) => {
                self.size = (*width as i32, *height as i32);
                vec![Self::configure(surface, self.size, vec![])]
            }
            WindowRequest::State(ToplevelState::Maximized) => {
                vec![Self::configure(surface, OUTPUT, vec![XdgState::Maximized])]
            }
            WindowRequest::State(ToplevelState::Fullscreen) => {
                vec![Self::configure(surface, OUTPUT, vec![XdgState::Fullscreen])]
            }
            WindowRequest::State(ToplevelState::Normal) => {
                vec![Self::configure(surface, self.size, vec![])]
            }
            WindowRequest::Refresh => vec![WaylandEvent::Frame { surface }],
            _ => Vec::new(),
        }
    }
}

type WaylandLoopback = LoopbackConnection<WaylandEvent, SurfaceId>;

fn connect() -> (
    NativeAppContext<WaylandLoopback, WaylandTranslator>,
    LoopbackInjector<WaylandEvent>,
) {
    let (connection, injector) = WaylandLoopback::new(capabilities());
    let connection = connection.with_responder(Compositor::default());
    (
        NativeAppContext::new("wayland", connection, WaylandTranslator::default()),
        injector,
    )
}

#[test]
fn test_configure_round_trip() {
    let (mut app, _injector) = connect();
    let recorder = Arc::new(Recorder::default());
    let window = app
        .create_window_context(
            WindowSettings::default()
                .with_size(800, 600)
                .with_handler(handler_ref(&recorder)),
        )
        .unwrap();
    assert!(app.dispatch_events());
    let created = recorder.take();
    assert!(matches!(created[..], [EventKind::Show { shown: true }, EventKind::Draw]));

    window.set_size((1024, 768));
    window.maximize();
    assert!(app.dispatch_events());
    let kinds = recorder.take();
    assert!(matches!(kinds[0], EventKind::Size { size: (1024, 768) }));
    assert!(matches!(kinds[1], EventKind::Size { size: (1920, 1080) }));
    assert!(matches!(
        kinds[2],
        EventKind::State {
            state: ToplevelState::Maximized
        }
    ));
    assert_eq!(kinds.len(), 3);

    window.normal_state();
    assert!(app.dispatch_events());
    let kinds = recorder.take();
    assert!(matches!(kinds[0], EventKind::Size { size: (1024, 768) }));
    assert!(matches!(
        kinds[1],
        EventKind::State {
            state: ToplevelState::Normal
        }
    ));
}

#[test]
fn test_pointer_focus_and_scroll() {
    let (mut app, injector) = connect();
    let recorder = Arc::new(Recorder::default());
    let window = app
        .create_window_context(WindowSettings::default().with_handler(handler_ref(&recorder)))
        .unwrap();
    let surface = window.native_handle() as SurfaceId;
    assert!(app.dispatch_events());
    recorder.take();

    injector.push_all([
        WaylandEvent::PointerEnter {
            surface,
            x: 5.0,
            y: 6.0,
        },
        WaylandEvent::PointerMotion { x: 40.5, y: 30.2 },
        WaylandEvent::PointerButton {
            button: BTN_LEFT,
            pressed: true,
        },
        WaylandEvent::PointerAxis {
            axis: Axis::VerticalScroll,
            value: 30.0,
        },
        WaylandEvent::PointerFrame,
    ]);
    assert!(app.dispatch_events());

    let kinds = recorder.take();
    assert!(matches!(
        kinds[..],
        [
            EventKind::MouseCross { entered: true, position: (5, 6) },
            EventKind::MouseMove { position: (40, 30), delta: (35, 24) },
            EventKind::MouseButton { button: MouseButton::Left, pressed: true, .. },
            EventKind::MouseWheel { value },
        ] if value == (0.0, -3.0)
    ));

    let mouse = app.mouse_context().unwrap();
    assert_eq!(mouse.over(), Some(window.native_handle()));
    assert!(mouse.pressed(MouseButton::Left));
    assert_eq!(mouse.position(), (40, 30));
}

#[test]
fn test_keyboard_focus_addresses_keys() {
    let (mut app, injector) = connect();
    let recorder = Arc::new(Recorder::default());
    let window = app
        .create_window_context(WindowSettings::default().with_handler(handler_ref(&recorder)))
        .unwrap();
    let surface = window.native_handle() as SurfaceId;

    injector.push_all([
        WaylandEvent::KeyboardEnter {
            surface,
            keys: Vec::new(),
        },
        WaylandEvent::Key {
            key: 57,
            pressed: true,
            text: Some(" ".to_string()),
        },
    ]);
    assert!(app.dispatch_events());
    let keyboard = app.keyboard_context().unwrap();
    assert!(keyboard.pressed(Keycode::Space));
    assert_eq!(keyboard.focus(), Some(window.native_handle()));

    injector.push(WaylandEvent::XdgClose { surface });
    assert!(app.dispatch_events());
    assert!(matches!(recorder.take().last(), Some(EventKind::Close)));
}

#[test]
fn test_backend_reports_wayland_extensions() {
    let backend = ny_platform_wayland::backend(|_config: &PlatformConfig| {
        let (connection, _injector) = WaylandLoopback::new(capabilities());
        Ok(connection.with_vulkan_extensions(VULKAN_EXTENSIONS.to_vec()))
    });
    assert_eq!(backend.name(), "wayland");
    assert_eq!(backend.priority(), 20);

    let app = backend
        .create_app_context(&PlatformConfig::default())
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(app.backend_name(), "wayland");
    assert_eq!(
        app.vulkan_extensions(),
        vec!["VK_KHR_surface", "VK_KHR_wayland_surface"]
    );
}
