//! X11 translation through a full app context
//!
//! A loopback connection plays the X server and window manager.

use std::sync::{Arc, Mutex};

use ny_core::{handler_ref, Event, EventHandler, EventKind, Keycode, ToplevelState};
use ny_platform::{
    AppContext, Backend, LoopbackConnection, LoopbackInjector, NativeAppContext, PlatformConfig,
    Responder, SurfaceType, WindowRequest, WindowSettings,
};
use ny_platform_x11::backend::{capabilities, VULKAN_EXTENSIONS};
use ny_platform_x11::{X11Connection, X11Event, X11Translator, XWindow};

#[derive(Default)]
struct Recorder {
    kinds: Mutex<Vec<EventKind>>,
}

impl EventHandler for Recorder {
    fn handle_event(&self, event: &Event) -> bool {
        self.kinds.lock().unwrap().push(event.kind.clone());
        true
    }
}

/// Window manager answering configure and state requests
#[derive(Default)]
struct WindowManager {
    geometry: (i16, i16, u16, u16),
}

impl Responder<X11Event, XWindow> for WindowManager {
    fn created(&mut self, window: XWindow, settings: &WindowSettings) -> Vec<X11Event> {
        self.geometry = (0, 0, settings.size.0 as u16, settings.size.1 as u16);
        vec![X11Event::MapNotify { window }]
    }

    fn respond(&mut self, window: XWindow, request: &WindowRequest) -> Vec<X11Event> {
        let (x, y, width, height) = &mut self.geometry;
        match request {
            WindowRequest::Size((w, h)) => {
                *width = *w as u16;
                *height = *h as u16;
            }
            WindowRequest::Position((px, py)) => {
                *x = *px as i16;
                *y = *py as i16;
            }
            WindowRequest::State(ToplevelState::Maximized) => {
                return vec![X11Event::NetWmState {
                    window,
                    maximized_horz: true,
                    maximized_vert: true,
                    fullscreen: false,
                    hidden: false,
                }]
            }
            WindowRequest::Hide => return vec![X11Event::UnmapNotify { window }],
            _ => return Vec::new(),
        }
        vec![X11Event::ConfigureNotify {
            window,
            x: *x,
            y: *y,
            width: *width,
            height: *height,
        }]
    }
}

type X11Loopback = LoopbackConnection<X11Event, XWindow>;

fn connect() -> (
    NativeAppContext<X11Loopback, X11Translator>,
    LoopbackInjector<X11Event>,
) {
    let (connection, injector) = X11Loopback::new(capabilities());
    let connection = connection
        .with_responder(WindowManager::default())
        .with_first_window(0x0040_0001);
    let translator = X11Translator::new(connection.atoms());
    (NativeAppContext::new("x11", connection, translator), injector)
}

#[test]
fn test_window_manager_round_trip() {
    let (mut app, injector) = connect();
    let recorder = Arc::new(Recorder::default());
    let window = app
        .create_window_context(
            WindowSettings::default()
                .with_size(640, 480)
                .with_handler(handler_ref(&recorder)),
        )
        .unwrap();
    assert_eq!(window.native_handle(), 0x0040_0001);

    window.set_size((700, 480));
    window.set_position((20, 30));
    window.maximize();
    assert!(app.dispatch_events());

    let kinds = recorder.kinds.lock().unwrap().clone();
    assert!(matches!(kinds[0], EventKind::Show { shown: true }));
    assert!(matches!(kinds[1], EventKind::Size { size: (700, 480) }));
    assert!(matches!(kinds[2], EventKind::Position { position: (20, 30) }));
    assert!(matches!(
        kinds[3],
        EventKind::State {
            state: ToplevelState::Maximized
        }
    ));
    assert_eq!(kinds.len(), 4);

    let atoms = app.connection().atoms();
    injector.push(X11Event::ClientMessage {
        window: 0x0040_0001,
        message_type: atoms.wm_protocols,
        data: [atoms.wm_delete_window, 0, 0, 0, 0],
    });
    assert!(app.dispatch_events());
    assert!(matches!(
        recorder.kinds.lock().unwrap().last(),
        Some(EventKind::Close)
    ));
}

#[test]
fn test_keyboard_context_tracks_x_keys() {
    let (mut app, injector) = connect();
    let recorder = Arc::new(Recorder::default());
    let window = app
        .create_window_context(WindowSettings::default().with_handler(handler_ref(&recorder)))
        .unwrap();
    let id = window.native_handle() as XWindow;

    injector.push_all([
        X11Event::FocusIn { window: id },
        X11Event::KeyPress {
            window: id,
            detail: 65,
            state: 0,
            text: Some(" ".to_string()),
        },
    ]);
    assert!(app.dispatch_events());

    let keyboard = app.keyboard_context().unwrap();
    assert!(keyboard.pressed(Keycode::Space));
    assert_eq!(keyboard.focus(), Some(window.native_handle()));

    injector.push(X11Event::FocusOut { window: id });
    assert!(app.dispatch_events());
    assert!(!app.keyboard_context().unwrap().pressed(Keycode::Space));
}

#[test]
fn test_backend_opens_contexts_through_connector() {
    let backend = ny_platform_x11::backend(|_config: &PlatformConfig| {
        let (connection, _injector) = X11Loopback::new(capabilities());
        Ok(connection.with_vulkan_extensions(VULKAN_EXTENSIONS.to_vec()))
    });
    assert_eq!(backend.name(), "x11");

    let mut app = backend
        .create_app_context(&PlatformConfig::default())
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(app.backend_name(), "x11");
    assert_eq!(
        app.vulkan_extensions(),
        vec!["VK_KHR_surface", "VK_KHR_xcb_surface"]
    );

    let mut settings = WindowSettings::default().with_surface(SurfaceType::Gl);
    settings.gl.config = Some(0x21);
    let window = app.create_window_context(settings).unwrap();
    assert!(matches!(
        window.surface(),
        ny_platform::Surface::Gl(gl) if gl.config == 0x21
    ));
}
