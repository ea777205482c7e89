//! Headless Loop Demo
//!
//! Opens a headless app context, feeds it input from a second thread and
//! runs the threaded dispatch loop until the window is closed.
//!
//! Run with:
//! `RUST_LOG=debug cargo run -p ny_platform --example headless_loop`

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ny_core::{
    handler_ref, Dispatcher, Event, EventHandler, EventKind, Keycode, KeyboardModifiers,
    LoopControl, ThreadedEventDispatcher,
};
use ny_platform::headless::{self, HeadlessEvent};
use ny_platform::{AppContext, PlatformConfig};
use tracing_subscriber::EnvFilter;

struct DemoWindow {
    control: LoopControl,
    keys: AtomicU32,
}

impl EventHandler for DemoWindow {
    fn handle_event(&self, event: &Event) -> bool {
        match &event.kind {
            EventKind::Size { size } => tracing::info!(?size, "resized"),
            EventKind::Key {
                keycode,
                pressed: true,
                ..
            } => {
                self.keys.fetch_add(1, Ordering::SeqCst);
                tracing::info!(?keycode, "key pressed");
            }
            EventKind::Close => {
                tracing::info!(keys = self.keys.load(Ordering::SeqCst), "closing");
                let _ = self.control.stop();
            }
            _ => return false,
        }
        true
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = PlatformConfig::from_env();
    tracing::info!(backend = ?config.backend, "configuration loaded");

    let (mut app, injector) = headless::connect();
    let control = LoopControl::new();
    let dispatcher = ThreadedEventDispatcher::new();

    let demo = Arc::new(DemoWindow {
        control: control.clone(),
        keys: AtomicU32::new(0),
    });
    let window = app.create_window_context(
        config
            .window
            .with_title("headless demo")
            .with_handler(handler_ref(&demo)),
    )?;
    window.set_size((1024, 768));
    let id = window.native_handle();

    // Native input from one thread, app events from another.
    let input = thread::spawn(move || {
        for keycode in [Keycode::H, Keycode::I] {
            injector.push(HeadlessEvent::window(
                id,
                EventKind::Key {
                    keycode,
                    pressed: true,
                    text: None,
                    modifiers: KeyboardModifiers::empty(),
                    repeat: false,
                },
            ));
            thread::sleep(Duration::from_millis(20));
        }
    });
    let app_events = dispatcher.clone();
    let target = demo.clone();
    let closer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        app_events.dispatch(Event::new(EventKind::Close).to(&target));
    });

    let connected = app.threaded_dispatch_loop(&dispatcher, &control);
    input.join().ok();
    closer.join().ok();

    tracing::info!(connected, "loop finished");
    drop(window);
    Ok(())
}
