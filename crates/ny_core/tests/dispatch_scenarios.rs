//! End-to-end dispatch scenarios
//!
//! These tests verify that:
//! - Synchronous dispatch delivers before returning
//! - Queued dispatch preserves FIFO order apart from in-place coalescing
//! - Barriers, stop and undeliverable events behave across threads

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use ny_core::{
    Dispatcher, Event, EventDispatcher, EventHandler, EventKind, LoopControl,
    ThreadedEventDispatcher,
};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Default)]
struct TestWindow {
    closed: AtomicBool,
    sizes: Mutex<Vec<(u32, u32)>>,
    handled: Mutex<Vec<EventKind>>,
}

impl EventHandler for TestWindow {
    fn handle_event(&self, event: &Event) -> bool {
        self.handled.lock().unwrap().push(event.kind.clone());
        match event.kind {
            EventKind::Close => {
                self.closed.store(true, Ordering::SeqCst);
                true
            }
            EventKind::Size { size } => {
                self.sizes.lock().unwrap().push(size);
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// A close event reaches the window before `dispatch` returns
#[test]
fn test_sync_dispatch_close() {
    let dispatcher = EventDispatcher::new();
    let window = Arc::new(TestWindow::default());

    dispatcher.dispatch(Event::new(EventKind::Close).to(&window));

    assert!(window.closed.load(Ordering::SeqCst));
}

/// Rapid resizes are delivered once, with the last size
#[test]
fn test_rapid_resizes_coalesce() {
    let dispatcher = ThreadedEventDispatcher::new();
    let window = Arc::new(TestWindow::default());

    dispatcher.dispatch(Event::new(EventKind::Size { size: (800, 600) }).to(&window));
    dispatcher.dispatch(Event::new(EventKind::Size { size: (810, 610) }).to(&window));
    dispatcher.dispatch(Event::new(EventKind::Size { size: (820, 620) }).to(&window));
    dispatcher.process_events();

    assert_eq!(*window.sizes.lock().unwrap(), vec![(820, 620)]);
    assert_eq!(window.handled.lock().unwrap().len(), 1);
}

/// Stopping from another thread ends the loop in bounded time
#[test]
fn test_stop_from_another_thread() {
    let dispatcher = ThreadedEventDispatcher::new();
    let control = LoopControl::new();
    let window = Arc::new(TestWindow::default());

    let (done_tx, done_rx) = mpsc::channel();
    let loop_dispatcher = dispatcher.clone();
    let loop_control = control.clone();
    let worker = thread::spawn(move || {
        let result = loop_dispatcher.process_loop(&loop_control);
        done_tx.send(Instant::now()).unwrap();
        result
    });

    // The loop delivers while it runs.
    dispatcher
        .dispatch_sync(Event::new(EventKind::Size { size: (1, 1) }).to(&window))
        .expect("delivered by the loop thread");

    let stopped_at = Instant::now();
    assert!(control.stop());
    dispatcher.dispatch(Event::new(EventKind::Close).to(&window));

    let exited_at = done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("loop exits after stop");
    worker.join().unwrap().unwrap();

    assert!(exited_at.duration_since(stopped_at) < Duration::from_secs(5));
    assert!(!window.closed.load(Ordering::SeqCst));
    assert_eq!(dispatcher.len(), 1);
}

/// Barriers resolve across threads
#[test]
fn test_wait_idle_from_another_thread() {
    let dispatcher = ThreadedEventDispatcher::new();
    let window = Arc::new(TestWindow::default());
    for _ in 0..5 {
        dispatcher.dispatch(Event::new(EventKind::Close).to(&window));
    }
    let idle = dispatcher.wait_idle();

    let drain = dispatcher.clone();
    let worker = thread::spawn(move || drain.process_events());

    assert!(idle.wait());
    worker.join().unwrap();
    assert_eq!(window.handled.lock().unwrap().len(), 5);
}

/// Stop on an idle control, then twice on a running loop
#[test]
fn test_stop_is_idempotent() {
    let dispatcher = ThreadedEventDispatcher::new();
    let control = LoopControl::new();
    assert!(!control.stop());

    let loop_dispatcher = dispatcher.clone();
    let loop_control = control.clone();
    let worker = thread::spawn(move || loop_dispatcher.process_loop(&loop_control));
    while !control.is_attached() {
        thread::yield_now();
    }

    assert!(control.stop());
    let _ = control.stop();
    worker.join().unwrap().unwrap();
    assert!(!control.stop());

    // The same control drives a second run.
    let loop_dispatcher = dispatcher.clone();
    let loop_control = control.clone();
    let worker = thread::spawn(move || loop_dispatcher.process_loop(&loop_control));
    while !control.is_attached() {
        thread::yield_now();
    }
    assert!(control.stop());
    worker.join().unwrap().unwrap();
}

/// Events without a handler only show up in the log
#[test]
fn test_missing_handler_is_logged() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let sync = EventDispatcher::new();
        assert!(!sync.send(Event::new(EventKind::Close)));

        let queued = ThreadedEventDispatcher::new();
        queued.dispatch(Event::new(EventKind::Draw));
        queued.process_events();
    });

    let output = logs.contents();
    assert_eq!(output.matches("no event handler").count(), 2, "{}", output);
}
