//! Queued, thread-safe event dispatch
//!
//! [`ThreadedEventDispatcher`] accepts events from any thread and delivers
//! them on whichever thread drains it, either with [`process_events`] or in
//! the blocking [`process_loop`].
//!
//! Ordering is FIFO except for coalescing: an overrideable event replaces the
//! first queued event of the same type in place. The replacement inherits the
//! replaced entry's queue position *and* its waiters, so a `dispatch_sync` or
//! `sync` barrier tied to the replaced event resolves once the replacement has
//! been delivered.
//!
//! [`process_events`]: ThreadedEventDispatcher::process_events
//! [`process_loop`]: ThreadedEventDispatcher::process_loop

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::thread::{self, ThreadId};

use smallvec::SmallVec;
use tokio::sync::oneshot;

use crate::dispatcher::{deliver, CallbackId, CallbackTable, Dispatcher};
use crate::error::{CoreError, Result};
use crate::event::{Event, EventType};
use crate::handler::{same_handler, HandlerRef};
use crate::loop_control::{LoopControl, LoopInterface, LoopThunk};

/// Called on every queue insertion, used to wake a native wait primitive
pub type WakeHook = Arc<dyn Fn() + Send + Sync>;

enum Waiter {
    /// `dispatch_sync` caller, told whether the handler consumed the event
    Delivered(oneshot::Sender<bool>),
    /// `sync` barrier
    Barrier(oneshot::Sender<()>),
}

impl Waiter {
    fn resolve(self, handled: bool) {
        // Receivers may have given up waiting; that is fine.
        match self {
            Waiter::Delivered(tx) => {
                let _ = tx.send(handled);
            }
            Waiter::Barrier(tx) => {
                let _ = tx.send(());
            }
        }
    }
}

struct Entry {
    event: Event,
    waiters: SmallVec<[Waiter; 1]>,
}

#[derive(Default)]
struct QueueState {
    queue: VecDeque<Entry>,
    idle_waiters: Vec<oneshot::Sender<()>>,
    in_flight: usize,
    loop_thread: Option<ThreadId>,
    wake_hook: Option<WakeHook>,
}

impl QueueState {
    fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.in_flight == 0
    }

    fn resolve_idle(&mut self) {
        if self.is_idle() {
            for tx in self.idle_waiters.drain(..) {
                let _ = tx.send(());
            }
        }
    }
}

#[derive(Default)]
struct Shared {
    state: Mutex<QueueState>,
    cond: Condvar,
    callbacks: CallbackTable,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Thread-safe FIFO event queue with coalescing
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct ThreadedEventDispatcher {
    shared: Arc<Shared>,
}

impl ThreadedEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for one event type
    pub fn on_event<F>(&self, event_type: EventType, callback: F) -> CallbackId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.shared.callbacks.add(event_type, Arc::new(callback))
    }

    /// Unregister an observer, returns false if it was not registered
    pub fn remove_callback(&self, id: CallbackId) -> bool {
        self.shared.callbacks.remove(id)
    }

    /// Install a hook run after every insertion, next to the condvar signal.
    ///
    /// Native loops that drain this queue set it to wake their own wait primitive.
    pub fn set_wake_hook(&self, hook: Option<WakeHook>) {
        self.shared.lock().wake_hook = hook;
    }

    /// Mark the calling thread as the one draining this queue until the
    /// binding is dropped, so `dispatch_sync` from it is rejected.
    ///
    /// [`process_loop`](Self::process_loop) does this itself; native loops
    /// that call [`process_events`](Self::process_events) use it instead.
    pub fn bind_loop_thread(&self) -> LoopThreadBinding {
        self.shared.lock().loop_thread = Some(thread::current().id());
        LoopThreadBinding {
            shared: self.shared.clone(),
        }
    }

    /// Number of undelivered events
    pub fn len(&self) -> usize {
        self.shared.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().queue.is_empty()
    }

    /// Queue `event` and block until the loop thread has delivered it.
    ///
    /// Returns whether the handler consumed the event. Calling this from the
    /// thread running [`process_loop`](Self::process_loop) fails with
    /// [`CoreError::WouldDeadlock`]. If no thread drains the queue this never
    /// returns.
    pub fn dispatch_sync(&self, event: Event) -> Result<bool> {
        if self.shared.lock().loop_thread == Some(thread::current().id()) {
            tracing::error!("dispatch_sync called from the dispatch loop thread");
            return Err(CoreError::WouldDeadlock);
        }

        let (tx, rx) = oneshot::channel();
        self.enqueue(event, Some(Waiter::Delivered(tx)));
        pollster::block_on(rx).map_err(|_| CoreError::Disconnected)
    }

    /// Resolves once every event queued at the time of the call was delivered
    ///
    /// An event already being delivered is not queued, so `sync` from inside
    /// a handler with nothing else pending resolves immediately.
    pub fn sync(&self) -> Completion {
        let (tx, rx) = oneshot::channel();
        let mut state = self.shared.lock();
        match state.queue.back_mut() {
            Some(last) => last.waiters.push(Waiter::Barrier(tx)),
            None => {
                let _ = tx.send(());
            }
        }
        Completion::new(rx)
    }

    /// Resolves the next time the queue is completely drained
    pub fn wait_idle(&self) -> Completion {
        let (tx, rx) = oneshot::channel();
        let mut state = self.shared.lock();
        if state.is_idle() {
            let _ = tx.send(());
        } else {
            state.idle_waiters.push(tx);
        }
        Completion::new(rx)
    }

    /// Drop every queued event aimed at `handler`, returning how many were removed.
    ///
    /// `dispatch_sync` callers waiting on a removed event get
    /// [`CoreError::Disconnected`]; `sync` barriers move to the previous event.
    pub fn purge(&self, handler: &HandlerRef) -> usize {
        let mut state = self.shared.lock();
        let mut removed = 0;
        let mut kept: VecDeque<Entry> = VecDeque::with_capacity(state.queue.len());

        for entry in state.queue.drain(..) {
            let targeted = entry
                .event
                .handler
                .as_ref()
                .is_some_and(|target| same_handler(target, handler));
            if !targeted {
                kept.push_back(entry);
                continue;
            }

            removed += 1;
            for waiter in entry.waiters {
                if let Waiter::Barrier(tx) = waiter {
                    match kept.back_mut() {
                        Some(previous) => previous.waiters.push(Waiter::Barrier(tx)),
                        None => {
                            let _ = tx.send(());
                        }
                    }
                }
            }
        }

        state.queue = kept;
        state.resolve_idle();
        if removed > 0 {
            tracing::debug!(removed, "purged queued events for dropped handler");
        }
        removed
    }

    /// Deliver everything currently queued on this thread and return
    ///
    /// Events dispatched by handlers during the drain are delivered too.
    pub fn process_events(&self) {
        loop {
            let entry = {
                let mut state = self.shared.lock();
                match state.queue.pop_front() {
                    Some(entry) => {
                        state.in_flight += 1;
                        entry
                    }
                    None => {
                        state.resolve_idle();
                        return;
                    }
                }
            };
            self.deliver_entry(entry);
        }
    }

    /// Deliver events on this thread until `control` is stopped
    ///
    /// Blocks on the queue's condition variable while it is empty.
    pub fn process_loop(&self, control: &LoopControl) -> Result<()> {
        let interface = Arc::new(QueueLoop {
            shared: self.shared.clone(),
            stopped: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            calls: Mutex::new(VecDeque::new()),
        });
        let _guard = control.attach(interface.clone())?;

        let mut state = self.shared.lock();
        state.loop_thread = Some(thread::current().id());

        loop {
            if interface.stopped.load(Ordering::SeqCst) {
                break;
            }

            if let Some(thunk) = interface.next_call() {
                drop(state);
                thunk();
                state = self.shared.lock();
                continue;
            }

            if let Some(entry) = state.queue.pop_front() {
                state.in_flight += 1;
                drop(state);
                self.deliver_entry(entry);
                state = self.shared.lock();
                continue;
            }

            state.resolve_idle();
            state = self
                .shared
                .cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.loop_thread = None;
        interface.finished.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn enqueue(&self, event: Event, waiter: Option<Waiter>) {
        let hook = {
            let mut state = self.shared.lock();
            let event_type = event.event_type();
            let replace = if event.overrideable() {
                state
                    .queue
                    .iter()
                    .position(|entry| entry.event.event_type() == event_type)
            } else {
                None
            };

            match replace {
                Some(index) => {
                    tracing::trace!(event_type, index, "coalescing queued event");
                    let entry = &mut state.queue[index];
                    entry.event = event;
                    entry.waiters.extend(waiter);
                }
                None => state.queue.push_back(Entry {
                    event,
                    waiters: waiter.into_iter().collect(),
                }),
            }
            state.wake_hook.clone()
        };

        self.shared.cond.notify_one();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn deliver_entry(&self, entry: Entry) {
        let _in_flight = InFlight {
            shared: &self.shared,
        };
        let handled = deliver(&entry.event, &self.shared.callbacks);
        for waiter in entry.waiters {
            waiter.resolve(handled);
        }
        drop(entry.event);
    }
}

impl Dispatcher for ThreadedEventDispatcher {
    /// Queue `event` for later delivery. Never blocks on delivery.
    fn dispatch(&self, event: Event) {
        self.enqueue(event, None);
    }
}

impl fmt::Debug for ThreadedEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("ThreadedEventDispatcher")
            .field("queued", &state.queue.len())
            .field("in_flight", &state.in_flight)
            .field("looping", &state.loop_thread.is_some())
            .finish()
    }
}

/// Accounts for one popped entry until its delivery ends, panicking or not
struct InFlight<'a> {
    shared: &'a Shared,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.in_flight -= 1;
        state.resolve_idle();
    }
}

/// Returned by [`ThreadedEventDispatcher::bind_loop_thread`]
#[must_use = "the binding is released when dropped"]
pub struct LoopThreadBinding {
    shared: Arc<Shared>,
}

impl Drop for LoopThreadBinding {
    fn drop(&mut self) {
        self.shared.lock().loop_thread = None;
    }
}

impl fmt::Debug for LoopThreadBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopThreadBinding").finish_non_exhaustive()
    }
}

/// The [`LoopInterface`] attached while `process_loop` runs
struct QueueLoop {
    shared: Arc<Shared>,
    stopped: AtomicBool,
    finished: AtomicBool,
    calls: Mutex<VecDeque<LoopThunk>>,
}

impl QueueLoop {
    fn next_call(&self) -> Option<LoopThunk> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn wake(&self) {
        // Taking the lock orders the wakeup after the loop's last check.
        let _state = self.shared.lock();
        self.shared.cond.notify_all();
    }
}

impl LoopInterface for QueueLoop {
    fn stop(&self) -> bool {
        if self.finished.load(Ordering::SeqCst) {
            return false;
        }
        self.stopped.store(true, Ordering::SeqCst);
        self.wake();
        true
    }

    fn call(&self, thunk: LoopThunk) -> bool {
        if self.finished.load(Ordering::SeqCst) || self.stopped.load(Ordering::SeqCst) {
            return false;
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(thunk);
        self.wake();
        true
    }
}

/// Future resolved by `sync()` / `wait_idle()`
///
/// Resolves to `true` once the barrier is reached, or `false` if the
/// dispatcher was dropped first.
pub struct Completion {
    rx: oneshot::Receiver<()>,
    done: Option<bool>,
}

impl Completion {
    fn new(rx: oneshot::Receiver<()>) -> Self {
        Self { rx, done: None }
    }

    /// Block the calling thread until resolved
    pub fn wait(self) -> bool {
        pollster::block_on(self)
    }

    /// Non-blocking check, `None` while still pending
    pub fn try_complete(&mut self) -> Option<bool> {
        if self.done.is_none() {
            self.done = match self.rx.try_recv() {
                Ok(()) => Some(true),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => Some(false),
            };
        }
        self.done
    }
}

impl Future for Completion {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        if let Some(done) = self.done {
            return Poll::Ready(done);
        }
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(result) => {
                let done = result.is_ok();
                self.done = Some(done);
                Poll::Ready(done)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("done", &self.done)
            .finish()
    }
}
