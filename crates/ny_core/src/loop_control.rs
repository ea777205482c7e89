//! Cross-thread control of a running dispatch loop
//!
//! A [`LoopControl`] is created by the caller before a loop starts. The loop
//! attaches its own [`LoopInterface`] for as long as it runs, which lets any
//! thread stop it or schedule work on it.
//!
//! A `stop()` that arrives before the loop has attached is not remembered.
//! Callers that need "stop as soon as possible" semantics should stop from a
//! handler or through [`LoopControl::call`] once the loop is running.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{CoreError, Result};

/// Work scheduled onto the loop thread
pub type LoopThunk = Box<dyn FnOnce() + Send>;

/// Implemented by each dispatch loop and attached to a [`LoopControl`] while it runs
pub trait LoopInterface: Send + Sync {
    /// Ask the loop to exit after its current step, waking it if it is blocked.
    /// Returns false if the loop has already finished.
    fn stop(&self) -> bool;

    /// Run `thunk` on the loop thread. Returns false if the loop has already finished.
    fn call(&self, thunk: LoopThunk) -> bool;
}

/// Cancellation token for a running dispatch loop
///
/// Clones share the same attachment slot, so a clone can be moved to another
/// thread and used to stop the loop that borrows the original.
#[derive(Clone, Default)]
pub struct LoopControl {
    impl_: Arc<Mutex<Option<Arc<dyn LoopInterface>>>>,
}

impl LoopControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the attached loop. Returns false if no loop is attached.
    pub fn stop(&self) -> bool {
        match self.current() {
            Some(interface) => interface.stop(),
            None => false,
        }
    }

    /// Run `thunk` on the thread owning the attached loop.
    /// Returns false (and drops `thunk`) if no loop is attached.
    pub fn call<F>(&self, thunk: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.current() {
            Some(interface) => interface.call(Box::new(thunk)),
            None => false,
        }
    }

    /// Whether a loop is currently attached
    pub fn is_attached(&self) -> bool {
        self.slot().is_some()
    }

    /// Attach a loop. Fails if another loop is attached.
    ///
    /// The returned guard detaches the loop again when dropped.
    pub fn attach(&self, interface: Arc<dyn LoopInterface>) -> Result<LoopGuard> {
        let mut slot = self.slot();
        if slot.is_some() {
            return Err(CoreError::LoopAttached);
        }
        *slot = Some(interface);
        tracing::debug!("dispatch loop attached");
        Ok(LoopGuard {
            control: self.clone(),
        })
    }

    fn current(&self) -> Option<Arc<dyn LoopInterface>> {
        // Clone out of the lock so `stop()` never runs under it.
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn LoopInterface>>> {
        self.impl_.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for LoopControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopControl")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Keeps a loop attached to its [`LoopControl`]
#[must_use = "the loop detaches when the guard is dropped"]
pub struct LoopGuard {
    control: LoopControl,
}

impl Drop for LoopGuard {
    fn drop(&mut self) {
        self.control.slot().take();
        tracing::debug!("dispatch loop detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLoop {
        stops: AtomicUsize,
        calls: AtomicUsize,
    }

    impl LoopInterface for CountingLoop {
        fn stop(&self) -> bool {
            self.stops.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn call(&self, thunk: LoopThunk) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thunk();
            true
        }
    }

    #[test]
    fn test_stop_without_loop_fails() {
        let control = LoopControl::new();
        assert!(!control.is_attached());
        assert!(!control.stop());
        assert!(!control.call(|| {}));
    }

    #[test]
    fn test_attach_forwards_until_guard_drops() {
        let control = LoopControl::new();
        let interface = Arc::new(CountingLoop::default());

        let guard = control.attach(interface.clone()).expect("attach");
        assert!(control.is_attached());
        assert!(control.stop());
        assert!(control.call(|| {}));
        assert_eq!(interface.stops.load(Ordering::SeqCst), 1);
        assert_eq!(interface.calls.load(Ordering::SeqCst), 1);

        drop(guard);
        assert!(!control.stop());
        assert_eq!(interface.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_only_one_loop_at_a_time() {
        let control = LoopControl::new();
        let _guard = control
            .attach(Arc::new(CountingLoop::default()))
            .expect("first attach");
        assert_eq!(
            control.attach(Arc::new(CountingLoop::default())).err(),
            Some(CoreError::LoopAttached)
        );
    }

    #[test]
    fn test_control_is_reusable() {
        let control = LoopControl::new();
        for _ in 0..3 {
            let guard = control
                .attach(Arc::new(CountingLoop::default()))
                .expect("attach");
            assert!(control.stop());
            drop(guard);
            assert!(!control.is_attached());
        }
    }

    #[test]
    fn test_clones_share_the_slot() {
        let control = LoopControl::new();
        let remote = control.clone();
        let _guard = control
            .attach(Arc::new(CountingLoop::default()))
            .expect("attach");
        assert!(remote.is_attached());
        assert!(remote.stop());
    }
}
