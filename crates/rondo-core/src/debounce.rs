//! Cancel-and-restart debouncing for event channels.
//!
//! A burst of calls inside the delay window collapses to a single invocation
//! with the last call's value; intermediate values are discarded, never
//! queued. Each debouncer owns at most one pending timer at a time.

use std::cell::Cell;
use std::rc::Rc;

use crate::platform::{SchedulerHandle, TimerToken};

/// Rate-limiting wrapper around an action.
///
/// Cloning yields another handle to the same debounce window, so a clone can
/// be moved into a host callback while the original stays with its owner.
pub struct Debouncer<T> {
    scheduler: SchedulerHandle,
    delay_ms: u64,
    pending: Rc<Cell<Option<TimerToken>>>,
    action: Rc<dyn Fn(T)>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
            delay_ms: self.delay_ms,
            pending: Rc::clone(&self.pending),
            action: Rc::clone(&self.action),
        }
    }
}

impl<T: 'static> Debouncer<T> {
    pub fn new(scheduler: SchedulerHandle, delay_ms: u64, action: impl Fn(T) + 'static) -> Self {
        Self {
            scheduler,
            delay_ms,
            pending: Rc::new(Cell::new(None)),
            action: Rc::new(action),
        }
    }

    /// Records `value` and restarts the delay window. The action runs with
    /// the most recent value once the window elapses without further calls.
    pub fn call(&self, value: T) {
        if let Some(token) = self.pending.take() {
            log::trace!("debounce: replacing pending timer {:?}", token);
            self.scheduler.cancel(token);
        }

        let pending = Rc::clone(&self.pending);
        let action = Rc::clone(&self.action);
        let token = self.scheduler.schedule(self.delay_ms, move || {
            pending.set(None);
            action(value);
        });
        self.pending.set(Some(token));
    }

    /// Drops any pending invocation without running it.
    pub fn cancel(&self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }
}
