//! Deterministic virtual-clock scheduler.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use rondo_core::{Scheduler, SchedulerHandle, TimerToken};

type Callback = Box<dyn FnOnce()>;

#[derive(Default)]
struct TestSchedulerCore {
    now_ms: u64,
    next_id: u64,
    /// Pending timers keyed by (due time, sequence): same-deadline timers
    /// fire in scheduling order.
    queue: BTreeMap<(u64, u64), (TimerToken, Callback)>,
    lookup: HashMap<TimerToken, (u64, u64)>,
}

/// A [`Scheduler`] driven by a manually advanced virtual clock.
///
/// Timers fire only inside [`TestScheduler::advance`], in deadline order,
/// with the clock set to each timer's due time while its callback runs.
/// Callbacks may schedule and cancel further timers; zero-delay timers
/// scheduled during an advance fire within that same advance.
#[derive(Clone, Default)]
pub struct TestScheduler {
    inner: Rc<RefCell<TestSchedulerCore>>,
}

impl TestScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`SchedulerHandle`] backed by this scheduler.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle::new(self.clone())
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Number of timers still pending.
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Advances the clock by `ms`, firing every timer that comes due.
    ///
    /// The internal borrow is released before each callback runs; callbacks
    /// are free to re-enter the scheduler.
    pub fn advance(&self, ms: u64) {
        let target = self.inner.borrow().now_ms + ms;
        loop {
            let fired = {
                let mut core = self.inner.borrow_mut();
                match core.queue.first_key_value().map(|(key, _)| *key) {
                    Some(key) if key.0 <= target => {
                        core.now_ms = core.now_ms.max(key.0);
                        core.queue.remove(&key).map(|(token, callback)| {
                            core.lookup.remove(&token);
                            callback
                        })
                    }
                    _ => None,
                }
            };
            match fired {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.inner.borrow_mut().now_ms = target;
    }
}

impl Scheduler for TestScheduler {
    fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerToken {
        let mut core = self.inner.borrow_mut();
        core.next_id += 1;
        let token = TimerToken::from_raw(core.next_id);
        let key = (core.now_ms + delay_ms, core.next_id);
        core.queue.insert(key, (token, callback));
        core.lookup.insert(token, key);
        token
    }

    fn cancel(&self, token: TimerToken) {
        let mut core = self.inner.borrow_mut();
        if let Some(key) = core.lookup.remove(&token) {
            core.queue.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl Fn(u32) -> Callback) {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        let make = move |id: u32| -> Callback {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(id))
        };
        (fired, make)
    }

    #[test]
    fn fires_in_deadline_order() {
        let scheduler = TestScheduler::new();
        let (fired, make) = recorder();
        scheduler.schedule(20, make(2));
        scheduler.schedule(10, make(1));
        scheduler.schedule(30, make(3));

        scheduler.advance(25);
        assert_eq!(*fired.borrow(), vec![1, 2]);
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(5);
        assert_eq!(*fired.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn same_deadline_fires_in_schedule_order() {
        let scheduler = TestScheduler::new();
        let (fired, make) = recorder();
        scheduler.schedule(10, make(1));
        scheduler.schedule(10, make(2));
        scheduler.advance(10);
        assert_eq!(*fired.borrow(), vec![1, 2]);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let scheduler = TestScheduler::new();
        let (fired, make) = recorder();
        let token = scheduler.schedule(10, make(1));
        scheduler.cancel(token);
        scheduler.advance(100);
        assert!(fired.borrow().is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn callbacks_can_schedule_followups() {
        let scheduler = TestScheduler::new();
        let (fired, make) = recorder();
        let chained = scheduler.clone();
        let mut followup = Some(make(2));
        scheduler.schedule(
            10,
            Box::new(move || {
                if let Some(callback) = followup.take() {
                    chained.schedule(5, callback);
                }
            }),
        );
        scheduler.advance(15);
        assert_eq!(*fired.borrow(), vec![2]);
        assert_eq!(scheduler.now_ms(), 15);
    }

    #[test]
    fn clock_matches_due_time_inside_callback() {
        let scheduler = TestScheduler::new();
        let observed = Rc::new(RefCell::new(0));
        let probe = scheduler.clone();
        let sink = Rc::clone(&observed);
        scheduler.schedule(
            40,
            Box::new(move || {
                *sink.borrow_mut() = probe.now_ms();
            }),
        );
        scheduler.advance(100);
        assert_eq!(*observed.borrow(), 40);
        assert_eq!(scheduler.now_ms(), 100);
    }
}
