//! Standard library backed runtime services for Rondo.
//!
//! Provides [`StdScheduler`], a wall-clock timer service for hosts that run
//! the carousel on their own event loop: timers go into a deadline heap and
//! fire when the host calls [`StdScheduler::pump`]. The host can sleep until
//! [`StdScheduler::next_deadline`] between pumps.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;

use rondo_core::{Scheduler, SchedulerHandle, TimerToken};
use web_time::{Duration, Instant};

struct Entry {
    deadline: Instant,
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the earliest deadline first;
        // same-deadline entries pop in scheduling order.
        other
            .deadline
            .cmp(&self.deadline)
            .then(other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct SchedulerCore {
    next_id: u64,
    queue: BinaryHeap<Entry>,
    callbacks: HashMap<u64, Box<dyn FnOnce()>>,
}

/// One-shot timer service over the standard clock.
///
/// Single-threaded and cooperative: nothing fires until the host pumps.
/// Cancellation removes the callback; its heap entry is discarded lazily.
#[derive(Clone, Default)]
pub struct StdScheduler {
    inner: Rc<RefCell<SchedulerCore>>,
}

impl StdScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`SchedulerHandle`] backed by this scheduler.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle::new(self.clone())
    }

    /// Fires every timer whose deadline has passed, in deadline order.
    /// Returns how many fired.
    ///
    /// The internal borrow is released before each callback runs; callbacks
    /// are free to schedule and cancel further timers.
    pub fn pump(&self) -> usize {
        let now = Instant::now();
        let mut fired = 0;
        loop {
            let callback = {
                let mut core = self.inner.borrow_mut();
                let due = core
                    .queue
                    .peek()
                    .map_or(false, |entry| entry.deadline <= now);
                if !due {
                    break;
                }
                core.queue
                    .pop()
                    .and_then(|entry| core.callbacks.remove(&entry.seq))
            };
            // A popped entry without a callback was cancelled; skip it.
            if let Some(callback) = callback {
                fired += 1;
                callback();
            }
        }
        if fired > 0 {
            log::trace!("pump fired {} timer(s)", fired);
        }
        fired
    }

    /// Deadline of the earliest live timer, if any. Lazily discards entries
    /// whose timers were cancelled.
    pub fn next_deadline(&self) -> Option<Instant> {
        let mut core = self.inner.borrow_mut();
        loop {
            let (seq, deadline) = core.queue.peek().map(|entry| (entry.seq, entry.deadline))?;
            if core.callbacks.contains_key(&seq) {
                return Some(deadline);
            }
            core.queue.pop();
        }
    }

    /// Whether no live timers remain.
    pub fn is_idle(&self) -> bool {
        self.inner.borrow().callbacks.is_empty()
    }
}

impl Scheduler for StdScheduler {
    fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerToken {
        let mut core = self.inner.borrow_mut();
        core.next_id += 1;
        let seq = core.next_id;
        core.queue.push(Entry {
            deadline: Instant::now() + Duration::from_millis(delay_ms),
            seq,
        });
        core.callbacks.insert(seq, callback);
        TimerToken::from_raw(seq)
    }

    fn cancel(&self, token: TimerToken) {
        self.inner.borrow_mut().callbacks.remove(&token.raw());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recording(scheduler: &StdScheduler, delay_ms: u64, id: u32) -> Rc<RefCell<Vec<u32>>> {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        scheduler.schedule(delay_ms, Box::new(move || sink.borrow_mut().push(id)));
        fired
    }

    #[test]
    fn due_timers_fire_on_pump() {
        let scheduler = StdScheduler::new();
        let fired = recording(&scheduler, 0, 1);

        assert!(!scheduler.is_idle());
        assert_eq!(scheduler.pump(), 1);
        assert_eq!(*fired.borrow(), vec![1]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn same_deadline_fires_in_schedule_order() {
        let scheduler = StdScheduler::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        for id in 1..=3u32 {
            let sink = Rc::clone(&fired);
            scheduler.schedule(0, Box::new(move || sink.borrow_mut().push(id)));
        }
        scheduler.pump();
        assert_eq!(*fired.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let scheduler = StdScheduler::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        let token = scheduler.schedule(0, Box::new(move || sink.borrow_mut().push(1u32)));
        scheduler.cancel(token);

        assert!(scheduler.is_idle());
        assert_eq!(scheduler.next_deadline(), None);
        assert_eq!(scheduler.pump(), 0);
        assert!(fired.borrow().is_empty());
    }

    #[test]
    fn next_deadline_skips_cancelled_entries() {
        let scheduler = StdScheduler::new();
        let sink = Rc::new(RefCell::new(Vec::new()));
        let early = {
            let sink = Rc::clone(&sink);
            scheduler.schedule(0, Box::new(move || sink.borrow_mut().push(1u32)))
        };
        let far = Instant::now();
        {
            let sink = Rc::clone(&sink);
            scheduler.schedule(60_000, Box::new(move || sink.borrow_mut().push(2u32)));
        }
        scheduler.cancel(early);

        let deadline = scheduler.next_deadline().unwrap();
        assert!(deadline >= far + Duration::from_millis(59_000));
    }

    #[test]
    fn far_future_timers_stay_pending() {
        let scheduler = StdScheduler::new();
        let fired = recording(&scheduler, 60_000, 1);

        assert_eq!(scheduler.pump(), 0);
        assert!(fired.borrow().is_empty());
        assert!(!scheduler.is_idle());
    }

    #[test]
    fn callbacks_can_schedule_followups() {
        let scheduler = StdScheduler::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let chained = scheduler.clone();
        let sink = Rc::clone(&fired);
        scheduler.schedule(
            0,
            Box::new(move || {
                let sink = Rc::clone(&sink);
                chained.schedule(0, Box::new(move || sink.borrow_mut().push(2u32)));
            }),
        );

        // The follow-up's deadline lands after the first pump took its clock
        // snapshot, so it fires on the next pump.
        assert_eq!(scheduler.pump(), 1);
        assert_eq!(scheduler.pump(), 1);
        assert_eq!(*fired.borrow(), vec![2]);
    }
}
