//! Paging lock and wraparound correction over the virtual sequence.
//!
//! With N real pages the carousel positions itself on a virtual sequence of
//! N+2 slots: slot 0 clones the last real page, slots 1..=N are the real
//! pages, slot N+1 clones the first. Animating onto a clone slot and then
//! snapping to the matching real slot with animation disabled fakes an
//! infinite loop without ever rendering a visible jump.

use crate::gesture::Direction;

/// How the render layer should move between positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionStyle {
    /// Animate position changes over the configured duration.
    Animated,
    /// Apply position changes instantly.
    None,
}

/// Result of a lock release that landed on a clone slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapSnap {
    /// Real slot the position was snapped to (1 or N).
    pub to: usize,
}

/// Owns the current virtual slot and the transition lock.
///
/// Exactly one advance is accepted per lock interval; further gestures are
/// shed until the release timer fires. Timer scheduling belongs to the
/// caller; this is the pure state machine.
#[derive(Clone, Debug)]
pub struct TransitionController {
    page_count: usize,
    current_page: usize,
    locked: bool,
}

impl TransitionController {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            // Slot 1 is the first real page; an empty carousel never pages.
            current_page: if page_count == 0 { 0 } else { 1 },
            locked: false,
        }
    }

    /// Current slot in the virtual sequence, in `[0, N+1]`.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Real page index shown at the current slot; clone slots map to the
    /// real page they duplicate. `None` when the carousel is empty.
    pub fn current_real_index(&self) -> Option<usize> {
        if self.page_count == 0 {
            return None;
        }
        Some(match self.current_page {
            0 => self.page_count - 1,
            page if page == self.page_count + 1 => 0,
            page => page - 1,
        })
    }

    /// Attempts to commit one page change.
    ///
    /// Returns `false`, with no state change, when the carousel is empty
    /// or a transition is already in progress. On `true` the lock is held
    /// and the caller must start the release timer.
    pub fn advance(&mut self, direction: Direction) -> bool {
        if self.page_count == 0 {
            return false;
        }
        if self.locked {
            log::trace!("advance {:?} shed: transition in progress", direction);
            return false;
        }

        self.locked = true;
        match direction {
            Direction::Forward => self.current_page += 1,
            Direction::Backward => self.current_page -= 1,
        }
        log::debug!("advance {:?} -> slot {}", direction, self.current_page);
        true
    }

    /// Releases the lock when the release timer fires.
    ///
    /// If the position landed on a clone slot it is snapped to the matching
    /// real slot and `Some(WrapSnap)` is returned; the caller must suppress
    /// animation for the snap and restore it shortly after.
    pub fn release(&mut self) -> Option<WrapSnap> {
        self.locked = false;

        if self.current_page == self.page_count + 1 {
            self.current_page = 1;
        } else if self.current_page == 0 {
            self.current_page = self.page_count;
        } else {
            return None;
        }

        log::debug!("wraparound snap -> slot {}", self.current_page);
        Some(WrapSnap {
            to: self.current_page,
        })
    }
}
