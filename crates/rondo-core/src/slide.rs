//! Per-slide load/cache/retry state machine.
//!
//! Images load lazily: a page starts fetching only once it becomes
//! mount-eligible. Eligibility covers the current page and its neighbors
//! plus the two clone-pair pages, so the slides the loop illusion depends on
//! are always pre-loaded without eagerly fetching all N images. Once loaded
//! a page stays cached for the life of the carousel.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Load status of one real page.
///
/// `Loaded` is terminal and permanent; `Errored` leaves only through an
/// explicit retry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlideStatus {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    Errored,
}

/// Tracks load status and mount eligibility for every real page.
#[derive(Clone, Debug)]
pub struct SlideCache {
    page_count: usize,
    statuses: FxHashMap<usize, SlideStatus>,
    /// Pages whose visual is held unmounted during a retry pulse.
    remounting: FxHashSet<usize>,
}

impl SlideCache {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            statuses: FxHashMap::default(),
            remounting: FxHashSet::default(),
        }
    }

    pub fn status(&self, page: usize) -> SlideStatus {
        self.statuses.get(&page).copied().unwrap_or_default()
    }

    /// Whether `page` is render-eligible for the given current real index:
    /// already loaded, one of the two clone-pair pages, or adjacent to the
    /// current page.
    pub fn eligible(&self, page: usize, current_real: Option<usize>) -> bool {
        if page >= self.page_count {
            return false;
        }
        if self.status(page) == SlideStatus::Loaded {
            return true;
        }
        if page == 0 || page == self.page_count - 1 {
            return true;
        }
        match current_real {
            Some(current) => page.abs_diff(current) <= 1,
            None => false,
        }
    }

    /// Whether the slide's visual element should be mounted right now. A
    /// page inside a retry remount pulse stays unmounted for one tick.
    pub fn mounted(&self, page: usize, current_real: Option<usize>) -> bool {
        self.eligible(page, current_real) && !self.remounting.contains(&page)
    }

    /// Moves every eligible, still-unloaded page to `Loading` and returns
    /// the pages a load request must be issued for. Call after every
    /// committed page change.
    pub fn sync(&mut self, current_real: Option<usize>) -> SmallVec<[usize; 4]> {
        let mut requests = SmallVec::new();
        for page in 0..self.page_count {
            if self.status(page) == SlideStatus::Unloaded && self.eligible(page, current_real) {
                self.statuses.insert(page, SlideStatus::Loading);
                requests.push(page);
            }
        }
        requests
    }

    /// Loader confirmation that a fetch began. Idempotent.
    pub fn load_started(&mut self, page: usize) {
        if page < self.page_count && self.status(page) == SlideStatus::Unloaded {
            self.statuses.insert(page, SlideStatus::Loading);
        }
    }

    /// Marks a page loaded. Terminal: the page never re-enters `Loading`
    /// and later failure signals for it are ignored.
    pub fn loaded(&mut self, page: usize) {
        if page < self.page_count {
            self.statuses.insert(page, SlideStatus::Loaded);
        }
    }

    /// Marks a page errored. Returns `false` when the signal is ignored
    /// (unknown page, or the page already loaded).
    pub fn failed(&mut self, page: usize) -> bool {
        if page >= self.page_count || self.status(page) == SlideStatus::Loaded {
            return false;
        }
        self.statuses.insert(page, SlideStatus::Errored);
        true
    }

    /// Starts a retry: only an errored page is accepted. The page moves back
    /// to `Loading` and its visual is held unmounted until
    /// [`SlideCache::complete_retry`] runs on the next scheduling tick.
    /// Re-assigning the same source to a failed element does not reliably
    /// re-trigger a fetch; the remount does.
    pub fn begin_retry(&mut self, page: usize) -> bool {
        if self.status(page) != SlideStatus::Errored {
            return false;
        }
        self.statuses.insert(page, SlideStatus::Loading);
        self.remounting.insert(page);
        true
    }

    /// Finishes the remount pulse. Returns `true` when a fresh load request
    /// must be issued for the page.
    pub fn complete_retry(&mut self, page: usize) -> bool {
        self.remounting.remove(&page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_pair_pages_are_always_eligible() {
        let cache = SlideCache::new(5);
        assert!(cache.eligible(0, Some(2)));
        assert!(cache.eligible(4, Some(2)));
        assert!(!cache.eligible(3, Some(0)));
    }

    #[test]
    fn neighbors_of_current_page_are_eligible() {
        let cache = SlideCache::new(7);
        assert!(cache.eligible(2, Some(3)));
        assert!(cache.eligible(3, Some(3)));
        assert!(cache.eligible(4, Some(3)));
        assert!(!cache.eligible(5, Some(3)));
        assert!(!cache.eligible(1, None));
    }

    #[test]
    fn sync_requests_each_eligible_page_once() {
        let mut cache = SlideCache::new(5);
        let first = cache.sync(Some(0));
        // Pages 0 and 1 by adjacency, page 4 as the clone pair.
        assert_eq!(first.as_slice(), &[0, 1, 4]);
        assert_eq!(cache.status(1), SlideStatus::Loading);

        // Nothing new until the window moves.
        assert!(cache.sync(Some(0)).is_empty());
        assert_eq!(cache.sync(Some(1)).as_slice(), &[2]);
    }

    #[test]
    fn loaded_is_terminal() {
        let mut cache = SlideCache::new(3);
        cache.sync(Some(0));
        cache.loaded(0);
        assert!(!cache.failed(0));
        assert_eq!(cache.status(0), SlideStatus::Loaded);
        // A later sync never re-enters Loading for a loaded page.
        assert!(cache.sync(Some(0)).is_empty());
    }

    #[test]
    fn loaded_pages_stay_mounted_anywhere() {
        let mut cache = SlideCache::new(9);
        cache.loaded(4);
        assert!(cache.mounted(4, Some(0)));
        assert!(!cache.mounted(5, Some(0)));
    }

    #[test]
    fn failure_then_retry_roundtrip() {
        let mut cache = SlideCache::new(3);
        cache.sync(Some(0));
        assert!(cache.failed(1));
        assert_eq!(cache.status(1), SlideStatus::Errored);

        // Retry holds the visual unmounted for one tick.
        assert!(cache.begin_retry(1));
        assert_eq!(cache.status(1), SlideStatus::Loading);
        assert!(!cache.mounted(1, Some(0)));
        assert!(cache.complete_retry(1));
        assert!(cache.mounted(1, Some(0)));

        // Only errored pages accept a retry.
        assert!(!cache.begin_retry(1));
        assert!(!cache.complete_retry(1));
    }

    #[test]
    fn error_is_localized_to_its_page() {
        let mut cache = SlideCache::new(3);
        cache.sync(Some(0));
        cache.failed(0);
        assert_eq!(cache.status(1), SlideStatus::Loading);
        assert_eq!(cache.status(2), SlideStatus::Loading);
    }

    #[test]
    fn out_of_range_signals_are_ignored() {
        let mut cache = SlideCache::new(2);
        cache.loaded(9);
        cache.load_started(9);
        assert!(!cache.failed(9));
        assert_eq!(cache.status(9), SlideStatus::Unloaded);
    }
}
