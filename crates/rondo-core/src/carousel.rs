//! Carousel composition root.
//!
//! Owns the paging, sizing, and slide-cache machines, wires gesture and
//! resize input through debouncers, and schedules every timer the component
//! needs. All mutation happens behind one `Rc<RefCell<…>>` on the event-loop
//! thread; timer callbacks re-enter through a weak handle so a dropped
//! carousel never outlives itself inside the scheduler.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::config::CarouselConfig;
use crate::debounce::Debouncer;
use crate::error::ImageLoadError;
use crate::gesture::{wheel_direction, Direction, TouchTracker};
use crate::platform::{ImageLoader, LoadRequest, ResizeObserver, SchedulerHandle, Surface, TimerToken};
use crate::size::SizeAdapter;
use crate::slide::{SlideCache, SlideStatus};
use crate::transition::{TransitionController, TransitionStyle};

/// Debounce window for wheel events: coalesces same-tick duplicates while
/// keeping paging responsive.
pub const WHEEL_DEBOUNCE_MS: u64 = 1;

/// Debounce window for both resize channels: coalesces resize storms.
pub const RESIZE_DEBOUNCE_MS: u64 = 100;

/// How long animation stays suppressed after a wraparound snap.
pub const WRAP_RESTORE_MS: u64 = 50;

/// How long animation stays suppressed after a viewport resize.
pub const RESIZE_RESTORE_MS: u64 = 500;

/// One slot of the render strip.
#[derive(Clone, Debug)]
pub struct SlideView {
    /// Slot index in the virtual sequence, `[0, N+1]`.
    pub slot: usize,
    /// Real page this slot renders (clone slots repeat a real page).
    pub page: usize,
    /// Image source for the slot.
    pub url: Rc<str>,
    /// Load status of the underlying real page.
    pub status: SlideStatus,
    /// Whether the slide's visual element should exist right now.
    pub mounted: bool,
    /// Whether the loading indicator overlays this slot.
    pub show_spinner: bool,
}

/// Pure snapshot of everything the render layer needs.
///
/// The strip holds N+2 slots (clone of the last page, the real pages, clone
/// of the first page) and is translated by `offset_x`. An empty carousel
/// yields an empty strip.
#[derive(Clone, Debug)]
pub struct RenderModel {
    pub width: f32,
    pub height: f32,
    pub transition: TransitionStyle,
    /// Horizontal strip translation: `−current_page × width`.
    pub offset_x: f32,
    /// Total strip width: `(N+2) × width`.
    pub strip_width: f32,
    pub slides: Vec<SlideView>,
}

struct Inner {
    config: CarouselConfig,
    scheduler: SchedulerHandle,
    loader: Rc<dyn ImageLoader>,
    transition: TransitionController,
    size: SizeAdapter,
    cache: SlideCache,
    style: TransitionStyle,
    touch: TouchTracker,
    lock_timer: Option<TimerToken>,
    wrap_restore: Option<TimerToken>,
    resize_restore: Option<TimerToken>,
    retry_pulses: FxHashMap<usize, TimerToken>,
    weak: Weak<RefCell<Inner>>,
}

/// An infinitely-looping, gesture-driven image carousel core.
///
/// Construct with a config and the host's scheduler and image loader, feed
/// it gesture and resize events (or [`Carousel::bind`] it to a
/// [`ResizeObserver`]), and read [`Carousel::render_model`] after each event
/// to position slides.
pub struct Carousel {
    inner: Rc<RefCell<Inner>>,
    wheel: Debouncer<f32>,
    container: Debouncer<f32>,
    viewport: Debouncer<f32>,
}

impl Carousel {
    pub fn new(
        config: CarouselConfig,
        scheduler: SchedulerHandle,
        loader: Rc<dyn ImageLoader>,
    ) -> Self {
        let page_count = config.page_count();
        let transition = TransitionController::new(page_count);
        let size = SizeAdapter::new(config.max_width(), config.max_height());
        let cache = SlideCache::new(page_count);

        let inner = Rc::new_cyclic(|weak| {
            RefCell::new(Inner {
                config,
                scheduler: scheduler.clone(),
                loader,
                transition,
                size,
                cache,
                style: TransitionStyle::Animated,
                touch: TouchTracker::new(),
                lock_timer: None,
                wrap_restore: None,
                resize_restore: None,
                retry_pulses: FxHashMap::default(),
                weak: weak.clone(),
            })
        });

        // The initial window (first page, neighbors, clone pair) starts
        // loading immediately.
        inner.borrow_mut().sync_cache();

        let wheel = {
            let inner = Rc::clone(&inner);
            Debouncer::new(scheduler.clone(), WHEEL_DEBOUNCE_MS, move |delta_y: f32| {
                inner.borrow_mut().advance(wheel_direction(delta_y));
            })
        };
        let container = {
            let inner = Rc::clone(&inner);
            Debouncer::new(scheduler.clone(), RESIZE_DEBOUNCE_MS, move |width: f32| {
                inner.borrow_mut().size.container_resized(width);
            })
        };
        let viewport = {
            let inner = Rc::clone(&inner);
            Debouncer::new(scheduler, RESIZE_DEBOUNCE_MS, move |width: f32| {
                inner.borrow_mut().apply_viewport_resize(width);
            })
        };

        Self {
            inner,
            wheel,
            container,
            viewport,
        }
    }

    /// Feeds one wheel event. Debounced at [`WHEEL_DEBOUNCE_MS`];
    /// `delta_y > 0` pages forward. Inert when the carousel is empty.
    pub fn wheel(&self, delta_y: f32) {
        if self.inner.borrow().config.page_count() == 0 {
            return;
        }
        self.wheel.call(delta_y);
    }

    /// Begins a touch sequence at horizontal position `x`.
    pub fn touch_start(&self, x: f32) {
        self.inner.borrow_mut().touch.start(x);
    }

    /// Records a touch move to horizontal position `x`.
    pub fn touch_move(&self, x: f32) {
        self.inner.borrow_mut().touch.update(x);
    }

    /// Ends the touch sequence, paging if the swipe resolved to a direction.
    /// Inert when the carousel is empty.
    pub fn touch_end(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(direction) = inner.touch.finish() {
            inner.advance(direction);
        }
    }

    /// Feeds the outer container's new width. Debounced at
    /// [`RESIZE_DEBOUNCE_MS`].
    pub fn container_resized(&self, width: f32) {
        self.container.call(width);
    }

    /// Feeds the inner viewport's new width. Debounced at
    /// [`RESIZE_DEBOUNCE_MS`].
    pub fn viewport_resized(&self, width: f32) {
        self.viewport.call(width);
    }

    /// Registers both resize channels with the host's observer.
    pub fn bind(&self, observer: &dyn ResizeObserver) {
        let container = self.container.clone();
        observer.observe(Surface::Container, Box::new(move |width| container.call(width)));
        let viewport = self.viewport.clone();
        observer.observe(Surface::Viewport, Box::new(move |width| viewport.call(width)));
    }

    /// Loader signal: the fetch for `page` began.
    pub fn image_load_started(&self, page: usize) {
        self.inner.borrow_mut().cache.load_started(page);
    }

    /// Loader signal: the image for `page` arrived. The page is cached
    /// permanently and never re-fetched.
    pub fn image_loaded(&self, page: usize) {
        log::trace!("page {} loaded", page);
        self.inner.borrow_mut().cache.loaded(page);
    }

    /// Loader signal: the fetch for `page` failed. Localized to that slide;
    /// the render model surfaces a retry affordance for it.
    pub fn image_load_failed(&self, page: usize) {
        if self.inner.borrow_mut().cache.failed(page) {
            log::warn!("{}", ImageLoadError { page });
        }
    }

    /// Retries a failed slide: unmounts its visual, then remounts and
    /// re-requests on the next scheduling tick.
    pub fn retry(&self, page: usize) {
        self.inner.borrow_mut().begin_retry(page);
    }

    /// Current slot in the virtual sequence.
    pub fn current_page(&self) -> usize {
        self.inner.borrow().transition.current_page()
    }

    /// Real page index currently shown; `None` when empty.
    pub fn current_real_index(&self) -> Option<usize> {
        self.inner.borrow().transition.current_real_index()
    }

    /// Whether a transition lock is held.
    pub fn locked(&self) -> bool {
        self.inner.borrow().transition.locked()
    }

    /// Current transition style.
    pub fn transition_style(&self) -> TransitionStyle {
        self.inner.borrow().style
    }

    /// Builds the pure render snapshot for the current state.
    pub fn render_model(&self) -> RenderModel {
        self.inner.borrow().render_model()
    }

    /// Cancels every pending timer this instance owns: debounce windows,
    /// the lock release, both style restores, and any retry pulses. Call on
    /// teardown.
    pub fn deactivate(&self) {
        self.wheel.cancel();
        self.container.cancel();
        self.viewport.cancel();
        self.inner.borrow_mut().cancel_timers();
    }
}

impl Inner {
    fn advance(&mut self, direction: Direction) {
        if !self.transition.advance(direction) {
            return;
        }
        self.sync_cache();

        // The release timer is deliberately not cancellable by gestures;
        // further advances are shed until it fires.
        let weak = self.weak.clone();
        let token = self
            .scheduler
            .schedule(self.config.transition_duration_ms(), move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().release_lock();
                }
            });
        self.lock_timer = Some(token);
    }

    fn release_lock(&mut self) {
        self.lock_timer = None;
        if self.transition.release().is_none() {
            return;
        }

        // Snapped off a clone slot: reposition without animation, then
        // restore it once the render layer has settled.
        self.style = TransitionStyle::None;
        if let Some(token) = self.wrap_restore.take() {
            self.scheduler.cancel(token);
        }
        let weak = self.weak.clone();
        self.wrap_restore = Some(self.scheduler.schedule(WRAP_RESTORE_MS, move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.borrow_mut();
                inner.wrap_restore = None;
                inner.style = TransitionStyle::Animated;
            }
        }));
    }

    fn apply_viewport_resize(&mut self, width: f32) {
        // Suppress animation so the layout change is not mistaken for a
        // paging transition.
        self.style = TransitionStyle::None;
        self.size.viewport_resized(width);

        if let Some(token) = self.resize_restore.take() {
            self.scheduler.cancel(token);
        }
        let weak = self.weak.clone();
        self.resize_restore = Some(self.scheduler.schedule(RESIZE_RESTORE_MS, move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.borrow_mut();
                inner.resize_restore = None;
                // If a wraparound restore is also pending, whichever timer
                // fires last wins; there is no priority between them.
                inner.style = TransitionStyle::Animated;
            }
        }));
    }

    fn begin_retry(&mut self, page: usize) {
        if !self.cache.begin_retry(page) {
            log::trace!("retry ignored for page {}", page);
            return;
        }
        if let Some(token) = self.retry_pulses.remove(&page) {
            self.scheduler.cancel(token);
        }
        let weak = self.weak.clone();
        let token = self.scheduler.schedule(0, move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().complete_retry(page);
            }
        });
        self.retry_pulses.insert(page, token);
    }

    fn complete_retry(&mut self, page: usize) {
        self.retry_pulses.remove(&page);
        if self.cache.complete_retry(page) {
            self.request_load(page);
        }
    }

    fn sync_cache(&mut self) {
        let current = self.transition.current_real_index();
        for page in self.cache.sync(current) {
            self.request_load(page);
        }
    }

    fn request_load(&mut self, page: usize) {
        if let Some(url) = self.config.page_url(page) {
            log::debug!("requesting image for page {}", page);
            self.loader.request(LoadRequest { page, url });
        }
    }

    fn cancel_timers(&mut self) {
        for token in self
            .lock_timer
            .take()
            .into_iter()
            .chain(self.wrap_restore.take())
            .chain(self.resize_restore.take())
            .chain(self.retry_pulses.drain().map(|(_, token)| token))
        {
            self.scheduler.cancel(token);
        }
    }

    fn render_model(&self) -> RenderModel {
        let page_count = self.config.page_count();
        let width = self.size.width();
        let current = self.transition.current_real_index();

        let mut slides = Vec::new();
        if page_count > 0 {
            slides.reserve(page_count + 2);
            for slot in 0..page_count + 2 {
                let page = match slot {
                    0 => page_count - 1,
                    slot if slot == page_count + 1 => 0,
                    slot => slot - 1,
                };
                let status = self.cache.status(page);
                slides.push(SlideView {
                    slot,
                    page,
                    // Slots always index real pages, so the URL exists.
                    url: self.config.page_url(page).unwrap_or_else(|| Rc::from("")),
                    status,
                    mounted: self.cache.mounted(page, current),
                    show_spinner: status == SlideStatus::Loading,
                });
            }
        }

        RenderModel {
            width,
            height: self.size.height(),
            transition: self.style,
            offset_x: -(self.transition.current_page() as f32) * width,
            strip_width: if page_count == 0 {
                0.0
            } else {
                (page_count + 2) as f32 * width
            },
            slides,
        }
    }
}
