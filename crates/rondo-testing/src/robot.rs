//! Robot-style driver for carousel timing scenarios.
//!
//! Wraps a real [`Carousel`] with a virtual clock and a recording loader so
//! tests can script gestures, advance time deterministically, and assert on
//! the resulting state, with no display and no real timers.
//!
//! # Example
//!
//! ```
//! use rondo_core::CarouselConfig;
//! use rondo_testing::CarouselRobot;
//!
//! let robot = CarouselRobot::new(CarouselConfig::new(["a", "b", "c"]));
//! robot.wheel(120.0);
//! robot.settle_transition();
//! assert_eq!(robot.real_index(), Some(1));
//! ```

use rondo_core::{
    Carousel, CarouselConfig, RenderModel, TransitionStyle, WHEEL_DEBOUNCE_MS, WRAP_RESTORE_MS,
};

use crate::loader::RecordingLoader;
use crate::scheduler::TestScheduler;

/// Programmatic control over a real carousel under virtual time.
pub struct CarouselRobot {
    scheduler: TestScheduler,
    loader: RecordingLoader,
    carousel: Carousel,
    transition_duration_ms: u64,
}

impl CarouselRobot {
    /// Builds a carousel from `config` on a fresh virtual clock.
    pub fn new(config: CarouselConfig) -> Self {
        let scheduler = TestScheduler::new();
        let loader = RecordingLoader::new();
        let transition_duration_ms = config.transition_duration_ms();
        let carousel = Carousel::new(config, scheduler.handle(), loader.shared());
        Self {
            scheduler,
            loader,
            carousel,
            transition_duration_ms,
        }
    }

    /// The carousel under test, for entry points the robot has no wrapper
    /// for.
    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// The virtual clock.
    pub fn scheduler(&self) -> &TestScheduler {
        &self.scheduler
    }

    /// The recording loader.
    pub fn loader(&self) -> &RecordingLoader {
        &self.loader
    }

    /// Advances virtual time by `ms`, firing due timers.
    pub fn advance_ms(&self, ms: u64) {
        self.scheduler.advance(ms);
    }

    /// Feeds one wheel event and lets its debounce window elapse. The
    /// transition lock is still held afterwards.
    pub fn wheel(&self, delta_y: f32) {
        self.carousel.wheel(delta_y);
        self.advance_ms(WHEEL_DEBOUNCE_MS);
    }

    /// Performs a full touch swipe from `from_x` to `to_x`.
    pub fn swipe(&self, from_x: f32, to_x: f32) {
        self.carousel.touch_start(from_x);
        self.carousel.touch_move(to_x);
        self.carousel.touch_end();
    }

    /// Taps without moving: starts and releases a touch at `x`.
    pub fn tap(&self, x: f32) {
        self.carousel.touch_start(x);
        self.carousel.touch_end();
    }

    /// Waits out one transition lock (duration + 1 ms).
    pub fn settle_transition(&self) {
        self.advance_ms(self.transition_duration_ms + 1);
    }

    /// Waits out the post-snap animation suppression window.
    pub fn settle_snap(&self) {
        self.advance_ms(WRAP_RESTORE_MS + 1);
    }

    /// Reports a successful image load for `page`.
    pub fn resolve_load(&self, page: usize) {
        self.carousel.image_loaded(page);
    }

    /// Reports a failed image load for `page`.
    pub fn fail_load(&self, page: usize) {
        self.carousel.image_load_failed(page);
    }

    pub fn current_page(&self) -> usize {
        self.carousel.current_page()
    }

    pub fn real_index(&self) -> Option<usize> {
        self.carousel.current_real_index()
    }

    pub fn locked(&self) -> bool {
        self.carousel.locked()
    }

    pub fn transition_style(&self) -> TransitionStyle {
        self.carousel.transition_style()
    }

    pub fn model(&self) -> RenderModel {
        self.carousel.render_model()
    }
}
