//! Rondo is a headless, infinitely-looping, gesture-driven image carousel.
//!
//! The crate holds only component logic: the paging state machine with its
//! wraparound illusion, gesture debouncing, container-size adaptation, and
//! the lazy per-slide load/cache/retry machine. Rendering, size observation,
//! image fetching, and timers are host capabilities injected through the
//! traits in [`platform`].
//!
//! Everything is single-threaded and event-driven: feed events in, let the
//! injected scheduler fire the timers, and read [`Carousel::render_model`]
//! to position slides.

pub mod carousel;
pub mod config;
pub mod debounce;
pub mod error;
pub mod gesture;
pub mod platform;
pub mod size;
pub mod slide;
pub mod transition;

pub use carousel::{
    Carousel, RenderModel, SlideView, RESIZE_DEBOUNCE_MS, RESIZE_RESTORE_MS, WHEEL_DEBOUNCE_MS,
    WRAP_RESTORE_MS,
};
pub use config::{
    CarouselConfig, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_TRANSITION_DURATION_MS,
};
pub use debounce::Debouncer;
pub use error::ImageLoadError;
pub use gesture::{wheel_direction, Direction, TouchTracker, MIN_SWIPE_LENGTH};
pub use platform::{
    ImageLoader, LoadRequest, ResizeObserver, Scheduler, SchedulerHandle, Surface, TimerToken,
};
pub use size::SizeAdapter;
pub use slide::{SlideCache, SlideStatus};
pub use transition::{TransitionController, TransitionStyle, WrapSnap};
