//! Platform abstraction traits for carousel runtime services.
//!
//! These traits let the carousel delegate timing, size observation, and
//! image fetching to the host environment, enabling integration with
//! different environments without depending directly on any windowing or
//! networking stack. Everything runs on one event-loop thread; none of the
//! traits are `Send`/`Sync`.

use std::rc::Rc;

/// Identifies one scheduled timer so its owner can cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Builds a token from a scheduler-allocated id.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The scheduler-allocated id behind this token.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One-shot timer service supplied by the host.
///
/// Callbacks re-enter the carousel, so implementations must not hold any
/// internal borrow while invoking one. Cancelling an already-fired or
/// unknown token is a no-op.
pub trait Scheduler {
    /// Schedules `callback` to run once after `delay_ms` milliseconds.
    fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerToken;

    /// Cancels a pending timer. No-op if it already fired or was cancelled.
    fn cancel(&self, token: TimerToken);
}

/// Cloneable handle to the host scheduler.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Rc<dyn Scheduler>,
}

impl SchedulerHandle {
    pub fn new(scheduler: impl Scheduler + 'static) -> Self {
        Self {
            inner: Rc::new(scheduler),
        }
    }

    pub fn schedule(&self, delay_ms: u64, callback: impl FnOnce() + 'static) -> TimerToken {
        self.inner.schedule(delay_ms, Box::new(callback))
    }

    pub fn cancel(&self, token: TimerToken) {
        self.inner.cancel(token);
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle").finish_non_exhaustive()
    }
}

/// The two independently observed surfaces of the carousel.
///
/// The outer container drives shrink-to-fit width; the inner viewport may be
/// intrinsically narrower (e.g. constrained by a parent layout) and drives
/// proportional rescaling, so both are tracked separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Container,
    Viewport,
}

/// Size-observation capability supplied by the host.
///
/// The host owns the concrete observation mechanism and the element handles;
/// the carousel only consumes the resulting width signals.
pub trait ResizeObserver {
    /// Registers `on_resize` to receive the surface's new width whenever it
    /// changes. Called once per [`Surface`] when a carousel binds itself.
    fn observe(&self, surface: Surface, on_resize: Box<dyn FnMut(f32)>);
}

/// A request to start fetching one slide's image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    /// Real page index the image belongs to.
    pub page: usize,
    /// Source URL, as configured.
    pub url: Rc<str>,
}

/// Image-fetch capability supplied by the host.
///
/// Implementations must not call back into the carousel synchronously from
/// [`ImageLoader::request`]; completion is reported on a later tick through
/// the carousel's loader-signal entry points (`image_load_started`,
/// `image_loaded`, `image_load_failed`).
pub trait ImageLoader {
    fn request(&self, request: LoadRequest);
}
