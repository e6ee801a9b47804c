//! Testing utilities and harness for Rondo
//!
//! Provides a virtual-clock scheduler, recording doubles for the platform
//! collaborators, and a robot-style driver for scripting gesture and timing
//! scenarios against a real [`rondo_core::Carousel`].

pub mod loader;
pub mod observer;
pub mod robot;
pub mod scheduler;

pub use loader::RecordingLoader;
pub use observer::TestResizeObserver;
pub use robot::CarouselRobot;
pub use scheduler::TestScheduler;

pub mod prelude {
    pub use crate::loader::RecordingLoader;
    pub use crate::observer::TestResizeObserver;
    pub use crate::robot::CarouselRobot;
    pub use crate::scheduler::TestScheduler;
}
