//! Scriptable resize-observer double.

use std::cell::RefCell;
use std::collections::HashMap;

use rondo_core::{ResizeObserver, Surface};

/// A [`ResizeObserver`] whose size changes are emitted by the test.
#[derive(Default)]
pub struct TestResizeObserver {
    callbacks: RefCell<HashMap<Surface, Box<dyn FnMut(f32)>>>,
}

impl TestResizeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a callback is registered for the surface.
    pub fn is_observing(&self, surface: Surface) -> bool {
        self.callbacks.borrow().contains_key(&surface)
    }

    /// Reports a new width for the surface, invoking its callback.
    ///
    /// The callback is taken out for the duration of the call so it may
    /// re-enter the carousel freely.
    pub fn emit(&self, surface: Surface, width: f32) {
        let callback = self.callbacks.borrow_mut().remove(&surface);
        if let Some(mut callback) = callback {
            callback(width);
            self.callbacks.borrow_mut().insert(surface, callback);
        }
    }
}

impl ResizeObserver for TestResizeObserver {
    fn observe(&self, surface: Surface, on_resize: Box<dyn FnMut(f32)>) {
        self.callbacks.borrow_mut().insert(surface, on_resize);
    }
}
