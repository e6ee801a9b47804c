//! Recording image-loader double.

use std::cell::RefCell;
use std::rc::Rc;

use rondo_core::{ImageLoader, LoadRequest};

/// An [`ImageLoader`] that records every request and fetches nothing.
///
/// Tests drive completion themselves through the carousel's loader-signal
/// entry points, which keeps load timing fully scripted.
#[derive(Clone, Default)]
pub struct RecordingLoader {
    requests: Rc<RefCell<Vec<LoadRequest>>>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shareable trait-object handle for carousel construction.
    pub fn shared(&self) -> Rc<dyn ImageLoader> {
        Rc::new(self.clone())
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<LoadRequest> {
        self.requests.borrow().clone()
    }

    /// Number of requests issued for one page.
    pub fn requests_for(&self, page: usize) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.page == page)
            .count()
    }

    /// Pages requested so far, in arrival order.
    pub fn requested_pages(&self) -> Vec<usize> {
        self.requests
            .borrow()
            .iter()
            .map(|request| request.page)
            .collect()
    }
}

impl ImageLoader for RecordingLoader {
    fn request(&self, request: LoadRequest) {
        log::trace!("recorded load request for page {}", request.page);
        self.requests.borrow_mut().push(request);
    }
}
