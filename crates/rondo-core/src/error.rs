//! Error type for slide image loading.

/// A slide image failed to load.
///
/// Never fatal: the failure is localized to the affected slide's status and
/// surfaced as a per-slide retry affordance. Other slides and the carousel
/// itself are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLoadError {
    /// Real page index whose image failed.
    pub page: usize,
}

impl std::fmt::Display for ImageLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "image for page {} failed to load", self.page)
    }
}

impl std::error::Error for ImageLoadError {}
