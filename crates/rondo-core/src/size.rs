//! Render-size adaptation from container and viewport width signals.

/// Derives the render width and height from two independent width signals.
///
/// The outer container shrinks the carousel to fit, capped at the configured
/// maximum. The inner viewport may be narrower still (e.g. constrained by a
/// parent layout); a viewport change also rescales the height to preserve
/// the configured aspect ratio. Heights keep full `f32` precision; no
/// rounding is applied.
#[derive(Clone, Debug)]
pub struct SizeAdapter {
    max_width: f32,
    max_height: f32,
    width: f32,
    height: f32,
}

impl SizeAdapter {
    /// Starts at the configured maximum dimensions.
    pub fn new(max_width: f32, max_height: f32) -> Self {
        Self {
            max_width,
            max_height,
            width: max_width,
            height: max_height,
        }
    }

    /// Current render width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Current render height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Shrink-to-fit on the outer container: the render width follows the
    /// container but never exceeds the configured maximum. Height is left
    /// untouched.
    pub fn container_resized(&mut self, container_width: f32) {
        self.width = container_width.clamp(0.0, self.max_width);
        log::trace!("container resize -> width {}", self.width);
    }

    /// Rescale on the inner viewport: width follows the viewport capped at
    /// the maximum, and height scales as `max_height × width / max_width`,
    /// preserving the configured aspect ratio exactly.
    pub fn viewport_resized(&mut self, viewport_width: f32) {
        self.width = viewport_width.clamp(0.0, self.max_width);
        self.height = self.max_height * self.width / self.max_width;
        log::trace!("viewport resize -> {} x {}", self.width, self.height);
    }
}
