//! Queue Configuration
//!
//! Motion and timing knobs for the queue strip. Tile widths are not
//! configurable: offsets are part of tile identity across passes.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use turn_queue::QueueConfig;
//!
//! let config = QueueConfig::new()
//!     .with_anim_duration(Duration::from_millis(250))
//!     .with_bounce_window(Duration::from_secs(1));
//! ```

use std::time::Duration;

/// Width of a marker tile or an inactive creature tile.
pub const TILE_WIDTH: f32 = 80.0;

/// Width of the active creature's tile.
pub const ACTIVE_TILE_WIDTH: f32 = 100.0;

/// Configuration for queue animations and bounce throttling.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueConfig {
    /// Duration of insert/update/delete animations.
    pub anim_duration: Duration,
    /// Horizontal distance an inserted tile slides in from.
    pub insert_slide: f32,
    /// Vertical distance tiles drop from on insert and lift to on delete.
    pub lift: f32,
    /// Scale of the active creature tile (and of a bounce at position 0).
    pub active_scale: f32,
    /// Default bounce height when the caller passes none.
    pub bounce_height: f32,
    /// Number of oscillations per bounce.
    pub bounce_count: u32,
    /// Duration of a single oscillation.
    pub bounce_step: Duration,
    /// Minimum interval between two executed bounces.
    pub bounce_window: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            anim_duration: Duration::from_millis(500),
            insert_slide: 500.0,
            lift: 100.0,
            active_scale: 1.25,
            bounce_height: 40.0,
            bounce_count: 3,
            bounce_step: Duration::from_millis(280),
            bounce_window: Duration::from_millis(500),
        }
    }
}

impl QueueConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_anim_duration(mut self, duration: Duration) -> Self {
        self.anim_duration = duration;
        self
    }

    #[must_use]
    pub fn with_insert_slide(mut self, slide: f32) -> Self {
        self.insert_slide = slide;
        self
    }

    #[must_use]
    pub fn with_lift(mut self, lift: f32) -> Self {
        self.lift = lift;
        self
    }

    #[must_use]
    pub fn with_active_scale(mut self, scale: f32) -> Self {
        self.active_scale = scale;
        self
    }

    #[must_use]
    pub fn with_bounce_height(mut self, height: f32) -> Self {
        self.bounce_height = height;
        self
    }

    #[must_use]
    pub fn with_bounce_count(mut self, count: u32) -> Self {
        self.bounce_count = count;
        self
    }

    #[must_use]
    pub fn with_bounce_step(mut self, step: Duration) -> Self {
        self.bounce_step = step;
        self
    }

    #[must_use]
    pub fn with_bounce_window(mut self, window: Duration) -> Self {
        self.bounce_window = window;
        self
    }

    /// Total duration of one bounce animation.
    pub fn bounce_duration(&self) -> Duration {
        self.bounce_step * self.bounce_count
    }
}
