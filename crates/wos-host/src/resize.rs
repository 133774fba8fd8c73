//! Debounced surface resizing
//!
//! Size reports arrive at a high rate while a window is being dragged. Each
//! report reschedules a single trailing action; only the last one survives
//! a full quiet window, and only then is the surface resized and the
//! running animation restarted.

use std::time::{Duration, Instant};

use wos_renderer::SharedSurface;

use crate::controller::AnimationController;

/// Width and height of the drawing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Trailing-edge scheduled action carrying a value.
///
/// `schedule` replaces whatever was pending; `poll` hands the value out
/// once its quiet window has elapsed.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    interval: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the quiet window. An already scheduled action keeps its due time.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Schedule `value`, discarding anything already pending
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.interval, value));
    }

    /// Drop the pending action, returning its value
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending action will fire
    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    /// Fire the pending action if it is due
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((due, _)) if now >= due => self.cancel(),
            _ => None,
        }
    }
}

/// Keeps the surface size in step with the element's content box
pub struct SurfaceSizeCoordinator {
    surface: SharedSurface,
    debouncer: Debouncer<SurfaceSize>,
    observing: bool,
}

impl SurfaceSizeCoordinator {
    pub fn new(surface: SharedSurface, debounce_ms: u64) -> Self {
        Self {
            surface,
            debouncer: Debouncer::new(Duration::from_millis(debounce_ms)),
            observing: false,
        }
    }

    /// Start accepting size reports
    pub fn observe(&mut self) {
        self.observing = true;
    }

    /// Stop accepting size reports and drop any pending resize
    pub fn release(&mut self) {
        self.observing = false;
        if self.debouncer.cancel().is_some() {
            log::debug!("Dropped pending resize on release");
        }
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn debounce(&self) -> Duration {
        self.debouncer.interval()
    }

    /// Applies from the next size report on
    pub fn set_debounce(&mut self, ms: u64) {
        self.debouncer.set_interval(Duration::from_millis(ms));
    }

    /// Size waiting for its quiet window
    pub fn pending(&self) -> Option<SurfaceSize> {
        self.debouncer.pending.as_ref().map(|(_, size)| *size)
    }

    /// Raw size report from the observation source
    pub fn notify(&mut self, size: SurfaceSize, now: Instant) {
        if !self.observing {
            return;
        }
        self.debouncer.schedule(size, now);
    }

    /// Run the resize if its quiet window has elapsed.
    ///
    /// Returns the size that was applied.
    pub fn poll(&mut self, now: Instant, controller: &mut AnimationController) -> Option<SurfaceSize> {
        let size = self.debouncer.poll(now)?;

        self.surface.borrow_mut().resize(size.width, size.height);
        if controller.is_running() {
            controller.restart();
        }
        log::debug!("Surface resized to {}x{}", size.width, size.height);
        Some(size)
    }
}
