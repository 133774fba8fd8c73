//! Ownership of the single running background animation

use wos_renderer::{AnimationKind, AnimationOptions, AnimationStrategy, SharedFrames, SharedSurface};

use crate::error::{BackgroundError, Result};

/// Observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Running,
}

/// Holds at most one live animation strategy.
///
/// Every transition that installs a strategy stops and drops the previous
/// one first, so two strategies never draw to the surface at once.
pub struct AnimationController {
    surface: SharedSurface,
    frames: SharedFrames,
    current: Option<Box<dyn AnimationStrategy>>,
}

impl AnimationController {
    pub fn new(surface: SharedSurface, frames: SharedFrames) -> Self {
        Self {
            surface,
            frames,
            current: None,
        }
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    pub fn frames(&self) -> &SharedFrames {
        &self.frames
    }

    pub fn state(&self) -> ControllerState {
        match self.current {
            Some(_) => ControllerState::Running,
            None => ControllerState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Registry name of the running animation
    pub fn active_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|s| s.name())
    }

    /// Replace the running animation with `name`.
    ///
    /// The current strategy is stopped and dropped before the lookup, so an
    /// unknown name leaves the controller idle.
    pub fn swap_to(&mut self, name: &str, options: &AnimationOptions) -> Result<()> {
        self.stop();

        let Some(kind) = AnimationKind::from_name(name) else {
            log::warn!("Unknown background animation: {:?}", name);
            return Err(BackgroundError::UnknownAnimation(name.to_string()));
        };

        let mut strategy = kind.create(self.surface.clone(), self.frames.clone());
        strategy.set_options(options);
        strategy.start();
        log::debug!("Animation controller running {}", kind);
        self.current = Some(strategy);
        Ok(())
    }

    /// Stop and drop the running animation, if any
    pub fn stop(&mut self) {
        if let Some(mut strategy) = self.current.take() {
            strategy.stop();
            log::debug!("Animation controller idle (stopped {})", strategy.name());
        }
    }

    /// Re-initialize the running animation for the current surface size.
    ///
    /// Options are untouched.
    pub fn restart(&mut self) {
        if let Some(strategy) = self.current.as_mut() {
            strategy.stop();
            strategy.start();
            log::debug!("Restarted {} animation", strategy.name());
        }
    }

    /// Effective options of the running animation
    pub fn current_options(&self) -> Option<AnimationOptions> {
        self.current.as_ref().map(|s| s.options())
    }

    /// Hand new options to the running animation. No-op when idle.
    pub fn apply_options(&mut self, options: &AnimationOptions) {
        if let Some(strategy) = self.current.as_mut() {
            strategy.set_options(options);
        }
    }

    /// Forward the host redraw callback
    pub fn on_frame(&mut self, dt: f32) {
        if let Some(strategy) = self.current.as_mut() {
            strategy.on_frame(dt);
        }
    }
}
