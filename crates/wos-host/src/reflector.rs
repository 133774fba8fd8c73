//! Validated background configuration
//!
//! [`BackgroundStateReflector`] owns the declared [`BackgroundConfig`] and
//! is the only way to change it. Each setter:
//!
//! 1. returns early when the value equals the current one (no validation,
//!    no side effects)
//! 2. validates, leaving everything untouched on error
//! 3. applies the cross-field effect (e.g. a colour write switches the
//!    type to `color`)
//! 4. realizes the result on the controller or the surface
//!
//! Invariant: the type is `animated` exactly when the controller is
//! running.

use std::time::Instant;

use wos_renderer::{AnimationOptions, SharedFrames, SharedSurface};
use wos_theme::{parse_background_position, parse_background_size, parse_color};

use crate::config::{BackgroundAttribute, BackgroundConfig, BackgroundType};
use crate::controller::AnimationController;
use crate::error::{BackgroundError, Result};
use crate::resize::{SurfaceSize, SurfaceSizeCoordinator};

/// Predicate deciding whether a string is a usable CSS colour
pub type ColorValidator = Box<dyn Fn(&str) -> bool>;

pub struct BackgroundStateReflector {
    config: BackgroundConfig,
    controller: AnimationController,
    coordinator: SurfaceSizeCoordinator,
    is_valid_color: ColorValidator,
}

impl BackgroundStateReflector {
    /// Create with default configuration and the CSS colour validator
    pub fn new(surface: SharedSurface, frames: SharedFrames) -> Self {
        Self::with_color_validator(surface, frames, Box::new(wos_theme::is_valid_color))
    }

    pub fn with_color_validator(
        surface: SharedSurface,
        frames: SharedFrames,
        is_valid_color: ColorValidator,
    ) -> Self {
        let config = BackgroundConfig::default();
        let coordinator = SurfaceSizeCoordinator::new(surface.clone(), config.debounce_ms);
        Self {
            config,
            controller: AnimationController::new(surface, frames),
            coordinator,
            is_valid_color,
        }
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn coordinator(&self) -> &SurfaceSizeCoordinator {
        &self.coordinator
    }

    pub fn surface(&self) -> &SharedSurface {
        self.controller.surface()
    }

    // === Getters ===

    pub fn background_type(&self) -> BackgroundType {
        self.config.kind
    }

    pub fn color(&self) -> &str {
        &self.config.color
    }

    pub fn image(&self) -> &str {
        &self.config.image
    }

    pub fn size(&self) -> &str {
        &self.config.size
    }

    pub fn position(&self) -> &str {
        &self.config.position
    }

    pub fn animation(&self) -> &str {
        &self.config.animation
    }

    /// Effective options: the running animation's when there is one
    pub fn animation_options(&self) -> AnimationOptions {
        self.controller
            .current_options()
            .unwrap_or_else(|| self.config.animation_options.clone())
    }

    pub fn debounce_ms(&self) -> u64 {
        self.config.debounce_ms
    }

    /// Attribute-form value of a field
    pub fn attribute_value(&self, attr: BackgroundAttribute) -> String {
        self.config.value_of(attr)
    }

    // === Setters ===

    pub fn set_type(&mut self, value: &str) -> Result<()> {
        if value == self.config.kind.as_str() {
            return Ok(());
        }
        let kind: BackgroundType = value.parse()?;

        match kind {
            BackgroundType::Animated => {
                // Fail-stop: on error the controller is idle, but it was not
                // running anyway since the type was not `animated`.
                self.controller
                    .swap_to(&self.config.animation, &self.config.animation_options)?;
            }
            BackgroundType::Color | BackgroundType::Image => self.controller.stop(),
        }

        self.config.kind = kind;
        self.repaint();
        log::debug!("Background type set to {}", kind);
        Ok(())
    }

    pub fn set_color(&mut self, value: &str) -> Result<()> {
        if value == self.config.color {
            return Ok(());
        }
        if !(self.is_valid_color)(value) {
            log::warn!("Rejected background color {:?}", value);
            return Err(BackgroundError::InvalidColor(value.to_string()));
        }

        self.config.color = value.to_string();
        self.switch_to_static(BackgroundType::Color);
        Ok(())
    }

    pub fn set_image(&mut self, value: &str) -> Result<()> {
        if value == self.config.image {
            return Ok(());
        }

        self.config.image = value.to_string();
        self.switch_to_static(BackgroundType::Image);
        Ok(())
    }

    pub fn set_size(&mut self, value: &str) -> Result<()> {
        if value == self.config.size {
            return Ok(());
        }

        self.config.size = value.to_string();
        if self.config.kind == BackgroundType::Image {
            self.repaint();
        }
        Ok(())
    }

    pub fn set_position(&mut self, value: &str) -> Result<()> {
        if value == self.config.position {
            return Ok(());
        }

        self.config.position = value.to_string();
        if self.config.kind == BackgroundType::Image {
            self.repaint();
        }
        Ok(())
    }

    /// Switch to the named animation.
    ///
    /// On an unknown name the error is returned and, if an animation was
    /// showing, the previous one is put back.
    pub fn set_animation(&mut self, name: &str) -> Result<()> {
        if name == self.config.animation {
            return Ok(());
        }

        if let Err(e) = self.controller.swap_to(name, &self.config.animation_options) {
            if self.config.kind == BackgroundType::Animated {
                self.restore_animation();
            }
            return Err(e);
        }

        self.config.animation = name.to_string();
        self.config.kind = BackgroundType::Animated;
        log::debug!("Background animation set to {}", name);
        Ok(())
    }

    /// Set options from their serialized JSON form. An empty string
    /// clears the stored record, and a running animation is rebuilt with
    /// its defaults since an empty record cannot be applied in place.
    pub fn set_animation_options(&mut self, raw: &str) -> Result<()> {
        if raw == self.config.animation_options_raw {
            return Ok(());
        }

        let options = if raw.trim().is_empty() {
            AnimationOptions::new()
        } else {
            AnimationOptions::from_json(raw).map_err(|e| {
                log::warn!("Rejected animation options {:?}: {}", raw, e);
                BackgroundError::from(e)
            })?
        };

        self.controller.apply_options(&options);
        let cleared = options.is_empty();
        self.config.animation_options = options;
        self.config.animation_options_raw = raw.to_string();
        if cleared && self.controller.is_running() {
            self.restore_animation();
        }
        Ok(())
    }

    pub fn set_debounce_ms(&mut self, ms: u64) -> Result<()> {
        if ms == self.config.debounce_ms {
            return Ok(());
        }

        self.config.debounce_ms = ms;
        self.coordinator.set_debounce(ms);
        Ok(())
    }

    /// Set a field from its attribute form
    pub fn set_attribute(&mut self, attr: BackgroundAttribute, value: &str) -> Result<()> {
        match attr {
            BackgroundAttribute::Type => self.set_type(value),
            BackgroundAttribute::Color => self.set_color(value),
            BackgroundAttribute::Image => self.set_image(value),
            BackgroundAttribute::Size => self.set_size(value),
            BackgroundAttribute::Position => self.set_position(value),
            BackgroundAttribute::Animation => self.set_animation(value),
            BackgroundAttribute::AnimationOptions => self.set_animation_options(value),
            BackgroundAttribute::AnimationDebounce => {
                if value == self.config.value_of(attr) {
                    return Ok(());
                }
                let ms = value
                    .trim()
                    .parse()
                    .map_err(|_| BackgroundError::InvalidDebounce(value.to_string()))?;
                self.set_debounce_ms(ms)
            }
        }
    }

    /// Put a field back to its default.
    ///
    /// Unlike the setters this has no cross-field effect, except that
    /// clearing the field currently shown falls back to a colour
    /// background.
    pub fn reset_attribute(&mut self, attr: BackgroundAttribute) {
        let defaults = BackgroundConfig::default();
        let showing = self.config.kind;

        match attr {
            BackgroundAttribute::Type => {
                self.controller.stop();
                self.config.kind = defaults.kind;
                self.repaint();
            }
            BackgroundAttribute::Color => {
                self.config.color = defaults.color;
                if showing == BackgroundType::Color {
                    self.repaint();
                }
            }
            BackgroundAttribute::Image => {
                self.config.image = defaults.image;
                if showing == BackgroundType::Image {
                    self.config.kind = BackgroundType::Color;
                    self.repaint();
                }
            }
            BackgroundAttribute::Size => {
                self.config.size = defaults.size;
                if showing == BackgroundType::Image {
                    self.repaint();
                }
            }
            BackgroundAttribute::Position => {
                self.config.position = defaults.position;
                if showing == BackgroundType::Image {
                    self.repaint();
                }
            }
            BackgroundAttribute::Animation => {
                self.config.animation = defaults.animation;
                if showing == BackgroundType::Animated {
                    self.controller.stop();
                    self.config.kind = BackgroundType::Color;
                    self.repaint();
                }
            }
            BackgroundAttribute::AnimationOptions => {
                self.config.animation_options = defaults.animation_options;
                self.config.animation_options_raw = defaults.animation_options_raw;
                if self.controller.is_running() {
                    self.restore_animation();
                }
            }
            BackgroundAttribute::AnimationDebounce => {
                self.config.debounce_ms = defaults.debounce_ms;
                self.coordinator.set_debounce(defaults.debounce_ms);
            }
        }
    }

    // === Lifecycle ===

    /// Begin observing size reports and show the current background
    pub fn activate(&mut self) {
        self.coordinator.observe();
        self.repaint();
    }

    /// Stop the animation, stop observing, and forget the configuration
    pub fn deactivate(&mut self) {
        self.controller.stop();
        self.coordinator.release();
        self.config = BackgroundConfig::default();
        self.coordinator.set_debounce(self.config.debounce_ms);
    }

    pub fn notify_resize(&mut self, size: SurfaceSize, now: Instant) {
        self.coordinator.notify(size, now);
    }

    pub fn poll_resize(&mut self, now: Instant) -> Option<SurfaceSize> {
        self.coordinator.poll(now, &mut self.controller)
    }

    pub fn on_frame(&mut self, dt: f32) {
        self.controller.on_frame(dt);
    }

    // === Internals ===

    fn switch_to_static(&mut self, kind: BackgroundType) {
        if self.config.kind != kind {
            self.controller.stop();
            self.config.kind = kind;
            log::debug!("Background type set to {}", kind);
        }
        self.repaint();
    }

    /// Start the configured animation afresh with the stored options
    fn restore_animation(&mut self) {
        let name = self.config.animation.clone();
        if let Err(e) = self.controller.swap_to(&name, &self.config.animation_options) {
            log::warn!("Could not restore {} animation: {}", name, e);
            self.config.kind = BackgroundType::Color;
            self.repaint();
        }
    }

    /// Paint the static style for the current type
    fn repaint(&mut self) {
        let mut surface = self.controller.surface().borrow_mut();
        match self.config.kind {
            BackgroundType::Color => match parse_color(&self.config.color) {
                Ok(color) => surface.paint_solid(color),
                Err(e) => {
                    log::warn!("Cannot paint background color: {}", e);
                    surface.clear();
                }
            },
            BackgroundType::Image => surface.paint_image(
                &self.config.image,
                parse_background_size(&self.config.size),
                parse_background_position(&self.config.position),
            ),
            BackgroundType::Animated => {}
        }
    }
}
