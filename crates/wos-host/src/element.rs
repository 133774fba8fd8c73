//! The window-os host element
//!
//! Attributes are the declarative face of the background configuration.
//! The element keeps its attribute table and the reflector's typed state
//! in agreement: external mutations flow in through
//! [`WindowOsElement::on_attribute_changed`], and after every successful
//! write the typed state is reflected back out. Reflected values are
//! reported to the caller; feeding them back in is harmless because equal
//! writes are ignored.

use std::collections::BTreeMap;
use std::time::Instant;

use wos_renderer::{AnimationOptions, SharedFrames, SharedSurface};

use crate::config::{BackgroundAttribute, BackgroundType};
use crate::error::Result;
use crate::reflector::{BackgroundStateReflector, ColorValidator};
use crate::resize::SurfaceSize;

/// An attribute value the element changed while reflecting its state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub attribute: BackgroundAttribute,
    pub old: Option<String>,
    pub new: Option<String>,
}

pub struct WindowOsElement {
    attributes: BTreeMap<BackgroundAttribute, String>,
    reflector: BackgroundStateReflector,
    attached: bool,
}

impl WindowOsElement {
    pub fn new(surface: SharedSurface, frames: SharedFrames) -> Self {
        Self::from_reflector(BackgroundStateReflector::new(surface, frames))
    }

    pub fn with_color_validator(
        surface: SharedSurface,
        frames: SharedFrames,
        is_valid_color: ColorValidator,
    ) -> Self {
        Self::from_reflector(BackgroundStateReflector::with_color_validator(
            surface,
            frames,
            is_valid_color,
        ))
    }

    fn from_reflector(reflector: BackgroundStateReflector) -> Self {
        Self {
            attributes: BTreeMap::new(),
            reflector,
            attached: false,
        }
    }

    pub fn reflector(&self) -> &BackgroundStateReflector {
        &self.reflector
    }

    pub fn surface(&self) -> &SharedSurface {
        self.reflector.surface()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    // === Attribute API ===

    /// Current attribute value, `None` when absent
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let attr = BackgroundAttribute::from_name(name)?;
        self.attributes.get(&attr).map(String::as_str)
    }

    /// Write an attribute and run the change callback.
    ///
    /// A rejected write leaves the attribute at its previous value.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<Vec<AttributeChange>> {
        let Some(attr) = BackgroundAttribute::from_name(name) else {
            log::debug!("Ignoring unknown attribute {}", name);
            return Ok(Vec::new());
        };

        let old = self.attributes.insert(attr, value.to_string());
        let result = self.on_attribute_changed(name, old.as_deref(), Some(value));
        if result.is_err() {
            self.restore(attr, old);
        }
        result
    }

    pub fn remove_attribute(&mut self, name: &str) -> Result<Vec<AttributeChange>> {
        let Some(attr) = BackgroundAttribute::from_name(name) else {
            return Ok(Vec::new());
        };

        let old = self.attributes.remove(&attr);
        self.on_attribute_changed(name, old.as_deref(), None)
    }

    fn restore(&mut self, attr: BackgroundAttribute, value: Option<String>) {
        match value {
            Some(v) => self.attributes.insert(attr, v),
            None => self.attributes.remove(&attr),
        };
    }

    // === Lifecycle ===

    /// Activate: the current attributes become the initial configuration.
    ///
    /// Every attribute is applied even if an earlier one is rejected; the
    /// first error is returned.
    pub fn on_attach(&mut self) -> Result<Vec<AttributeChange>> {
        if self.attached {
            return Ok(Vec::new());
        }
        self.attached = true;
        self.reflector.activate();
        log::info!("Window-os element attached");

        // Debounce and style fields first so the visible field applied last
        // decides the type.
        const ORDER: [BackgroundAttribute; 8] = [
            BackgroundAttribute::AnimationDebounce,
            BackgroundAttribute::Size,
            BackgroundAttribute::Position,
            BackgroundAttribute::AnimationOptions,
            BackgroundAttribute::Color,
            BackgroundAttribute::Image,
            BackgroundAttribute::Animation,
            BackgroundAttribute::Type,
        ];

        let mut first_error = None;
        for attr in ORDER {
            let Some(value) = self.attributes.get(&attr).cloned() else {
                continue;
            };
            if let Err(e) = self.reflector.set_attribute(attr, &value) {
                log::warn!("Ignoring {}={:?}: {}", attr, value, e);
                first_error.get_or_insert(e);
            }
        }

        let changes = self.reflect();
        match first_error {
            Some(e) => Err(e),
            None => Ok(changes),
        }
    }

    /// Stop the animation and release the size observer
    pub fn on_detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.reflector.deactivate();
        log::info!("Window-os element detached");
    }

    /// Change callback for one attribute mutation
    pub fn on_attribute_changed(
        &mut self,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<Vec<AttributeChange>> {
        if old == new {
            return Ok(Vec::new());
        }
        let Some(attr) = BackgroundAttribute::from_name(name) else {
            return Ok(Vec::new());
        };
        if !self.attached {
            return Ok(Vec::new());
        }

        match new {
            Some(value) => self.reflector.set_attribute(attr, value)?,
            None => self.reflector.reset_attribute(attr),
        }
        Ok(self.reflect())
    }

    /// Bring the attribute table in line with the typed state.
    ///
    /// Absent attributes whose field still holds its default stay absent.
    fn reflect(&mut self) -> Vec<AttributeChange> {
        let mut changes = Vec::new();

        for attr in BackgroundAttribute::ALL {
            let value = self.reflector.attribute_value(attr);
            let current = self.attributes.get(&attr);

            let unchanged = match current {
                Some(existing) => *existing == value,
                None => value == attr.default_value(),
            };
            if unchanged {
                continue;
            }

            let old = self.attributes.insert(attr, value.clone());
            changes.push(AttributeChange {
                attribute: attr,
                old,
                new: Some(value),
            });
        }

        changes
    }

    // === Typed properties ===

    pub fn background_type(&self) -> BackgroundType {
        self.reflector.background_type()
    }

    pub fn background_color(&self) -> &str {
        self.reflector.color()
    }

    pub fn background_image(&self) -> &str {
        self.reflector.image()
    }

    pub fn background_size(&self) -> &str {
        self.reflector.size()
    }

    pub fn background_position(&self) -> &str {
        self.reflector.position()
    }

    pub fn background_animation(&self) -> &str {
        self.reflector.animation()
    }

    pub fn background_animation_options(&self) -> AnimationOptions {
        self.reflector.animation_options()
    }

    pub fn background_animation_debounce(&self) -> u64 {
        self.reflector.debounce_ms()
    }

    pub fn set_background_type(&mut self, value: BackgroundType) -> Result<Vec<AttributeChange>> {
        self.set_attribute(BackgroundAttribute::Type.name(), value.as_str())
    }

    pub fn set_background_color(&mut self, value: &str) -> Result<Vec<AttributeChange>> {
        self.set_attribute(BackgroundAttribute::Color.name(), value)
    }

    pub fn set_background_image(&mut self, value: &str) -> Result<Vec<AttributeChange>> {
        self.set_attribute(BackgroundAttribute::Image.name(), value)
    }

    pub fn set_background_size(&mut self, value: &str) -> Result<Vec<AttributeChange>> {
        self.set_attribute(BackgroundAttribute::Size.name(), value)
    }

    pub fn set_background_position(&mut self, value: &str) -> Result<Vec<AttributeChange>> {
        self.set_attribute(BackgroundAttribute::Position.name(), value)
    }

    pub fn set_background_animation(&mut self, value: &str) -> Result<Vec<AttributeChange>> {
        self.set_attribute(BackgroundAttribute::Animation.name(), value)
    }

    pub fn set_background_animation_options(
        &mut self,
        options: &AnimationOptions,
    ) -> Result<Vec<AttributeChange>> {
        self.set_attribute(BackgroundAttribute::AnimationOptions.name(), &options.to_json())
    }

    pub fn set_background_animation_debounce(&mut self, ms: u64) -> Result<Vec<AttributeChange>> {
        self.set_attribute(BackgroundAttribute::AnimationDebounce.name(), &ms.to_string())
    }

    // === Host callbacks ===

    /// Size report from the observation source
    pub fn on_resize(&mut self, width: u32, height: u32, now: Instant) {
        self.reflector.notify_resize(SurfaceSize::new(width, height), now);
    }

    /// Run timers that are due
    pub fn poll(&mut self, now: Instant) -> Option<SurfaceSize> {
        self.reflector.poll_resize(now)
    }

    /// Host redraw callback
    pub fn on_animation_frame(&mut self, dt: f32) {
        self.reflector.on_frame(dt);
    }
}

impl Drop for WindowOsElement {
    fn drop(&mut self) {
        self.on_detach();
    }
}
