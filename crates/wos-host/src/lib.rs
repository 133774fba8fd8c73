//! WOS Host - background lifecycle of the window-os element
//!
//! This crate provides:
//! - [`AnimationController`]: owns the single running background animation
//! - [`SurfaceSizeCoordinator`]: debounced surface resizing
//! - [`BackgroundStateReflector`]: validated, change-suppressing setters over
//!   the declared [`BackgroundConfig`]
//! - [`WindowOsElement`]: the attribute and lifecycle boundary

pub mod config;
pub mod controller;
pub mod element;
pub mod error;
pub mod reflector;
pub mod resize;

pub use config::{BackgroundAttribute, BackgroundConfig, BackgroundType, DEFAULT_DEBOUNCE_MS};
pub use controller::{AnimationController, ControllerState};
pub use element::{AttributeChange, WindowOsElement};
pub use error::{BackgroundError, Result};
pub use reflector::{BackgroundStateReflector, ColorValidator};
pub use resize::{Debouncer, SurfaceSize, SurfaceSizeCoordinator};
