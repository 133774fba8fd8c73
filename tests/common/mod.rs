//! Common test utilities and harness
//!
//! Provides reusable utilities for functional testing including:
//! - Test environment setup (temp config directory)
//! - An attached element on a recording surface with a virtual clock
//! - Assertion utilities over the surface call log

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use wos_host::{ControllerState, WindowOsElement};
use wos_renderer::{FrameScheduler, SharedFrames, SharedSurface, Surface, SurfaceCall};

/// Test environment with isolated config directory
pub struct TestEnvironment {
    /// Temporary directory for test config
    pub temp_dir: TempDir,
    /// Path to the config directory
    pub config_dir: PathBuf,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_dir = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            config_dir,
        }
    }

    /// Write a test config file
    pub fn write_config(&self, content: &str) -> PathBuf {
        let config_path = self.config_path();
        std::fs::write(&config_path, content).expect("Failed to write test config");
        config_path
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// An attached element on a recording surface, with a virtual clock
pub struct BackdropHarness {
    pub element: WindowOsElement,
    surface: SharedSurface,
    frames: SharedFrames,
    start: Instant,
}

impl BackdropHarness {
    /// Create and attach an element with default attributes
    pub fn new(width: u32, height: u32) -> Self {
        let mut harness = Self::detached(width, height);
        harness.element.on_attach().expect("Default attach should succeed");
        harness.clear_calls();
        harness
    }

    /// Create without attaching, so attributes can be declared first
    pub fn detached(width: u32, height: u32) -> Self {
        let surface = Surface::recording(width, height).into_shared();
        let frames = FrameScheduler::shared();
        Self {
            element: WindowOsElement::new(surface.clone(), frames.clone()),
            surface,
            frames,
            start: Instant::now(),
        }
    }

    /// Virtual time `ms` milliseconds after the harness was created
    pub fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    /// Report a size at virtual time `ms`
    pub fn resize_at(&mut self, ms: u64, width: u32, height: u32) {
        let now = self.at(ms);
        self.element.on_resize(width, height, now);
    }

    /// Run timers at virtual time `ms`
    pub fn poll_at(&mut self, ms: u64) -> bool {
        let now = self.at(ms);
        self.element.poll(now).is_some()
    }

    /// Deliver `count` redraw callbacks
    pub fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.element.on_animation_frame(1.0 / 60.0);
        }
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().pending()
    }

    pub fn delivered_frames(&self) -> u64 {
        self.frames.borrow().delivered()
    }

    pub fn state(&self) -> ControllerState {
        self.element.reflector().controller().state()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.surface.borrow().calls().to_vec()
    }

    pub fn clear_calls(&self) {
        self.surface.borrow_mut().take_calls();
    }

    /// Number of times an animation was (re)started
    pub fn starts(&self) -> usize {
        self.surface
            .borrow()
            .count_calls(|c| matches!(c, SurfaceCall::AnimationStarted(_)))
    }

    /// Assert the element is running exactly the named animation
    pub fn assert_running(&self, name: &str) {
        assert_eq!(self.state(), ControllerState::Running, "controller should be running");
        assert_eq!(
            self.element.reflector().controller().active_name(),
            Some(name),
            "wrong animation running"
        );
        assert_eq!(self.pending_frames(), 1, "exactly one frame request expected");
    }

    /// Assert nothing is animating and no frame request is left behind
    pub fn assert_idle(&self) {
        assert_eq!(self.state(), ControllerState::Idle, "controller should be idle");
        assert_eq!(self.pending_frames(), 0, "orphaned frame request");
    }
}
