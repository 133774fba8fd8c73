//! Headless frame loop
//!
//! Drives the element the way a compositor would: size reports, timer
//! polling and one redraw callback per display refresh.

use std::thread;
use std::time::{Duration, Instant};

use wos_config::{BackgroundSection, Config, ConfigEvent, ConfigWatcher};
use wos_host::WindowOsElement;
use wos_renderer::{FrameScheduler, SharedFrames, Surface};

use crate::shutdown::StopFlag;

pub struct Runner {
    element: WindowOsElement,
    frames: SharedFrames,
    window: (u32, u32),
    frame_interval: Duration,
    run_for: Option<Duration>,
}

impl Runner {
    pub fn new(config: &Config) -> Self {
        let window = (config.window.width, config.window.height);
        let surface = Surface::new(window.0, window.1).into_shared();
        let frames = FrameScheduler::shared();

        Self {
            element: WindowOsElement::new(surface, frames.clone()),
            frames,
            window,
            frame_interval: frame_interval(config.runtime.frame_rate),
            run_for: run_for(config.runtime.run_seconds),
        }
    }

    /// Apply the background section and attach the element
    pub fn attach(&mut self, config: &Config) {
        // Attributes written before attach are only recorded; attach applies
        // them in order.
        self.apply_background(&config.background);
        if let Err(e) = self.element.on_attach() {
            log::warn!("Background partially applied: {}", e);
        }
        log::info!(
            "Background: {} at {}x{}",
            self.element.background_type(),
            self.window.0,
            self.window.1
        );
    }

    fn apply_background(&mut self, background: &BackgroundSection) {
        let attributes = match background.attributes() {
            Ok(attributes) => attributes,
            Err(e) => {
                log::error!("Invalid background section: {}", e);
                return;
            }
        };

        for (name, value) in attributes {
            if let Err(e) = self.element.set_attribute(name, &value) {
                log::warn!("Rejected {}={:?}: {}", name, value, e);
            }
        }
    }

    /// Apply a reloaded configuration
    pub fn reload(&mut self, config: &Config, now: Instant) {
        self.apply_background(&config.background);

        let window = (config.window.width, config.window.height);
        if window != self.window {
            self.window = window;
            self.element.on_resize(window.0, window.1, now);
        }
        self.frame_interval = frame_interval(config.runtime.frame_rate);
        log::info!("Configuration applied");
    }

    /// One display refresh
    pub fn tick(&mut self, now: Instant, dt: Duration) {
        if let Some(size) = self.element.poll(now) {
            log::info!("Surface now {}x{}", size.width, size.height);
        }
        if self.frames.borrow().pending() > 0 {
            self.element.on_animation_frame(dt.as_secs_f32());
        }
    }

    /// Drive the element until `run_for` elapses or `stop` is raised
    pub fn run(&mut self, watcher: Option<ConfigWatcher>, stop: &StopFlag) {
        let started = Instant::now();
        let mut last = started;
        let mut last_report = started;

        loop {
            let now = Instant::now();
            if stop.is_raised() {
                log::info!("Stop requested");
                break;
            }
            if self.run_for.is_some_and(|limit| now.duration_since(started) >= limit) {
                break;
            }

            if let Some(watcher) = &watcher {
                for event in watcher.drain_events() {
                    match event {
                        ConfigEvent::ConfigReloaded(config) => self.reload(&config, now),
                        ConfigEvent::ReloadError(e) => log::warn!("Keeping previous configuration: {}", e),
                    }
                }
            }

            self.tick(now, now.duration_since(last));
            last = now;

            if now.duration_since(last_report) >= Duration::from_secs(5) {
                log::debug!("{} frames delivered", self.frames.borrow().delivered());
                last_report = now;
            }

            let elapsed = Instant::now().duration_since(now);
            if let Some(remaining) = self.frame_interval.checked_sub(elapsed) {
                thread::sleep(remaining);
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.element.on_detach();
        log::info!("{} frames delivered", self.frames.borrow().delivered());
    }
}

fn frame_interval(frame_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / frame_rate.clamp(1, 240) as f64)
}

fn run_for(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}
