//! Configuration Hot-Reload
//!
//! Watches config.toml and sends reload events through a channel for the
//! runner to apply on its own thread.

use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::ModifyKind,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crate::{Config, ConfigError};

/// Events emitted by the configuration watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// Configuration file changed, contains the new config
    ConfigReloaded(Config),
    /// The file changed but could not be loaded
    ReloadError(String),
}

/// Watches the configuration file for changes
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<ConfigEvent>,
    config_file: PathBuf,
}

impl ConfigWatcher {
    /// Watch the default configuration file
    pub fn new() -> Result<Self, ConfigError> {
        ConfigWatcherBuilder::new().build()
    }

    fn watch(config_file: PathBuf, debounce: Duration) -> Result<Self, ConfigError> {
        let (tx, rx) = mpsc::channel();

        let watched_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| ConfigError::WatchError(format!("{:?} has no parent", config_file)))?;

        let target = config_file.clone();
        let mut last_event: Option<Instant> = None;

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(event) => event,
                    Err(e) => {
                        log::error!("Watch error: {:?}", e);
                        return;
                    }
                };

                // Editors either write in place or rename a temp file over the target
                let relevant = matches!(
                    event.kind,
                    EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Name(_)) | EventKind::Create(_)
                );
                if !relevant || !event.paths.iter().any(|p| p == &target) {
                    return;
                }

                let now = Instant::now();
                if let Some(last) = last_event {
                    if now.duration_since(last) < debounce {
                        return;
                    }
                }
                last_event = Some(now);

                log::info!("Config file changed, reloading...");
                let event = match Config::load_from(&target) {
                    Ok(config) => ConfigEvent::ConfigReloaded(config),
                    Err(e) => {
                        log::error!("Failed to reload config: {}", e);
                        ConfigEvent::ReloadError(e.to_string())
                    }
                };
                let _ = tx.send(event);
            },
            NotifyConfig::default().with_poll_interval(Duration::from_secs(1)),
        )
        .map_err(|e| ConfigError::WatchError(e.to_string()))?;

        watcher
            .watch(&watched_dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatchError(e.to_string()))?;
        log::info!("Watching config directory: {:?}", watched_dir);

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            config_file,
        })
    }

    /// Path of the watched file
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Try to receive a config event without blocking
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ConfigEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Get all pending events
    pub fn drain_events(&self) -> Vec<ConfigEvent> {
        self.receiver.try_iter().collect()
    }
}

/// Builder for creating a ConfigWatcher with custom options
pub struct ConfigWatcherBuilder {
    debounce_ms: u64,
    path: Option<PathBuf>,
}

impl Default for ConfigWatcherBuilder {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            path: None,
        }
    }
}

impl ConfigWatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set debounce duration in milliseconds
    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Watch this file instead of the default config path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<ConfigWatcher, ConfigError> {
        let path = match self.path {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        ConfigWatcher::watch(path, Duration::from_millis(self.debounce_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watcher_builder_default() {
        let builder = ConfigWatcherBuilder::new();
        assert_eq!(builder.debounce_ms, 100);
        assert!(builder.path.is_none());
    }

    #[test]
    fn test_watcher_builder_fluent() {
        let builder = ConfigWatcherBuilder::new().debounce_ms(250).path("/tmp/wos/config.toml");
        assert_eq!(builder.debounce_ms, 250);
        assert_eq!(builder.path, Some(PathBuf::from("/tmp/wos/config.toml")));
    }

    #[test]
    fn test_watch_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigWatcherBuilder::new()
            .path(dir.path().join("absent").join("config.toml"))
            .build();
        assert!(matches!(result, Err(ConfigError::WatchError(_))));
    }

    #[test]
    fn test_no_events_without_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::create_default_config_in(dir.path()).unwrap();
        let watcher = ConfigWatcherBuilder::new().path(&path).build().unwrap();
        assert_eq!(watcher.config_file(), path.as_path());
        assert!(watcher.drain_events().is_empty());
    }

    #[test]
    fn test_reload_error_event() {
        let event = ConfigEvent::ReloadError("bad toml".to_string());
        assert!(format!("{:?}", event).contains("ReloadError"));
    }
}
