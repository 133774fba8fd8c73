//! WOS Configuration Management
//!
//! Handles loading the desktop background configuration from
//! ~/.wos/config.toml (or `$WOS_CONFIG_DIR/config.toml`), generating a
//! default file on first run, and hot-reloading it.

pub mod watcher;

pub use watcher::{ConfigEvent, ConfigWatcher, ConfigWatcherBuilder};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration directory name
const CONFIG_DIR_NAME: &str = ".wos";
/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "WOS_CONFIG_DIR";

/// Background section, one field per element attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSection {
    /// color, image or animated
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,

    /// Any CSS color
    #[serde(default = "default_color")]
    pub color: String,

    /// Image URL or path
    #[serde(default)]
    pub image: String,

    /// CSS background-size
    #[serde(default = "default_size")]
    pub size: String,

    /// CSS background-position
    #[serde(default = "default_position")]
    pub position: String,

    /// matrix, mesh or orbs
    #[serde(default)]
    pub animation: String,

    /// Tunables passed to the animation untouched
    #[serde(default)]
    pub animation_options: toml::Table,

    /// Quiet window before a resize restarts the animation
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_type() -> String {
    "color".to_string()
}

fn default_color() -> String {
    "transparent".to_string()
}

fn default_size() -> String {
    "cover".to_string()
}

fn default_position() -> String {
    "center".to_string()
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for BackgroundSection {
    fn default() -> Self {
        Self {
            kind: default_type(),
            color: default_color(),
            image: String::new(),
            size: default_size(),
            position: default_position(),
            animation: String::new(),
            animation_options: toml::Table::new(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl BackgroundSection {
    /// Options in the JSON form the `background-animation-options`
    /// attribute carries. Empty when no options are set.
    pub fn animation_options_json(&self) -> Result<String, ConfigError> {
        if self.animation_options.is_empty() {
            return Ok(String::new());
        }
        serde_json::to_string(&self.animation_options).map_err(ConfigError::OptionsError)
    }

    /// Attribute assignments in the order they should be applied.
    ///
    /// The type comes last so it has the final say over which field is
    /// shown.
    pub fn attributes(&self) -> Result<Vec<(&'static str, String)>, ConfigError> {
        Ok(vec![
            ("background-animation-debounce", self.debounce_ms.to_string()),
            ("background-size", self.size.clone()),
            ("background-position", self.position.clone()),
            ("background-animation-options", self.animation_options_json()?),
            ("background-color", self.color.clone()),
            ("background-image", self.image.clone()),
            ("background-animation", self.animation.clone()),
            ("background-type", self.kind.clone()),
        ])
    }
}

/// Window section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Surface width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Surface height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    800
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Runtime section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Redraw callbacks per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Stop after this many seconds; 0 runs until killed
    #[serde(default)]
    pub run_seconds: u64,
}

fn default_frame_rate() -> u32 {
    60
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            run_seconds: 0,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Desktop background
    #[serde(default)]
    pub background: BackgroundSection,

    /// Window settings
    #[serde(default)]
    pub window: WindowConfig,

    /// Frame loop settings
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_create_in(&Self::config_dir()?)
    }

    /// Load `config.toml` from `dir`, writing a default one first if absent
    pub fn load_or_create_in(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            log::info!("Config file not found, creating default at {:?}", config_path);
            Self::create_default_config_in(dir)?;
        }

        let config = Self::load_from(&config_path)?;
        log::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Get the configuration directory path ($WOS_CONFIG_DIR or ~/.wos/)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Write the default configuration file into `dir`
    pub fn create_default_config_in(dir: &Path) -> Result<PathBuf, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDirError(dir.to_path_buf(), e))?;

        let toml_content =
            toml::to_string_pretty(&Config::default()).map_err(ConfigError::SerializeError)?;

        let content = format!(
            "# Window-os background configuration\n\
             #\n\
             # background.type is color, image or animated.\n\
             # background.animation is one of matrix, mesh, orbs; its tunables go in\n\
             # [background.animation_options], e.g. density = 1.5\n\
             \n\
             {toml_content}"
        );

        fs::write(&config_path, content)
            .map_err(|e| ConfigError::WriteError(config_path.clone(), e))?;

        log::info!("Created default configuration at {:?}", config_path);
        Ok(config_path)
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Home directory not found
    NoHomeDirectory,
    /// Failed to read config file
    ReadError(PathBuf, std::io::Error),
    /// Failed to parse config file
    ParseError(PathBuf, toml::de::Error),
    /// Failed to serialize config
    SerializeError(toml::ser::Error),
    /// Failed to serialize animation options
    OptionsError(serde_json::Error),
    /// Failed to write config file
    WriteError(PathBuf, std::io::Error),
    /// Failed to create directory
    CreateDirError(PathBuf, std::io::Error),
    /// Failed to set up file watcher
    WatchError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoHomeDirectory => write!(f, "Could not determine home directory"),
            ConfigError::ReadError(path, e) => write!(f, "Failed to read {:?}: {}", path, e),
            ConfigError::ParseError(path, e) => write!(f, "Failed to parse {:?}: {}", path, e),
            ConfigError::SerializeError(e) => write!(f, "Failed to serialize config: {}", e),
            ConfigError::OptionsError(e) => write!(f, "Failed to serialize animation options: {}", e),
            ConfigError::WriteError(path, e) => write!(f, "Failed to write {:?}: {}", path, e),
            ConfigError::CreateDirError(path, e) => write!(f, "Failed to create {:?}: {}", path, e),
            ConfigError::WatchError(e) => write!(f, "Failed to watch files: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
