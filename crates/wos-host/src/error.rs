//! Errors raised by background configuration writes

use thiserror::Error;

/// A rejected background configuration write.
///
/// The write that produced the error had no effect; the previous valid
/// state is still in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackgroundError {
    #[error("Invalid background type: {0:?} (expected color, image or animated)")]
    InvalidBackgroundType(String),

    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Unknown animation: {0:?}")]
    UnknownAnimation(String),

    #[error("Invalid animation options: {0}")]
    OptionsParse(String),

    #[error("Invalid debounce interval: {0:?} (expected integer milliseconds)")]
    InvalidDebounce(String),
}

impl From<serde_json::Error> for BackgroundError {
    fn from(e: serde_json::Error) -> Self {
        BackgroundError::OptionsParse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BackgroundError>;
