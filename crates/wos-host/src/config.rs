//! Declared background configuration

use std::fmt;
use std::str::FromStr;

use wos_renderer::AnimationOptions;

use crate::error::BackgroundError;

/// Default quiet window for resize notifications
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Which field decides what the surface shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackgroundType {
    #[default]
    Color,
    Image,
    Animated,
}

impl BackgroundType {
    pub fn as_str(self) -> &'static str {
        match self {
            BackgroundType::Color => "color",
            BackgroundType::Image => "image",
            BackgroundType::Animated => "animated",
        }
    }
}

impl FromStr for BackgroundType {
    type Err = BackgroundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(BackgroundType::Color),
            "image" => Ok(BackgroundType::Image),
            "animated" => Ok(BackgroundType::Animated),
            other => Err(BackgroundError::InvalidBackgroundType(other.to_string())),
        }
    }
}

impl fmt::Display for BackgroundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reflected attributes of the host element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackgroundAttribute {
    Type,
    Color,
    Image,
    Size,
    Position,
    Animation,
    AnimationOptions,
    AnimationDebounce,
}

impl BackgroundAttribute {
    pub const ALL: [BackgroundAttribute; 8] = [
        BackgroundAttribute::Type,
        BackgroundAttribute::Color,
        BackgroundAttribute::Image,
        BackgroundAttribute::Size,
        BackgroundAttribute::Position,
        BackgroundAttribute::Animation,
        BackgroundAttribute::AnimationOptions,
        BackgroundAttribute::AnimationDebounce,
    ];

    /// Attribute name as written on the element
    pub fn name(self) -> &'static str {
        match self {
            BackgroundAttribute::Type => "background-type",
            BackgroundAttribute::Color => "background-color",
            BackgroundAttribute::Image => "background-image",
            BackgroundAttribute::Size => "background-size",
            BackgroundAttribute::Position => "background-position",
            BackgroundAttribute::Animation => "background-animation",
            BackgroundAttribute::AnimationOptions => "background-animation-options",
            BackgroundAttribute::AnimationDebounce => "background-animation-debounce",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }

    /// Value the field holds when the attribute is absent
    pub fn default_value(self) -> String {
        let config = BackgroundConfig::default();
        config.value_of(self)
    }
}

impl fmt::Display for BackgroundAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Background configuration as declared on the element.
///
/// `kind` picks which of `color`, `image` and `animation` is shown; the
/// other two keep their values so switching back restores them.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundConfig {
    pub kind: BackgroundType,
    pub color: String,
    pub image: String,
    pub size: String,
    pub position: String,
    /// Empty when no animation has been chosen
    pub animation: String,
    pub animation_options: AnimationOptions,
    /// Serialized form of `animation_options` as last written
    pub animation_options_raw: String,
    pub debounce_ms: u64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            kind: BackgroundType::Color,
            color: "transparent".to_string(),
            image: String::new(),
            size: "cover".to_string(),
            position: "center".to_string(),
            animation: String::new(),
            animation_options: AnimationOptions::new(),
            animation_options_raw: String::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl BackgroundConfig {
    /// Attribute-form value of a field
    pub fn value_of(&self, attr: BackgroundAttribute) -> String {
        match attr {
            BackgroundAttribute::Type => self.kind.as_str().to_string(),
            BackgroundAttribute::Color => self.color.clone(),
            BackgroundAttribute::Image => self.image.clone(),
            BackgroundAttribute::Size => self.size.clone(),
            BackgroundAttribute::Position => self.position.clone(),
            BackgroundAttribute::Animation => self.animation.clone(),
            BackgroundAttribute::AnimationOptions => self.animation_options_raw.clone(),
            BackgroundAttribute::AnimationDebounce => self.debounce_ms.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BackgroundConfig::default();
        assert_eq!(config.kind, BackgroundType::Color);
        assert_eq!(config.color, "transparent");
        assert_eq!(config.size, "cover");
        assert_eq!(config.position, "center");
        assert_eq!(config.debounce_ms, 100);
        assert!(config.animation.is_empty());
        assert!(config.animation_options.is_empty());
    }

    #[test]
    fn test_type_parse() {
        assert_eq!("animated".parse::<BackgroundType>(), Ok(BackgroundType::Animated));
        assert_eq!("image".parse::<BackgroundType>(), Ok(BackgroundType::Image));
        assert_eq!(
            "Color".parse::<BackgroundType>(),
            Err(BackgroundError::InvalidBackgroundType("Color".into()))
        );
        assert!("".parse::<BackgroundType>().is_err());
    }

    #[test]
    fn test_attribute_names() {
        for attr in BackgroundAttribute::ALL {
            assert_eq!(BackgroundAttribute::from_name(attr.name()), Some(attr));
        }
        assert_eq!(BackgroundAttribute::from_name("title"), None);
        assert_eq!(BackgroundAttribute::AnimationDebounce.default_value(), "100");
        assert_eq!(BackgroundAttribute::Type.default_value(), "color");
    }
}
