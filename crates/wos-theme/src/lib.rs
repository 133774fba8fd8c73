//! WOS Theme - CSS value handling for the desktop background
//!
//! This crate provides:
//! - The colour-validity predicate used by the background reflector
//! - Colour parsing into normalized RGBA
//! - Interpretation of `background-size` / `background-position` values

pub mod parser;

pub use parser::{
    ThemeParseError, is_valid_color, parse_background_position, parse_background_size,
    parse_color,
};

/// RGBA color as floats (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a new color with alpha
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit components
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Convert to 8-bit components, clamping out-of-range channels
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
}

/// How a background image is scaled into the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundSize {
    /// Scale to cover the whole surface, cropping if needed
    #[default]
    Cover,
    /// Scale to fit entirely inside the surface
    Contain,
    /// Natural image size
    Auto,
    /// Explicit pixel size
    Fixed(u32, u32),
}

/// Anchor of a background image inside the surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BackgroundPosition {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Fractional anchor (0.0 - 1.0 on each axis)
    Percent(f32, f32),
}

impl BackgroundPosition {
    /// Anchor as fractions of the free space on each axis
    pub fn anchor(&self) -> (f32, f32) {
        match *self {
            BackgroundPosition::Center => (0.5, 0.5),
            BackgroundPosition::Top => (0.5, 0.0),
            BackgroundPosition::Bottom => (0.5, 1.0),
            BackgroundPosition::Left => (0.0, 0.5),
            BackgroundPosition::Right => (1.0, 0.5),
            BackgroundPosition::TopLeft => (0.0, 0.0),
            BackgroundPosition::TopRight => (1.0, 0.0),
            BackgroundPosition::BottomLeft => (0.0, 1.0),
            BackgroundPosition::BottomRight => (1.0, 1.0),
            BackgroundPosition::Percent(x, y) => (x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rgba8_clamps() {
        let c = Color::rgba(1.5, -0.2, 0.5, 1.0);
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn test_position_anchor() {
        assert_eq!(BackgroundPosition::Center.anchor(), (0.5, 0.5));
        assert_eq!(BackgroundPosition::BottomRight.anchor(), (1.0, 1.0));
        assert_eq!(BackgroundPosition::Percent(0.25, 0.75).anchor(), (0.25, 0.75));
    }
}
