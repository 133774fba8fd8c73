//! CSS value parsing using lightningcss
//!
//! Colours are parsed and converted to sRGB by lightningcss, so every colour
//! space it understands (lab, oklch, `color()`, ...) ends up as a paintable
//! [`Color`].

use thiserror::Error;

use lightningcss::traits::Parse;
use lightningcss::values::color::{CssColor, RGBA};

use crate::{BackgroundPosition, BackgroundSize, Color};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThemeParseError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Check whether a string is a well-formed CSS color.
///
/// This is the color-validity collaborator used by the background reflector.
/// A value is only valid if it can also be painted, so system colours that
/// have no fixed sRGB value are rejected.
pub fn is_valid_color(value: &str) -> bool {
    !value.trim().is_empty() && parse_color(value).is_ok()
}

/// Parse any CSS color value into normalized RGBA
pub fn parse_color(value: &str) -> Result<Color, ThemeParseError> {
    let value = value.trim();
    let css_color = CssColor::parse_string(value)
        .map_err(|e| ThemeParseError::InvalidColor(format!("{value}: {e:?}")))?;
    css_color_to_color(&css_color, value)
}

fn css_color_to_color(css_color: &CssColor, source: &str) -> Result<Color, ThemeParseError> {
    match css_color {
        CssColor::RGBA(rgba) => Ok(rgba_to_color(rgba)),
        CssColor::CurrentColor => Ok(Color::WHITE),
        // The desktop has no dark scheme, so light-dark() resolves to light
        CssColor::LightDark(light, _) => css_color_to_color(light, source),
        other => match other.to_rgb() {
            Ok(CssColor::RGBA(rgba)) => Ok(rgba_to_color(&rgba)),
            _ => Err(ThemeParseError::InvalidColor(format!("{source}: no sRGB value"))),
        },
    }
}

fn rgba_to_color(rgba: &RGBA) -> Color {
    Color::from_u8(rgba.red, rgba.green, rgba.blue, rgba.alpha)
}

/// Interpret a `background-size` value.
///
/// Unknown values fall back to `cover`, which is also the element default.
pub fn parse_background_size(value: &str) -> BackgroundSize {
    let value = value.trim().to_lowercase();
    match value.as_str() {
        "cover" => BackgroundSize::Cover,
        "contain" => BackgroundSize::Contain,
        "auto" | "auto auto" => BackgroundSize::Auto,
        other => {
            let mut parts = other.split_whitespace().map(|p| p.trim_end_matches("px").parse::<u32>());
            match (parts.next(), parts.next()) {
                (Some(Ok(w)), Some(Ok(h))) if w > 0 && h > 0 => BackgroundSize::Fixed(w, h),
                (Some(Ok(w)), None) if w > 0 => BackgroundSize::Fixed(w, w),
                _ => {
                    log::debug!("Unrecognized background-size {:?}, using cover", other);
                    BackgroundSize::Cover
                }
            }
        }
    }
}

/// Interpret a `background-position` value.
///
/// Keyword order is not significant ("top left" == "left top").
pub fn parse_background_position(value: &str) -> BackgroundPosition {
    let value = value.trim().to_lowercase();
    let words: Vec<&str> = value.split_whitespace().collect();

    let has = |w: &str| words.contains(&w);
    let keywords_only = words
        .iter()
        .all(|w| matches!(*w, "top" | "bottom" | "left" | "right" | "center"));

    if keywords_only && !words.is_empty() {
        let vertical = if has("top") { -1 } else if has("bottom") { 1 } else { 0 };
        let horizontal = if has("left") { -1 } else if has("right") { 1 } else { 0 };
        return match (horizontal, vertical) {
            (0, 0) => BackgroundPosition::Center,
            (0, -1) => BackgroundPosition::Top,
            (0, 1) => BackgroundPosition::Bottom,
            (-1, 0) => BackgroundPosition::Left,
            (1, 0) => BackgroundPosition::Right,
            (-1, -1) => BackgroundPosition::TopLeft,
            (1, -1) => BackgroundPosition::TopRight,
            (-1, 1) => BackgroundPosition::BottomLeft,
            _ => BackgroundPosition::BottomRight,
        };
    }

    if let [x, y] = words.as_slice() {
        let x = x.strip_suffix('%').and_then(|v| v.parse::<f32>().ok());
        let y = y.strip_suffix('%').and_then(|v| v.parse::<f32>().ok());
        if let (Some(x), Some(y)) = (x, y) {
            return BackgroundPosition::Percent(x / 100.0, y / 100.0);
        }
    }

    log::debug!("Unrecognized background-position {:?}, using center", value);
    BackgroundPosition::Center
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_colors() {
        assert!(is_valid_color("transparent"));
        assert!(is_valid_color("#ff0000"));
        assert!(is_valid_color("#f00"));
        assert!(is_valid_color("rgb(255, 0, 0)"));
        assert!(is_valid_color("rgba(0, 255, 255, 0.6)"));
        assert!(is_valid_color("hsl(120, 50%, 50%)"));
        assert!(is_valid_color("rebeccapurple"));
        assert!(is_valid_color("  red  "));
    }

    #[test]
    fn test_invalid_colors() {
        assert!(!is_valid_color(""));
        assert!(!is_valid_color("   "));
        assert!(!is_valid_color("not-a-color"));
        assert!(!is_valid_color("#ggg"));
        assert!(!is_valid_color("red blue"));
        assert!(!is_valid_color("rgb(1, 2"));
    }

    #[test]
    fn test_parse_hex_color() {
        let c = parse_color("#ff5555").unwrap();
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.333).abs() < 0.01);

        let c = parse_color("#fff").unwrap();
        assert!((c.b - 1.0).abs() < 0.01);

        let c = parse_color("#0000").unwrap();
        assert_eq!(c.a, 0.0);

        assert!(parse_color("#12345").is_err());
    }

    #[test]
    fn test_parse_rgb_color() {
        let c = parse_color("rgb(255, 85, 85)").unwrap();
        assert!((c.r - 1.0).abs() < 0.01);

        let c = parse_color("rgba(0, 255, 255, 0.6)").unwrap();
        assert!((c.g - 1.0).abs() < 0.01);
        assert!((c.a - 0.6).abs() < 0.01);

        let c = parse_color("rgb(0 128 0 / 50%)").unwrap();
        assert!((c.a - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_parse_hsl_color() {
        let c = parse_color("hsl(0, 100%, 50%)").unwrap();
        assert!((c.r - 1.0).abs() < 0.01);
        assert!(c.g.abs() < 0.01);
    }

    #[test]
    fn test_parse_color_red() {
        let c = parse_color("#ff0000").unwrap();
        assert_eq!(c.to_rgba8(), [255, 0, 0, 255]);
        assert!(parse_color("nope").is_err());
    }

    #[test]
    fn test_wide_gamut_colors_convert_to_srgb() {
        for value in [
            "lab(50% 40 59.5)",
            "lch(52% 72 50)",
            "oklab(0.6 0.1 0.1)",
            "oklch(70% 0.1 200)",
            "color(display-p3 1 0 0)",
            "hwb(120 0% 0%)",
        ] {
            assert!(is_valid_color(value), "{value} should be valid");
            let c = parse_color(value).unwrap();
            assert_eq!(c.a, 1.0, "{value}");
        }

        let red = parse_color("color(srgb 1 0 0)").unwrap();
        assert_eq!(red.to_rgba8(), [255, 0, 0, 255]);

        let teal = parse_color("oklch(70% 0.1 200)").unwrap();
        assert!(teal.g > teal.r && teal.b > teal.r);
    }

    #[test]
    fn test_parse_background_size() {
        assert_eq!(parse_background_size("cover"), BackgroundSize::Cover);
        assert_eq!(parse_background_size("Contain"), BackgroundSize::Contain);
        assert_eq!(parse_background_size("auto"), BackgroundSize::Auto);
        assert_eq!(parse_background_size("100px 200px"), BackgroundSize::Fixed(100, 200));
        assert_eq!(parse_background_size("64px"), BackgroundSize::Fixed(64, 64));
        assert_eq!(parse_background_size("weird"), BackgroundSize::Cover);
    }

    #[test]
    fn test_parse_background_position() {
        assert_eq!(parse_background_position("center"), BackgroundPosition::Center);
        assert_eq!(parse_background_position("top left"), BackgroundPosition::TopLeft);
        assert_eq!(parse_background_position("left top"), BackgroundPosition::TopLeft);
        assert_eq!(parse_background_position("bottom right"), BackgroundPosition::BottomRight);
        assert_eq!(parse_background_position("center top"), BackgroundPosition::Top);
        assert_eq!(
            parse_background_position("25% 75%"),
            BackgroundPosition::Percent(0.25, 0.75)
        );
        assert_eq!(parse_background_position("???"), BackgroundPosition::Center);
    }
}
