//! Opaque animation options record
//!
//! Options round-trip through the `background-animation-options` attribute
//! as a JSON object. The controller passes them along untouched; only the
//! animation that receives them knows which keys it understands.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use wos_theme::Color;

/// Schema-less option mapping handed to an animation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationOptions(Map<String, Value>);

impl AnimationOptions {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize from the attribute's JSON form. Only objects are accepted.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to the attribute's JSON form
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert or replace a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a value as a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Get a number, accepting numeric strings too
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get a non-negative integer, accepting numeric strings too
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64().map(|v| v as usize),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get a boolean (true/false, or "true"/"yes"/"1" style strings)
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Get a CSS color value
    pub fn get_color(&self, key: &str) -> Option<Color> {
        let raw = self.get_str(key)?;
        match wos_theme::parse_color(raw) {
            Ok(color) => Some(color),
            Err(e) => {
                log::debug!("Ignoring option {}: {}", key, e);
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for AnimationOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_object() {
        let opts = AnimationOptions::from_json(r#"{"speed": 2, "color": "lime"}"#).unwrap();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts.get_f64("speed"), Some(2.0));
        assert_eq!(opts.get_str("color"), Some("lime"));
    }

    #[test]
    fn test_rejects_malformed_and_non_objects() {
        assert!(AnimationOptions::from_json("{bad json").is_err());
        assert!(AnimationOptions::from_json("[1, 2]").is_err());
        assert!(AnimationOptions::from_json("42").is_err());
        assert!(AnimationOptions::from_json("").is_err());
    }

    #[test]
    fn test_to_json_reparses_equal() {
        let mut opts = AnimationOptions::new();
        opts.insert("density", 1.5);
        opts.insert("charset", "01");
        let again = AnimationOptions::from_json(&opts.to_json()).unwrap();
        assert_eq!(again, opts);
    }

    #[test]
    fn test_lenient_getters() {
        let opts = AnimationOptions::from_json(
            r##"{"count": "12", "glow": "yes", "size": -3, "color": "#00ff00", "bad": "zzz"}"##,
        )
        .unwrap();
        assert_eq!(opts.get_usize("count"), Some(12));
        assert_eq!(opts.get_bool("glow"), Some(true));
        assert_eq!(opts.get_usize("size"), None);
        assert_eq!(opts.get_f64("size"), Some(-3.0));
        assert_eq!(opts.get_color("color").map(|c| c.to_rgba8()), Some([0, 255, 0, 255]));
        assert_eq!(opts.get_color("bad"), None);
        assert_eq!(opts.get_f64("missing"), None);
    }
}
