use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// User-configurable marker appearance and activation hotkey.
///
/// Every field carries its own serde default, so a persisted blob written by
/// an older version merges over the defaults field by field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_marker_color")]
    pub marker_color: String,
    #[serde(default = "default_outline_color")]
    pub outline_color: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_outline_width")]
    pub outline_width: f64,
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default = "default_hotkey")]
    pub hotkey: Hotkey,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            enabled: false,
            marker_color: default_marker_color(),
            outline_color: default_outline_color(),
            opacity: default_opacity(),
            outline_width: default_outline_width(),
            size: default_size(),
            hotkey: default_hotkey(),
        }
    }
}

impl Settings {
    /// Clamps the numeric fields into their documented ranges.
    pub fn normalized(mut self) -> Self {
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self.outline_width = self.outline_width.max(0.0);
        self.size = self.size.max(0.0);
        self
    }

    /// The subset of fields a live marker is drawn with.
    pub fn style(&self) -> MarkerStyle {
        MarkerStyle {
            fill: self.marker_color.clone(),
            opacity: self.opacity,
            outline: self.outline_color.clone(),
            outline_width: self.outline_width,
            radius: self.size,
        }
    }
}

fn default_marker_color() -> String {
    "#ff0000".to_string()
}

fn default_outline_color() -> String {
    "#ffffff".to_string()
}

fn default_opacity() -> f64 {
    0.8
}

fn default_outline_width() -> f64 {
    2.0
}

fn default_size() -> f64 {
    10.0
}

fn default_hotkey() -> Hotkey {
    Hotkey('1')
}

/// Style snapshot handed to the host when drawing a marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerStyle {
    pub fill: String,
    pub opacity: f64,
    pub outline: String,
    pub outline_width: f64,
    pub radius: f64,
}

/// A single alphanumeric character, stored upper-case and matched
/// case-insensitively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hotkey(char);

impl Hotkey {
    pub fn new(key: char) -> Result<Self, HotkeyError> {
        if key.is_ascii_alphanumeric() {
            Ok(Hotkey(key.to_ascii_uppercase()))
        } else {
            Err(HotkeyError::NotAlphanumeric(key))
        }
    }

    pub fn matches(&self, key: char) -> bool {
        key.to_ascii_uppercase() == self.0
    }

    pub fn key(&self) -> char {
        self.0
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Hotkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Hotkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(key), None) => Hotkey::new(key).map_err(D::Error::custom),
            _ => Err(D::Error::custom(HotkeyError::NotASingleCharacter(value))),
        }
    }
}

#[derive(Error, Debug)]
pub enum HotkeyError {
    #[error("hotkey must be a single character, got '{0}'")]
    NotASingleCharacter(String),
    #[error("hotkey must be alphanumeric, got '{0}'")]
    NotAlphanumeric(char),
}
