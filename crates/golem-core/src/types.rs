use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A continuous world-space position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A block-aligned anchor with its dimension.
///
/// Set only by explicit command (`!sethome` / `!base`), overwritten on
/// re-set, absent until first set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub dimension: String,
}

impl Location {
    /// Capture a live position as a block-aligned anchor.
    pub fn from_position(pos: Position, dimension: impl Into<String>) -> Self {
        Self {
            x: pos.x.floor() as i32,
            y: pos.y.floor() as i32,
            z: pos.z.floor() as i32,
            dimension: dimension.into(),
        }
    }

    /// The anchor as a navigation target.
    pub fn position(&self) -> Position {
        Position::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// One of the interchangeable reply backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    ChatGpt,
    Gemini,
    DeepSeek,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::ChatGpt, Backend::Gemini, Backend::DeepSeek];

    /// Config / wire identifier, e.g. "chatgpt".
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::ChatGpt => "chatgpt",
            Backend::Gemini => "gemini",
            Backend::DeepSeek => "deepseek",
        }
    }

    /// Display name used in chat messages, e.g. "ChatGPT".
    pub fn label(self) -> &'static str {
        match self {
            Backend::ChatGpt => "ChatGPT",
            Backend::Gemini => "Gemini",
            Backend::DeepSeek => "DeepSeek",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown backend: {0}")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chatgpt" => Ok(Backend::ChatGpt),
            "gemini" => Ok(Backend::Gemini),
            "deepseek" => Ok(Backend::DeepSeek),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance_to(b), 5.0);
    }

    #[test]
    fn test_location_floors_coordinates() {
        let loc = Location::from_position(Position::new(10.7, 64.2, -3.4), "overworld");
        assert_eq!((loc.x, loc.y, loc.z), (10, 64, -4));
        assert_eq!(loc.to_string(), "10, 64, -4");
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("ChatGPT".parse::<Backend>().unwrap(), Backend::ChatGpt);
        assert_eq!("gemini".parse::<Backend>().unwrap(), Backend::Gemini);
        assert!("claude".parse::<Backend>().is_err());
    }
}
