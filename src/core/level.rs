//! Log level definitions
//!
//! Levels are ordered by severity, most severe first: a lower value is more
//! severe, so `Level::Crit < Level::Debug`.

use super::error::LoggedError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    Crit = 0,
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
    Debug = 4,
}

impl Level {
    /// All levels, most severe first
    pub const ALL: [Level; 5] = [
        Level::Crit,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
    ];

    /// Canonical 4-character name used in encoded records
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Crit => "crit",
            Level::Error => "eror",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "dbug",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Whether a record at this level passes a filter set to `threshold`
    #[inline]
    pub fn is_enabled_for(self, threshold: Level) -> bool {
        self <= threshold
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" | "dbug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" | "eror" => Ok(Level::Error),
            "crit" => Ok(Level::Crit),
            _ => Err(LoggedError::InvalidLevel(s.to_string())),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
