//! Serializable logger configuration

use super::{
    error::{LoggedError, Result},
    level::Level,
    logger::LoggerBuilder,
};
use crate::formats::Format;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MAX_BYTES: usize = 8 * 1024;
const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;

/// Logger settings as read from a config file
///
/// Missing fields take their defaults: logfmt, `info`, unbuffered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub format: Format,
    pub level: Level,
    pub buffer: Option<BufferConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    /// Pending bytes that trigger an immediate flush
    pub max_bytes: usize,
    /// Zero disables the periodic flush
    pub flush_interval_ms: u64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
        }
    }
}

impl BufferConfig {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}

impl LoggerConfig {
    /// Parse and validate a JSON document
    ///
    /// ```
    /// use logged::{Format, Level, LoggerConfig};
    ///
    /// let config = LoggerConfig::from_json(r#"{"format": "json", "level": "debug"}"#).unwrap();
    /// assert_eq!(config.format, Format::Json);
    /// assert_eq!(config.level, Level::Debug);
    /// assert!(config.buffer.is_none());
    /// ```
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(buffer) = &self.buffer {
            if buffer.max_bytes == 0 {
                return Err(LoggedError::config(
                    "buffer",
                    "max_bytes must be greater than zero",
                ));
            }
        }
        Ok(())
    }

    pub fn into_builder(self) -> LoggerBuilder {
        let builder = LoggerBuilder::new()
            .format(self.format)
            .min_level(self.level);

        match self.buffer {
            Some(buffer) => builder.buffered(buffer.max_bytes, buffer.flush_interval()),
            None => builder,
        }
    }
}
