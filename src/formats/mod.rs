//! Record encoders
//!
//! Turns a message, a level and an ordered key/value context into one
//! newline-terminated line of either format:
//! - Json: `{"lvl":"info","msg":"started","port":8080}`
//! - Logfmt: `lvl=info msg="started" port=8080`
//!
//! Encoding is pure. The only clock ever read is a timestamp already
//! carried in the context.

pub mod json;
pub mod logfmt;

use crate::core::buffer::{self, Buffer};
use crate::core::error::{LoggedError, Result};
use crate::core::level::Level;
use crate::core::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// strftime layout for timestamp values, e.g. `2018-11-07T06:54:30+0000`
pub const TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Encodes records into bytes
pub trait Formatter: Send + Sync {
    /// Append one encoded record, newline included, to `buf`
    fn format_into(&self, msg: &str, lvl: Level, ctx: &[Value], buf: &mut Buffer);

    /// Encode one record into an owned byte vector
    fn format(&self, msg: &str, lvl: Level, ctx: &[Value]) -> Vec<u8> {
        let mut buf = buffer::pool().get();
        self.format_into(msg, lvl, ctx, &mut buf);
        buf.as_bytes().to_vec()
    }
}

impl<F: Formatter + ?Sized> Formatter for Box<F> {
    fn format_into(&self, msg: &str, lvl: Level, ctx: &[Value], buf: &mut Buffer) {
        (**self).format_into(msg, lvl, ctx, buf)
    }
}

impl<F: Formatter + ?Sized> Formatter for Arc<F> {
    fn format_into(&self, msg: &str, lvl: Level, ctx: &[Value], buf: &mut Buffer) {
        (**self).format_into(msg, lvl, ctx, buf)
    }
}

/// Adapts a plain function into a [`Formatter`]
///
/// ```
/// use logged::{FormatterFn, Formatter, Level};
///
/// let f = FormatterFn(|msg: &str, lvl: Level, _ctx: &[logged::Value], buf: &mut logged::Buffer| {
///     buf.write_str(lvl.as_str());
///     buf.write_byte(b' ');
///     buf.write_str(msg);
///     buf.write_byte(b'\n');
/// });
///
/// assert_eq!(f.format("hi", Level::Warn, &[]), b"warn hi\n");
/// ```
pub struct FormatterFn<F>(pub F);

impl<F> Formatter for FormatterFn<F>
where
    F: Fn(&str, Level, &[Value], &mut Buffer) + Send + Sync,
{
    fn format_into(&self, msg: &str, lvl: Level, ctx: &[Value], buf: &mut Buffer) {
        (self.0)(msg, lvl, ctx, buf)
    }
}

/// The built-in encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    Json,
    #[default]
    Logfmt,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Logfmt => "logfmt",
        }
    }
}

impl Formatter for Format {
    fn format_into(&self, msg: &str, lvl: Level, ctx: &[Value], buf: &mut Buffer) {
        match self {
            Format::Json => json::encode(msg, lvl, ctx, buf),
            Format::Logfmt => logfmt::encode(msg, lvl, ctx, buf),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = LoggedError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "logfmt" => Ok(Format::Logfmt),
            _ => Err(LoggedError::InvalidFormat(s.to_string())),
        }
    }
}

impl Serialize for Format {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Format {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Look up a formatter by its format name (`json` or `logfmt`)
pub fn formatter_from_str(name: &str) -> Result<Box<dyn Formatter>> {
    let format: Format = name.parse()?;
    Ok(Box::new(format))
}

/// One step of walking a context
pub(crate) enum Pair<'a> {
    Field(&'a str, &'a Value),
    /// A non-string key; nothing after it is encoded
    Malformed(&'a Value),
}

static NIL: Value = Value::Nil;

/// Walk `ctx` two entries at a time, stopping after the first bad key
///
/// A trailing key without a value pairs with nil.
pub(crate) fn pairs(ctx: &[Value]) -> impl Iterator<Item = Pair<'_>> {
    let mut stopped = false;
    ctx.chunks(2).map_while(move |chunk| {
        if stopped {
            return None;
        }
        match chunk[0].as_key() {
            Some(key) => Some(Pair::Field(key, chunk.get(1).unwrap_or(&NIL))),
            None => {
                stopped = true;
                Some(Pair::Malformed(&chunk[0]))
            }
        }
    })
}

/// Control characters with a short two-character escape
#[inline]
pub(crate) fn short_escape(b: u8) -> Option<&'static str> {
    match b {
        b'"' => Some("\\\""),
        b'\\' => Some("\\\\"),
        b'\n' => Some("\\n"),
        b'\r' => Some("\\r"),
        b'\t' => Some("\\t"),
        0x08 => Some("\\b"),
        0x0c => Some("\\f"),
        _ => None,
    }
}
