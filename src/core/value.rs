//! Values carried in a record's key/value context
//!
//! A context is a flat, ordered slice of alternating keys and values. Keys
//! are checked when the record is encoded, not when the context is built,
//! so any `Value` may sit in a key position.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::borrow::Cow;
use std::fmt;
use std::time::SystemTime;

/// Key used for synthetic pairs describing a malformed context
pub const ERROR_KEY: &str = "LOGGED_ERROR";

/// A single context entry
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Str(String),
    Time(DateTime<FixedOffset>),
    Nil,
    /// Pre-rendered text for types without a dedicated encoding
    Other(String),
}

impl Value {
    /// Capture any `Display` type through its human-readable form
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Value::Other(value.to_string())
    }

    /// Capture any `Debug` type through its debug form
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Value::Other(format!("{:?}", value))
    }

    /// The key text, if this value may sit in a key position
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) | Value::Other(s) => f.write_str(s),
            Value::Time(t) => write!(f, "{}", t.format(crate::formats::TIME_LAYOUT)),
            Value::Nil => f.write_str("nil"),
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(s: Cow<'_, str>) -> Self {
        Value::Str(s.into_owned())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(t: DateTime<Tz>) -> Self {
        Value::Time(t.fixed_offset())
    }
}

impl From<SystemTime> for Value {
    fn from(t: SystemTime) -> Self {
        Value::from(DateTime::<Utc>::from(t))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

/// Build a context vector from alternating keys and values
///
/// ```
/// use logged::{ctx, Value};
///
/// let ctx = ctx!["user", "alice", "attempts", 3, "admin", false];
/// assert_eq!(ctx.len(), 6);
/// assert_eq!(ctx[3], Value::Int(3));
/// ```
#[macro_export]
macro_rules! ctx {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($item:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($item)),+]
    };
}
