//! Logfmt record encoding
//!
//! `lvl=<level> msg="<message>" key=value ...`, space separated. A non-empty
//! message is always quoted. Floats always carry three fractional digits.
//! String values are quoted only when they are empty or hold a space, `=`,
//! `"` or a control character; backslashes are escaped whether or not the
//! value is quoted. Keys follow the same rules as string values.

use super::{pairs, short_escape, Pair, TIME_LAYOUT};
use crate::core::buffer::{BitSize, Buffer, FloatFormat};
use crate::core::level::Level;
use crate::core::value::{Value, ERROR_KEY};
use std::fmt::Write as _;

const FLOAT_PRECISION: usize = 3;

pub(crate) fn encode(msg: &str, lvl: Level, ctx: &[Value], buf: &mut Buffer) {
    buf.write_str("lvl=");
    buf.write_str(lvl.as_str());
    buf.write_str(" msg=");
    if !msg.is_empty() {
        buf.write_byte(b'"');
        write_escaped(buf, msg);
        buf.write_byte(b'"');
    }

    for pair in pairs(ctx) {
        let (key, value) = match pair {
            Pair::Field(key, value) => (key, value),
            Pair::Malformed(value) => (ERROR_KEY, value),
        };
        buf.write_byte(b' ');
        write_string(buf, key);
        buf.write_byte(b'=');
        write_value(buf, value);
    }

    buf.write_byte(b'\n');
}

fn write_value(buf: &mut Buffer, value: &Value) {
    match value {
        Value::Int(i) => buf.append_int(*i),
        Value::Uint(u) => buf.append_uint(*u),
        Value::F32(f) => {
            buf.append_float(f64::from(*f), FloatFormat::Fixed(FLOAT_PRECISION), BitSize::B32)
        }
        Value::F64(f) => buf.append_float(*f, FloatFormat::Fixed(FLOAT_PRECISION), BitSize::B64),
        Value::Bool(b) => buf.append_bool(*b),
        Value::Str(s) | Value::Other(s) => write_string(buf, s),
        Value::Time(t) => buf.append_time(t, TIME_LAYOUT),
        Value::Nil => {}
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s
            .bytes()
            .any(|b| b == b' ' || b == b'=' || b == b'"' || b < 0x20)
}

fn write_string(buf: &mut Buffer, s: &str) {
    let quoted = needs_quotes(s);
    if quoted {
        buf.write_byte(b'"');
    }
    write_escaped(buf, s);
    if quoted {
        buf.write_byte(b'"');
    }
}

fn write_escaped(buf: &mut Buffer, s: &str) {
    let bytes = s.as_bytes();
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        let short = short_escape(b);
        if short.is_none() && b >= 0x20 {
            continue;
        }
        // Multi-byte UTF-8 never contains bytes below 0x80, so `i` is a char boundary
        buf.write_str(&s[start..i]);
        match short {
            Some(esc) => buf.write_str(esc),
            None => {
                let _ = write!(buf, "\\u{:04x}", b);
            }
        }
        start = i + 1;
    }

    buf.write_str(&s[start..]);
}
