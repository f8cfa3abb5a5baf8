//! JSON record encoding
//!
//! One object per line. Level and message come first, then the context
//! pairs in call order. Strings are escaped by `serde_json`.

use super::{pairs, Pair, TIME_LAYOUT};
use crate::core::buffer::{BitSize, Buffer, FloatFormat};
use crate::core::level::Level;
use crate::core::value::{Value, ERROR_KEY};

pub(crate) fn encode(msg: &str, lvl: Level, ctx: &[Value], buf: &mut Buffer) {
    buf.write_str("{\"lvl\":\"");
    buf.write_str(lvl.as_str());
    buf.write_str("\",\"msg\":");
    write_string(buf, msg);

    for pair in pairs(ctx) {
        let (key, value) = match pair {
            Pair::Field(key, value) => (key, value),
            Pair::Malformed(value) => (ERROR_KEY, value),
        };
        buf.write_byte(b',');
        write_string(buf, key);
        buf.write_byte(b':');
        write_value(buf, value);
    }

    buf.write_str("}\n");
}

fn write_value(buf: &mut Buffer, value: &Value) {
    match value {
        Value::Int(i) => buf.append_int(*i),
        Value::Uint(u) => buf.append_uint(*u),
        Value::F32(f) => write_float(buf, f64::from(*f), BitSize::B32),
        Value::F64(f) => write_float(buf, *f, BitSize::B64),
        Value::Bool(b) => buf.append_bool(*b),
        Value::Str(s) | Value::Other(s) => write_string(buf, s),
        Value::Time(t) => {
            buf.write_byte(b'"');
            buf.append_time(t, TIME_LAYOUT);
            buf.write_byte(b'"');
        }
        Value::Nil => buf.write_str("null"),
    }
}

/// JSON has no literal for NaN or infinities, so those are quoted
fn write_float(buf: &mut Buffer, f: f64, bits: BitSize) {
    let quote = !f.is_finite();
    if quote {
        buf.write_byte(b'"');
    }
    buf.append_float(f, FloatFormat::Shortest, bits);
    if quote {
        buf.write_byte(b'"');
    }
}

fn write_string(buf: &mut Buffer, s: &str) {
    // Writing into a Buffer cannot fail
    let _ = serde_json::to_writer(&mut *buf, s);
}
