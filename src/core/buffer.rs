//! Reusable byte buffers for record encoding
//!
//! Encoders write into a [`Buffer`] borrowed from a [`BufferPool`]. The
//! borrowed buffer goes back to the pool when its guard drops, so callers
//! must copy the encoded bytes out before releasing it.

use chrono::{DateTime, TimeZone};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::io;
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

/// Initial capacity of buffers created by the shared pool
pub const DEFAULT_BUFFER_CAPACITY: usize = 512;

/// Number of idle buffers a pool keeps around
pub const DEFAULT_MAX_IDLE: usize = 256;

/// Buffers that grew beyond this are freed instead of pooled
const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// How a float is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatFormat {
    /// Fewest digits that round-trip at the given bit size
    Shortest,
    /// Exactly this many fractional digits, rounded to nearest
    Fixed(usize),
}

/// Precision the float value is interpreted at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitSize {
    B32,
    B64,
}

/// Growable byte buffer with typed append helpers
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    b: Vec<u8>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            b: Vec::with_capacity(capacity),
        }
    }

    pub fn append_int(&mut self, i: i64) {
        let _ = write!(self, "{}", i);
    }

    pub fn append_uint(&mut self, u: u64) {
        let _ = write!(self, "{}", u);
    }

    /// Append a float; non-finite values render as `NaN`, `+Inf` or `-Inf`
    pub fn append_float(&mut self, f: f64, format: FloatFormat, bits: BitSize) {
        if f.is_nan() {
            self.write_str("NaN");
            return;
        }
        if f.is_infinite() {
            self.write_str(if f > 0.0 { "+Inf" } else { "-Inf" });
            return;
        }

        let _ = match (format, bits) {
            (FloatFormat::Shortest, BitSize::B32) => write!(self, "{}", f as f32),
            (FloatFormat::Shortest, BitSize::B64) => write!(self, "{}", f),
            (FloatFormat::Fixed(prec), BitSize::B32) => write!(self, "{:.*}", prec, f as f32),
            (FloatFormat::Fixed(prec), BitSize::B64) => write!(self, "{:.*}", prec, f),
        };
    }

    pub fn append_bool(&mut self, v: bool) {
        self.write_str(if v { "true" } else { "false" });
    }

    /// Append a timestamp rendered with a strftime-style layout
    pub fn append_time<Tz>(&mut self, t: &DateTime<Tz>, layout: &str)
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let _ = write!(self, "{}", t.format(layout));
    }

    #[inline]
    pub fn write_byte(&mut self, v: u8) {
        self.b.push(v);
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.b.extend_from_slice(s.as_bytes());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.b.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.b.capacity()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.b
    }

    /// View the contents as text, borrowing when they are valid UTF-8
    pub fn to_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.b)
    }

    /// Empty the buffer, keeping its allocation
    #[inline]
    pub fn reset(&mut self) {
        self.b.clear();
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.b
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Buffer::write_str(self, s);
        Ok(())
    }
}

impl io::Write for Buffer {
    fn write(&mut self, bs: &[u8]) -> io::Result<usize> {
        self.b.extend_from_slice(bs);
        Ok(bs.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Pool of idle buffers backed by a bounded channel used as a free list
#[derive(Debug)]
pub struct BufferPool {
    free_tx: Sender<Buffer>,
    free_rx: Receiver<Buffer>,
    capacity: usize,
}

impl BufferPool {
    pub fn new(capacity: usize) -> Self {
        Self::with_max_idle(capacity, DEFAULT_MAX_IDLE)
    }

    pub fn with_max_idle(capacity: usize, max_idle: usize) -> Self {
        let (free_tx, free_rx) = bounded(max_idle);
        Self {
            free_tx,
            free_rx,
            capacity,
        }
    }

    /// Borrow an empty buffer, allocating one if none is idle
    pub fn get(&self) -> PooledBuffer<'_> {
        let mut buf = self
            .free_rx
            .try_recv()
            .unwrap_or_else(|_| Buffer::with_capacity(self.capacity));
        buf.reset();

        PooledBuffer { buf, pool: self }
    }

    fn put(&self, buf: Buffer) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        // A full free list just drops the buffer
        let _ = self.free_tx.try_send(buf);
    }

    /// Number of buffers currently waiting for reuse
    pub fn idle(&self) -> usize {
        self.free_rx.len()
    }
}

/// A buffer on loan from a [`BufferPool`], returned on drop
pub struct PooledBuffer<'a> {
    buf: Buffer,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Buffer {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.buf));
    }
}

/// Process-wide pool shared by the formatters and handlers
pub fn pool() -> &'static BufferPool {
    static POOL: OnceLock<BufferPool> = OnceLock::new();
    POOL.get_or_init(|| BufferPool::new(DEFAULT_BUFFER_CAPACITY))
}
