//! Core logger types and traits

pub mod buffer;
pub mod config;
pub mod error;
pub mod handler;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod value;

pub use buffer::{pool, BitSize, Buffer, BufferPool, FloatFormat, PooledBuffer};
pub use config::{BufferConfig, LoggerConfig};
pub use error::{LoggedError, Result};
pub use handler::{handler_fn, Handler, HandlerFn};
pub use level::Level;
pub use logger::{normalize, Logger, LoggerBuilder, NORMALIZE_NOTE};
pub use metrics::HandlerMetrics;
pub use value::{Value, ERROR_KEY};
