//! Handler implementations

pub mod buffered;
pub mod discard;
pub mod file;
pub mod filter;
pub mod stream;

pub use buffered::BufferedStreamHandler;
pub use discard::DiscardHandler;
pub use file::open_log_file;
pub use filter::LevelFilterHandler;
pub use stream::StreamHandler;

pub use crate::core::handler::{handler_fn, Handler, HandlerFn};
