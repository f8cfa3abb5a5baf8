//! Handler trait for record destinations

use super::{error::Result, level::Level, value::Value};
use std::sync::Arc;

/// Receives every record a [`Logger`](super::logger::Logger) emits
///
/// `log` must not fail or block indefinitely. Handlers that own resources
/// override `close`; the default has nothing to release.
pub trait Handler: Send + Sync {
    fn log(&self, msg: &str, lvl: Level, ctx: &[Value]);

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn log(&self, msg: &str, lvl: Level, ctx: &[Value]) {
        (**self).log(msg, lvl, ctx)
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn log(&self, msg: &str, lvl: Level, ctx: &[Value]) {
        (**self).log(msg, lvl, ctx)
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}

/// Adapts a closure into a [`Handler`] without a close step
///
/// ```
/// use logged::{handler_fn, Handler, Level};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let seen = AtomicUsize::new(0);
/// let h = handler_fn(|_msg: &str, _lvl: Level, _ctx: &[logged::Value]| {
///     seen.fetch_add(1, Ordering::Relaxed);
/// });
///
/// h.log("hello", Level::Info, &[]);
/// assert_eq!(seen.load(Ordering::Relaxed), 1);
/// ```
pub struct HandlerFn<F>(F);

pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&str, Level, &[Value]) + Send + Sync,
{
    HandlerFn(f)
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&str, Level, &[Value]) + Send + Sync,
{
    fn log(&self, msg: &str, lvl: Level, ctx: &[Value]) {
        (self.0)(msg, lvl, ctx)
    }
}
