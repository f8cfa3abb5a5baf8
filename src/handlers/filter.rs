//! Level filtering decorator

use crate::core::error::Result;
use crate::core::handler::Handler;
use crate::core::level::Level;
use crate::core::value::Value;

/// Forwards records at `threshold` or more severe to the inner handler
pub struct LevelFilterHandler<H> {
    threshold: Level,
    inner: H,
}

impl<H: Handler> LevelFilterHandler<H> {
    pub fn new(threshold: Level, inner: H) -> Self {
        Self { threshold, inner }
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: Handler> Handler for LevelFilterHandler<H> {
    #[inline]
    fn log(&self, msg: &str, lvl: Level, ctx: &[Value]) {
        if lvl.is_enabled_for(self.threshold) {
            self.inner.log(msg, lvl, ctx);
        }
    }

    fn close(&self) -> Result<()> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::handler::handler_fn;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct CloseableHandler {
        close_called: AtomicBool,
    }

    impl Handler for CloseableHandler {
        fn log(&self, _msg: &str, _lvl: Level, _ctx: &[Value]) {}

        fn close(&self) -> Result<()> {
            self.close_called.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_level_filter_handler() {
        let count = AtomicUsize::new(0);
        let h = LevelFilterHandler::new(
            Level::Info,
            handler_fn(|_: &str, _: Level, _: &[Value]| {
                count.fetch_add(1, Ordering::SeqCst);
            }),
        );

        h.log("test", Level::Debug, &[]);
        h.log("test", Level::Info, &[]);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_level_filter_admits_more_severe() {
        let seen = parking_lot::Mutex::new(Vec::new());
        let h = LevelFilterHandler::new(
            Level::Warn,
            handler_fn(|_: &str, lvl: Level, _: &[Value]| seen.lock().push(lvl)),
        );

        for lvl in Level::ALL {
            h.log("test", lvl, &[]);
        }

        assert_eq!(*seen.lock(), vec![Level::Crit, Level::Error, Level::Warn]);
    }

    #[test]
    fn test_level_filter_close_without_inner_close() {
        let h = LevelFilterHandler::new(Level::Info, handler_fn(|_: &str, _: Level, _: &[Value]| {}));

        assert!(h.close().is_ok());
    }

    #[test]
    fn test_level_filter_calls_inner_close() {
        let h = LevelFilterHandler::new(
            Level::Info,
            CloseableHandler {
                close_called: AtomicBool::new(false),
            },
        );

        h.close().unwrap();

        assert!(h.inner().close_called.load(Ordering::SeqCst));
    }
}
