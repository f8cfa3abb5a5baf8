//! Handler that drops everything

use crate::core::handler::Handler;
use crate::core::level::Level;
use crate::core::value::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardHandler;

impl Handler for DiscardHandler {
    #[inline]
    fn log(&self, _msg: &str, _lvl: Level, _ctx: &[Value]) {}
}
