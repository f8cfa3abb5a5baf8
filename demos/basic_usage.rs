//! Basic logger usage example
//!
//! Demonstrates logging to stdout in both formats, context binding and
//! level filtering.
//!
//! Run with: cargo run --example basic_usage

use logged::prelude::*;

fn main() -> Result<()> {
    println!("=== logged - Basic Usage Example ===\n");

    // Every record written straight to stdout as logfmt
    let logger = Logger::new(StreamHandler::stdout(Format::Logfmt), ctx!["app", "basic_usage"]);

    println!("1. Logging at different levels:");
    debug!(logger, "This is a debug message");
    info!(logger, "This is an info message", "port", 8080);
    warn!(logger, "This is a warning message", "retries", 3);
    error!(logger, "This is an error message", "path", "/var/run/app.sock");
    crit!(logger, "This is a critical message", "disk_free", 0.015);

    println!("\n2. Child loggers carry extra context:");
    let request = logger.with(&ctx!["request_id", 42]);
    request.info("handling request", &ctx!["method", "GET"]);
    request.info("request done", &ctx!["status", 200, "elapsed_ms", 12.5]);

    println!("\n3. Odd contexts are padded and flagged:");
    logger.warn("missing value", &ctx!["user"]);

    println!("\n4. JSON output with a minimum level of warn:");
    let json = Logger::new(
        LevelFilterHandler::new(Level::Warn, StreamHandler::stdout(Format::Json)),
        Vec::new(),
    );
    json.info("not shown", &[]);
    json.warn("shown", &ctx!["quote", "\"quoted\"", "nothing", ()]);
    json.crit("shown too", &ctx!["tags", Value::debug(&["a", "b"])]);

    logger.close()?;
    json.close()?;

    println!("\n=== Example completed successfully ===");
    Ok(())
}
