//! Buffered file logging example
//!
//! Records collect in memory and reach the file when the buffer fills,
//! when the flush interval elapses, or when the logger is closed.
//!
//! Run with: cargo run --example buffered_file

use logged::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== logged - Buffered File Example ===\n");

    let dir = std::env::temp_dir().join("logged-demo");
    let path = dir.join("app.log");

    let config = LoggerConfig::from_json(
        r#"{
            "format": "json",
            "level": "debug",
            "buffer": { "max_bytes": 4096, "flush_interval_ms": 200 }
        }"#,
    )?;
    println!("Config: {:?}", config);

    let logger = config
        .into_builder()
        .context(ctx!["pid", std::process::id()])
        .build(open_log_file(&path)?);

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let logger = logger.with(&ctx!["worker", id]);
            thread::spawn(move || {
                for job in 0..25 {
                    debug!(logger, "job finished", "job", job, "ok", job % 7 != 0);
                }
            })
        })
        .collect();

    for worker in workers {
        let _ = worker.join();
    }

    // Give the timer a chance to flush before closing
    thread::sleep(Duration::from_millis(300));
    logger.close()?;

    let content = std::fs::read_to_string(&path)?;
    println!("Wrote {} records to {}", content.lines().count(), path.display());
    if let Some(last) = content.lines().last() {
        println!("Last record: {}", last);
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
