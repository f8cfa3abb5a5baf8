//! Log file writers for the stream handlers

use crate::core::error::{LoggedError, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// Open `path` for appending, creating it and its parent directories
///
/// # Examples
///
/// ```no_run
/// use logged::{open_log_file, Format, StreamHandler};
///
/// let file = open_log_file("/var/log/app/app.log").unwrap();
/// let handler = StreamHandler::new(file, Format::Json);
/// ```
pub fn open_log_file(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LoggedError::io_operation(format!("creating log directory '{}'", parent.display()), e)
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggedError::io_operation(format!("opening log file '{}'", path.display()), e))
}
