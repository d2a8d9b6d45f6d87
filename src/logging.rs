//! Logger setup.
//!
//! Everything logs through the `log` facade; this module wires it to a
//! `fern` dispatch writing to stdout and, optionally, a log file.

use std::path::PathBuf;

use crate::config::LogConfig;

/// Location of the optional log file.
pub fn log_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("glprimer").join("glprimer.log"))
}

/// Installs the global logger. Fails if a logger is already installed or
/// the log file cannot be opened.
pub fn init(config: &LogConfig) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.level)
        .chain(std::io::stdout());

    if config.file {
        if let Some(path) = log_file_path() {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            dispatch = dispatch.chain(fern::log_file(&path)?);
        }
    }

    dispatch.apply()?;
    log::debug!("logging initialized at {}", config.level);
    Ok(())
}
