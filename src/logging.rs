// src/logging.rs

//! Global logging setup driven by the `[logging]` table.

use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::{
    path::{Path, PathBuf},
    process, thread,
};

use crate::config::LoggingConfig;

/// Map a configured level name onto a filter; unknown names fall back to INFO.
pub fn level_filter(level: &str) -> LevelFilter {
    match level.to_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Path of the log file when file logging is enabled.
pub fn log_file_path(log_dir: &Path, cfg: &LoggingConfig) -> Option<PathBuf> {
    cfg.enable
        .then(|| log_dir.join(cfg.file.as_deref().unwrap_or("netguard.log")))
}

/// Build the dispatch without installing it.
pub fn build_dispatch(log_dir: &Path, cfg: &LoggingConfig) -> Result<Dispatch, fern::InitError> {
    let mut dispatch = Dispatch::new()
        .format(|out, msg, record| {
            out.finish(format_args!(
                "[{}][{:5}][{}][pid={}][tid={:?}] {}",
                Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                process::id(),
                thread::current().id(),
                msg
            ))
        })
        .level(level_filter(&cfg.level))
        .chain(std::io::stdout());

    if let Some(path) = log_file_path(log_dir, cfg) {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }
    Ok(dispatch)
}

/// Configure global logging as requested in `cfg`. Can only succeed once per
/// process.
pub fn setup_logging(log_dir: &Path, cfg: &LoggingConfig) -> Result<(), fern::InitError> {
    build_dispatch(log_dir, cfg)?.apply()?;
    log::info!("Logging initialised at level {}", level_filter(&cfg.level));
    Ok(())
}
