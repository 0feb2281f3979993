use anyhow::{Context, Result};
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use std::fs::OpenOptions;

/// 記錄檔名稱，寫在目前工作目錄
pub const LOG_FILE_NAME: &str = "sortbydate.log";

#[must_use]
pub const fn log_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// 將所有記錄附加到 [`LOG_FILE_NAME`]
pub fn init_logging(debug: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE_NAME)
        .with_context(|| format!("Failed to open log file {LOG_FILE_NAME}"))?;

    Builder::new()
        .filter_level(log_level(debug))
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .format_timestamp_secs()
        .try_init()
        .context("Failed to initialize logger")?;

    Ok(())
}
