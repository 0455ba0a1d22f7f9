use std::path::{Path, PathBuf};

use anyhow::Result;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Everything goes to a single file appender: the scraper runs from a
/// scheduler and stdout is reserved for metric lines.
pub fn app_config(path: &Path, level: LevelFilter) -> Result<Config> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} - {m}{n}",
        )))
        .build(path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(level))?;
    Ok(config)
}

pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    log4rs::init_config(app_config(path, level)?)?;
    Ok(())
}

pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("towerflux.log")
}
