use std::{env, time::SystemTime};

use anyhow::Result;
use colored::Colorize;
use log::{Level, LevelFilter};

const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

fn colored_level(level: Level) -> String {
    match level {
        Level::Error => level.to_string().red().bold().to_string(),
        Level::Warn => level.to_string().yellow().to_string(),
        Level::Info => level.to_string().green().to_string(),
        Level::Debug => level.to_string().blue().to_string(),
        Level::Trace => level.to_string().dimmed().to_string(),
    }
}

pub fn setup_logger() -> Result<()> {
    let level = env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                colored_level(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
