use std::io::Write;

use log::LevelFilter;

use crate::error::{GalleryError, Result};

/// Parses the level names accepted on the command line
pub fn parse_level(name: &str) -> Result<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        other => Err(GalleryError::Config(format!("unknown log level '{}'", other))),
    }
}

/// Installs env_logger with `[timestamp:LEVEL:target] message` records.
/// `RUST_LOG` wins over `default_level` when set.
pub fn init(default_level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(default_level.as_str());
    let result = env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}:{}:{}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    if result.is_err() {
        log::debug!("logger already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("WARN").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert!(parse_level("chatty").is_err());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(LevelFilter::Off);
        init(LevelFilter::Off);
    }
}
