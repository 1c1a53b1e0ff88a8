use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the global subscriber.
///
/// The terminal is in raw mode while the form is up, so events go to
/// `log_file` when one is configured and are dropped otherwise. `RUST_LOG`
/// takes precedence over `log_level`.
pub fn init_logging(config: &Config) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(rust_log.as_deref(), &config.log_level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    let installed = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(io::sink).try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

/// An unparseable `RUST_LOG` falls back to `log_level`.
fn env_filter(rust_log: Option<&str>, log_level: &str) -> Result<EnvFilter> {
    if let Some(filter) = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(log_level).with_context(|| format!("invalid log level '{log_level}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn rust_log_wins_over_configured_level() {
        let filter = env_filter(Some("warn"), "debug").unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn configured_level_applies_without_rust_log() {
        let filter = env_filter(None, "debug").unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = env_filter(Some("mortgage_calc=loudest"), "error").unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn bad_configured_level_is_an_error() {
        let err = env_filter(None, "mortgage_calc=loudest").unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    // The only test that installs the global subscriber.
    #[test]
    fn events_land_in_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.log");
        std::env::remove_var(EnvFilter::DEFAULT_ENV);
        let config = Config {
            log_file: Some(path.clone()),
            log_level: "debug".to_string(),
            ..Config::default()
        };

        init_logging(&config).unwrap();
        tracing::debug!("loan form opened");
        tracing::trace!("below the configured level");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("loan form opened"), "{contents}");
        assert!(!contents.contains("below the configured level"), "{contents}");

        assert!(init_logging(&config).is_err());
    }
}
