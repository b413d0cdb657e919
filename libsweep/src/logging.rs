//! Logging setup for the sweep binary
//!
//! Diagnostics go to stderr through `tracing`; the progress lines a user
//! reads during a run are written to stdout separately. The default level is
//! `warn` so a normal run only shows skipped files and failed deletes.
//!
//! Precedence: `--verbose` > `RUST_LOG` > `SWEEP_LOG_LEVEL` > `warn`, and
//! `--log-format` > `SWEEP_LOG_FORMAT` > `text`.
//!
//! ```no_run
//! use libsweep::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::from_env(Some(LogFormat::Json), false).init();
//! ```

use std::str::FromStr;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact text without targets
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line, colored, with source locations
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
}

impl LoggingConfig {
    /// Resolve settings from CLI values and `SWEEP_LOG_*` variables
    pub fn from_env(format: Option<LogFormat>, verbose: bool) -> Self {
        let format = format
            .or_else(|| {
                std::env::var("SWEEP_LOG_FORMAT")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_default();
        let level =
            std::env::var("SWEEP_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LEVEL.to_string());

        Self {
            format,
            level,
            verbose,
        }
    }

    fn filter(&self) -> EnvFilter {
        if self.verbose {
            return EnvFilter::new("debug");
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber
    ///
    /// A second call is a no-op; the first subscriber stays in place.
    pub fn init(&self) {
        let filter = self.filter();
        let result = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .try_init(),
        };

        if let Err(e) = result {
            tracing::debug!("Logging already initialized: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);

        let result = "xml".parse::<LogFormat>();
        assert!(result.unwrap_err().contains("Invalid log format: 'xml'"));
    }

    #[test]
    fn test_log_format_display() {
        assert_eq!(LogFormat::Json.to_string(), "json");
        assert_eq!(LogFormat::default().to_string(), "text");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("SWEEP_LOG_FORMAT");
        std::env::remove_var("SWEEP_LOG_LEVEL");

        let config = LoggingConfig::from_env(None, false);
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.level, "warn");
        assert!(!config.verbose);
    }

    #[test]
    #[serial]
    fn test_cli_format_beats_env() {
        std::env::set_var("SWEEP_LOG_FORMAT", "pretty");
        std::env::set_var("SWEEP_LOG_LEVEL", "info");

        let config = LoggingConfig::from_env(Some(LogFormat::Json), true);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");

        let config = LoggingConfig::from_env(None, false);
        assert_eq!(config.format, LogFormat::Pretty);

        std::env::remove_var("SWEEP_LOG_FORMAT");
        std::env::remove_var("SWEEP_LOG_LEVEL");
    }

    #[test]
    #[serial]
    fn test_init_twice_does_not_panic() {
        let config = LoggingConfig::from_env(Some(LogFormat::Text), false);
        config.init();
        config.init();
    }
}
