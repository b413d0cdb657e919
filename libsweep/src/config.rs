//! Configuration management for Sweep
//!
//! Configuration is optional: every field has a default and a missing file
//! at the default location is not an error.
//!
//! ```toml
//! [api]
//! base_url = "https://api.twitter.com"
//! timeout = "30s"
//!
//! [pacing]
//! requests_per_window = 50
//! window = "15m"
//! throttle_cooldown = "15m"
//! courtesy_delay = "200ms"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::rate_limiter::PacingPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub pacing: PacingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde_compat")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Write requests allowed per window (free tier: 50 per 15 minutes)
    pub requests_per_window: usize,
    #[serde(with = "humantime_serde_compat")]
    pub window: Duration,
    #[serde(with = "humantime_serde_compat")]
    pub throttle_cooldown: Duration,
    #[serde(with = "humantime_serde_compat")]
    pub courtesy_delay: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        let policy = PacingPolicy::default();
        Self {
            requests_per_window: policy.requests_per_window,
            window: policy.window,
            throttle_cooldown: policy.throttle_cooldown,
            courtesy_delay: policy.courtesy_delay,
        }
    }
}

impl PacingConfig {
    pub fn policy(&self) -> PacingPolicy {
        PacingPolicy {
            requests_per_window: self.requests_per_window,
            window: self.window,
            throttle_cooldown: self.throttle_cooldown,
            courtesy_delay: self.courtesy_delay,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `SWEEP_CONFIG` and then the
    /// XDG config location are tried; a missing file there yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        let config_path = resolve_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }
        if self.pacing.requests_per_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pacing.requests_per_window".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Resolve the configuration file path, defaulting to the XDG config directory
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("SWEEP_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("sweep").join("config.toml"))
}

/// Human-readable durations (`"15m"`, `"200ms"`) via humantime
mod humantime_serde_compat {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SweepError;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.twitter.com");
        assert_eq!(config.pacing.requests_per_window, 50);
        assert_eq!(config.pacing.window, Duration::from_secs(15 * 60));
        assert_eq!(config.pacing.throttle_cooldown, Duration::from_secs(15 * 60));
        assert_eq!(config.pacing.courtesy_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[pacing]
requests_per_window = 10
window = "1m 30s"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.pacing.requests_per_window, 10);
        assert_eq!(config.pacing.window, Duration::from_secs(90));
        assert_eq!(config.pacing.courtesy_delay, Duration::from_millis(200));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_duration_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[pacing]\nwindow = \"soon\"\n").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(
            result,
            Err(SweepError::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_zero_requests_per_window_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[pacing]\nrequests_per_window = 0\n").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(
            result,
            Err(SweepError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(&temp.path().join("nope.toml")));
        assert!(matches!(
            result,
            Err(SweepError::Config(ConfigError::ReadError(_)))
        ));
    }

    #[test]
    #[serial]
    fn test_env_override_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        std::env::set_var("SWEEP_CONFIG", temp.path().join("absent.toml"));

        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());

        std::env::remove_var("SWEEP_CONFIG");
    }

    #[test]
    #[serial]
    fn test_env_override_is_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "[api]\nbase_url = \"http://127.0.0.1:9\"\n").unwrap();
        std::env::set_var("SWEEP_CONFIG", &path);

        let config = Config::load(None).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9");

        std::env::remove_var("SWEEP_CONFIG");
    }

    #[test]
    fn test_policy_from_config() {
        let pacing = PacingConfig {
            requests_per_window: 5,
            ..Default::default()
        };
        let policy = pacing.policy();
        assert_eq!(policy.requests_per_window, 5);
        assert_eq!(policy.courtesy_delay, Duration::from_millis(200));
    }
}
