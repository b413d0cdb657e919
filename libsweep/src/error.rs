//! Error types for Sweep

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SweepError>;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SweepError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SweepError::Selection(_) => 3,
            SweepError::Credential(_) => 2,
            SweepError::Config(_) => 1,
            SweepError::Archive(_) => 1,
            SweepError::Api(_) => 1,
            SweepError::Io(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("All authentication credentials are required (missing {0})")]
    Missing(&'static str),
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Archive path {0} does not exist")]
    PathNotFound(PathBuf),

    #[error("Archive path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("Could not find tweet data files in the archive")]
    NoDataFiles,

    #[error("Error reading file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("No tweets found in the archive")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Offset {offset} is greater than the number of tweets ({total})")]
    OffsetOutOfRange { offset: usize, total: usize },

    #[error("Limit must be between 1 and {max} (got {limit})")]
    LimitOutOfRange { limit: usize, max: usize },
}

#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to build request: {0}")]
    Request(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_missing_credentials() {
        let error = SweepError::Credential(CredentialError::Missing("consumer key"));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_selection_error() {
        let error = SweepError::Selection(SelectionError::OffsetOutOfRange {
            offset: 10,
            total: 3,
        });
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_archive_error() {
        let error = SweepError::Archive(ArchiveError::NoDataFiles);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = SweepError::Config(ConfigError::MissingField("api.base_url".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting_offset() {
        let error = SweepError::Selection(SelectionError::OffsetOutOfRange {
            offset: 5,
            total: 2,
        });
        assert_eq!(
            error.to_string(),
            "Selection error: Offset 5 is greater than the number of tweets (2)"
        );
    }

    #[test]
    fn test_error_message_formatting_parse() {
        let error = ArchiveError::Parse {
            path: PathBuf::from("data/tweet.js"),
            reason: "unexpected format".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Error parsing file data/tweet.js: unexpected format"
        );
    }

    #[test]
    fn test_error_conversion_from_api_error() {
        let api_error = ApiError::Network("connection reset".to_string());
        let sweep_error: SweepError = api_error.into();

        match sweep_error {
            SweepError::Api(_) => {
                // Success - correct conversion
            }
            _ => panic!("Expected SweepError::Api"),
        }
    }
}
