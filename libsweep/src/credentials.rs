//! OAuth 1.0a user-context credentials
//!
//! The four strings are supplied by the caller (CLI flags or environment)
//! and kept in [`SecretString`] so they are zeroed on drop and never show up
//! in `Debug` output.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::error::{CredentialError, Result};

pub struct Credentials {
    consumer_key: SecretString,
    consumer_secret: SecretString,
    access_token: SecretString,
    access_token_secret: SecretString,
}

impl Credentials {
    /// Build credentials, rejecting any empty value
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Missing` naming the first empty field.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            consumer_key: required("consumer key", consumer_key.into())?,
            consumer_secret: required("consumer secret", consumer_secret.into())?,
            access_token: required("access token", access_token.into())?,
            access_token_secret: required("access token secret", access_token_secret.into())?,
        })
    }

    /// Build credentials from optional values, as parsed from the CLI
    pub fn from_options(
        consumer_key: Option<String>,
        consumer_secret: Option<String>,
        access_token: Option<String>,
        access_token_secret: Option<String>,
    ) -> Result<Self> {
        Self::new(
            consumer_key.unwrap_or_default(),
            consumer_secret.unwrap_or_default(),
            access_token.unwrap_or_default(),
            access_token_secret.unwrap_or_default(),
        )
    }

    pub fn consumer_key(&self) -> &str {
        self.consumer_key.expose_secret()
    }

    pub fn consumer_secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn access_token_secret(&self) -> &str {
        self.access_token_secret.expose_secret()
    }
}

fn required(field: &'static str, value: String) -> Result<SecretString> {
    if value.trim().is_empty() {
        return Err(CredentialError::Missing(field).into());
    }
    Ok(SecretString::from(value))
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"[REDACTED]")
            .field("consumer_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("access_token_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SweepError;

    #[test]
    fn test_new_exposes_values() {
        let creds = Credentials::new("ck", "cs", "at", "ats").unwrap();
        assert_eq!(creds.consumer_key(), "ck");
        assert_eq!(creds.consumer_secret(), "cs");
        assert_eq!(creds.access_token(), "at");
        assert_eq!(creds.access_token_secret(), "ats");
    }

    #[test]
    fn test_missing_value_is_rejected() {
        let result = Credentials::new("ck", "", "at", "ats");
        assert!(matches!(
            result,
            Err(SweepError::Credential(CredentialError::Missing("consumer secret")))
        ));
    }

    #[test]
    fn test_from_options_none_is_missing() {
        let result = Credentials::from_options(
            Some("ck".to_string()),
            Some("cs".to_string()),
            None,
            Some("ats".to_string()),
        );
        assert!(matches!(
            result,
            Err(SweepError::Credential(CredentialError::Missing("access token")))
        ));
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        assert!(Credentials::new("  ", "cs", "at", "ats").is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("ck-value", "cs-value", "at-value", "ats-value").unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("ck-value"));
        assert!(!debug.contains("ats-value"));
        assert!(debug.contains("[REDACTED]"));
    }
}
