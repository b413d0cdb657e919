//! Remote API abstraction
//!
//! The deletion executor talks to the provider through [`PostApi`], which
//! exposes the two calls it needs: a lookup to learn whether a post still
//! exists, and a delete. Responses are returned as raw status + body so the
//! executor can apply its own policy (404 on lookup means already gone, 429
//! on delete means throttled, and so on).
//!
//! # Examples
//!
//! ```no_run
//! use libsweep::api::{twitter::TwitterClient, PostApi};
//! use libsweep::config::ApiConfig;
//! use libsweep::credentials::Credentials;
//!
//! # async fn example() -> libsweep::error::Result<()> {
//! let credentials = Credentials::new("key", "secret", "token", "token-secret")?;
//! let client = TwitterClient::new(credentials, &ApiConfig::default())?;
//!
//! let response = client.lookup("1050118621198921728").await?;
//! println!("lookup answered HTTP {}", response.status);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Existence;

pub mod oauth;
pub mod twitter;

/// Status and body of an API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_throttled(&self) -> bool {
        self.status == 429
    }
}

/// Read and delete access to a user's posts
#[async_trait]
pub trait PostApi: Send + Sync {
    /// Look a post up by id
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` when no response was received. Any HTTP
    /// response, including 4xx/5xx, is returned as `Ok`.
    async fn lookup(&self, id: &str) -> Result<ApiResponse>;

    /// Delete a post by id
    ///
    /// # Errors
    ///
    /// Same contract as [`PostApi::lookup`].
    async fn delete(&self, id: &str) -> Result<ApiResponse>;
}

/// Check whether a post still exists
///
/// Only a 404 counts as absent. Transport failures and unexpected statuses
/// come back as `Existence::Unknown`.
pub async fn check_existence(api: &dyn PostApi, id: &str) -> Existence {
    match api.lookup(id).await {
        Ok(response) => {
            tracing::debug!(
                "Check tweet {} response: HTTP {} - {}",
                id,
                response.status,
                response.body
            );
            Existence::from_status(response.status)
        }
        Err(e) => Existence::Unknown(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;

    #[test]
    fn test_response_classification() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
        assert!(ApiResponse::new(429, "").is_throttled());
        assert!(!ApiResponse::new(500, "").is_throttled());
    }

    #[tokio::test]
    async fn test_check_existence_maps_statuses() {
        let api = MockApi::new()
            .with_lookup("present", 200)
            .with_lookup("gone", 404)
            .with_lookup("locked", 403);

        assert_eq!(check_existence(&api, "present").await, Existence::Present);
        assert_eq!(check_existence(&api, "gone").await, Existence::Absent);
        assert_eq!(
            check_existence(&api, "locked").await,
            Existence::Unknown("HTTP 403".to_string())
        );
    }

    #[tokio::test]
    async fn test_check_existence_network_failure_is_unknown() {
        let api = MockApi::new().with_lookup_failure("flaky", "connection reset");

        match check_existence(&api, "flaky").await {
            Existence::Unknown(reason) => assert!(reason.contains("connection reset")),
            other => panic!("Expected Unknown, got {:?}", other),
        }
    }
}
