//! Twitter/X API v2 client

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use tracing::debug;

use crate::api::oauth::{percent_encode, Signer};
use crate::api::{ApiResponse, PostApi};
use crate::config::ApiConfig;
use crate::credentials::Credentials;
use crate::error::{ApiError, Result};

/// Signed client for the v2 tweet endpoints
pub struct TwitterClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl TwitterClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` when the HTTP client cannot be built.
    pub fn new(credentials: Credentials, config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("sweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// `{base}/2/tweets/{id}`
    pub fn tweet_url(&self, id: &str) -> String {
        format!("{}/2/tweets/{}", self.base_url, percent_encode(id))
    }

    async fn send(&self, method: Method, id: &str) -> Result<ApiResponse> {
        let url = self.tweet_url(id);
        let authorization = Signer::new(&self.credentials).authorization_header(method.as_str(), &url)?;

        debug!("{} {}", method, url);
        let response = self
            .http
            .request(method, &url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {}", e)))?;

        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl PostApi for TwitterClient {
    async fn lookup(&self, id: &str) -> Result<ApiResponse> {
        self.send(Method::GET, id).await
    }

    async fn delete(&self, id: &str) -> Result<ApiResponse> {
        self.send(Method::DELETE, id).await
    }
}
