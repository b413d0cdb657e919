//! Sweep - delete posts listed in a Twitter/X archive
//!
//! This library reads an exported archive, selects posts by date order,
//! offset and limit, asks for confirmation, and deletes them through the
//! API while staying under the provider's write rate limit.

pub mod api;
pub mod archive;
pub mod config;
pub mod confirm;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod logging;
pub mod rate_limiter;
pub mod selector;
pub mod service;
pub mod types;

// Mock API is available for all builds (not just tests) to support integration tests
pub mod mock;

// Re-export commonly used types
pub use config::Config;
pub use credentials::Credentials;
pub use error::{Result, SweepError};
pub use types::{DeletionSummary, PostRecord, SortOrder};
