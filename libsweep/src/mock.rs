//! Scripted API and pacer for testing
//!
//! [`MockApi`] answers lookups and deletes from per-id scripts and
//! [`MockPacer`] returns immediately instead of sleeping. Both write to a
//! shared [`Journal`], so tests can assert on the exact interleaving of API
//! calls and pauses without any network access or real waiting.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::api::{ApiResponse, PostApi};
use crate::error::{ApiError, Result};
use crate::rate_limiter::{Pacer, PauseOutcome, PauseReason};

/// One observed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Lookup(String),
    Delete(String),
    Pause(PauseReason, Duration),
}

/// Ordered record of mock calls, shareable between mocks
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<MockEvent>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: MockEvent) {
        lock(&self.events).push(event);
    }

    pub fn events(&self) -> Vec<MockEvent> {
        lock(&self.events).clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                MockEvent::Lookup(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                MockEvent::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn pauses(&self, reason: PauseReason) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, MockEvent::Pause(r, _) if *r == reason))
            .count()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone)]
enum Scripted {
    Status(u16, String),
    NetworkFailure(String),
}

impl Scripted {
    fn respond(&self) -> Result<ApiResponse> {
        match self {
            Scripted::Status(status, body) => Ok(ApiResponse::new(*status, body.clone())),
            Scripted::NetworkFailure(message) => Err(ApiError::Network(message.clone()).into()),
        }
    }
}

/// Scripted [`PostApi`]; unscripted ids answer 200 to both calls
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    lookups: HashMap<String, Scripted>,
    deletes: HashMap<String, Scripted>,
    default_delete: Option<u16>,
    journal: Journal,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record calls into an existing journal
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn with_lookup(mut self, id: &str, status: u16) -> Self {
        self.lookups
            .insert(id.to_string(), Scripted::Status(status, String::new()));
        self
    }

    pub fn with_lookup_failure(mut self, id: &str, message: &str) -> Self {
        self.lookups
            .insert(id.to_string(), Scripted::NetworkFailure(message.to_string()));
        self
    }

    pub fn with_delete(mut self, id: &str, status: u16, body: &str) -> Self {
        self.deletes
            .insert(id.to_string(), Scripted::Status(status, body.to_string()));
        self
    }

    pub fn with_delete_failure(mut self, id: &str, message: &str) -> Self {
        self.deletes
            .insert(id.to_string(), Scripted::NetworkFailure(message.to_string()));
        self
    }

    /// Status returned by deletes of unscripted ids
    pub fn with_default_delete(mut self, status: u16) -> Self {
        self.default_delete = Some(status);
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

#[async_trait]
impl PostApi for MockApi {
    async fn lookup(&self, id: &str) -> Result<ApiResponse> {
        self.journal.push(MockEvent::Lookup(id.to_string()));
        match self.lookups.get(id) {
            Some(scripted) => scripted.respond(),
            None => Ok(ApiResponse::new(200, format!(r#"{{"data":{{"id":"{}"}}}}"#, id))),
        }
    }

    async fn delete(&self, id: &str) -> Result<ApiResponse> {
        self.journal.push(MockEvent::Delete(id.to_string()));
        match self.deletes.get(id) {
            Some(scripted) => scripted.respond(),
            None => {
                let status = self.default_delete.unwrap_or(200);
                Ok(ApiResponse::new(status, r#"{"data":{"deleted":true}}"#))
            }
        }
    }
}

/// [`Pacer`] that never sleeps
#[derive(Debug, Clone, Default)]
pub struct MockPacer {
    journal: Journal,
    interrupt_on: Option<PauseReason>,
}

impl MockPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Report every pause of `reason` as interrupted
    pub fn interrupt_on(mut self, reason: PauseReason) -> Self {
        self.interrupt_on = Some(reason);
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

#[async_trait]
impl Pacer for MockPacer {
    async fn pause(&self, reason: PauseReason, duration: Duration) -> PauseOutcome {
        self.journal.push(MockEvent::Pause(reason, duration));
        if self.interrupt_on == Some(reason) {
            PauseOutcome::Interrupted
        } else {
            PauseOutcome::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unscripted_ids_succeed() {
        let api = MockApi::new();
        assert_eq!(api.lookup("1").await.unwrap().status, 200);
        assert_eq!(api.delete("1").await.unwrap().status, 200);
        assert_eq!(api.journal().lookups(), vec!["1"]);
        assert_eq!(api.journal().deletes(), vec!["1"]);
    }

    #[tokio::test]
    async fn test_scripted_responses() {
        let api = MockApi::new()
            .with_lookup("gone", 404)
            .with_delete("busy", 429, "Too Many Requests")
            .with_delete_failure("down", "timed out");

        assert_eq!(api.lookup("gone").await.unwrap().status, 404);
        let busy = api.delete("busy").await.unwrap();
        assert_eq!(busy.status, 429);
        assert_eq!(busy.body, "Too Many Requests");
        assert!(api.delete("down").await.is_err());
    }

    #[tokio::test]
    async fn test_shared_journal_interleaves() {
        let journal = Journal::new();
        let api = MockApi::new().with_journal(journal.clone());
        let pacer = MockPacer::new().with_journal(journal.clone());

        api.lookup("1").await.unwrap();
        pacer
            .pause(PauseReason::Window, Duration::from_secs(1))
            .await;
        api.delete("1").await.unwrap();

        assert_eq!(
            journal.events(),
            vec![
                MockEvent::Lookup("1".to_string()),
                MockEvent::Pause(PauseReason::Window, Duration::from_secs(1)),
                MockEvent::Delete("1".to_string()),
            ]
        );
        assert_eq!(journal.pauses(PauseReason::Window), 1);
    }

    #[tokio::test]
    async fn test_interrupt_on_reason() {
        let pacer = MockPacer::new().interrupt_on(PauseReason::Throttled);
        assert_eq!(
            pacer.pause(PauseReason::Courtesy, Duration::ZERO).await,
            PauseOutcome::Completed
        );
        assert_eq!(
            pacer.pause(PauseReason::Throttled, Duration::ZERO).await,
            PauseOutcome::Interrupted
        );
    }
}
