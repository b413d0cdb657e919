//! Rate limiting for deletion runs
//!
//! The provider allows a fixed number of write requests per window. Rather
//! than tracking a token bucket, the run pauses for the full window before
//! every Nth record. A `429 Too Many Requests` adds a separate cooldown, and
//! a short courtesy delay follows every delete call.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tracing::info;

/// Pacing parameters for a deletion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    /// Records processed between two window pauses
    pub requests_per_window: usize,
    /// Length of the periodic pause
    pub window: Duration,
    /// Extra pause after the provider answers 429
    pub throttle_cooldown: Duration,
    /// Pause after every delete call
    pub courtesy_delay: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            requests_per_window: 50,
            window: Duration::from_secs(15 * 60),
            throttle_cooldown: Duration::from_secs(15 * 60),
            courtesy_delay: Duration::from_millis(200),
        }
    }
}

impl PacingPolicy {
    /// Whether a window pause is due before processing record `index`
    /// (zero-based)
    pub fn window_pause_due(&self, index: usize) -> bool {
        self.requests_per_window > 0 && index > 0 && index % self.requests_per_window == 0
    }
}

/// Why the run is pausing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    /// Periodic pause every `requests_per_window` records
    Window,
    /// The provider answered 429
    Throttled,
    /// Spacing between delete calls
    Courtesy,
}

impl fmt::Display for PauseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PauseReason::Window => write!(f, "rate limit window"),
            PauseReason::Throttled => write!(f, "throttling cooldown"),
            PauseReason::Courtesy => write!(f, "courtesy delay"),
        }
    }
}

/// How a pause ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    Completed,
    Interrupted,
}

/// Something that can wait between API calls
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, reason: PauseReason, duration: Duration) -> PauseOutcome;
}

/// Sleeps on the tokio timer; Ctrl-C cuts a pause short
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, reason: PauseReason, duration: Duration) -> PauseOutcome {
        if duration.is_zero() {
            return PauseOutcome::Completed;
        }
        if reason != PauseReason::Courtesy {
            info!(
                "Pausing {} for {}",
                reason,
                humantime::format_duration(duration)
            );
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => PauseOutcome::Completed,
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => PauseOutcome::Interrupted,
                // No signal handler available: fall back to the plain sleep
                Err(_) => {
                    tokio::time::sleep(duration).await;
                    PauseOutcome::Completed
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PacingPolicy::default();
        assert_eq!(policy.requests_per_window, 50);
        assert_eq!(policy.window, Duration::from_secs(900));
        assert_eq!(policy.throttle_cooldown, Duration::from_secs(900));
        assert_eq!(policy.courtesy_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_window_pause_due() {
        let policy = PacingPolicy::default();
        assert!(!policy.window_pause_due(0));
        assert!(!policy.window_pause_due(49));
        assert!(policy.window_pause_due(50));
        assert!(!policy.window_pause_due(51));
        assert!(policy.window_pause_due(100));
    }

    #[test]
    fn test_window_pause_never_due_with_zero_window_size() {
        let policy = PacingPolicy {
            requests_per_window: 0,
            ..Default::default()
        };
        assert!(!policy.window_pause_due(50));
    }

    #[test]
    fn test_pause_reason_display() {
        assert_eq!(PauseReason::Window.to_string(), "rate limit window");
        assert_eq!(PauseReason::Throttled.to_string(), "throttling cooldown");
    }

    #[tokio::test]
    async fn test_tokio_pacer_short_pause_completes() {
        let start = std::time::Instant::now();
        let outcome = TokioPacer
            .pause(PauseReason::Courtesy, Duration::from_millis(20))
            .await;
        assert_eq!(outcome, PauseOutcome::Completed);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_tokio_pacer_zero_duration() {
        let outcome = TokioPacer.pause(PauseReason::Window, Duration::ZERO).await;
        assert_eq!(outcome, PauseOutcome::Completed);
    }
}
