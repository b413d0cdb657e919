//! Rate-limited deletion of the confirmed selection
//!
//! Records are processed strictly in selection order. For each one the
//! executor checks existence, deletes, and paces itself according to a
//! [`PacingPolicy`]. Per-record failures are counted and never abort the
//! run; a failed delete is not retried.

use std::io::Write;
use tracing::{info, warn};

use crate::api::{check_existence, PostApi};
use crate::error::Result;
use crate::rate_limiter::{PacingPolicy, Pacer, PauseOutcome, PauseReason};
use crate::types::{DeletionOutcome, DeletionSummary, Existence, PostRecord};

/// Deletes posts through a [`PostApi`], pausing through a [`Pacer`]
pub struct DeletionExecutor<'a> {
    api: &'a dyn PostApi,
    pacer: &'a dyn Pacer,
    policy: PacingPolicy,
}

impl<'a> DeletionExecutor<'a> {
    pub fn new(api: &'a dyn PostApi, pacer: &'a dyn Pacer, policy: PacingPolicy) -> Self {
        Self { api, pacer, policy }
    }

    /// Process every post and return the accumulated counters
    ///
    /// Progress lines are written to `out`. If a pause is interrupted the
    /// loop stops and the summary so far is returned with
    /// `interrupted` set.
    ///
    /// # Errors
    ///
    /// Only failures to write progress to `out`; API failures are counted.
    pub async fn run(&self, posts: &[PostRecord], out: &mut dyn Write) -> Result<DeletionSummary> {
        let total = posts.len();
        let mut summary = DeletionSummary::new(total);

        writeln!(out, "Checking tweets status and executing deletion...")?;
        info!("Starting deletion of {} post(s)", total);

        for (index, post) in posts.iter().enumerate() {
            if self.policy.window_pause_due(index) {
                writeln!(
                    out,
                    "Rate limit reached. Waiting for {} before continuing...",
                    humantime::format_duration(self.policy.window)
                )?;
                if self.pause(PauseReason::Window).await == PauseOutcome::Interrupted {
                    summary.interrupted = true;
                    break;
                }
            }

            let existence = check_existence(self.api, &post.id).await;
            if !existence.should_delete() {
                writeln!(out, "Tweet already deleted: ID {}", post.id)?;
                summary.record(DeletionOutcome::AlreadyGone);
                continue;
            }
            if let Existence::Unknown(reason) = &existence {
                warn!(
                    "Could not confirm tweet {} exists ({}), attempting delete anyway",
                    post.id, reason
                );
            }

            let throttled = self.delete_one(post, &mut summary, out).await?;

            if throttled {
                writeln!(
                    out,
                    "Rate limit exceeded. Waiting for {}...",
                    humantime::format_duration(self.policy.throttle_cooldown)
                )?;
            }
            let interrupted = (throttled
                && self.pause(PauseReason::Throttled).await == PauseOutcome::Interrupted)
                || self.pause(PauseReason::Courtesy).await == PauseOutcome::Interrupted;

            if interrupted {
                // After the last record there is nothing left to skip
                summary.interrupted = index + 1 < total;
                break;
            }
        }

        if summary.interrupted {
            warn!(
                "Deletion interrupted after {} of {} post(s)",
                summary.processed(),
                total
            );
        }
        info!(
            "Deletion finished: {} deleted, {} failed, {} already gone",
            summary.deleted, summary.failed, summary.already_gone
        );

        Ok(summary)
    }

    /// Issue the delete call; returns whether the provider throttled us
    async fn delete_one(
        &self,
        post: &PostRecord,
        summary: &mut DeletionSummary,
        out: &mut dyn Write,
    ) -> Result<bool> {
        match self.api.delete(&post.id).await {
            Ok(response) if response.is_success() => {
                summary.record(DeletionOutcome::Deleted);
                writeln!(
                    out,
                    "Deleted: {}/{} - ID: {}",
                    summary.deleted, summary.total, post.id
                )?;
                Ok(false)
            }
            Ok(response) => {
                summary.record(DeletionOutcome::Failed);
                warn!("Delete of {} failed with HTTP {}", post.id, response.status);
                writeln!(
                    out,
                    "Failed to delete tweet ID {}: HTTP {} - {}",
                    post.id, response.status, response.body
                )?;
                Ok(response.is_throttled())
            }
            Err(e) => {
                summary.record(DeletionOutcome::Failed);
                warn!("Delete of {} failed: {}", post.id, e);
                writeln!(out, "Error deleting tweet ID {}: {}", post.id, e)?;
                Ok(false)
            }
        }
    }

    async fn pause(&self, reason: PauseReason) -> PauseOutcome {
        let duration = match reason {
            PauseReason::Window => self.policy.window,
            PauseReason::Throttled => self.policy.throttle_cooldown,
            PauseReason::Courtesy => self.policy.courtesy_delay,
        };
        self.pacer.pause(reason, duration).await
    }
}

/// Print the final report for a deletion pass
pub fn write_report(summary: &DeletionSummary, out: &mut dyn Write) -> Result<()> {
    if summary.interrupted {
        writeln!(
            out,
            "\nInterrupted: processed {} of {} tweets before stopping.",
            summary.processed(),
            summary.total
        )?;
    }

    writeln!(
        out,
        "\nCompleted: Successfully deleted {}/{} tweets. Failed: {}, Already deleted: {}",
        summary.deleted, summary.total, summary.failed, summary.already_gone
    )?;

    if summary.failed > 0 {
        writeln!(out, "\nNote: Some tweets may have failed to delete because:")?;
        writeln!(out, "- They were already deleted")?;
        writeln!(
            out,
            "- They were too old (the API limits deletion of older tweets)"
        )?;
        writeln!(out, "- API rate limits were reached")?;
        writeln!(out, "- Your API access level does not allow deletion")?;
    }

    if summary.looks_access_restricted() {
        writeln!(out, "\nAPI Access Restriction Warning:")?;
        writeln!(
            out,
            "It appears your API access level may not allow tweet deletion."
        )?;
        writeln!(
            out,
            "The free tier has very limited access; check your plan at https://developer.x.com/en/portal/product"
        )?;
    }

    Ok(())
}
