//! Core types for Sweep

use chrono::{DateTime, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Layout of archive `created_at` fields after the leading weekday,
/// e.g. `Oct 10 20:19:24 +0000 2018` in `Wed Oct 10 20:19:24 +0000 2018`
pub const ARCHIVE_TIME_FORMAT: &str = "%b %d %H:%M:%S %z %Y";

/// A single post extracted from an archive data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    /// `created_at` exactly as it appears in the archive
    pub created_at_raw: String,
    /// Parsed creation time, `None` when the raw value is not a weekday
    /// followed by [`ARCHIVE_TIME_FORMAT`]
    pub created_at: Option<DateTime<FixedOffset>>,
    pub text: String,
    pub retweeted: bool,
}

impl PostRecord {
    pub fn new(id: String, created_at_raw: String, text: String, retweeted: bool) -> Self {
        let created_at = parse_archive_time(&created_at_raw);
        Self {
            id,
            created_at_raw,
            created_at,
            text,
            retweeted,
        }
    }
}

/// Parse an archive timestamp, returning `None` on any mismatch
///
/// The weekday must be a valid name but is not checked against the date.
pub fn parse_archive_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let (weekday, rest) = raw.trim().split_once(' ')?;
    weekday.parse::<Weekday>().ok()?;
    DateTime::parse_from_str(rest.trim_start(), ARCHIVE_TIME_FORMAT).ok()
}

/// Order in which archive posts are considered for deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Archive discovery order, untouched
    Original,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "original" => Ok(SortOrder::Original),
            _ => Err(format!(
                "Invalid sort order: '{}'. Valid options: newest, oldest, original",
                s
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "newest"),
            SortOrder::Oldest => write!(f, "oldest"),
            SortOrder::Original => write!(f, "original"),
        }
    }
}

/// Result of checking whether a post still exists remotely
///
/// `Unknown` covers every response that is neither a clear "found" nor a
/// clear "not found". The executor treats it as present so that a real
/// failure surfaces through the delete call itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    Present,
    Absent,
    Unknown(String),
}

impl Existence {
    /// Map an HTTP status from the lookup endpoint
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => Existence::Present,
            404 => Existence::Absent,
            other => Existence::Unknown(format!("HTTP {}", other)),
        }
    }

    /// Whether a delete should be attempted
    pub fn should_delete(&self) -> bool {
        !matches!(self, Existence::Absent)
    }
}

/// Per-record outcome of the deletion pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    AlreadyGone,
    Failed,
}

/// Counters accumulated over a deletion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    pub total: usize,
    pub deleted: usize,
    pub failed: usize,
    pub already_gone: usize,
    /// Set when the run was stopped by an interrupt during a pause
    pub interrupted: bool,
}

impl DeletionSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: DeletionOutcome) {
        match outcome {
            DeletionOutcome::Deleted => self.deleted += 1,
            DeletionOutcome::AlreadyGone => self.already_gone += 1,
            DeletionOutcome::Failed => self.failed += 1,
        }
    }

    /// Number of records that reached a final outcome
    pub fn processed(&self) -> usize {
        self.deleted + self.failed + self.already_gone
    }

    /// Nothing was deleted and at least one delete failed, which usually
    /// means the API access level does not allow deletion
    pub fn looks_access_restricted(&self) -> bool {
        self.deleted == 0 && self.failed > 0
    }
}
