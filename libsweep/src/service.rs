//! End-to-end delete pipeline
//!
//! Wires the stages together in their fixed order:
//! archive reader → selector → confirmation gate → deletion executor.
//! The API client is only built once the user has confirmed, so a dry run
//! or a cancelled run never touches the network.
//!
//! # Example
//!
//! ```no_run
//! use libsweep::api::{twitter::TwitterClient, PostApi};
//! use libsweep::config::Config;
//! use libsweep::credentials::Credentials;
//! use libsweep::rate_limiter::TokioPacer;
//! use libsweep::selector::Selection;
//! use libsweep::service::{DeleteRequest, DeleteService};
//! use libsweep::types::SortOrder;
//!
//! # async fn example() -> libsweep::Result<()> {
//! let config = Config::load(None)?;
//! let request = DeleteRequest {
//!     archive: "/home/me/twitter-archive".into(),
//!     selection: Selection::new(SortOrder::Oldest, 0, 20)?,
//!     dry_run: false,
//! };
//!
//! let service = DeleteService::new(config.pacing.policy());
//! let mut input = std::io::stdin().lock();
//! let mut out = std::io::stdout();
//! let outcome = service
//!     .run(&request, &mut input, &mut out, &TokioPacer, || {
//!         let credentials = Credentials::new("key", "secret", "token", "token-secret")?;
//!         let client = TwitterClient::new(credentials, &config.api)?;
//!         Ok(Box::new(client) as Box<dyn PostApi>)
//!     })
//!     .await?;
//! println!("{:?}", outcome.summary());
//! # Ok(())
//! # }
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::info;

use crate::api::PostApi;
use crate::archive::read_archive;
use crate::confirm::{confirm, Confirmation};
use crate::error::Result;
use crate::executor::{write_report, DeletionExecutor};
use crate::rate_limiter::{PacingPolicy, Pacer};
use crate::selector::{select_with_progress, Selection};
use crate::types::{DeletionSummary, PostRecord};

/// What to delete
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    /// Root of the extracted archive
    pub archive: PathBuf,
    pub selection: Selection,
    pub dry_run: bool,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    DryRun { selected: usize },
    Cancelled { selected: usize },
    Completed(DeletionSummary),
}

impl RunOutcome {
    /// Counters for the run; all zero unless deletion actually ran
    pub fn summary(&self) -> DeletionSummary {
        match self {
            RunOutcome::Completed(summary) => summary.clone(),
            RunOutcome::DryRun { .. } | RunOutcome::Cancelled { .. } => DeletionSummary::default(),
        }
    }
}

pub struct DeleteService {
    policy: PacingPolicy,
}

impl DeleteService {
    pub fn new(policy: PacingPolicy) -> Self {
        Self { policy }
    }

    /// Read the archive and apply the selection
    pub fn prepare(&self, request: &DeleteRequest, out: &mut dyn Write) -> Result<Vec<PostRecord>> {
        let archive = read_archive(&request.archive, out)?;
        select_with_progress(archive.posts, &request.selection, out)
    }

    /// Run the whole pipeline
    ///
    /// `connect` builds the API client and is called only after the user
    /// confirmed deletion.
    pub async fn run<C>(
        &self,
        request: &DeleteRequest,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
        pacer: &dyn Pacer,
        connect: C,
    ) -> Result<RunOutcome>
    where
        C: FnOnce() -> Result<Box<dyn PostApi>>,
    {
        let selected = self.prepare(request, out)?;

        match confirm(&selected, request.dry_run, input, out)? {
            Confirmation::DryRun => {
                info!("Dry run: {} post(s) selected, nothing deleted", selected.len());
                return Ok(RunOutcome::DryRun {
                    selected: selected.len(),
                });
            }
            Confirmation::Cancelled => {
                info!("Deletion cancelled by user");
                return Ok(RunOutcome::Cancelled {
                    selected: selected.len(),
                });
            }
            Confirmation::Confirmed => {}
        }

        let api = connect()?;
        let executor = DeletionExecutor::new(api.as_ref(), pacer, self.policy);
        let summary = executor.run(&selected, out).await?;
        write_report(&summary, out)?;

        Ok(RunOutcome::Completed(summary))
    }
}
