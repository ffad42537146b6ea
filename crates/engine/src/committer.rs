//! One-shot validation and persistence of a finished draft.
//!
//! A commit validates locally, submits the quote to storage exactly once and
//! clears the local mirror only after storage confirmed the write. Only one
//! commit may be in flight at a time.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use cotizapro_core::{CommitStatus, NewQuote, OwnerId, QuoteDraft, QuoteId, ValidationError};

use crate::mirror::DraftMirror;
use crate::slot::LocalSlot;
use crate::store::{QuoteStore, StoreError};

/// Errors that can occur when committing a draft.
#[derive(Debug, Error)]
pub enum CommitError {
    /// Draft is incomplete; storage was not contacted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another commit has not finished yet; storage was not contacted.
    #[error("a commit is already in progress")]
    AlreadyInFlight,

    /// Storage rejected or never acknowledged the quote.
    #[error("failed to submit quote: {0}")]
    Submission(#[source] StoreError),
}

/// Submits drafts to a [`QuoteStore`] and clears their mirror on success.
#[derive(Debug)]
pub struct QuoteCommitter<S, L> {
    store: S,
    mirror: DraftMirror<L>,
    status: Mutex<CommitStatus>,
}

impl<S: QuoteStore, L: LocalSlot> QuoteCommitter<S, L> {
    /// Create a committer writing to `store` and owning `mirror`.
    #[must_use]
    pub const fn new(store: S, mirror: DraftMirror<L>) -> Self {
        Self {
            store,
            mirror,
            status: Mutex::new(CommitStatus::Idle),
        }
    }

    /// Outcome of the latest commit attempt.
    #[must_use]
    pub fn status(&self) -> CommitStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The mirror cleared by successful commits.
    pub const fn mirror(&self) -> &DraftMirror<L> {
        &self.mirror
    }

    /// The storage quotes are submitted to.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validate `draft` and persist it for `owner_id`.
    ///
    /// Totals are computed once, here, and stored with the quote. The store
    /// is called at most once and never retried. If the returned future is
    /// dropped before it completes, the status goes back to idle and the
    /// mirror is left alone.
    ///
    /// # Errors
    ///
    /// - `CommitError::Validation` if the customer name or a description is
    ///   blank
    /// - `CommitError::AlreadyInFlight` if another commit is running
    /// - `CommitError::Submission` if storage fails; the mirror is kept
    #[instrument(skip(self, draft), fields(owner_id = %owner_id, items = draft.line_items.len()))]
    pub async fn commit(
        &self,
        draft: &QuoteDraft,
        owner_id: &OwnerId,
    ) -> Result<QuoteId, CommitError> {
        draft.validate()?;

        let Some(guard) = InFlight::acquire(&self.status) else {
            debug!("Commit rejected, another one is in flight");
            return Err(CommitError::AlreadyInFlight);
        };

        let quote = NewQuote::from_draft(owner_id.clone(), draft, Utc::now());

        match self.store.create(&quote).await {
            Ok(id) => {
                self.mirror.clear();
                guard.settle(CommitStatus::Succeeded);
                info!(quote_id = %id, total = %quote.total, "Quote committed");
                Ok(id)
            }
            Err(e) => {
                guard.settle(CommitStatus::Failed);
                error!(error = %e, "Quote submission failed");
                Err(CommitError::Submission(e))
            }
        }
    }
}

/// Holds the in-flight status until settled; resets it to idle on drop.
struct InFlight<'a> {
    status: &'a Mutex<CommitStatus>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn acquire(status: &'a Mutex<CommitStatus>) -> Option<Self> {
        let mut current = status.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_in_flight() {
            return None;
        }
        *current = CommitStatus::InFlight;
        Some(Self {
            status,
            settled: false,
        })
    }

    fn settle(mut self, outcome: CommitStatus) {
        self.set(outcome);
        self.settled = true;
    }

    fn set(&self, status: CommitStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.set(CommitStatus::Idle);
        }
    }
}
