//! Editing session over a single draft.
//!
//! A session hydrates the draft from the local mirror when it starts and
//! writes it back after every mutation, so the mirror always holds the
//! latest edits. All edits go through the methods below.

use tracing::{debug, instrument};

use cotizapro_core::{CommitStatus, LineItemField, LineItemId, OwnerId, QuoteDraft, QuoteId, Totals};

use crate::committer::{CommitError, QuoteCommitter};
use crate::mirror::DraftMirror;
use crate::slot::LocalSlot;
use crate::store::QuoteStore;

/// A draft under composition, mirrored on every edit.
#[derive(Debug)]
pub struct QuoteSession<S, L> {
    draft: QuoteDraft,
    committer: QuoteCommitter<S, L>,
}

impl<S: QuoteStore, L: LocalSlot> QuoteSession<S, L> {
    /// Start a session, restoring whatever draft `slot` holds.
    #[must_use]
    pub fn start(store: S, slot: L) -> Self {
        let mirror = DraftMirror::new(slot);
        let draft = mirror.hydrate();

        Self {
            draft,
            committer: QuoteCommitter::new(store, mirror),
        }
    }

    /// The current draft.
    pub const fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    /// Live totals of the current draft.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.draft.totals()
    }

    /// Outcome of the latest commit attempt.
    #[must_use]
    pub fn status(&self) -> CommitStatus {
        self.committer.status()
    }

    /// The committer, with its store and mirror.
    pub const fn committer(&self) -> &QuoteCommitter<S, L> {
        &self.committer
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.draft.customer_name = name.into();
        self.mirror();
    }

    pub fn set_customer_phone(&mut self, phone: impl Into<String>) {
        self.draft.customer_phone = phone.into();
        self.mirror();
    }

    /// Append a blank row and return its id.
    pub fn add_item(&mut self) -> LineItemId {
        let id = self.draft.line_items.add();
        self.mirror();
        id
    }

    /// Remove a row. The last remaining row is never removed.
    pub fn remove_item(&mut self, id: &LineItemId) -> bool {
        let removed = self.draft.line_items.remove(id);
        if removed {
            self.mirror();
        }
        removed
    }

    /// Replace one field of a row from raw user input.
    pub fn update_item(&mut self, id: &LineItemId, field: LineItemField, value: &str) -> bool {
        let updated = self.draft.line_items.update(id, field, value);
        if updated {
            self.mirror();
        }
        updated
    }

    /// Resolve a row given either its id or its 1-based row number.
    #[must_use]
    pub fn resolve_item(&self, reference: &str) -> Option<LineItemId> {
        let reference = reference.trim();
        let id = LineItemId::new(reference);
        if self.draft.line_items.get(&id).is_some() {
            return Some(id);
        }

        reference
            .parse::<usize>()
            .ok()
            .and_then(|position| self.draft.line_items.id_at(position))
            .cloned()
    }

    /// Throw the draft away and start over with a blank one.
    #[instrument(skip_all)]
    pub fn discard(&mut self) {
        self.draft = QuoteDraft::new();
        self.committer.mirror().clear();
        debug!("Draft discarded");
    }

    /// Commit the draft for `owner_id`.
    ///
    /// On success the session starts over with a blank draft. On failure the
    /// draft and its mirror are kept so the user can retry.
    ///
    /// # Errors
    ///
    /// See [`QuoteCommitter::commit`].
    pub async fn commit(&mut self, owner_id: &OwnerId) -> Result<QuoteId, CommitError> {
        let id = self.committer.commit(&self.draft, owner_id).await?;
        self.draft = QuoteDraft::new();
        Ok(id)
    }

    fn mirror(&self) {
        self.committer.mirror().save(&self.draft);
    }
}
