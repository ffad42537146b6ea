//! Integration tests for CotizaciónPro.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline flow against in-memory storage
//! cargo test -p cotizapro-integration-tests
//!
//! # Live flow against a Supabase project (reads SUPABASE_URL,
//! # SUPABASE_ANON_KEY and COTIZA_ACCESS_TOKEN)
//! cargo test -p cotizapro-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `commit_flow` - Compose, survive restarts, commit, read back and share
//! - `supabase_live` - Same flow against a real project

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use tempfile::TempDir;

use cotizapro_core::{LineItemField, OwnerId};
use cotizapro_engine::{FileSlot, MemoryQuoteStore, QuoteReader, QuoteSession, QuoteStore};

/// Share links in tests point here.
pub const BASE_URL: &str = "https://cotizacionpro.app";

/// A device with a draft directory, talking to shared storage.
pub struct TestDevice {
    pub store: Arc<MemoryQuoteStore>,
    draft_dir: TempDir,
}

impl TestDevice {
    /// A device with an empty draft directory and empty storage.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryQuoteStore::new()),
            draft_dir: tempfile::tempdir().expect("Failed to create draft directory"),
        }
    }

    /// Open a session, as the app does on every start.
    #[must_use]
    pub fn open(&self) -> QuoteSession<Arc<MemoryQuoteStore>, FileSlot> {
        QuoteSession::start(Arc::clone(&self.store), self.slot())
    }

    /// The draft slot directory of this device.
    #[must_use]
    pub fn slot(&self) -> FileSlot {
        FileSlot::new(self.draft_dir.path())
    }

    /// A reader over the same storage.
    ///
    /// # Panics
    ///
    /// Panics if [`BASE_URL`] does not parse.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn reader(&self) -> QuoteReader<Arc<MemoryQuoteStore>> {
        QuoteReader::new(
            Arc::clone(&self.store),
            BASE_URL.parse().expect("valid base URL"),
        )
    }
}

impl Default for TestDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill `session` with a customer and the given `(description, quantity,
/// price)` rows, replacing whatever rows it had.
pub fn compose<S: QuoteStore, L: cotizapro_engine::LocalSlot>(
    session: &mut QuoteSession<S, L>,
    customer: &str,
    rows: &[(&str, &str, &str)],
) {
    session.discard();
    session.set_customer_name(customer);

    for (index, (description, quantity, price)) in rows.iter().enumerate() {
        let id = if index == 0 {
            session.resolve_item("1")
        } else {
            Some(session.add_item())
        };
        let Some(id) = id else { continue };

        session.update_item(&id, LineItemField::Description, description);
        session.update_item(&id, LineItemField::Quantity, quantity);
        session.update_item(&id, LineItemField::PricePerUnit, price);
    }
}

/// Owner used by the offline tests.
#[must_use]
pub fn owner(name: &str) -> OwnerId {
    OwnerId::new(format!("owner-{name}"))
}
