//! Remote quote storage boundary.
//!
//! Storage is an opaque create / read-by-id service scoped by owner. The
//! engine never assumes anything beyond the quote field set and the
//! guarantee that a read only ever returns the requesting owner's rows.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use cotizapro_core::{NewQuote, OwnerId, Quote, QuoteId};

/// Errors that can occur when talking to quote storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Create / read-by-id quote storage.
pub trait QuoteStore: Send + Sync {
    /// Persist a new quote for `quote.owner_id` and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the quote could not be created.
    fn create(&self, quote: &NewQuote) -> impl Future<Output = Result<QuoteId, StoreError>> + Send;

    /// Fetch a quote, but only if it belongs to `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if storage could not be queried. A missing quote
    /// or one owned by someone else is `Ok(None)`.
    fn get_by_id(
        &self,
        id: &QuoteId,
        owner_id: &OwnerId,
    ) -> impl Future<Output = Result<Option<Quote>, StoreError>> + Send;
}

impl<T: QuoteStore + ?Sized> QuoteStore for &T {
    fn create(&self, quote: &NewQuote) -> impl Future<Output = Result<QuoteId, StoreError>> + Send {
        (**self).create(quote)
    }

    fn get_by_id(
        &self,
        id: &QuoteId,
        owner_id: &OwnerId,
    ) -> impl Future<Output = Result<Option<Quote>, StoreError>> + Send {
        (**self).get_by_id(id, owner_id)
    }
}

impl<T: QuoteStore + ?Sized> QuoteStore for Arc<T> {
    fn create(&self, quote: &NewQuote) -> impl Future<Output = Result<QuoteId, StoreError>> + Send {
        (**self).create(quote)
    }

    fn get_by_id(
        &self,
        id: &QuoteId,
        owner_id: &OwnerId,
    ) -> impl Future<Output = Result<Option<Quote>, StoreError>> + Send {
        (**self).get_by_id(id, owner_id)
    }
}

/// In-process quote storage with the same owner scoping as the remote one.
///
/// Can be switched into an unavailable mode to simulate lost connectivity.
#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    quotes: Mutex<Vec<Quote>>,
    create_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryQuoteStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `create` calls received, successful or not.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of stored quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes().len()
    }

    /// Whether no quote has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes().is_empty()
    }

    fn quotes(&self) -> std::sync::MutexGuard<'_, Vec<Quote>> {
        self.quotes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "storage unavailable".to_owned(),
            });
        }
        Ok(())
    }
}

impl QuoteStore for MemoryQuoteStore {
    async fn create(&self, quote: &NewQuote) -> Result<QuoteId, StoreError> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.check_available()?;

        let id = QuoteId::new(format!("q-{call}"));
        self.quotes().push(quote.clone().into_quote(id.clone()));
        Ok(id)
    }

    async fn get_by_id(
        &self,
        id: &QuoteId,
        owner_id: &OwnerId,
    ) -> Result<Option<Quote>, StoreError> {
        self.check_available()?;

        Ok(self
            .quotes()
            .iter()
            .find(|quote| &quote.id == id && &quote.owner_id == owner_id)
            .cloned())
    }
}
