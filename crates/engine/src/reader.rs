//! Retrieval and presentation of committed quotes.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use cotizapro_core::{OwnerId, Price, Quote, QuoteId};

use crate::store::{QuoteStore, StoreError};

/// Dates are shown in Mexico City standard time, UTC-06:00.
const DISPLAY_UTC_OFFSET_SECS: i32 = 6 * 3600;

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Errors that can occur when reading a quote.
#[derive(Debug, Error)]
pub enum ReadError {
    /// No quote with that id belongs to the requesting owner.
    #[error("quote not found")]
    NotFound,

    /// Storage could not be queried.
    #[error("failed to load quote: {0}")]
    Store(#[from] StoreError),
}

/// A quote ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteView {
    pub id: String,
    pub date: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub rows: Vec<QuoteRowView>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
}

/// One numbered row of a [`QuoteView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRowView {
    /// 1-based row number.
    pub position: usize,
    pub description: String,
    /// Quantity and unit price, e.g. `2 × $100.00`.
    pub detail: String,
    /// Line amount, e.g. `$200.00`.
    pub amount: String,
}

/// Reads committed quotes and formats them for display and sharing.
#[derive(Debug)]
pub struct QuoteReader<S> {
    store: S,
    base_url: Url,
}

impl<S: QuoteStore> QuoteReader<S> {
    /// Read from `store`; share links point at `base_url`.
    #[must_use]
    pub const fn new(store: S, base_url: Url) -> Self {
        Self { store, base_url }
    }

    /// Fetch the quote `id` owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `ReadError::NotFound` both when the id does not exist and when
    /// it belongs to someone else, and `ReadError::Store` on transport
    /// failure.
    #[instrument(skip(self), fields(quote_id = %id, owner_id = %owner_id))]
    pub async fn fetch(&self, id: &QuoteId, owner_id: &OwnerId) -> Result<Quote, ReadError> {
        let quote = self
            .store
            .get_by_id(id, owner_id)
            .await?
            .ok_or(ReadError::NotFound)?;

        debug!(items = quote.line_items.len(), "Quote loaded");
        Ok(quote)
    }

    /// Link to the public page of quote `id`.
    #[must_use]
    pub fn share_url(&self, id: &QuoteId) -> String {
        format!(
            "{}/cotizacion/{id}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    /// Plain-text summary for sharing over chat or SMS.
    #[must_use]
    pub fn format_summary(&self, quote: &Quote) -> String {
        format!(
            "Cotización para {}\n\nTotal: {}\n\nVer detalles: {}",
            quote.customer_name,
            Price::mxn(quote.total),
            self.share_url(&quote.id)
        )
    }

    /// Build the presentation model of `quote`. Stored amounts are used as-is.
    #[must_use]
    pub fn present(&self, quote: &Quote) -> QuoteView {
        let rows = quote
            .line_items
            .iter()
            .enumerate()
            .map(|(index, item)| QuoteRowView {
                position: index + 1,
                description: item.description.clone(),
                detail: format!(
                    "{} × {}",
                    format_quantity(item.quantity),
                    Price::mxn(item.price_per_unit).display_amount()
                ),
                amount: Price::mxn(item.amount()).display_amount(),
            })
            .collect();

        QuoteView {
            id: quote.id.to_string(),
            date: spanish_long_date(quote.created_at),
            customer_name: quote.customer_name.clone(),
            customer_phone: quote
                .has_phone()
                .then(|| quote.customer_phone.clone()),
            rows,
            subtotal: Price::mxn(quote.subtotal).to_string(),
            tax: Price::mxn(quote.tax).to_string(),
            total: Price::mxn(quote.total).to_string(),
        }
    }
}

/// Quantities print without trailing zeros, e.g. `2` or `2.5`.
fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

/// Long Spanish date such as `17 de octubre de 2026`.
#[must_use]
pub fn spanish_long_date(at: DateTime<Utc>) -> String {
    let offset = FixedOffset::west_opt(DISPLAY_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    let local = at.with_timezone(&offset);
    let month = usize::try_from(local.month0())
        .ok()
        .and_then(|index| MONTHS.get(index))
        .copied()
        .unwrap_or_default();

    format!("{} de {month} de {}", local.day(), local.year())
}
