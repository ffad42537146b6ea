//! The in-progress, not-yet-committed quote.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::line_item::LineItemCollection;
use crate::totals::Totals;

/// A required field was missing when the draft was about to be committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Customer name is empty or whitespace.
    #[error("customer name is required")]
    MissingCustomerName,

    /// A line item has an empty or whitespace description.
    #[error("line item {position} has no description")]
    MissingDescription {
        /// 1-based row number of the first offending item.
        position: usize,
    },
}

/// Quote under composition.
///
/// Serializes to the JSON shape kept in the local draft slot:
/// `{ "customerName", "customerPhone", "lineItems": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    pub customer_name: String,
    /// Phone / WhatsApp number; may be empty.
    pub customer_phone: String,
    pub line_items: LineItemCollection,
}

impl QuoteDraft {
    /// An empty draft with one blank row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live totals for the current rows.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.line_items.totals()
    }

    /// Check the fields required to commit.
    ///
    /// # Errors
    ///
    /// Returns the first missing field: the customer name is checked before
    /// any line item description.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_name.trim().is_empty() {
            return Err(ValidationError::MissingCustomerName);
        }

        if let Some(index) = self
            .line_items
            .iter()
            .position(|item| item.description.trim().is_empty())
        {
            return Err(ValidationError::MissingDescription {
                position: index + 1,
            });
        }

        Ok(())
    }
}
