//! Committed quotes and the payload that creates them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::draft::QuoteDraft;
use crate::line_item::LineItem;
use crate::totals::Totals;
use crate::types::{OwnerId, QuoteId};

/// Everything remote storage needs to create a quote.
///
/// Amounts are computed once, at commit time, and stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
    pub owner_id: OwnerId,
    pub customer_name: String,
    pub customer_phone: String,
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl NewQuote {
    /// Snapshot a draft for `owner_id`, computing its totals now.
    #[must_use]
    pub fn from_draft(owner_id: OwnerId, draft: &QuoteDraft, created_at: DateTime<Utc>) -> Self {
        let Totals {
            subtotal,
            tax,
            total,
        } = draft.totals();

        Self {
            owner_id,
            customer_name: draft.customer_name.clone(),
            customer_phone: draft.customer_phone.clone(),
            line_items: draft.line_items.as_slice().to_vec(),
            subtotal,
            tax,
            total,
            created_at,
        }
    }

    /// Attach the id assigned by storage.
    #[must_use]
    pub fn into_quote(self, id: QuoteId) -> Quote {
        Quote {
            id,
            owner_id: self.owner_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            line_items: self.line_items,
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            created_at: self.created_at,
        }
    }
}

/// An immutable, committed quote as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub owner_id: OwnerId,
    pub customer_name: String,
    pub customer_phone: String,
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Stored amounts. These are never recomputed from the items.
    #[must_use]
    pub const fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
        }
    }

    /// Whether a phone number was captured.
    #[must_use]
    pub fn has_phone(&self) -> bool {
        !self.customer_phone.trim().is_empty()
    }
}
