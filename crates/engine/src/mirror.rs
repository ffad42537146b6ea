//! Local mirror of the draft being composed.
//!
//! Every edit rewrites the whole draft into a single fixed slot so that a
//! reload, a crash or lost connectivity never loses typed work. Only the
//! latest state is kept. The mirror is a courtesy cache: failures to write
//! are logged and otherwise ignored, and unreadable content hydrates as a
//! fresh draft field by field instead of failing the session.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use cotizapro_core::{
    LineItem, LineItemCollection, LineItemId, PRICE_FALLBACK, QUANTITY_FALLBACK, QuoteDraft,
    parse_price, parse_quantity,
};

use crate::slot::{LocalSlot, SlotError};

/// Slot key reserved for the draft.
pub const DRAFT_KEY: &str = "draft_quote";

/// Why a stored draft could not be used as-is.
#[derive(Debug, Error)]
pub enum HydrationError {
    /// Stored text is not JSON.
    #[error("malformed draft: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Slot could not be read.
    #[error("draft slot unreadable: {0}")]
    Slot(#[from] SlotError),
}

/// Write-through mirror of a [`QuoteDraft`] in a [`LocalSlot`].
#[derive(Debug)]
pub struct DraftMirror<S> {
    slot: S,
}

impl<S: LocalSlot> DraftMirror<S> {
    /// Mirror drafts into `slot`.
    #[must_use]
    pub const fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Overwrite the slot with `draft`.
    #[instrument(skip_all, fields(items = draft.line_items.len()))]
    pub fn save(&self, draft: &QuoteDraft) {
        let result = serde_json::to_string(draft)
            .map_err(HydrationError::from)
            .and_then(|json| {
                self.slot
                    .write(DRAFT_KEY, &json)
                    .map_err(HydrationError::from)
            });

        match result {
            Ok(()) => debug!("Draft mirrored"),
            Err(e) => warn!(error = %e, "Failed to mirror draft"),
        }
    }

    /// Load the mirrored draft, or a fresh one when there is none.
    ///
    /// Never fails: unusable content is logged and replaced by defaults.
    #[instrument(skip_all)]
    pub fn hydrate(&self) -> QuoteDraft {
        let raw = match self.slot.read(DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No mirrored draft, starting fresh");
                return QuoteDraft::new();
            }
            Err(e) => {
                warn!(error = %HydrationError::from(e), "Starting with a fresh draft");
                return QuoteDraft::new();
            }
        };

        match draft_from_json(&raw) {
            Ok(draft) => {
                debug!(items = draft.line_items.len(), "Draft hydrated");
                draft
            }
            Err(e) => {
                warn!(error = %e, "Starting with a fresh draft");
                QuoteDraft::new()
            }
        }
    }

    /// Erase the mirrored draft.
    #[instrument(skip_all)]
    pub fn clear(&self) {
        if let Err(e) = self.slot.delete(DRAFT_KEY) {
            warn!(error = %e, "Failed to clear mirrored draft");
        }
    }

    /// Access the underlying slot.
    pub const fn slot(&self) -> &S {
        &self.slot
    }
}

/// Parse mirrored JSON leniently.
///
/// Only text that is not JSON at all is an error. Any JSON value yields a
/// draft: missing or mistyped fields take the same defaults as a fresh draft,
/// and line items are repaired one by one.
///
/// # Errors
///
/// Returns `HydrationError::Malformed` when `raw` is not valid JSON.
pub fn draft_from_json(raw: &str) -> Result<QuoteDraft, HydrationError> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(draft_from_value(&value))
}

fn draft_from_value(value: &Value) -> QuoteDraft {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_default()
    };

    let items = value
        .get("lineItems")
        .and_then(Value::as_array)
        .map(|rows| rows.iter().filter_map(item_from_value).collect())
        .unwrap_or_default();

    QuoteDraft {
        customer_name: text("customerName"),
        customer_phone: text("customerPhone"),
        line_items: LineItemCollection::from_items(items),
    }
}

fn item_from_value(value: &Value) -> Option<LineItem> {
    let row = value.as_object()?;

    let id = match row.get("id") {
        Some(Value::String(id)) if !id.is_empty() => LineItemId::new(id.as_str()),
        Some(Value::Number(id)) => LineItemId::new(id.to_string()),
        _ => LineItemId::generate(),
    };

    let description = row
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    let quantity =
        numeric_text(row.get("quantity")).map_or(QUANTITY_FALLBACK, |s| parse_quantity(&s));
    let price_per_unit =
        numeric_text(row.get("pricePerUnit")).map_or(PRICE_FALLBACK, |s| parse_price(&s));

    Some(LineItem {
        id,
        description,
        quantity,
        price_per_unit,
    })
}

/// Numbers and strings both carry amounts.
fn numeric_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
