//! Line items and the ordered collection that holds them.
//!
//! A [`LineItemCollection`] always holds at least one entry: the editor must
//! always show a row to type into, so removing the last row is a no-op.
//!
//! # Numeric fallback table
//!
//! Quantities and prices arrive as raw text from an input field. Text that
//! does not describe a usable amount resolves to a fixed fallback instead of
//! being stored:
//!
//! | Field            | Rejected input                                   | Fallback |
//! |------------------|--------------------------------------------------|----------|
//! | `quantity`       | empty, unparseable, zero, negative, too large    | `1`      |
//! | `price_per_unit` | empty, unparseable, negative, too large          | `0`      |
//!
//! Input is parsed as a whole: `"12abc"` is unparseable, not `12`. "Too
//! large" means above [`AMOUNT_LIMIT`], which keeps every product and sum of
//! a quote exact.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::totals::Totals;
use crate::types::{LineItemField, LineItemId};

/// Quantity used when the entered quantity is not a positive number.
pub const QUANTITY_FALLBACK: Decimal = Decimal::ONE;

/// Unit price used when the entered price is not a non-negative number.
pub const PRICE_FALLBACK: Decimal = Decimal::ZERO;

/// Largest quantity or unit price accepted from input: 10^12.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// One billable row of a quote.
///
/// Amounts serialize as JSON numbers, the shape web clients store in the
/// `line_items` column and in the draft slot. Strings are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_unit: Decimal,
}

impl LineItem {
    /// A blank row: no description, quantity 1, price 0.
    #[must_use]
    pub const fn blank(id: LineItemId) -> Self {
        Self {
            id,
            description: String::new(),
            quantity: QUANTITY_FALLBACK,
            price_per_unit: PRICE_FALLBACK,
        }
    }

    /// Line amount (`quantity * price_per_unit`). Never stored.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.quantity.saturating_mul(self.price_per_unit)
    }
}

/// Parse a quantity from raw input, applying the fallback table.
#[must_use]
pub fn parse_quantity(input: &str) -> Decimal {
    parse_amount(input)
        .filter(|q| q.is_sign_positive() && !q.is_zero())
        .unwrap_or(QUANTITY_FALLBACK)
}

/// Parse a unit price from raw input, applying the fallback table.
#[must_use]
pub fn parse_price(input: &str) -> Decimal {
    parse_amount(input)
        .filter(|p| p.is_zero() || p.is_sign_positive())
        .unwrap_or(PRICE_FALLBACK)
}

/// Plain decimal notation first, then anything `f64` understands
/// (exponents such as `1e3`). Non-finite values and magnitudes above
/// [`AMOUNT_LIMIT`] are rejected.
fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(|f| Decimal::try_from(f).ok())
        })
        .filter(|amount| amount.abs() <= AMOUNT_LIMIT)
}

/// Ordered, never-empty set of line items.
///
/// Order is display-significant and preserved across every edit. Item ids
/// are unique within the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct LineItemCollection {
    items: Vec<LineItem>,
}

impl LineItemCollection {
    /// A collection holding a single blank row.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: vec![LineItem::blank(LineItemId::generate())],
        }
    }

    /// Build a collection from existing items, restoring the invariants.
    ///
    /// An empty input yields a single blank row. Items whose id repeats an
    /// earlier one are given a fresh id; their contents and position are kept.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        if items.is_empty() {
            return Self::new();
        }

        let mut seen = std::collections::HashSet::with_capacity(items.len());
        let items = items
            .into_iter()
            .map(|mut item| {
                if !seen.insert(item.id.clone()) {
                    item.id = LineItemId::generate();
                    seen.insert(item.id.clone());
                }
                item
            })
            .collect();

        Self { items }
    }

    /// Append a blank row and return its id.
    pub fn add(&mut self) -> LineItemId {
        let id = LineItemId::generate();
        self.items.push(LineItem::blank(id.clone()));
        id
    }

    /// Remove the row with `id`.
    ///
    /// Returns `false` without changing anything when the id is unknown or
    /// when the row is the only one left.
    pub fn remove(&mut self, id: &LineItemId) -> bool {
        if self.items.len() <= 1 {
            return false;
        }
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Replace one field of the row with `id`.
    ///
    /// Numeric fields are parsed with [`parse_quantity`] / [`parse_price`].
    /// Returns `false` when no row has that id.
    pub fn update(&mut self, id: &LineItemId, field: LineItemField, value: &str) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };

        match field {
            LineItemField::Description => value.clone_into(&mut item.description),
            LineItemField::Quantity => item.quantity = parse_quantity(value),
            LineItemField::PricePerUnit => item.price_per_unit = parse_price(value),
        }
        true
    }

    /// Look up a row by id.
    #[must_use]
    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Id of the row at a 1-based display position.
    #[must_use]
    pub fn id_at(&self, position: usize) -> Option<&LineItemId> {
        position
            .checked_sub(1)
            .and_then(|index| self.items.get(index))
            .map(|item| &item.id)
    }

    /// Number of rows (always at least 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate rows in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Rows in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[LineItem] {
        &self.items
    }

    /// Subtotal, IVA and total for the current rows.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::compute(&self.items)
    }
}

impl Default for LineItemCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<LineItem>> for LineItemCollection {
    fn from(items: Vec<LineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<LineItemCollection> for Vec<LineItem> {
    fn from(collection: LineItemCollection) -> Self {
        collection.items
    }
}

impl<'a> IntoIterator for &'a LineItemCollection {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
