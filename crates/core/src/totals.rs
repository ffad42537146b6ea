//! Quote arithmetic: subtotal, IVA and total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::line_item::LineItem;

/// IVA (value-added tax) rate applied to every quote: 16%.
pub const TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

/// Derived amounts of a set of line items.
///
/// Always recomputed from the items; never cached between edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Compute totals at the fixed [`TAX_RATE`].
    ///
    /// ```
    /// use cotizapro_core::{LineItem, LineItemId, Totals};
    /// use rust_decimal::Decimal;
    ///
    /// let items = [
    ///     LineItem {
    ///         id: LineItemId::new("1"),
    ///         description: "Tubería".into(),
    ///         quantity: Decimal::from(2),
    ///         price_per_unit: Decimal::from(100),
    ///     },
    ///     LineItem {
    ///         id: LineItemId::new("2"),
    ///         description: "Mano de obra".into(),
    ///         quantity: Decimal::from(1),
    ///         price_per_unit: Decimal::from(50),
    ///     },
    /// ];
    ///
    /// let totals = Totals::compute(&items);
    /// assert_eq!(totals.subtotal, Decimal::from(250));
    /// assert_eq!(totals.tax, Decimal::from(40));
    /// assert_eq!(totals.total, Decimal::from(290));
    /// ```
    #[must_use]
    pub fn compute<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Self {
        Self::compute_with_rate(items, TAX_RATE)
    }

    /// Compute totals at an explicit tax rate.
    ///
    /// Amounts accepted from input are capped at
    /// [`AMOUNT_LIMIT`](crate::AMOUNT_LIMIT), far below where these sums
    /// would saturate.
    #[must_use]
    pub fn compute_with_rate<'a>(
        items: impl IntoIterator<Item = &'a LineItem>,
        tax_rate: Decimal,
    ) -> Self {
        let subtotal = items
            .into_iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.amount()));
        let tax = subtotal.saturating_mul(tax_rate);

        Self {
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
        }
    }
}
