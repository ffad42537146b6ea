//! Property-based tests for the line item model and quote arithmetic.
//!
//! These tests verify that:
//! - Totals always equal the sum of line amounts plus 16% IVA
//! - No sequence of edits empties a collection or duplicates an id
//! - Updates never disturb other rows or their order

use cotizapro_core::{
    AMOUNT_LIMIT, LineItem, LineItemCollection, LineItemField, LineItemId, TAX_RATE, Totals,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for an amount with up to two decimals, like a typed price.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a positive quantity with up to one decimal.
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..10_000).prop_map(|tenths| Decimal::new(tenths, 1))
}

fn arb_items() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec((arb_quantity(), arb_amount()), 1..20).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (quantity, price_per_unit))| LineItem {
                id: LineItemId::new(i.to_string()),
                description: format!("row {i}"),
                quantity,
                price_per_unit,
            })
            .collect()
    })
}

#[derive(Debug, Clone)]
enum Edit {
    Add,
    Remove(usize),
    Update(usize, LineItemField, String),
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    let field = prop_oneof![
        Just(LineItemField::Description),
        Just(LineItemField::Quantity),
        Just(LineItemField::PricePerUnit),
    ];
    prop_oneof![
        Just(Edit::Add),
        (1usize..8).prop_map(Edit::Remove),
        (1usize..8, field, "[-a-z0-9. ]{0,6}").prop_map(|(p, f, v)| Edit::Update(p, f, v)),
    ]
}

fn apply(items: &mut LineItemCollection, edit: &Edit) {
    match edit {
        Edit::Add => {
            items.add();
        }
        Edit::Remove(position) => {
            if let Some(id) = items.id_at(*position).cloned() {
                items.remove(&id);
            }
        }
        Edit::Update(position, field, value) => {
            if let Some(id) = items.id_at(*position).cloned() {
                items.update(&id, *field, value);
            }
        }
    }
}

proptest! {
    /// Subtotal is the exact sum of line amounts and total is subtotal * 1.16.
    #[test]
    fn totals_match_line_amounts(items in arb_items()) {
        let totals = Totals::compute(&items);

        let expected: Decimal = items
            .iter()
            .map(|item| item.quantity * item.price_per_unit)
            .sum();
        prop_assert_eq!(totals.subtotal, expected);
        prop_assert_eq!(totals.tax, expected * TAX_RATE);
        prop_assert_eq!(totals.total, expected * Decimal::new(116, 2));
    }

    /// No edit sequence leaves the collection empty or with repeated ids.
    #[test]
    fn edits_never_empty_collection(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let mut items = LineItemCollection::new();
        for edit in &edits {
            apply(&mut items, edit);
            prop_assert!(items.len() >= 1);
        }

        let mut ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }

    /// Removing everything one id at a time always stops at one row.
    #[test]
    fn removing_all_rows_keeps_one(items in arb_items()) {
        let mut collection = LineItemCollection::from_items(items.clone());
        for item in &items {
            collection.remove(&item.id);
        }
        prop_assert_eq!(collection.len(), 1);
    }

    /// Numeric updates never store a non-positive quantity or negative price.
    #[test]
    fn numeric_updates_respect_fallbacks(value in "\\PC{0,8}") {
        let mut items = LineItemCollection::new();
        let id = items.id_at(1).cloned().unwrap_or_else(LineItemId::generate);
        items.update(&id, LineItemField::Quantity, &value);
        items.update(&id, LineItemField::PricePerUnit, &value);

        let row = items.get(&id);
        prop_assert!(row.is_some_and(|r| r.quantity > Decimal::ZERO));
        prop_assert!(row.is_some_and(|r| r.price_per_unit >= Decimal::ZERO));
    }

    /// Whatever digits are typed, stored amounts stay within the limit and
    /// the totals add up exactly.
    #[test]
    fn typed_amounts_keep_totals_exact(
        quantity in "[0-9]{1,32}(\\.[0-9]{1,6})?",
        price in "[0-9]{1,32}(\\.[0-9]{1,6})?|[0-9]e[0-9]{1,2}",
        rows in 1usize..40,
    ) {
        let mut items = LineItemCollection::new();
        for _ in 1..rows {
            items.add();
        }
        let ids: Vec<LineItemId> = items.iter().map(|item| item.id.clone()).collect();
        for id in &ids {
            items.update(id, LineItemField::Quantity, &quantity);
            items.update(id, LineItemField::PricePerUnit, &price);
        }

        for item in &items {
            prop_assert!(item.quantity <= AMOUNT_LIMIT);
            prop_assert!(item.price_per_unit <= AMOUNT_LIMIT);
        }
        let totals = items.totals();
        prop_assert_eq!(totals.tax, totals.subtotal * TAX_RATE);
        prop_assert_eq!(totals.total, totals.subtotal + totals.tax);
    }

    /// Updating one row leaves every other row identical and in place.
    #[test]
    fn update_touches_only_target(items in arb_items(), pick in 0usize..20, value in "[0-9]{1,3}") {
        let mut collection = LineItemCollection::from_items(items);
        let position = pick % collection.len() + 1;
        let before = collection.clone();
        let target = collection.id_at(position).cloned();

        if let Some(id) = &target {
            collection.update(id, LineItemField::Quantity, &value);
        }

        for (old, new) in before.iter().zip(collection.iter()) {
            prop_assert_eq!(&old.id, &new.id);
            if Some(&old.id) != target.as_ref() {
                prop_assert_eq!(old, new);
            }
        }
    }
}
