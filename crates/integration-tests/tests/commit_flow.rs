//! Integration tests for the draft-to-shared-quote flow.
//!
//! Runs entirely offline: storage is in memory and the draft slot lives in a
//! temporary directory, so restarting the app is opening a new session on the
//! same directory.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use cotizapro_core::{CommitStatus, LineItemField, QuoteId, ValidationError};
use cotizapro_engine::{CommitError, DraftMirror, LocalSlot, ReadError};
use cotizapro_integration_tests::{TestDevice, compose, owner};

// ============================================================================
// Composing
// ============================================================================

#[test]
fn test_draft_survives_restart() {
    let device = TestDevice::new();
    {
        let mut session = device.open();
        compose(
            &mut session,
            "Juan Pérez",
            &[("Pintura", "2", "100"), ("Brocha", "1", "50")],
        );
        session.set_customer_phone("55 1234 5678");
    }

    let session = device.open();
    let draft = session.draft();
    assert_eq!(draft.customer_name, "Juan Pérez");
    assert_eq!(draft.customer_phone, "55 1234 5678");
    let descriptions: Vec<_> = draft
        .line_items
        .iter()
        .map(|item| item.description.as_str())
        .collect();
    assert_eq!(descriptions, ["Pintura", "Brocha"]);
    assert_eq!(session.totals().total, Decimal::from(290));
}

#[test]
fn test_corrupt_slot_starts_fresh_draft() {
    let device = TestDevice::new();
    device.slot().write("draft_quote", "{\"lineItems\": [").unwrap();

    let session = device.open();
    assert_eq!(session.draft().customer_name, "");
    assert_eq!(session.draft().line_items.len(), 1);
}

#[test]
fn test_invalid_numbers_fall_back() {
    let device = TestDevice::new();
    let mut session = device.open();
    compose(&mut session, "Ana", &[("Cable", "abc", "-5")]);

    let item = session.draft().line_items.iter().next().unwrap();
    assert_eq!(item.quantity, Decimal::ONE);
    assert_eq!(item.price_per_unit, Decimal::ZERO);

    let id = item.id.clone();
    session.update_item(&id, LineItemField::Quantity, "0");
    assert_eq!(session.draft().line_items.get(&id).unwrap().quantity, Decimal::ONE);
}

#[test]
fn test_last_row_cannot_be_removed() {
    let device = TestDevice::new();
    let mut session = device.open();
    let only = session.resolve_item("1").unwrap();

    assert!(!session.remove_item(&only));
    assert_eq!(session.draft().line_items.len(), 1);
    assert_eq!(device.open().draft().line_items.len(), 1);
}

// ============================================================================
// Committing
// ============================================================================

#[tokio::test]
async fn test_commit_then_share() {
    let device = TestDevice::new();
    let mut session = device.open();
    compose(
        &mut session,
        "Juan Pérez",
        &[("Pintura", "2", "100"), ("Brocha", "1", "50")],
    );

    let id = session.commit(&owner("ana")).await.unwrap();
    assert_eq!(session.status(), CommitStatus::Succeeded);

    // Mirror is gone: a restart begins with a blank draft.
    let restarted = device.open();
    assert_eq!(restarted.draft().customer_name, "");
    assert_eq!(restarted.draft().line_items.len(), 1);

    let reader = device.reader();
    let quote = reader.fetch(&id, &owner("ana")).await.unwrap();
    assert_eq!(quote.subtotal, Decimal::from(250));
    assert_eq!(quote.tax, Decimal::from(40));
    assert_eq!(quote.total, Decimal::from(290));

    let view = reader.present(&quote);
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.total, "$290.00 MXN");

    assert_eq!(
        reader.format_summary(&quote),
        format!(
            "Cotización para Juan Pérez\n\nTotal: $290.00 MXN\n\nVer detalles: https://cotizacionpro.app/cotizacion/{id}"
        )
    );
}

#[tokio::test]
async fn test_missing_customer_name_is_not_submitted() {
    let device = TestDevice::new();
    let mut session = device.open();
    compose(&mut session, "   ", &[("Pintura", "1", "10")]);

    let err = session.commit(&owner("ana")).await.unwrap_err();

    assert!(matches!(
        err,
        CommitError::Validation(ValidationError::MissingCustomerName)
    ));
    assert_eq!(device.store.create_calls(), 0);
    assert_eq!(device.open().draft().line_items.len(), 1);
    assert_eq!(
        device.open().draft().line_items.iter().next().unwrap().description,
        "Pintura"
    );
}

#[tokio::test]
async fn test_offline_commit_keeps_work_and_retry_succeeds() {
    let device = TestDevice::new();
    let mut session = device.open();
    compose(&mut session, "María", &[("Instalación", "1", "1500")]);

    device.store.set_unavailable(true);
    let err = session.commit(&owner("ana")).await.unwrap_err();
    assert!(matches!(err, CommitError::Submission(_)));
    assert_eq!(session.status(), CommitStatus::Failed);

    // Still there after a restart.
    let mut session = device.open();
    assert_eq!(session.draft().customer_name, "María");

    device.store.set_unavailable(false);
    let id = session.commit(&owner("ana")).await.unwrap();
    assert_eq!(device.store.create_calls(), 2);
    assert_eq!(device.store.len(), 1);
    assert!(device.reader().fetch(&id, &owner("ana")).await.is_ok());
}

// ============================================================================
// Reading
// ============================================================================

#[tokio::test]
async fn test_other_owner_gets_not_found() {
    let device = TestDevice::new();
    let mut session = device.open();
    compose(&mut session, "Pedro", &[("Puerta", "1", "2000")]);
    let id = session.commit(&owner("ana")).await.unwrap();

    let reader = device.reader();
    let foreign = reader.fetch(&id, &owner("beto")).await;
    let missing = reader.fetch(&QuoteId::new("q-999"), &owner("ana")).await;

    assert!(matches!(foreign, Err(ReadError::NotFound)));
    assert!(matches!(missing, Err(ReadError::NotFound)));
}

#[tokio::test]
async fn test_stored_amounts_are_not_recomputed() {
    let device = TestDevice::new();
    let mut session = device.open();
    compose(&mut session, "Luis", &[("Tornillos", "3", "0.10")]);
    let id = session.commit(&owner("ana")).await.unwrap();

    let quote = device.reader().fetch(&id, &owner("ana")).await.unwrap();
    assert_eq!(quote.subtotal, Decimal::new(30, 2));
    assert_eq!(quote.tax, Decimal::new(48, 3));
    assert_eq!(quote.total, Decimal::new(348, 3));
    assert_eq!(device.reader().present(&quote).total, "$0.35 MXN");
}

#[test]
fn test_mirror_shares_slot_with_session() {
    let device = TestDevice::new();
    let mut session = device.open();
    session.set_customer_name("Rosa");

    let mirrored = DraftMirror::new(device.slot()).hydrate();
    assert_eq!(&mirrored, session.draft());
}
