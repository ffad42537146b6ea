//! Local draft commands.
//!
//! # Usage
//!
//! ```bash
//! cotiza draft customer --name "Juan Pérez"
//! cotiza draft set 1 description "Instalación"
//! cotiza draft remove 2
//! ```
//!
//! Every edit is written to the draft slot in `COTIZA_DRAFT_DIR` right away.
//! None of these commands reach Supabase.

#![allow(clippy::print_stdout)]

use cotizapro_core::{LineItemField, Price, QuoteDraft};
use cotizapro_engine::EngineError;
use cotizapro_engine::error::add_breadcrumb;

use super::Context;

/// Print the draft rows and live totals.
pub fn show(ctx: &Context) {
    let session = ctx.draft_session();
    print_draft(session.draft());
}

/// Update customer name and/or phone.
pub fn customer(ctx: &Context, name: Option<String>, phone: Option<String>) {
    let mut session = ctx.draft_session();

    if let Some(name) = name {
        session.set_customer_name(name);
    }
    if let Some(phone) = phone {
        session.set_customer_phone(phone);
    }

    add_breadcrumb("draft", "Customer updated");
    print_draft(session.draft());
}

/// Append a blank row.
pub fn add(ctx: &Context) {
    let mut session = ctx.draft_session();
    let id = session.add_item();

    add_breadcrumb("draft", "Row added");
    println!(
        "Concepto {} agregado ({id})",
        session.draft().line_items.len()
    );
}

/// Set one field of a row from raw input.
pub fn set(
    ctx: &Context,
    item: &str,
    field: LineItemField,
    value: &str,
) -> Result<(), EngineError> {
    let mut session = ctx.draft_session();
    let id = session
        .resolve_item(item)
        .ok_or_else(|| EngineError::UnknownItem(item.to_owned()))?;

    session.update_item(&id, field, value);

    add_breadcrumb("draft", "Row updated");
    print_draft(session.draft());
    Ok(())
}

/// Remove a row; the last row always stays.
pub fn remove(ctx: &Context, item: &str) -> Result<(), EngineError> {
    let mut session = ctx.draft_session();
    let id = session
        .resolve_item(item)
        .ok_or_else(|| EngineError::UnknownItem(item.to_owned()))?;

    if session.remove_item(&id) {
        add_breadcrumb("draft", "Row removed");
    } else {
        println!("La cotización debe tener al menos un concepto");
    }

    print_draft(session.draft());
    Ok(())
}

/// Throw the draft away.
pub fn discard(ctx: &Context) {
    let mut session = ctx.draft_session();
    session.discard();
    println!("Borrador descartado");
}

fn print_draft(draft: &QuoteDraft) {
    let name = if draft.customer_name.trim().is_empty() {
        "(sin nombre)"
    } else {
        draft.customer_name.as_str()
    };
    println!("Cliente: {name}");
    if !draft.customer_phone.trim().is_empty() {
        println!("Teléfono: {}", draft.customer_phone);
    }
    println!();

    for (index, item) in draft.line_items.iter().enumerate() {
        let description = if item.description.trim().is_empty() {
            "(sin descripción)"
        } else {
            item.description.as_str()
        };
        println!(
            "{:>3}. {description}  {} × {} = {}  [{}]",
            index + 1,
            item.quantity.normalize(),
            Price::mxn(item.price_per_unit).display_amount(),
            Price::mxn(item.amount()).display_amount(),
            item.id
        );
    }

    let totals = draft.totals();
    println!();
    println!("Subtotal:  {}", Price::mxn(totals.subtotal));
    println!("IVA (16%): {}", Price::mxn(totals.tax));
    println!("Total:     {}", Price::mxn(totals.total));
}
