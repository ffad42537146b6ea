//! CotizaciónPro Core - Quote model and calculation engine.
//!
//! This crate provides the types shared by every CotizaciónPro component:
//! - `engine` - Draft mirroring, commit and retrieval against remote storage
//! - `cli` - Terminal front end for composing and sharing quotes
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no local storage. Every mutation of a draft is an explicit method
//! call on a value, which keeps the model embeddable and testable outside any
//! UI.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, peso amounts and lifecycle statuses
//! - [`line_item`] - Line items, the never-empty collection, numeric fallbacks
//! - [`totals`] - Subtotal / IVA / total
//! - [`draft`] - The quote under composition and its commit validation
//! - [`quote`] - Committed quotes and their creation payload

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod draft;
pub mod line_item;
pub mod quote;
pub mod totals;
pub mod types;

pub use draft::{QuoteDraft, ValidationError};
pub use line_item::{
    AMOUNT_LIMIT, LineItem, LineItemCollection, PRICE_FALLBACK, QUANTITY_FALLBACK, parse_price,
    parse_quantity,
};
pub use quote::{NewQuote, Quote};
pub use totals::{TAX_RATE, Totals};
pub use types::*;
