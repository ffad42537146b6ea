//! Core types for CotizaciónPro.
//!
//! This module provides type-safe wrappers for identifiers, peso amounts and
//! lifecycle statuses.

pub mod id;
pub mod money;
pub mod status;

pub use id::*;
pub use money::{CurrencyCode, Price, round_cents};
pub use status::*;
