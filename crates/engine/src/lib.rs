//! CotizaciónPro engine library.
//!
//! Everything between a draft being typed and a quote being shared:
//! local mirroring of the draft, the one-shot commit to remote storage and
//! the read-back and formatting of committed quotes. The quote model itself
//! lives in `cotizapro-core`.
//!
//! # Modules
//!
//! - [`session`] - Editing session that mirrors every change
//! - [`mirror`] / [`slot`] - Local draft slot
//! - [`committer`] - Validation and single-flight submission
//! - [`reader`] - Retrieval, presentation and share summary
//! - [`store`] / [`identity`] - Boundaries to storage and sign-in
//! - [`services`] - Supabase implementation of those boundaries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod committer;
pub mod config;
pub mod error;
pub mod identity;
pub mod mirror;
pub mod reader;
pub mod services;
pub mod session;
pub mod slot;
pub mod store;

pub use committer::{CommitError, QuoteCommitter};
pub use config::{ConfigError, EngineConfig};
pub use error::EngineError;
pub use identity::{Identity, IdentityError, IdentityProvider, StaticIdentity};
pub use mirror::DraftMirror;
pub use reader::{QuoteReader, QuoteView, ReadError};
pub use services::SupabaseClient;
pub use session::QuoteSession;
pub use slot::{FileSlot, LocalSlot, MemorySlot};
pub use store::{MemoryQuoteStore, QuoteStore, StoreError};
