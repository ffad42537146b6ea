//! Clients for external services.
//!
//! # Services
//!
//! - `supabase` - Quote storage (PostgREST) and the signed-in user (Auth)

pub mod supabase;

pub use supabase::SupabaseClient;
