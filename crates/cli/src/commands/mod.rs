//! CLI command implementations.

#![allow(clippy::print_stderr)]

pub mod draft;
pub mod quote;

use cotizapro_engine::identity::IdentityProvider;
use cotizapro_engine::{
    EngineConfig, EngineError, FileSlot, Identity, MemoryQuoteStore, QuoteReader, QuoteSession,
    StaticIdentity, SupabaseClient,
};

/// Configuration shared by every command.
pub struct Context {
    config: EngineConfig,
}

impl Context {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    fn client(&self) -> Result<SupabaseClient, EngineError> {
        Ok(SupabaseClient::new(self.config.remote()?)?)
    }

    fn slot(&self) -> FileSlot {
        FileSlot::new(&self.config.draft_dir)
    }

    /// Session that can commit the draft kept in the configured directory.
    pub fn session(&self) -> Result<QuoteSession<SupabaseClient, FileSlot>, EngineError> {
        Ok(QuoteSession::start(self.client()?, self.slot()))
    }

    /// Session for local edits only; its store is never reached, so no
    /// Supabase configuration is needed.
    pub fn draft_session(&self) -> QuoteSession<MemoryQuoteStore, FileSlot> {
        QuoteSession::start(MemoryQuoteStore::new(), self.slot())
    }

    pub fn reader(&self) -> Result<QuoteReader<SupabaseClient>, EngineError> {
        Ok(QuoteReader::new(
            self.client()?,
            self.config.public_base_url.clone(),
        ))
    }

    /// The signed-in user.
    ///
    /// An access token takes precedence over a configured fixed owner.
    pub async fn identity(&self) -> Result<Identity, EngineError> {
        let identity = if self.config.has_access_token() {
            self.client()?.current_identity().await?
        } else if let Some(owner) = &self.config.static_owner {
            StaticIdentity::from(owner).current_identity().await?
        } else {
            None
        };

        let identity = identity.ok_or(EngineError::SignInRequired)?;
        cotizapro_engine::error::set_sentry_user(&identity.owner_id);
        Ok(identity)
    }
}

/// Print `message` and exit with status 1.
pub fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
