//! Who is composing quotes.
//!
//! Signing in is handled elsewhere; the engine only asks the identity
//! provider for the current owner. No identity is not an engine error: the
//! caller is expected to send the user to sign in.

use std::future::Future;

use thiserror::Error;

use cotizapro_core::OwnerId;

use crate::config::StaticOwnerConfig;

/// Display name used when the profile has neither a name nor an e-mail.
pub const DEFAULT_DISPLAY_NAME: &str = "Usuario";

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// The signed-in owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub owner_id: OwnerId,
    pub display_name: String,
}

impl Identity {
    /// Build an identity, deriving the display name from the profile.
    ///
    /// Preference order: profile name, the part of the e-mail before `@`,
    /// then [`DEFAULT_DISPLAY_NAME`].
    #[must_use]
    pub fn from_profile(owner_id: OwnerId, name: Option<&str>, email: Option<&str>) -> Self {
        let display_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| {
                email
                    .and_then(|e| e.split('@').next())
                    .map(str::trim)
                    .filter(|local| !local.is_empty())
            })
            .unwrap_or(DEFAULT_DISPLAY_NAME)
            .to_owned();

        Self {
            owner_id,
            display_name,
        }
    }
}

/// Source of the current identity.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in owner, or `None` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the provider could not be reached.
    fn current_identity(&self) -> impl Future<Output = Result<Option<Identity>, IdentityError>> + Send;
}

/// Fixed identity, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    identity: Option<Identity>,
}

impl StaticIdentity {
    /// Always report `identity`.
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Nobody is signed in.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self { identity: None }
    }
}

impl From<&StaticOwnerConfig> for StaticIdentity {
    fn from(config: &StaticOwnerConfig) -> Self {
        Self::new(Identity::from_profile(
            OwnerId::new(config.owner_id.as_str()),
            Some(&config.display_name),
            None,
        ))
    }
}

impl IdentityProvider for StaticIdentity {
    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError> {
        Ok(self.identity.clone())
    }
}
