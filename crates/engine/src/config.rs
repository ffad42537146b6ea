//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Remote
//! Required by commands that reach Supabase. Either both or neither must be
//! set; editing the local draft works without them.
//! - `SUPABASE_URL` - Supabase project URL (e.g., https://abcd.supabase.co)
//! - `SUPABASE_ANON_KEY` - Supabase public API key
//!
//! ## Optional
//! - `COTIZA_ACCESS_TOKEN` - Access token of the signed-in user
//! - `COTIZA_OWNER_ID` - Fixed owner id used when no access token is set
//! - `COTIZA_OWNER_NAME` - Display name for the fixed owner (default: Usuario)
//! - `COTIZA_DRAFT_DIR` - Directory for the local draft slot (default: .cotiza)
//! - `COTIZA_BASE_URL` - Public URL used in share links (default: https://cotizacionpro.app)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::identity::DEFAULT_DISPLAY_NAME;

const DEFAULT_DRAFT_DIR: &str = ".cotiza";
const DEFAULT_BASE_URL: &str = "https://cotizacionpro.app";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Supabase REST/Auth configuration, absent when only the local draft is used
    pub supabase: Option<SupabaseConfig>,
    /// Fixed owner used when there is no access token
    pub static_owner: Option<StaticOwnerConfig>,
    /// Directory holding the local draft slot
    pub draft_dir: PathBuf,
    /// Public base URL for share links
    pub public_base_url: Url,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Supabase project configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL
    pub url: Url,
    /// Public API key, sent as `apikey`
    pub anon_key: SecretString,
    /// Signed-in user's access token
    pub access_token: Option<SecretString>,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Identity used when no access token is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticOwnerConfig {
    pub owner_id: String,
    pub display_name: String,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, if only one of
    /// `SUPABASE_URL` / `SUPABASE_ANON_KEY` is set, or if the API key looks
    /// like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`EngineConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let supabase = if env.optional("SUPABASE_URL").is_some()
            || env.optional("SUPABASE_ANON_KEY").is_some()
        {
            Some(SupabaseConfig {
                url: env.url("SUPABASE_URL", None)?,
                anon_key: env.validated_secret("SUPABASE_ANON_KEY")?,
                access_token: env.optional("COTIZA_ACCESS_TOKEN").map(SecretString::from),
            })
        } else {
            None
        };

        let static_owner = env
            .optional("COTIZA_OWNER_ID")
            .map(|owner_id| StaticOwnerConfig {
                owner_id,
                display_name: env.or_default("COTIZA_OWNER_NAME", DEFAULT_DISPLAY_NAME),
            });

        Ok(Self {
            supabase,
            static_owner,
            draft_dir: PathBuf::from(env.or_default("COTIZA_DRAFT_DIR", DEFAULT_DRAFT_DIR)),
            public_base_url: env.url("COTIZA_BASE_URL", Some(DEFAULT_BASE_URL))?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Supabase configuration for commands that reach the backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when Supabase is not configured.
    pub fn remote(&self) -> Result<&SupabaseConfig, ConfigError> {
        self.supabase
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("SUPABASE_URL".to_string()))
    }

    /// Whether a user access token is configured.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.supabase
            .as_ref()
            .is_some_and(|supabase| supabase.access_token.is_some())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a URL variable, falling back to `default` when unset.
    fn url(&self, key: &str, default: Option<&str>) -> Result<Url, ConfigError> {
        let raw = match default {
            Some(default) => self.or_default(key, default),
            None => self.required(key)?,
        };
        Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a key is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the key from the Supabase dashboard."
            ),
        ));
    }

    Ok(())
}
