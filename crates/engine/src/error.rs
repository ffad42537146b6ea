//! Unified error handling with Sentry integration.
//!
//! Every fallible engine operation converts into [`EngineError`]. Front ends
//! call [`EngineError::report`] once, which captures failures of the system
//! (storage, identity, configuration) to Sentry and leaves user mistakes out,
//! then show [`EngineError::user_message`] to the user.

use thiserror::Error;

use cotizapro_core::ValidationError;

use crate::committer::CommitError;
use crate::config::ConfigError;
use crate::identity::IdentityError;
use crate::reader::ReadError;
use crate::store::StoreError;

/// Engine-level error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Commit failed.
    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),

    /// Read failed.
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    /// Identity provider failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Storage client could not be set up.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Nobody is signed in.
    #[error("Sign-in required")]
    SignInRequired,

    /// A line item reference matched no row of the draft.
    #[error("Unknown line item: {0}")]
    UnknownItem(String),
}

impl EngineError {
    /// Whether this error is caused by the user rather than the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Commit(CommitError::Validation(_) | CommitError::AlreadyInFlight)
                | Self::Read(ReadError::NotFound)
                | Self::SignInRequired
                | Self::UnknownItem(_)
        )
    }

    /// Capture system errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_user_error() {
            tracing::debug!(error = %self, "User error");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Engine error"
        );
    }

    /// Message shown to the user, in Spanish.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Commit(CommitError::Validation(ValidationError::MissingCustomerName)) => {
                "Por favor ingresa el nombre del cliente".to_string()
            }
            Self::Commit(CommitError::Validation(ValidationError::MissingDescription {
                position,
            })) => {
                format!("Por favor ingresa la descripción del concepto {position}")
            }
            Self::Commit(CommitError::AlreadyInFlight) => {
                "La cotización ya se está guardando".to_string()
            }
            Self::Commit(CommitError::Submission(_)) => {
                "Error al guardar. Intenta de nuevo.".to_string()
            }
            Self::Read(ReadError::NotFound) => "Cotización no encontrada".to_string(),
            Self::Read(ReadError::Store(_)) | Self::Store(_) => {
                "Error al cargar la cotización. Intenta de nuevo.".to_string()
            }
            Self::SignInRequired => "Inicia sesión para continuar".to_string(),
            Self::Identity(_) => "No se pudo verificar tu sesión. Intenta de nuevo.".to_string(),
            Self::UnknownItem(reference) => format!("No existe el concepto {reference}"),
            Self::Config(err) => format!("Configuración inválida: {err}"),
        }
    }
}

/// Result type alias for `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Set the Sentry user context from an owner id.
///
/// Call this once the identity is known to associate errors with the user.
pub fn set_sentry_user(owner_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(owner_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of edits
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::UnknownItem("7".to_string());
        assert_eq!(err.to_string(), "Unknown line item: 7");

        let err = EngineError::Read(ReadError::NotFound);
        assert_eq!(err.to_string(), "Read error: quote not found");
    }

    #[test]
    fn test_user_messages() {
        let err = EngineError::from(CommitError::Validation(
            ValidationError::MissingCustomerName,
        ));
        assert_eq!(err.user_message(), "Por favor ingresa el nombre del cliente");

        let err = EngineError::from(CommitError::Submission(StoreError::Parse(
            "bad".to_string(),
        )));
        assert_eq!(err.user_message(), "Error al guardar. Intenta de nuevo.");

        let err = EngineError::from(ReadError::NotFound);
        assert_eq!(err.user_message(), "Cotización no encontrada");
    }

    #[test]
    fn test_user_errors_are_not_reported() {
        assert!(EngineError::SignInRequired.is_user_error());
        assert!(EngineError::from(ReadError::NotFound).is_user_error());
        assert!(!EngineError::from(ReadError::Store(StoreError::Parse(String::new()))).is_user_error());
        assert!(
            !EngineError::from(CommitError::Submission(StoreError::Api {
                status: 500,
                message: String::new(),
            }))
            .is_user_error()
        );
    }

    #[test]
    fn test_report_without_sentry_client_is_harmless() {
        EngineError::from(ReadError::Store(StoreError::Parse("x".to_string()))).report();
        EngineError::SignInRequired.report();
    }
}
