//! Error types for the Painto storefront core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single user-facing error reported by the commerce API.
///
/// The API returns these alongside a `null` payload when a request was
/// well-formed but semantically rejected (e.g. an unknown variant id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field, if the API reported one.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// A shared error type for the storefront crates.
///
/// Lower layers (storage, bundle sources, the commerce client) return this
/// through [`Result`]. The localization runtime and the cart session manager
/// never surface it to their callers; they log it and degrade instead.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PaintoError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-local storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Network failure or non-success HTTP status reaching a remote service
    #[error("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// GraphQL-level errors returned by the commerce API
    #[error("API error: {}", .0.join("; "))]
    Api(Vec<String>),

    /// User errors reported by a commerce API mutation
    #[error("User errors: {}", .0.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; "))]
    UserErrors(Vec<UserError>),

    /// Invalid caller input rejected before any remote call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaintoError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Transport error without an HTTP status
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this error was reported by the remote API itself
    /// (GraphQL errors or user errors) rather than by the network.
    pub fn is_remote_semantic(&self) -> bool {
        matches!(self, Self::Api(_) | Self::UserErrors(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PaintoError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound {
                entity_type: "file",
                id: err.to_string(),
            };
        }
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PaintoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PaintoError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PaintoError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for PaintoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            };
        }
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at the bootstrap boundary)
impl From<anyhow::Error> for PaintoError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PaintoError>`.
pub type Result<T> = std::result::Result<T, PaintoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_display_joins_messages() {
        let err = PaintoError::UserErrors(vec![
            UserError {
                field: Some(vec!["lines".into(), "0".into(), "merchandiseId".into()]),
                message: "invalid variant".into(),
                code: Some("INVALID".into()),
            },
            UserError {
                field: None,
                message: "quantity too large".into(),
                code: None,
            },
        ]);
        assert_eq!(
            err.to_string(),
            "User errors: invalid variant; quantity too large"
        );
        assert!(err.is_remote_semantic());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PaintoError = io.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_json_error_is_serialization() {
        let err: PaintoError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(err.is_serialization());
    }
}
