//! Error types for the PREP application.

use thiserror::Error;

/// A shared error type for the entire PREP application.
///
/// Collaborator failures (`ResearchFailure`, `PlanningFailure`, `ScoringFailure`)
/// carry a human-readable reason that is also recorded on the session.
/// `InvalidState` and `UnknownQuestion` are caller errors: the operation that
/// produced them performed no mutation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrepError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Persistence failure in the session store
    #[error("Storage error: {0}")]
    Storage(String),

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

    /// Rejected request parameters (empty company name, zero question count, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The research collaborator failed or timed out
    #[error("Research failed: {0}")]
    ResearchFailure(String),

    /// The question planner failed or produced an unusable plan
    #[error("Question planning failed: {0}")]
    PlanningFailure(String),

    /// The feedback scorer failed or timed out
    #[error("Scoring failed: {0}")]
    ScoringFailure(String),

    /// Operation invoked while the session is in a state that does not allow it
    #[error("Cannot {operation} while session is {status}")]
    InvalidState { operation: String, status: String },

    /// Answer submitted for a question id the session does not contain
    #[error("Unknown question: '{0}'")]
    UnknownQuestion(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PrepError {
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

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
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

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn research(reason: impl Into<String>) -> Self {
        Self::ResearchFailure(reason.into())
    }

    pub fn planning(reason: impl Into<String>) -> Self {
        Self::PlanningFailure(reason.into())
    }

    pub fn scoring(reason: impl Into<String>) -> Self {
        Self::ScoringFailure(reason.into())
    }

    /// Creates an InvalidState error for `operation` attempted in `status`
    pub fn invalid_state(operation: impl Into<String>, status: impl ToString) -> Self {
        Self::InvalidState {
            operation: operation.into(),
            status: status.to_string(),
        }
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

    /// Check if this is a Storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Check if this is an InvalidState error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Check if this error came from an external collaborator
    /// (research, planning or scoring).
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::ResearchFailure(_) | Self::PlanningFailure(_) | Self::ScoringFailure(_)
        )
    }

    /// Returns the human-readable reason carried by a collaborator failure.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::ResearchFailure(r) | Self::PlanningFailure(r) | Self::ScoringFailure(r) => {
                Some(r)
            }
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PrepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PrepError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PrepError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for PrepError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::EntityNotFound(id) => Self::not_found("entity", id),
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::TomlParseError(_) | MigrationError::TomlSerializeError(_) => {
                Self::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
            _ => Self::Storage(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, PrepError>`.
pub type Result<T> = std::result::Result<T, PrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message() {
        let err = PrepError::invalid_state("submit an answer", "Completed");
        assert_eq!(
            err.to_string(),
            "Cannot submit an answer while session is Completed"
        );
        assert!(err.is_invalid_state());
        assert!(!err.is_collaborator_failure());
    }

    #[test]
    fn test_collaborator_reason() {
        let err = PrepError::research("timed out after 30s");
        assert!(err.is_collaborator_failure());
        assert_eq!(err.reason(), Some("timed out after 30s"));
        assert_eq!(PrepError::storage("disk full").reason(), None);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PrepError = io.into();
        assert!(matches!(err, PrepError::Io { .. }));
    }
}
