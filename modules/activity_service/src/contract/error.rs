//! Contract error types for activity service
//!
//! These errors are transport-agnostic and used for inter-module communication.

use std::fmt;

/// Kinds of entities the service stores or references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Activity,
    User,
    Technology,
    ActivityType,
    Feedback,
}

impl EntityKind {
    /// Name exposed to API clients
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "Activity",
            Self::User => "User",
            Self::Technology => "Technology",
            Self::ActivityType => "ActivityType",
            Self::Feedback => "Feedback",
        }
    }

    /// Message used when a referenced entity cannot be resolved
    pub fn unresolved_message(self) -> &'static str {
        match self {
            Self::Activity => "No activity found.",
            Self::User => "No user found.",
            Self::Technology => "No technology found.",
            Self::ActivityType => "No activity type found.",
            Self::Feedback => "No feedback found.",
        }
    }

    /// Message used when the resource addressed by a request does not exist
    pub fn missing_message(self) -> &'static str {
        match self {
            Self::Activity => "The activity was not found!",
            Self::User => "The user was not found!",
            Self::Technology => "The technology was not found!",
            Self::ActivityType => "The activity type was not found!",
            Self::Feedback => "The feedback was not found!",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A referenced entity could not be located by its id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({kind} {id})")]
pub struct EntityNotFound {
    pub kind: EntityKind,
    pub id: i32,
    pub message: String,
}

impl EntityNotFound {
    pub fn new(kind: EntityKind, id: i32) -> Self {
        Self {
            kind,
            id,
            message: kind.unresolved_message().to_string(),
        }
    }
}

/// Structural validation failure on a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Activity service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The entity addressed by the request does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: i32 },

    /// A reference inside the request body could not be resolved
    #[error(transparent)]
    Unresolved(#[from] EntityNotFound),

    /// The request body failed structural validation
    #[error("Validation failed: {}", join_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    /// Concurrent modification or constraint violation
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// Internal error
    #[error("Internal error")]
    Internal,
}

impl ServiceError {
    pub fn not_found(kind: EntityKind, id: i32) -> Self {
        Self::NotFound { kind, id }
    }
}

/// Render field errors as a single human-readable line
pub fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
