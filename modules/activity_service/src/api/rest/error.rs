//! HTTP error mapping to JSON error bodies

use crate::contract::{EntityKind, FieldError, ServiceError};
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by every endpoint.
///
/// `entity` and `id` are present when a referenced entity could not be
/// resolved, `errors` when the request failed validation.
#[derive(Debug, Serialize, ToSchema)]
pub struct Problem {
    #[serde(skip)]
    pub status: StatusCode,

    /// Human-readable summary
    #[schema(example = "The activity was not found!")]
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Technology")]
    pub entity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldErrorDto>>,
}

/// Single field violation
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldErrorDto {
    #[schema(example = "name")]
    pub field: String,
    pub message: String,
}

impl From<FieldError> for FieldErrorDto {
    fn from(error: FieldError) -> Self {
        Self {
            field: error.field,
            message: error.message,
        }
    }
}

impl Problem {
    /// Create a new error body
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            entity: None,
            id: None,
            errors: None,
        }
    }

    /// Name the entity that could not be resolved
    pub fn with_entity(mut self, kind: EntityKind, id: i32) -> Self {
        self.entity = Some(kind.as_str().to_string());
        self.id = Some(id);
        self
    }

    /// Attach field violations
    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors.into_iter().map(Into::into).collect());
        self
    }

    /// Body for a path id that does not address an existing entity
    pub fn missing(kind: EntityKind) -> Self {
        Self::new(StatusCode::NOT_FOUND, kind.missing_message())
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Map domain errors to HTTP error bodies
pub fn map_domain_error(error: ServiceError) -> Problem {
    match error {
        ServiceError::NotFound { kind, .. } => Problem::missing(kind),

        ServiceError::Unresolved(not_found) => {
            Problem::new(StatusCode::NOT_FOUND, not_found.message)
                .with_entity(not_found.kind, not_found.id)
        }

        ServiceError::Validation { errors } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation failed.").with_errors(errors)
        }

        ServiceError::Conflict { reason } => Problem::new(StatusCode::CONFLICT, reason),

        ServiceError::Internal => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred",
        ),
    }
}

/// Map a body that could not be deserialized
pub fn map_json_rejection(rejection: JsonRejection) -> Problem {
    tracing::warn!(error = %rejection.body_text(), "Rejected malformed request body");
    Problem::new(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// Map query parameters that could not be parsed
pub fn map_query_rejection(rejection: QueryRejection) -> Problem {
    tracing::warn!(error = %rejection.body_text(), "Rejected malformed query");
    Problem::new(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// Map a path id that is not an integer: no such entity can exist
pub fn map_path_rejection(kind: EntityKind, rejection: PathRejection) -> Problem {
    tracing::debug!(error = %rejection.body_text(), "Rejected path id");
    Problem::missing(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::EntityNotFound;

    #[test]
    fn test_unresolved_reference_body() {
        let problem = map_domain_error(ServiceError::Unresolved(EntityNotFound::new(
            EntityKind::Technology,
            5,
        )));

        assert_eq!(problem.status, StatusCode::NOT_FOUND);
        let body = serde_json::to_value(&problem).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "message": "No technology found.",
                "entity": "Technology",
                "id": 5
            })
        );
    }

    #[test]
    fn test_missing_entity_body_has_only_message() {
        let problem = map_domain_error(ServiceError::not_found(EntityKind::Activity, 9));

        let body = serde_json::to_value(&problem).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "message": "The activity was not found!" })
        );
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let problem = map_domain_error(ServiceError::Validation {
            errors: vec![FieldError::new("name", "This value should not be blank.")],
        });

        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        let body = serde_json::to_value(&problem).unwrap();
        assert_eq!(body["errors"][0]["field"], "name");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let problem = map_domain_error(ServiceError::Internal);
        assert_eq!(problem.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.message, "An unexpected error occurred");
    }
}
