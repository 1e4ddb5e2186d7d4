//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ===== References =====

/// Reference to another entity: either a bare id or an object carrying `id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum EntityRef {
    Id(i32),
    Object { id: i32 },
}

impl EntityRef {
    pub fn id(self) -> i32 {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

// ===== Request DTOs =====

/// Activity create/edit request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    /// Ignored: the path decides which activity is edited
    #[serde(default)]
    pub id: Option<i32>,

    #[schema(example = "Build API")]
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub application_deadline: Option<DateTime<Utc>>,

    #[serde(default)]
    pub final_deadline: Option<DateTime<Utc>>,

    /// Only honoured with the `client` timestamp policy
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Only honoured with the `client` timestamp policy
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[schema(example = "open")]
    #[serde(default)]
    pub status: Option<String>,

    /// Owning user
    #[serde(default)]
    pub owner: Option<EntityRef>,

    #[serde(default)]
    pub technologies: Vec<EntityRef>,

    #[serde(default)]
    pub types: Vec<EntityRef>,
}

/// User create/edit request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// Ignored: the path decides which user is edited
    #[serde(default)]
    pub id: Option<i32>,

    #[schema(example = "ada@example.com")]
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub bio: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Sort direction accepted by the feedback query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirectionDto {
    Asc,
    Desc,
}

/// Query parameters of the feedback listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FeedbackQuery {
    /// 1-based page number
    pub current_page: Option<u64>,
    pub page_size: Option<u64>,
    #[param(inline)]
    pub sort_created_at: Option<SortDirectionDto>,
    /// Replaces `sortCreatedAt` when both are given
    #[param(inline)]
    pub sort_stars: Option<SortDirectionDto>,
}

// ===== Response DTOs =====

/// Outcome of a mutation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Activity successfully created!")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TechnologyDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityTypeDto {
    pub id: i32,
    pub name: String,
}

/// Owner as shown inside activity views
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDto {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
}

/// `ActivityList` view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListDto {
    pub id: Option<i32>,
    pub name: String,
    pub status: String,
    pub application_deadline: Option<DateTime<Utc>>,
    pub final_deadline: Option<DateTime<Utc>>,
    pub owner: Option<OwnerDto>,
    pub technologies: Vec<TechnologyDto>,
}

/// `ActivityDetails` view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetailsDto {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub final_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: String,
    pub owner: Option<OwnerDto>,
    pub technologies: Vec<TechnologyDto>,
    pub types: Vec<ActivityTypeDto>,
}

/// `UserList` view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListDto {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
}

/// `UserDetail` view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailDto {
    pub id: Option<i32>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Mean feedback rating, `null` without feedback
    pub average_stars: Option<f64>,
}

/// `Feedback` view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDto {
    pub id: i32,
    pub stars: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Author id, `null` once the author is deleted
    pub user_from: Option<i32>,
}

/// A page of feedback together with the overall rating
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackListResponse {
    pub items: Vec<FeedbackDto>,
    pub average_stars: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ref_accepts_bare_id_and_object() {
        let refs: Vec<EntityRef> = serde_json::from_str(r#"[5, {"id": 7}]"#).unwrap();
        assert_eq!(refs.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![5, 7]);
    }

    #[test]
    fn test_activity_request_defaults() {
        let req: ActivityRequest =
            serde_json::from_str(r#"{"id": null, "name": "Build API", "owner": 10}"#).unwrap();

        assert_eq!(req.name.as_deref(), Some("Build API"));
        assert_eq!(req.owner.map(EntityRef::id), Some(10));
        assert!(req.technologies.is_empty());
        assert!(req.types.is_empty());
    }

    #[test]
    fn test_activity_request_camel_case_deadlines() {
        let req: ActivityRequest = serde_json::from_str(
            r#"{"applicationDeadline": "2025-01-01T00:00:00Z", "finalDeadline": null}"#,
        )
        .unwrap();

        assert!(req.application_deadline.is_some());
        assert!(req.final_deadline.is_none());
    }

    #[test]
    fn test_entity_ref_rejects_strings() {
        let parsed = serde_json::from_str::<EntityRef>(r#""5""#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_user_detail_serializes_camel_case() {
        let dto = UserListDto {
            id: Some(1),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        };
        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
    }
}
