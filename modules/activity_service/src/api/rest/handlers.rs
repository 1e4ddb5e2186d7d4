//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{
        map_domain_error, map_json_rejection, map_path_rejection, map_query_rejection, Problem,
    },
};
use crate::contract::{EntityKind, FeedbackSort};
use crate::domain::Service;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

type PathId = Result<Path<i32>, PathRejection>;

fn path_id(kind: EntityKind, path: PathId) -> Result<i32, Problem> {
    path.map(|Path(id)| id)
        .map_err(|rejection| map_path_rejection(kind, rejection))
}

// ===== Activity Handlers =====

/// List all activities
#[utoipa::path(
    get,
    path = "/api/activities/",
    responses(
        (status = 200, description = "Activities", body = [ActivityListDto]),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["activities"],
    operation_id = "listActivities"
)]
pub async fn list_activities(service: Arc<Service>) -> Result<Json<Vec<ActivityListDto>>, Problem> {
    let activities = service.list_activities().await.map_err(map_domain_error)?;

    Ok(Json(activities.into_iter().map(Into::into).collect()))
}

/// Get a specific activity
#[utoipa::path(
    get,
    path = "/api/activities/{id}",
    params(("id" = i32, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity", body = ActivityDetailsDto),
        (status = 404, description = "Activity not found", body = Problem)
    ),
    tags = ["activities"],
    operation_id = "getActivity"
)]
pub async fn get_activity(
    service: Arc<Service>,
    path: PathId,
) -> Result<Json<ActivityDetailsDto>, Problem> {
    let id = path_id(EntityKind::Activity, path)?;
    let activity = service.get_activity(id).await.map_err(map_domain_error)?;

    Ok(Json(activity.into()))
}

/// Create an activity
#[utoipa::path(
    post,
    path = "/api/activities/create",
    request_body = ActivityRequest,
    responses(
        (status = 201, description = "Activity created", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Problem),
        (status = 404, description = "Referenced entity not found", body = Problem),
        (status = 409, description = "Conflicting write", body = Problem)
    ),
    tags = ["activities"],
    operation_id = "createActivity"
)]
pub async fn create_activity(
    service: Arc<Service>,
    payload: Result<Json<ActivityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), Problem> {
    let Json(req) = payload.map_err(map_json_rejection)?;

    service
        .create_activity(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Activity successfully created!")),
    ))
}

/// Edit an existing activity
#[utoipa::path(
    post,
    path = "/api/activities/{id}/edit",
    params(("id" = i32, Path, description = "Activity id")),
    request_body = ActivityRequest,
    responses(
        (status = 200, description = "Activity edited", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Problem),
        (status = 404, description = "Activity or referenced entity not found", body = Problem),
        (status = 409, description = "Conflicting write", body = Problem)
    ),
    tags = ["activities"],
    operation_id = "editActivity"
)]
pub async fn edit_activity(
    service: Arc<Service>,
    path: PathId,
    payload: Result<Json<ActivityRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, Problem> {
    let id = path_id(EntityKind::Activity, path)?;
    // An unknown id is reported before anything about the body
    service
        .ensure_activity_exists(id)
        .await
        .map_err(map_domain_error)?;
    let Json(req) = payload.map_err(map_json_rejection)?;

    service
        .edit_activity(id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MessageResponse::new("Activity successfully edited!")))
}

/// Delete an activity
#[utoipa::path(
    delete,
    path = "/api/activities/{id}/delete",
    params(("id" = i32, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity deleted", body = MessageResponse),
        (status = 404, description = "Activity not found", body = Problem)
    ),
    tags = ["activities"],
    operation_id = "deleteActivity"
)]
pub async fn delete_activity(
    service: Arc<Service>,
    path: PathId,
) -> Result<Json<MessageResponse>, Problem> {
    let id = path_id(EntityKind::Activity, path)?;

    service
        .delete_activity(id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MessageResponse::new(
        "The activity was successfully deleted!",
    )))
}

// ===== User Handlers =====

/// List all users
#[utoipa::path(
    get,
    path = "/api/user/",
    responses(
        (status = 200, description = "Users", body = [UserListDto]),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
pub async fn list_users(service: Arc<Service>) -> Result<Json<Vec<UserListDto>>, Problem> {
    let users = service.list_users().await.map_err(map_domain_error)?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get a specific user with its rating
#[utoipa::path(
    get,
    path = "/api/user/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserDetailDto),
        (status = 404, description = "User not found", body = Problem)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
pub async fn get_user(service: Arc<Service>, path: PathId) -> Result<Json<UserDetailDto>, Problem> {
    let id = path_id(EntityKind::User, path)?;
    let details = service.get_user_details(id).await.map_err(map_domain_error)?;

    Ok(Json(details.into()))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/user/create",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Problem),
        (status = 409, description = "Email already in use", body = Problem)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
pub async fn create_user(
    service: Arc<Service>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), Problem> {
    let Json(req) = payload.map_err(map_json_rejection)?;

    service
        .create_user(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User successfully created!")),
    ))
}

/// Edit an existing user
#[utoipa::path(
    post,
    path = "/api/user/{id}/edit",
    params(("id" = i32, Path, description = "User id")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User edited", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Problem),
        (status = 404, description = "User not found", body = Problem),
        (status = 409, description = "Conflicting write", body = Problem)
    ),
    tags = ["users"],
    operation_id = "editUser"
)]
pub async fn edit_user(
    service: Arc<Service>,
    path: PathId,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, Problem> {
    let id = path_id(EntityKind::User, path)?;
    service
        .ensure_user_exists(id)
        .await
        .map_err(map_domain_error)?;
    let Json(req) = payload.map_err(map_json_rejection)?;

    service
        .edit_user(id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MessageResponse::new("User successfully edited!")))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/user/{id}/delete",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = Problem),
        (status = 409, description = "User still owns activities", body = Problem)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
pub async fn delete_user(
    service: Arc<Service>,
    path: PathId,
) -> Result<Json<MessageResponse>, Problem> {
    let id = path_id(EntityKind::User, path)?;

    service.delete_user(id).await.map_err(map_domain_error)?;

    Ok(Json(MessageResponse::new("The user was successfully deleted!")))
}

/// Feedback received by a user
#[utoipa::path(
    get,
    path = "/api/user/{id}/feedback",
    params(("id" = i32, Path, description = "User id"), FeedbackQuery),
    responses(
        (status = 200, description = "Feedback page", body = FeedbackListResponse),
        (status = 400, description = "Invalid query", body = Problem),
        (status = 404, description = "User not found", body = Problem)
    ),
    tags = ["users"],
    operation_id = "listUserFeedback"
)]
pub async fn user_feedback(
    service: Arc<Service>,
    path: PathId,
    query: Result<Query<FeedbackQuery>, QueryRejection>,
) -> Result<Json<FeedbackListResponse>, Problem> {
    let id = path_id(EntityKind::User, path)?;
    let Query(query) = query.map_err(map_query_rejection)?;

    let summary = service
        .user_feedback(
            id,
            FeedbackSort::from(&query),
            query.current_page,
            query.page_size,
        )
        .await
        .map_err(map_domain_error)?;

    Ok(Json(FeedbackListResponse {
        items: summary.items.into_iter().map(Into::into).collect(),
        average_stars: summary.average_stars,
    }))
}
