//! Route registration

use super::{dto::*, error::Problem, handlers, openapi::ApiDoc};
use crate::domain::Service;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// Register all REST routes on `router`
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        // Activity endpoints
        .route("/api/activities", get(list_activities_handler))
        .route("/api/activities/", get(list_activities_handler))
        .route("/api/activities/create", post(create_activity_handler))
        .route("/api/activities/{id}", get(get_activity_handler))
        .route("/api/activities/{id}/edit", post(edit_activity_handler))
        .route("/api/activities/{id}/delete", delete(delete_activity_handler))
        // User endpoints
        .route("/api/user", get(list_users_handler))
        .route("/api/user/", get(list_users_handler))
        .route("/api/user/create", post(create_user_handler))
        .route("/api/user/{id}", get(get_user_handler))
        .route("/api/user/{id}/edit", post(edit_user_handler))
        .route("/api/user/{id}/delete", delete(delete_user_handler))
        .route("/api/user/{id}/feedback", get(user_feedback_handler))
        // API document
        .route("/api/openapi.json", get(openapi_handler))
        // Add service as extension for handlers
        .layer(Extension(service));

    Ok(router)
}

// ===== Handler wrappers that extract service from Extension =====

async fn list_activities_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<ActivityListDto>>, Problem> {
    handlers::list_activities(service).await
}

async fn get_activity_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ActivityDetailsDto>, Problem> {
    handlers::get_activity(service, path).await
}

async fn create_activity_handler(
    Extension(service): Extension<Arc<Service>>,
    payload: Result<Json<ActivityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), Problem> {
    handlers::create_activity(service, payload).await
}

async fn edit_activity_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ActivityRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, Problem> {
    handlers::edit_activity(service, path, payload).await
}

async fn delete_activity_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, Problem> {
    handlers::delete_activity(service, path).await
}

async fn list_users_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<UserListDto>>, Problem> {
    handlers::list_users(service).await
}

async fn get_user_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<UserDetailDto>, Problem> {
    handlers::get_user(service, path).await
}

async fn create_user_handler(
    Extension(service): Extension<Arc<Service>>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), Problem> {
    handlers::create_user(service, payload).await
}

async fn edit_user_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, Problem> {
    handlers::edit_user(service, path, payload).await
}

async fn delete_user_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, Problem> {
    handlers::delete_user(service, path).await
}

async fn user_feedback_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<i32>, PathRejection>,
    query: Result<Query<FeedbackQuery>, QueryRejection>,
) -> Result<Json<FeedbackListResponse>, Problem> {
    handlers::user_feedback(service, path, query).await
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
