//! OpenAPI document for the REST API

use super::{dto::*, error::FieldErrorDto, error::Problem};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Activity service API",
        description = "Activities, users and the lookups activities reference."
    ),
    paths(
        super::handlers::list_activities,
        super::handlers::get_activity,
        super::handlers::create_activity,
        super::handlers::edit_activity,
        super::handlers::delete_activity,
        super::handlers::list_users,
        super::handlers::get_user,
        super::handlers::create_user,
        super::handlers::edit_user,
        super::handlers::delete_user,
        super::handlers::user_feedback,
    ),
    components(schemas(
        EntityRef,
        ActivityRequest,
        UserRequest,
        SortDirectionDto,
        MessageResponse,
        TechnologyDto,
        ActivityTypeDto,
        OwnerDto,
        ActivityListDto,
        ActivityDetailsDto,
        UserListDto,
        UserDetailDto,
        FeedbackDto,
        FeedbackListResponse,
        Problem,
        FieldErrorDto,
    )),
    tags(
        (name = "activities", description = "Activity management"),
        (name = "users", description = "User profiles and feedback")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/activities/",
            "/api/activities/{id}",
            "/api/activities/create",
            "/api/activities/{id}/edit",
            "/api/activities/{id}/delete",
            "/api/user/",
            "/api/user/{id}",
            "/api/user/create",
            "/api/user/{id}/edit",
            "/api/user/{id}/delete",
            "/api/user/{id}/feedback",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }

    #[test]
    fn test_document_registers_error_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.schemas.contains_key("Problem"));
        assert!(components.schemas.contains_key("ActivityRequest"));
    }
}
