//! Domain service - business logic orchestration

use super::repository::{
    ActivityRepository, ActivityTypeRepository, FeedbackRepository, StoreError,
    TechnologyRepository, UserRepository,
};
use super::transformer::{ActivityTransformer, TransformError, UserTransformer};
use super::validation::{validate_activity, validate_user};
use crate::config::{Config, SeedConfig};
use crate::contract::{
    Activity, ActivityDraft, EntityKind, FeedbackPage, FeedbackSort, FeedbackSummary, FieldError,
    ServiceError, User, UserDetails, UserDraft,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Store handles the service works against
#[derive(Clone)]
pub struct Repositories {
    pub activities: Arc<dyn ActivityRepository>,
    pub users: Arc<dyn UserRepository>,
    pub technologies: Arc<dyn TechnologyRepository>,
    pub activity_types: Arc<dyn ActivityTypeRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
}

/// Domain service for activities and users
pub struct Service {
    repos: Repositories,
    activity_transformer: ActivityTransformer,
    user_transformer: UserTransformer,
    feedback_page_size: u64,
    max_feedback_page_size: u64,
}

impl Service {
    /// Create a new service instance
    pub fn new(repos: Repositories, config: &Config) -> Self {
        let activity_transformer = ActivityTransformer::new(
            repos.activities.clone(),
            repos.users.clone(),
            repos.technologies.clone(),
            repos.activity_types.clone(),
            config.timestamp_policy,
        );
        let user_transformer = UserTransformer::new(repos.users.clone(), config.timestamp_policy);

        Self {
            repos,
            activity_transformer,
            user_transformer,
            feedback_page_size: config.feedback_page_size.max(1),
            max_feedback_page_size: config.max_feedback_page_size.max(1),
        }
    }

    // ===== Activity Operations =====

    /// List all activities
    pub async fn list_activities(&self) -> Result<Vec<Activity>, ServiceError> {
        self.repos.activities.list_all().await.map_err(map_store_error)
    }

    /// Get a specific activity
    pub async fn get_activity(&self, id: i32) -> Result<Activity, ServiceError> {
        self.repos
            .activities
            .find(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Activity, id))
    }

    /// Fail with not-found unless the activity `id` is stored
    pub async fn ensure_activity_exists(&self, id: i32) -> Result<(), ServiceError> {
        let exists = self
            .repos
            .activities
            .exists(id)
            .await
            .map_err(map_store_error)?;

        if exists {
            Ok(())
        } else {
            Err(ServiceError::not_found(EntityKind::Activity, id))
        }
    }

    /// Delete an activity
    pub async fn delete_activity(&self, id: i32) -> Result<(), ServiceError> {
        let activity = self.get_activity(id).await?;

        self.repos
            .activities
            .delete(&activity)
            .await
            .map_err(map_store_error)?;

        tracing::info!(activity_id = id, "Activity deleted");
        Ok(())
    }

    /// Create an activity from a draft.
    ///
    /// Any id carried by the draft is ignored: creating never edits.
    pub async fn create_activity(&self, mut draft: ActivityDraft) -> Result<Activity, ServiceError> {
        draft.id = None;
        self.validate_and_save_activity(draft).await
    }

    /// Replace the activity `id` with the content of `draft`
    pub async fn edit_activity(
        &self,
        id: i32,
        mut draft: ActivityDraft,
    ) -> Result<Activity, ServiceError> {
        self.ensure_activity_exists(id).await?;

        draft.id = Some(id);
        self.validate_and_save_activity(draft).await
    }

    async fn validate_and_save_activity(
        &self,
        draft: ActivityDraft,
    ) -> Result<Activity, ServiceError> {
        ensure_valid(validate_activity(&draft))?;

        let activity = self
            .activity_transformer
            .transform(draft)
            .await
            .map_err(map_transform_error)?;

        let saved = self
            .repos
            .activities
            .save(&activity)
            .await
            .map_err(map_store_error)?;

        tracing::info!(
            activity_id = ?saved.id,
            created = activity.is_new(),
            "Activity saved"
        );
        Ok(saved)
    }

    // ===== User Operations =====

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        self.repos.users.list_all().await.map_err(map_store_error)
    }

    /// Get a specific user
    pub async fn get_user(&self, id: i32) -> Result<User, ServiceError> {
        self.repos
            .users
            .find(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::User, id))
    }

    /// Fail with not-found unless the user `id` is stored
    pub async fn ensure_user_exists(&self, id: i32) -> Result<(), ServiceError> {
        self.get_user(id).await.map(|_| ())
    }

    /// Get a user together with its feedback rating
    pub async fn get_user_details(&self, id: i32) -> Result<UserDetails, ServiceError> {
        let user = self.get_user(id).await?;
        let average_stars = self
            .repos
            .feedback
            .average_stars(id)
            .await
            .map_err(map_store_error)?;

        Ok(UserDetails {
            user,
            average_stars,
        })
    }

    /// Create a user from a draft, ignoring any id it carries
    pub async fn create_user(&self, mut draft: UserDraft) -> Result<User, ServiceError> {
        draft.id = None;
        self.validate_and_save_user(draft).await
    }

    /// Replace the user `id` with the content of `draft`
    pub async fn edit_user(&self, id: i32, mut draft: UserDraft) -> Result<User, ServiceError> {
        self.ensure_user_exists(id).await?;

        draft.id = Some(id);
        self.validate_and_save_user(draft).await
    }

    async fn validate_and_save_user(&self, draft: UserDraft) -> Result<User, ServiceError> {
        ensure_valid(validate_user(&draft))?;

        let user = self
            .user_transformer
            .transform(draft)
            .await
            .map_err(map_transform_error)?;

        let saved = self
            .repos
            .users
            .save(&user)
            .await
            .map_err(map_store_error)?;

        tracing::info!(user_id = ?saved.id, "User saved");
        Ok(saved)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i32) -> Result<(), ServiceError> {
        let user = self.get_user(id).await?;

        self.repos
            .users
            .delete(&user)
            .await
            .map_err(map_store_error)?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Feedback received by a user
    ///
    /// A missing page size falls back to the configured default; larger
    /// requests are capped.
    pub async fn user_feedback(
        &self,
        user_id: i32,
        sort: FeedbackSort,
        current_page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<FeedbackSummary, ServiceError> {
        self.get_user(user_id).await?;

        let page = FeedbackPage {
            current_page: current_page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(self.feedback_page_size)
                .clamp(1, self.max_feedback_page_size),
        };

        let items = self
            .repos
            .feedback
            .find_for_user(user_id, sort, page)
            .await
            .map_err(map_store_error)?;
        let average_stars = self
            .repos
            .feedback
            .average_stars(user_id)
            .await
            .map_err(map_store_error)?;

        Ok(FeedbackSummary {
            items,
            average_stars,
        })
    }

    // ===== Lookups =====

    /// Create configured technologies and activity types that do not exist yet
    pub async fn seed_lookups(&self, seed: &SeedConfig) -> Result<usize, ServiceError> {
        let mut created = 0;

        let mut known: HashSet<String> = self
            .repos
            .technologies
            .list_all()
            .await
            .map_err(map_store_error)?
            .into_iter()
            .map(|t| t.name)
            .collect();
        for name in &seed.technologies {
            if !known.insert(name.clone()) {
                continue;
            }
            self.repos
                .technologies
                .create(name)
                .await
                .map_err(map_store_error)?;
            created += 1;
        }

        let mut known: HashSet<String> = self
            .repos
            .activity_types
            .list_all()
            .await
            .map_err(map_store_error)?
            .into_iter()
            .map(|t| t.name)
            .collect();
        for name in &seed.activity_types {
            if !known.insert(name.clone()) {
                continue;
            }
            self.repos
                .activity_types
                .create(name)
                .await
                .map_err(map_store_error)?;
            created += 1;
        }

        if created > 0 {
            tracing::info!(created, "Seeded lookup entries");
        }
        Ok(created)
    }
}

// ===== Helper Functions =====

fn ensure_valid(errors: Vec<FieldError>) -> Result<(), ServiceError> {
    if errors.is_empty() {
        return Ok(());
    }
    tracing::warn!(errors = errors.len(), "Rejected invalid draft");
    Err(ServiceError::Validation { errors })
}

fn map_transform_error(error: TransformError) -> ServiceError {
    match error {
        TransformError::NotFound(not_found) => {
            tracing::warn!(
                entity = %not_found.kind,
                id = not_found.id,
                "Draft references a missing entity"
            );
            ServiceError::Unresolved(not_found)
        }
        TransformError::Store(store) => map_store_error(store),
        TransformError::MissingOwner => ServiceError::Validation {
            errors: vec![FieldError::new("owner", "This value should not be null.")],
        },
    }
}

fn map_store_error(error: StoreError) -> ServiceError {
    match error {
        StoreError::Conflict { kind, reason } => {
            tracing::warn!(entity = %kind, %reason, "Store rejected write");
            ServiceError::Conflict { reason }
        }
        StoreError::Backend(source) => {
            tracing::error!("Storage failure: {:?}", source);
            ServiceError::Internal
        }
    }
}
