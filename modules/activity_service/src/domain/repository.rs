//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    Activity, ActivityType, EntityKind, Feedback, FeedbackPage, FeedbackSort, NewFeedback,
    Technology, User,
};
use async_trait::async_trait;

/// Persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Stale version, or a unique/foreign-key constraint rejected the write
    #[error("{kind} conflict: {reason}")]
    Conflict { kind: EntityKind, reason: String },

    /// Any other backend failure
    #[error("storage backend failure: {0}")]
    Backend(#[source] anyhow::Error),
}

impl StoreError {
    pub fn conflict(kind: EntityKind, reason: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            reason: reason.into(),
        }
    }

    pub fn backend(error: impl Into<anyhow::Error>) -> Self {
        Self::Backend(error.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository for activities and their associations
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Find an activity with owner, technologies and types loaded
    async fn find(&self, id: i32) -> StoreResult<Option<Activity>>;

    /// Whether an activity row exists, without loading its associations
    async fn exists(&self, id: i32) -> StoreResult<bool>;

    /// List all activities ordered by id
    async fn list_all(&self) -> StoreResult<Vec<Activity>>;

    /// Insert or update an activity together with its associations.
    ///
    /// Updates only succeed when the stored version equals `activity.version`.
    async fn save(&self, activity: &Activity) -> StoreResult<Activity>;

    /// Delete an activity and its association rows
    async fn delete(&self, activity: &Activity) -> StoreResult<()>;
}

/// Repository for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id
    async fn find(&self, id: i32) -> StoreResult<Option<User>>;

    /// List all users ordered by id
    async fn list_all(&self) -> StoreResult<Vec<User>>;

    /// Insert or update a user, with the same version check as activities
    async fn save(&self, user: &User) -> StoreResult<User>;

    /// Delete a user
    async fn delete(&self, user: &User) -> StoreResult<()>;
}

/// Repository for technology lookups
#[async_trait]
pub trait TechnologyRepository: Send + Sync {
    async fn find(&self, id: i32) -> StoreResult<Option<Technology>>;

    async fn list_all(&self) -> StoreResult<Vec<Technology>>;

    async fn create(&self, name: &str) -> StoreResult<Technology>;
}

/// Repository for activity type lookups
#[async_trait]
pub trait ActivityTypeRepository: Send + Sync {
    async fn find(&self, id: i32) -> StoreResult<Option<ActivityType>>;

    async fn list_all(&self) -> StoreResult<Vec<ActivityType>>;

    async fn create(&self, name: &str) -> StoreResult<ActivityType>;
}

/// Repository for feedback left between users
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Store a new feedback entry
    async fn save(&self, feedback: &NewFeedback) -> StoreResult<Feedback>;

    /// Mean stars received by a user, `None` without feedback
    async fn average_stars(&self, user_id: i32) -> StoreResult<Option<f64>>;

    /// Feedback received by a user, sorted and paginated
    async fn find_for_user(
        &self,
        user_id: i32,
        sort: FeedbackSort,
        page: FeedbackPage,
    ) -> StoreResult<Vec<Feedback>>;
}
