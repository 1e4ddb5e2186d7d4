//! Entity-resolution transformers
//!
//! Turn validated drafts into ready-to-persist entities, resolving every
//! referenced id through the repositories. Transformers only read from the
//! store; persisting the result is left to the caller.

use super::repository::{
    ActivityRepository, ActivityTypeRepository, StoreError, TechnologyRepository, UserRepository,
};
use crate::config::TimestampPolicy;
use crate::contract::{Activity, ActivityDraft, EntityKind, EntityNotFound, User, UserDraft};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Failure while building an entity from a draft
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    NotFound(#[from] EntityNotFound),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Draft carries no owner id; validation rejects these before transforming
    #[error("activity draft has no owner")]
    MissingOwner,
}

/// Resolves activity drafts into activities
pub struct ActivityTransformer {
    activities: Arc<dyn ActivityRepository>,
    users: Arc<dyn UserRepository>,
    technologies: Arc<dyn TechnologyRepository>,
    activity_types: Arc<dyn ActivityTypeRepository>,
    timestamps: TimestampPolicy,
}

impl ActivityTransformer {
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        users: Arc<dyn UserRepository>,
        technologies: Arc<dyn TechnologyRepository>,
        activity_types: Arc<dyn ActivityTypeRepository>,
        timestamps: TimestampPolicy,
    ) -> Self {
        Self {
            activities,
            users,
            technologies,
            activity_types,
            timestamps,
        }
    }

    /// Build the activity described by `draft`.
    ///
    /// With an id the stored activity is loaded and its technologies and
    /// types are replaced wholesale; without one a fresh activity is built.
    /// On error the partially built entity is dropped.
    pub async fn transform(&self, draft: ActivityDraft) -> Result<Activity, TransformError> {
        let mut entity = match draft.id {
            Some(id) => {
                let mut existing = self
                    .activities
                    .find(id)
                    .await?
                    .ok_or_else(|| EntityNotFound::new(EntityKind::Activity, id))?;
                existing.clear_technologies();
                existing.clear_types();
                existing
            }
            None => Activity::default(),
        };

        let stored_created_at = entity.id.map(|_| entity.created_at);
        let (created_at, updated_at) = stamp(
            self.timestamps,
            stored_created_at,
            draft.created_at,
            draft.updated_at,
        );
        entity.name = draft.name;
        entity.description = draft.description;
        entity.application_deadline = draft.application_deadline;
        entity.final_deadline = draft.final_deadline;
        entity.created_at = created_at;
        entity.updated_at = updated_at;
        entity.status = draft.status;

        let owner_id = draft.owner.ok_or(TransformError::MissingOwner)?;
        let owner = self
            .users
            .find(owner_id)
            .await?
            .ok_or_else(|| EntityNotFound::new(EntityKind::User, owner_id))?;
        entity.set_owner(owner);

        for technology_id in draft.technologies {
            let technology = self
                .technologies
                .find(technology_id)
                .await?
                .ok_or_else(|| EntityNotFound::new(EntityKind::Technology, technology_id))?;
            entity.add_technology(technology);
        }

        for type_id in draft.types {
            let activity_type = self
                .activity_types
                .find(type_id)
                .await?
                .ok_or_else(|| EntityNotFound::new(EntityKind::ActivityType, type_id))?;
            entity.add_type(activity_type);
        }

        tracing::debug!(
            activity_id = ?entity.id,
            technologies = ?entity.technology_ids(),
            types = ?entity.type_ids(),
            "Activity draft resolved"
        );
        Ok(entity)
    }
}

/// Resolves user drafts into users
pub struct UserTransformer {
    users: Arc<dyn UserRepository>,
    timestamps: TimestampPolicy,
}

impl UserTransformer {
    pub fn new(users: Arc<dyn UserRepository>, timestamps: TimestampPolicy) -> Self {
        Self { users, timestamps }
    }

    /// Build the user described by `draft`, loading it first when an id is given
    pub async fn transform(&self, draft: UserDraft) -> Result<User, TransformError> {
        let mut entity = match draft.id {
            Some(id) => self
                .users
                .find(id)
                .await?
                .ok_or_else(|| EntityNotFound::new(EntityKind::User, id))?,
            None => User::default(),
        };

        let stored_created_at = entity.id.map(|_| entity.created_at);
        let (created_at, updated_at) = stamp(
            self.timestamps,
            stored_created_at,
            draft.created_at,
            draft.updated_at,
        );
        entity.email = draft.email.trim().to_string();
        entity.first_name = draft.first_name;
        entity.last_name = draft.last_name;
        entity.bio = draft.bio;
        entity.created_at = created_at;
        entity.updated_at = updated_at;

        Ok(entity)
    }
}

/// Pick `(created_at, updated_at)` for a transformed entity.
///
/// `stored_created_at` is the creation time of an already persisted entity.
fn stamp(
    policy: TimestampPolicy,
    stored_created_at: Option<DateTime<Utc>>,
    client_created_at: Option<DateTime<Utc>>,
    client_updated_at: Option<DateTime<Utc>>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Utc::now();
    let server_created_at = stored_created_at.unwrap_or(now);
    match policy {
        TimestampPolicy::Server => (server_created_at, now),
        TimestampPolicy::Client => (
            client_created_at.unwrap_or(server_created_at),
            client_updated_at.unwrap_or(now),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_server_policy_keeps_stored_creation_time() {
        let stored = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single();
        let client = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).single();

        let (created_at, updated_at) = stamp(TimestampPolicy::Server, stored, client, client);

        assert_eq!(Some(created_at), stored);
        assert!(updated_at > created_at);
    }

    #[test]
    fn test_client_policy_uses_client_values() {
        let client_created = Utc.with_ymd_and_hms(2019, 5, 1, 8, 0, 0).single();
        let client_updated = Utc.with_ymd_and_hms(2019, 6, 1, 8, 0, 0).single();

        let (created_at, updated_at) =
            stamp(TimestampPolicy::Client, None, client_created, client_updated);

        assert_eq!(Some(created_at), client_created);
        assert_eq!(Some(updated_at), client_updated);
    }

    #[test]
    fn test_client_policy_falls_back_to_server_values() {
        let stored = Utc.with_ymd_and_hms(2021, 3, 3, 3, 3, 3).single();

        let (created_at, _) = stamp(TimestampPolicy::Client, stored, None, None);

        assert_eq!(Some(created_at), stored);
    }
}
