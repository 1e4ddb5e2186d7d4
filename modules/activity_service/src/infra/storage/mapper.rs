//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{activity, activity_type, feedback, technology, user};
use crate::contract::{Activity, ActivityType, Feedback, Technology, User};

// ===== Lookup Conversions =====

impl From<technology::Model> for Technology {
    fn from(entity: technology::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

impl From<activity_type::Model> for ActivityType {
    fn from(entity: activity_type::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

// ===== User Conversions =====

impl From<user::Model> for User {
    fn from(entity: user::Model) -> Self {
        Self {
            id: Some(entity.id),
            version: entity.version,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            bio: entity.bio,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

// ===== Feedback Conversions =====

impl From<feedback::Model> for Feedback {
    fn from(entity: feedback::Model) -> Self {
        Self {
            id: entity.id,
            user_to: entity.user_to_id,
            user_from: entity.user_from_id,
            stars: entity.stars,
            comment: entity.comment,
            created_at: entity.created_at,
        }
    }
}

// ===== Activity Conversions =====

/// Assemble an activity from its row and already loaded relations
pub fn activity_from_parts(
    entity: activity::Model,
    owner: User,
    technologies: Vec<technology::Model>,
    types: Vec<activity_type::Model>,
) -> Activity {
    let mut activity = Activity::default();
    activity.id = Some(entity.id);
    activity.version = entity.version;
    activity.name = entity.name;
    activity.description = entity.description;
    activity.application_deadline = entity.application_deadline;
    activity.final_deadline = entity.final_deadline;
    activity.created_at = entity.created_at;
    activity.updated_at = entity.updated_at;
    activity.status = entity.status;
    activity.set_owner(owner);
    for technology in technologies {
        activity.add_technology(technology.into());
    }
    for activity_type in types {
        activity.add_type(activity_type.into());
    }
    activity
}
