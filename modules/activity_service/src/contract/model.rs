//! Contract models for activity service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Technology lookup entry referenced by activities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technology {
    pub id: i32,
    pub name: String,
}

/// Activity type lookup entry referenced by activities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityType {
    pub id: i32,
    pub name: String,
}

/// User profile
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    /// Identity, `None` until first saved
    pub id: Option<i32>,
    /// Optimistic concurrency counter, 0 for unsaved users
    pub version: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User profile together with its feedback rating
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub user: User,
    /// Mean of all feedback stars received, `None` without feedback
    pub average_stars: Option<f64>,
}

/// Activity owned by a user and tagged with technologies and types.
///
/// Technologies and types are held in private id-keyed sets and can only be
/// changed through the association methods below. The inverse side of both
/// associations lives in the association tables rewritten on save, so the
/// in-memory entity is the single place an association is edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Activity {
    /// Identity, `None` until first saved
    pub id: Option<i32>,
    /// Optimistic concurrency counter, 0 for unsaved activities
    pub version: i32,
    pub name: String,
    pub description: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub final_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: String,
    owner: Option<User>,
    technologies: BTreeMap<i32, Technology>,
    types: BTreeMap<i32, ActivityType>,
}

impl Activity {
    /// Whether the activity has never been persisted
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn owner(&self) -> Option<&User> {
        self.owner.as_ref()
    }

    pub fn set_owner(&mut self, owner: User) {
        self.owner = Some(owner);
    }

    // ===== Technologies =====

    pub fn technologies(&self) -> impl Iterator<Item = &Technology> {
        self.technologies.values()
    }

    pub fn technology_ids(&self) -> Vec<i32> {
        self.technologies.keys().copied().collect()
    }

    /// Link a technology; returns `false` when it was already linked
    pub fn add_technology(&mut self, technology: Technology) -> bool {
        self.technologies.insert(technology.id, technology).is_none()
    }

    pub fn remove_technology(&mut self, technology_id: i32) -> Option<Technology> {
        self.technologies.remove(&technology_id)
    }

    pub fn clear_technologies(&mut self) {
        self.technologies.clear();
    }

    // ===== Types =====

    pub fn types(&self) -> impl Iterator<Item = &ActivityType> {
        self.types.values()
    }

    pub fn type_ids(&self) -> Vec<i32> {
        self.types.keys().copied().collect()
    }

    /// Link an activity type; returns `false` when it was already linked
    pub fn add_type(&mut self, activity_type: ActivityType) -> bool {
        self.types.insert(activity_type.id, activity_type).is_none()
    }

    pub fn remove_type(&mut self, type_id: i32) -> Option<ActivityType> {
        self.types.remove(&type_id)
    }

    pub fn clear_types(&mut self) {
        self.types.clear();
    }
}

/// Feedback left for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: i32,
    pub user_to: i32,
    pub user_from: Option<i32>,
    pub stars: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One page of feedback received by a user, with the rating over all of it
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSummary {
    pub items: Vec<Feedback>,
    pub average_stars: Option<f64>,
}

/// Feedback about to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub user_to: i32,
    pub user_from: Option<i32>,
    pub stars: i32,
    pub comment: Option<String>,
}

/// Sort direction for feedback queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Requested feedback ordering.
///
/// Only one ordering applies: `stars` replaces `created_at` when both are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackSort {
    pub created_at: Option<SortDirection>,
    pub stars: Option<SortDirection>,
}

/// Requested feedback page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackPage {
    /// 1-based page number, values below 1 are treated as 1
    pub current_page: u64,
    pub page_size: u64,
}

impl FeedbackPage {
    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        (self.current_page.max(1) - 1).saturating_mul(self.page_size)
    }
}

// ===== Drafts =====

/// Inbound activity data with references still unresolved
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityDraft {
    /// Activity to edit, `None` to create a new one
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub final_deadline: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub status: String,
    /// Owning user id
    pub owner: Option<i32>,
    /// Technology ids, order as given
    pub technologies: Vec<i32>,
    /// Activity type ids, order as given
    pub types: Vec<i32>,
}

/// Inbound user data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserDraft {
    /// User to edit, `None` to create a new one
    pub id: Option<i32>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
