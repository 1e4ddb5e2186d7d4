//! Contract layer - public models and errors
//!
//! This layer contains transport-agnostic models and errors.
//! NO serde derives on models - these are pure domain types.

pub mod error;
pub mod model;

pub use error::{EntityKind, EntityNotFound, FieldError, ServiceError};
pub use model::{
    Activity, ActivityDraft, ActivityType, Feedback, FeedbackPage, FeedbackSort, FeedbackSummary,
    NewFeedback, SortDirection, Technology, User, UserDetails, UserDraft,
};
