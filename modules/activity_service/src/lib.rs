//! Activity Service Module
//!
//! CRUD over activities and users. Inbound drafts are validated, then
//! resolved into entities whose owner, technologies and types all exist
//! before anything is persisted.

// Public exports
pub mod contract;
pub use contract::{
    error::ServiceError, Activity, ActivityDraft, ActivityType, EntityKind, EntityNotFound,
    Feedback, FieldError, Technology, User, UserDraft,
};

pub mod module;
pub use module::ActivityServiceModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
