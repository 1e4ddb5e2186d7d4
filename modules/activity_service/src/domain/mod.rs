//! Domain layer - business logic and services

pub mod repository;
pub mod service;
pub mod transformer;
pub mod validation;

pub use repository::{
    ActivityRepository, ActivityTypeRepository, FeedbackRepository, StoreError, StoreResult,
    TechnologyRepository, UserRepository,
};
pub use service::{Repositories, Service};
pub use transformer::{ActivityTransformer, TransformError, UserTransformer};
