//! Mapper implementations for converting between DTOs and contract models
//!
//! Requests become drafts; each view DTO is built from the contract model
//! so a view only ever exposes the fields it names.

use super::dto::*;
use crate::contract;

// ===== Request conversions =====

impl From<ActivityRequest> for contract::ActivityDraft {
    fn from(req: ActivityRequest) -> Self {
        Self {
            id: req.id,
            name: req.name.unwrap_or_default(),
            description: req.description,
            application_deadline: req.application_deadline,
            final_deadline: req.final_deadline,
            created_at: req.created_at,
            updated_at: req.updated_at,
            status: req.status.unwrap_or_default(),
            owner: req.owner.map(EntityRef::id),
            technologies: req.technologies.into_iter().map(EntityRef::id).collect(),
            types: req.types.into_iter().map(EntityRef::id).collect(),
        }
    }
}

impl From<UserRequest> for contract::UserDraft {
    fn from(req: UserRequest) -> Self {
        Self {
            id: req.id,
            email: req.email.unwrap_or_default(),
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            bio: req.bio,
            created_at: req.created_at,
            updated_at: req.updated_at,
        }
    }
}

impl From<SortDirectionDto> for contract::SortDirection {
    fn from(direction: SortDirectionDto) -> Self {
        match direction {
            SortDirectionDto::Asc => Self::Asc,
            SortDirectionDto::Desc => Self::Desc,
        }
    }
}

impl From<&FeedbackQuery> for contract::FeedbackSort {
    fn from(query: &FeedbackQuery) -> Self {
        Self {
            created_at: query.sort_created_at.map(Into::into),
            stars: query.sort_stars.map(Into::into),
        }
    }
}

// ===== Lookup conversions =====

impl From<&contract::Technology> for TechnologyDto {
    fn from(technology: &contract::Technology) -> Self {
        Self {
            id: technology.id,
            name: technology.name.clone(),
        }
    }
}

impl From<&contract::ActivityType> for ActivityTypeDto {
    fn from(activity_type: &contract::ActivityType) -> Self {
        Self {
            id: activity_type.id,
            name: activity_type.name.clone(),
        }
    }
}

impl From<&contract::User> for OwnerDto {
    fn from(user: &contract::User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

// ===== Activity views =====

impl From<contract::Activity> for ActivityListDto {
    fn from(activity: contract::Activity) -> Self {
        Self {
            owner: activity.owner().map(Into::into),
            technologies: activity.technologies().map(Into::into).collect(),
            id: activity.id,
            name: activity.name,
            status: activity.status,
            application_deadline: activity.application_deadline,
            final_deadline: activity.final_deadline,
        }
    }
}

impl From<contract::Activity> for ActivityDetailsDto {
    fn from(activity: contract::Activity) -> Self {
        Self {
            owner: activity.owner().map(Into::into),
            technologies: activity.technologies().map(Into::into).collect(),
            types: activity.types().map(Into::into).collect(),
            id: activity.id,
            name: activity.name,
            description: activity.description,
            application_deadline: activity.application_deadline,
            final_deadline: activity.final_deadline,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
            status: activity.status,
        }
    }
}

// ===== User views =====

impl From<contract::User> for UserListDto {
    fn from(user: contract::User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

impl From<contract::UserDetails> for UserDetailDto {
    fn from(details: contract::UserDetails) -> Self {
        let user = details.user;
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            created_at: user.created_at,
            updated_at: user.updated_at,
            average_stars: details.average_stars,
        }
    }
}

impl From<contract::Feedback> for FeedbackDto {
    fn from(feedback: contract::Feedback) -> Self {
        Self {
            id: feedback.id,
            stars: feedback.stars,
            comment: feedback.comment,
            created_at: feedback.created_at,
            user_from: feedback.user_from,
        }
    }
}
