//! Structural validation for inbound drafts
//!
//! Only shape checks live here (required fields, lengths, formats).
//! Whether referenced entities exist is decided by the transformers.

use crate::contract::{ActivityDraft, FieldError, UserDraft};

const MAX_NAME_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 5000;
const MAX_STATUS_LEN: usize = 50;
const MAX_EMAIL_LEN: usize = 180;
const MAX_PERSON_NAME_LEN: usize = 100;
const MAX_BIO_LEN: usize = 2000;

/// Validate an activity draft
///
/// Returns every violation found; an empty list means the draft may be
/// transformed.
pub fn validate_activity(draft: &ActivityDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    require_text(&mut errors, "name", &draft.name, MAX_NAME_LEN);
    require_text(&mut errors, "status", &draft.status, MAX_STATUS_LEN);

    if let Some(description) = &draft.description {
        limit_text(&mut errors, "description", description, MAX_DESCRIPTION_LEN);
    }

    match draft.owner {
        None => errors.push(FieldError::new("owner", "This value should not be null.")),
        Some(id) if id <= 0 => {
            errors.push(FieldError::new("owner", "Identifiers must be positive."))
        }
        Some(_) => {}
    }

    check_ids(&mut errors, "technologies", &draft.technologies);
    check_ids(&mut errors, "types", &draft.types);

    if let (Some(application), Some(final_deadline)) =
        (draft.application_deadline, draft.final_deadline)
    {
        if application > final_deadline {
            errors.push(FieldError::new(
                "applicationDeadline",
                "The application deadline must not be after the final deadline.",
            ));
        }
    }

    errors
}

/// Validate a user draft
pub fn validate_user(draft: &UserDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if require_text(&mut errors, "email", &draft.email, MAX_EMAIL_LEN)
        && !is_email(draft.email.trim())
    {
        errors.push(FieldError::new("email", "This value is not a valid email address."));
    }
    require_text(&mut errors, "firstName", &draft.first_name, MAX_PERSON_NAME_LEN);
    require_text(&mut errors, "lastName", &draft.last_name, MAX_PERSON_NAME_LEN);

    if let Some(bio) = &draft.bio {
        limit_text(&mut errors, "bio", bio, MAX_BIO_LEN);
    }

    errors
}

/// Require a non-blank value no longer than `max` characters.
/// Returns `true` when the value passed.
fn require_text(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "This value should not be blank."));
        return false;
    }
    limit_text(errors, field, value, max)
}

fn limit_text(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) -> bool {
    if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("This value is too long. It should have {max} characters or less."),
        ));
        return false;
    }
    true
}

fn check_ids(errors: &mut Vec<FieldError>, field: &str, ids: &[i32]) {
    for (index, id) in ids.iter().enumerate() {
        if *id <= 0 {
            errors.push(FieldError::new(
                format!("{field}[{index}]"),
                "Identifiers must be positive.",
            ));
        }
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
