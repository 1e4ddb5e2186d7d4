//! Integration tests for the entity-resolution transformers

mod common;

use activity_service::config::TimestampPolicy;
use activity_service::contract::*;
use activity_service::domain::repository::ActivityRepository;
use activity_service::domain::{ActivityTransformer, TransformError, UserTransformer};
use chrono::{TimeZone, Utc};
use common::{activity_draft, user, user_draft, TestEnv};
use std::sync::Arc;

fn transformer(env: &TestEnv, policy: TimestampPolicy) -> ActivityTransformer {
    ActivityTransformer::new(
        Arc::new(env.activities.clone()),
        Arc::new(env.users.clone()),
        Arc::new(env.technologies.clone()),
        Arc::new(env.activity_types.clone()),
        policy,
    )
}

/// Activity 1 owned by user 10 with technologies 1-3 and type 1
fn stored_activity(env: &TestEnv) -> Activity {
    let mut activity = Activity::default();
    activity.id = Some(1);
    activity.version = 1;
    activity.name = "Existing".to_string();
    activity.status = "open".to_string();
    activity.created_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap();
    activity.set_owner(env.users.get(10).unwrap());
    for id in 1..=3 {
        activity.add_technology(Technology {
            id,
            name: format!("tech-{id}"),
        });
    }
    activity.add_type(ActivityType {
        id: 1,
        name: "Workshop".to_string(),
    });
    env.activities.insert(activity.clone());
    activity
}

#[tokio::test]
async fn test_new_draft_resolves_every_reference() {
    let env = TestEnv::with_lookups();
    let existing = stored_activity(&env);

    let activity = transformer(&env, TimestampPolicy::Server)
        .transform(activity_draft("Build API", vec![5], vec![2]))
        .await
        .unwrap();

    assert!(activity.is_new());
    assert_eq!(activity.owner().and_then(|o| o.id), Some(10));
    assert_eq!(activity.technology_ids(), vec![5]);
    assert_eq!(activity.type_ids(), vec![2]);
    assert_eq!(activity.name, "Build API");

    // The stored activity is untouched and nothing was saved
    assert_eq!(env.activities.get(1), Some(existing));
    assert_eq!(env.activities.save_calls(), 0);
}

#[tokio::test]
async fn test_edit_with_empty_sets_clears_associations() {
    let env = TestEnv::with_lookups();
    stored_activity(&env);

    let mut draft = activity_draft("Existing", vec![], vec![]);
    draft.id = Some(1);

    let activity = transformer(&env, TimestampPolicy::Server)
        .transform(draft)
        .await
        .unwrap();

    assert_eq!(activity.id, Some(1));
    assert_eq!(activity.technologies().count(), 0);
    assert_eq!(activity.types().count(), 0);
}

#[tokio::test]
async fn test_edit_replaces_associations_exactly() {
    let env = TestEnv::with_lookups();
    stored_activity(&env);

    let mut draft = activity_draft("Existing", vec![3, 4, 4], vec![2]);
    draft.id = Some(1);

    let activity = transformer(&env, TimestampPolicy::Server)
        .transform(draft)
        .await
        .unwrap();

    assert_eq!(activity.technology_ids(), vec![3, 4]);
    assert_eq!(activity.type_ids(), vec![2]);
    assert_eq!(activity.version, 1);
}

#[tokio::test]
async fn test_unknown_technology_aborts() {
    let env = TestEnv::with_lookups();

    let err = transformer(&env, TimestampPolicy::Server)
        .transform(activity_draft("Build API", vec![1, 99], vec![]))
        .await
        .unwrap_err();

    match err {
        TransformError::NotFound(not_found) => {
            assert_eq!(not_found.kind, EntityKind::Technology);
            assert_eq!(not_found.id, 99);
            assert_eq!(not_found.message, "No technology found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(env.activities.save_calls(), 0);
}

#[tokio::test]
async fn test_unknown_type_aborts() {
    let env = TestEnv::with_lookups();

    let err = transformer(&env, TimestampPolicy::Server)
        .transform(activity_draft("Build API", vec![1], vec![7]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TransformError::NotFound(EntityNotFound {
            kind: EntityKind::ActivityType,
            id: 7,
            ..
        })
    ));
}

#[tokio::test]
async fn test_unknown_owner_aborts() {
    let env = TestEnv::with_lookups();
    let mut draft = activity_draft("Build API", vec![], vec![]);
    draft.owner = Some(404);

    let err = transformer(&env, TimestampPolicy::Server)
        .transform(draft)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TransformError::NotFound(EntityNotFound {
            kind: EntityKind::User,
            id: 404,
            ..
        })
    ));
}

#[tokio::test]
async fn test_unknown_activity_id_aborts() {
    let env = TestEnv::with_lookups();
    let mut draft = activity_draft("Build API", vec![], vec![]);
    draft.id = Some(77);

    let err = transformer(&env, TimestampPolicy::Server)
        .transform(draft)
        .await
        .unwrap_err();

    match err {
        TransformError::NotFound(not_found) => {
            assert_eq!(not_found.kind, EntityKind::Activity);
            assert_eq!(not_found.message, "No activity found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_repeated_edit_converges() {
    let env = TestEnv::with_lookups();
    stored_activity(&env);
    let transformer = transformer(&env, TimestampPolicy::Server);

    let mut draft = activity_draft("Renamed", vec![2, 5], vec![1]);
    draft.id = Some(1);

    for _ in 0..2 {
        let activity = transformer.transform(draft.clone()).await.unwrap();
        env.activities.save(&activity).await.unwrap();
    }

    let stored = env.activities.get(1).unwrap();
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.technology_ids(), vec![2, 5]);
    assert_eq!(stored.type_ids(), vec![1]);
    assert_eq!(env.activities.count(), 1);
}

#[tokio::test]
async fn test_server_policy_ignores_client_timestamps_on_edit() {
    let env = TestEnv::with_lookups();
    let existing = stored_activity(&env);

    let mut draft = activity_draft("Existing", vec![], vec![]);
    draft.id = Some(1);
    draft.created_at = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).single();

    let activity = transformer(&env, TimestampPolicy::Server)
        .transform(draft)
        .await
        .unwrap();

    assert_eq!(activity.created_at, existing.created_at);
    assert!(activity.updated_at > existing.created_at);
}

#[tokio::test]
async fn test_client_policy_takes_client_timestamps() {
    let env = TestEnv::with_lookups();
    let created = Utc.with_ymd_and_hms(2023, 2, 2, 2, 2, 2).single();
    let updated = Utc.with_ymd_and_hms(2023, 3, 3, 3, 3, 3).single();

    let mut draft = activity_draft("Build API", vec![], vec![]);
    draft.created_at = created;
    draft.updated_at = updated;

    let activity = transformer(&env, TimestampPolicy::Client)
        .transform(draft)
        .await
        .unwrap();

    assert_eq!(Some(activity.created_at), created);
    assert_eq!(Some(activity.updated_at), updated);
}

#[tokio::test]
async fn test_user_transformer_edits_loaded_user() {
    let env = TestEnv::new();
    env.users.insert(user(3, "old@example.com"));
    let transformer = UserTransformer::new(Arc::new(env.users.clone()), TimestampPolicy::Server);

    let mut draft = user_draft("  new@example.com ");
    draft.id = Some(3);
    let edited = transformer.transform(draft).await.unwrap();

    assert_eq!(edited.id, Some(3));
    assert_eq!(edited.version, 1);
    assert_eq!(edited.email, "new@example.com");
    assert_eq!(edited.first_name, "Grace");
    assert_eq!(edited.created_at, user(3, "old@example.com").created_at);
}

#[tokio::test]
async fn test_user_transformer_rejects_unknown_id() {
    let env = TestEnv::new();
    let transformer = UserTransformer::new(Arc::new(env.users.clone()), TimestampPolicy::Server);

    let mut draft = user_draft("x@example.com");
    draft.id = Some(8);

    let err = transformer.transform(draft).await.unwrap_err();
    assert!(matches!(
        err,
        TransformError::NotFound(EntityNotFound {
            kind: EntityKind::User,
            id: 8,
            ..
        })
    ));
}
