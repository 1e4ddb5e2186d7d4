//! Common test utilities: in-memory repositories and fixtures
#![allow(dead_code)]

use activity_service::config::Config;
use activity_service::contract::*;
use activity_service::domain::repository::{
    ActivityRepository, ActivityTypeRepository, FeedbackRepository, StoreError, StoreResult,
    TechnologyRepository, UserRepository,
};
use activity_service::domain::{Repositories, Service};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ===== Activities =====

#[derive(Clone, Default)]
pub struct MockActivityRepo {
    data: Arc<RwLock<BTreeMap<i32, Activity>>>,
    finds: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
}

impl MockActivityRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an activity as-is, bypassing the version check
    pub fn insert(&self, activity: Activity) {
        let id = activity.id.expect("fixture activity needs an id");
        self.data.write().insert(id, activity);
    }

    pub fn get(&self, id: i32) -> Option<Activity> {
        self.data.read().get(&id).cloned()
    }

    pub fn count(&self) -> usize {
        self.data.read().len()
    }

    pub fn find_calls(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActivityRepository for MockActivityRepo {
    async fn find(&self, id: i32) -> StoreResult<Option<Activity>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.read().get(&id).cloned())
    }

    async fn exists(&self, id: i32) -> StoreResult<bool> {
        Ok(self.data.read().contains_key(&id))
    }

    async fn list_all(&self) -> StoreResult<Vec<Activity>> {
        Ok(self.data.read().values().cloned().collect())
    }

    async fn save(&self, activity: &Activity) -> StoreResult<Activity> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut data = self.data.write();

        let mut stored = activity.clone();
        match activity.id {
            None => {
                let next_id = data.keys().next_back().copied().unwrap_or(0) + 1;
                stored.id = Some(next_id);
                stored.version = 1;
            }
            Some(id) => {
                let current = data.get(&id).map(|a| a.version);
                if current != Some(activity.version) {
                    return Err(StoreError::conflict(EntityKind::Activity, "stale version"));
                }
                stored.version += 1;
            }
        }

        let id = stored.id.unwrap_or_default();
        data.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, activity: &Activity) -> StoreResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = activity.id {
            self.data.write().remove(&id);
        }
        Ok(())
    }
}

// ===== Users =====

#[derive(Clone, Default)]
pub struct MockUserRepo {
    data: Arc<RwLock<BTreeMap<i32, User>>>,
    saves: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
}

impl MockUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        let id = user.id.expect("fixture user needs an id");
        self.data.write().insert(id, user);
    }

    pub fn get(&self, id: i32) -> Option<User> {
        self.data.read().get(&id).cloned()
    }

    pub fn save_calls(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for MockUserRepo {
    async fn find(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.data.read().get(&id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<User>> {
        Ok(self.data.read().values().cloned().collect())
    }

    async fn save(&self, user: &User) -> StoreResult<User> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut data = self.data.write();

        let email_taken = data
            .values()
            .any(|other| other.email == user.email && other.id != user.id);
        if email_taken {
            return Err(StoreError::conflict(
                EntityKind::User,
                "email is already in use",
            ));
        }

        let mut stored = user.clone();
        match user.id {
            None => {
                let next_id = data.keys().next_back().copied().unwrap_or(0) + 1;
                stored.id = Some(next_id);
                stored.version = 1;
            }
            Some(id) => {
                let current = data.get(&id).map(|u| u.version);
                if current != Some(user.version) {
                    return Err(StoreError::conflict(EntityKind::User, "stale version"));
                }
                stored.version += 1;
            }
        }

        let id = stored.id.unwrap_or_default();
        data.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, user: &User) -> StoreResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = user.id {
            self.data.write().remove(&id);
        }
        Ok(())
    }
}

// ===== Lookups =====

#[derive(Clone, Default)]
pub struct MockTechnologyRepo {
    data: Arc<RwLock<BTreeMap<i32, Technology>>>,
}

impl MockTechnologyRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: i32, name: &str) {
        self.data.write().insert(
            id,
            Technology {
                id,
                name: name.to_string(),
            },
        );
    }
}

#[async_trait]
impl TechnologyRepository for MockTechnologyRepo {
    async fn find(&self, id: i32) -> StoreResult<Option<Technology>> {
        Ok(self.data.read().get(&id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Technology>> {
        Ok(self.data.read().values().cloned().collect())
    }

    async fn create(&self, name: &str) -> StoreResult<Technology> {
        let mut data = self.data.write();
        let id = data.keys().next_back().copied().unwrap_or(0) + 1;
        let technology = Technology {
            id,
            name: name.to_string(),
        };
        data.insert(id, technology.clone());
        Ok(technology)
    }
}

#[derive(Clone, Default)]
pub struct MockActivityTypeRepo {
    data: Arc<RwLock<BTreeMap<i32, ActivityType>>>,
}

impl MockActivityTypeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: i32, name: &str) {
        self.data.write().insert(
            id,
            ActivityType {
                id,
                name: name.to_string(),
            },
        );
    }
}

#[async_trait]
impl ActivityTypeRepository for MockActivityTypeRepo {
    async fn find(&self, id: i32) -> StoreResult<Option<ActivityType>> {
        Ok(self.data.read().get(&id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<ActivityType>> {
        Ok(self.data.read().values().cloned().collect())
    }

    async fn create(&self, name: &str) -> StoreResult<ActivityType> {
        let mut data = self.data.write();
        let id = data.keys().next_back().copied().unwrap_or(0) + 1;
        let activity_type = ActivityType {
            id,
            name: name.to_string(),
        };
        data.insert(id, activity_type.clone());
        Ok(activity_type)
    }
}

// ===== Feedback =====

#[derive(Clone, Default)]
pub struct MockFeedbackRepo {
    data: Arc<RwLock<Vec<Feedback>>>,
}

impl MockFeedbackRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store feedback with a fixed creation day
    pub fn insert(&self, user_to: i32, stars: i32, day: u32) {
        let mut data = self.data.write();
        let id = data.len() as i32 + 1;
        data.push(Feedback {
            id,
            user_to,
            user_from: None,
            stars,
            comment: None,
            created_at: Utc
                .with_ymd_and_hms(2025, 1, day, 12, 0, 0)
                .single()
                .expect("valid fixture date"),
        });
    }
}

#[async_trait]
impl FeedbackRepository for MockFeedbackRepo {
    async fn save(&self, new_feedback: &NewFeedback) -> StoreResult<Feedback> {
        let mut data = self.data.write();
        let feedback = Feedback {
            id: data.len() as i32 + 1,
            user_to: new_feedback.user_to,
            user_from: new_feedback.user_from,
            stars: new_feedback.stars,
            comment: new_feedback.comment.clone(),
            created_at: Utc::now(),
        };
        data.push(feedback.clone());
        Ok(feedback)
    }

    async fn average_stars(&self, user_id: i32) -> StoreResult<Option<f64>> {
        let stars: Vec<i32> = self
            .data
            .read()
            .iter()
            .filter(|f| f.user_to == user_id)
            .map(|f| f.stars)
            .collect();
        if stars.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            stars.iter().map(|s| f64::from(*s)).sum::<f64>() / stars.len() as f64,
        ))
    }

    async fn find_for_user(
        &self,
        user_id: i32,
        sort: FeedbackSort,
        page: FeedbackPage,
    ) -> StoreResult<Vec<Feedback>> {
        let mut items: Vec<Feedback> = self
            .data
            .read()
            .iter()
            .filter(|f| f.user_to == user_id)
            .cloned()
            .collect();

        if let Some(direction) = sort.stars {
            items.sort_by_key(|f| f.stars);
            if direction == SortDirection::Desc {
                items.reverse();
            }
        } else if let Some(direction) = sort.created_at {
            items.sort_by_key(|f| f.created_at);
            if direction == SortDirection::Desc {
                items.reverse();
            }
        }

        Ok(items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .collect())
    }
}

// ===== Fixtures =====

/// Service wired to fresh in-memory repositories
pub struct TestEnv {
    pub activities: MockActivityRepo,
    pub users: MockUserRepo,
    pub technologies: MockTechnologyRepo,
    pub activity_types: MockActivityTypeRepo,
    pub feedback: MockFeedbackRepo,
    pub service: Arc<Service>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let activities = MockActivityRepo::new();
        let users = MockUserRepo::new();
        let technologies = MockTechnologyRepo::new();
        let activity_types = MockActivityTypeRepo::new();
        let feedback = MockFeedbackRepo::new();

        let repos = Repositories {
            activities: Arc::new(activities.clone()),
            users: Arc::new(users.clone()),
            technologies: Arc::new(technologies.clone()),
            activity_types: Arc::new(activity_types.clone()),
            feedback: Arc::new(feedback.clone()),
        };

        Self {
            service: Arc::new(Service::new(repos, &config)),
            activities,
            users,
            technologies,
            activity_types,
            feedback,
        }
    }

    /// Owner 10, technologies 1-5, activity types 1-2
    pub fn with_lookups() -> Self {
        let env = Self::new();
        env.users.insert(user(10, "owner@example.com"));
        for (id, name) in [(1, "Rust"), (2, "Go"), (3, "Kotlin"), (4, "Elixir"), (5, "Zig")] {
            env.technologies.insert(id, name);
        }
        env.activity_types.insert(1, "Workshop");
        env.activity_types.insert(2, "Hackathon");
        env
    }
}

pub fn user(id: i32, email: &str) -> User {
    User {
        id: Some(id),
        version: 1,
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        bio: None,
        created_at: Utc
            .with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
            .single()
            .expect("valid fixture date"),
        updated_at: Utc
            .with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
            .single()
            .expect("valid fixture date"),
    }
}

/// Draft for a new activity owned by user 10
pub fn activity_draft(name: &str, technologies: Vec<i32>, types: Vec<i32>) -> ActivityDraft {
    ActivityDraft {
        id: None,
        name: name.to_string(),
        status: "open".to_string(),
        owner: Some(10),
        technologies,
        types,
        ..ActivityDraft::default()
    }
}

pub fn user_draft(email: &str) -> UserDraft {
    UserDraft {
        email: email.to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        ..UserDraft::default()
    }
}
