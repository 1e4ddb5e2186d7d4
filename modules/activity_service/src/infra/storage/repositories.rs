//! SeaORM repository implementations

use crate::contract::{
    Activity, ActivityType, EntityKind, Feedback, FeedbackPage, FeedbackSort, NewFeedback,
    SortDirection, Technology, User,
};
use crate::domain::repository::{
    ActivityRepository, ActivityTypeRepository, FeedbackRepository, StoreError, StoreResult,
    TechnologyRepository, UserRepository,
};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr, TransactionTrait,
};
use std::sync::Arc;

use super::entity::{
    activity, activity_activity_type, activity_technology, activity_type, feedback, technology,
    user,
};
use super::mapper::activity_from_parts;

// ===== Error Mapping =====

/// Classify a database error for the given entity kind
fn map_db_error(kind: EntityKind, error: DbErr) -> StoreError {
    match error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::conflict(kind, detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => StoreError::conflict(kind, detail),
        _ => StoreError::backend(error),
    }
}

trait DbResultExt<T> {
    fn for_entity(self, kind: EntityKind) -> StoreResult<T>;
}

impl<T> DbResultExt<T> for Result<T, DbErr> {
    fn for_entity(self, kind: EntityKind) -> StoreResult<T> {
        self.map_err(|e| map_db_error(kind, e))
    }
}

fn stale(kind: EntityKind, id: i32) -> StoreError {
    StoreError::conflict(
        kind,
        format!("{kind} {id} was modified or removed since it was read"),
    )
}

// ===== Activity Repository =====

pub struct SeaOrmActivityRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmActivityRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Load owner, technologies and types for an activity row
    async fn hydrate<C: ConnectionTrait>(conn: &C, model: activity::Model) -> StoreResult<Activity> {
        const KIND: EntityKind = EntityKind::Activity;

        let owner = user::Entity::find_by_id(model.owner_id)
            .one(conn)
            .await
            .for_entity(KIND)?
            .ok_or_else(|| {
                StoreError::backend(anyhow::anyhow!(
                    "activity {} references missing owner {}",
                    model.id,
                    model.owner_id
                ))
            })?;

        let technologies = model
            .find_related(technology::Entity)
            .order_by_asc(technology::Column::Id)
            .all(conn)
            .await
            .for_entity(KIND)?;

        let types = model
            .find_related(activity_type::Entity)
            .order_by_asc(activity_type::Column::Id)
            .all(conn)
            .await
            .for_entity(KIND)?;

        Ok(activity_from_parts(model, owner.into(), technologies, types))
    }

    /// Rewrite the association rows of `activity_id` inside a transaction
    async fn replace_links<C: ConnectionTrait>(
        conn: &C,
        activity_id: i32,
        activity: &Activity,
    ) -> StoreResult<()> {
        const KIND: EntityKind = EntityKind::Activity;

        activity_technology::Entity::delete_many()
            .filter(activity_technology::Column::ActivityId.eq(activity_id))
            .exec(conn)
            .await
            .for_entity(KIND)?;
        activity_activity_type::Entity::delete_many()
            .filter(activity_activity_type::Column::ActivityId.eq(activity_id))
            .exec(conn)
            .await
            .for_entity(KIND)?;

        let technology_links: Vec<activity_technology::ActiveModel> = activity
            .technology_ids()
            .into_iter()
            .map(|technology_id| activity_technology::ActiveModel {
                activity_id: Set(activity_id),
                technology_id: Set(technology_id),
            })
            .collect();
        if !technology_links.is_empty() {
            activity_technology::Entity::insert_many(technology_links)
                .exec_without_returning(conn)
                .await
                .for_entity(KIND)?;
        }

        let type_links: Vec<activity_activity_type::ActiveModel> = activity
            .type_ids()
            .into_iter()
            .map(|activity_type_id| activity_activity_type::ActiveModel {
                activity_id: Set(activity_id),
                activity_type_id: Set(activity_type_id),
            })
            .collect();
        if !type_links.is_empty() {
            activity_activity_type::Entity::insert_many(type_links)
                .exec_without_returning(conn)
                .await
                .for_entity(KIND)?;
        }

        Ok(())
    }
}

#[async_trait]
impl ActivityRepository for SeaOrmActivityRepository {
    async fn find(&self, id: i32) -> StoreResult<Option<Activity>> {
        let model = activity::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .for_entity(EntityKind::Activity)?;

        match model {
            Some(model) => Ok(Some(Self::hydrate(&*self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn exists(&self, id: i32) -> StoreResult<bool> {
        let found: Option<i32> = activity::Entity::find_by_id(id)
            .select_only()
            .column(activity::Column::Id)
            .into_tuple()
            .one(&*self.db)
            .await
            .for_entity(EntityKind::Activity)?;

        Ok(found.is_some())
    }

    async fn list_all(&self) -> StoreResult<Vec<Activity>> {
        let models = activity::Entity::find()
            .order_by_asc(activity::Column::Id)
            .all(&*self.db)
            .await
            .for_entity(EntityKind::Activity)?;

        let mut activities = Vec::with_capacity(models.len());
        for model in models {
            activities.push(Self::hydrate(&*self.db, model).await?);
        }
        Ok(activities)
    }

    async fn save(&self, activity: &Activity) -> StoreResult<Activity> {
        const KIND: EntityKind = EntityKind::Activity;

        let owner_id = activity.owner().and_then(|owner| owner.id).ok_or_else(|| {
            StoreError::backend(anyhow::anyhow!("activity owner must be a persisted user"))
        })?;

        let txn = self.db.begin().await.for_entity(KIND)?;

        let id = match activity.id {
            None => {
                let inserted = activity::ActiveModel {
                    id: NotSet,
                    version: Set(1),
                    name: Set(activity.name.clone()),
                    description: Set(activity.description.clone()),
                    application_deadline: Set(activity.application_deadline),
                    final_deadline: Set(activity.final_deadline),
                    created_at: Set(activity.created_at),
                    updated_at: Set(activity.updated_at),
                    status: Set(activity.status.clone()),
                    owner_id: Set(owner_id),
                }
                .insert(&txn)
                .await
                .for_entity(KIND)?;
                inserted.id
            }
            Some(id) => {
                let result = activity::Entity::update_many()
                    .col_expr(activity::Column::Name, Expr::value(activity.name.clone()))
                    .col_expr(
                        activity::Column::Description,
                        Expr::value(activity.description.clone()),
                    )
                    .col_expr(
                        activity::Column::ApplicationDeadline,
                        Expr::value(activity.application_deadline),
                    )
                    .col_expr(
                        activity::Column::FinalDeadline,
                        Expr::value(activity.final_deadline),
                    )
                    .col_expr(activity::Column::CreatedAt, Expr::value(activity.created_at))
                    .col_expr(activity::Column::UpdatedAt, Expr::value(activity.updated_at))
                    .col_expr(activity::Column::Status, Expr::value(activity.status.clone()))
                    .col_expr(activity::Column::OwnerId, Expr::value(owner_id))
                    .col_expr(
                        activity::Column::Version,
                        Expr::col(activity::Column::Version).add(1),
                    )
                    .filter(activity::Column::Id.eq(id))
                    .filter(activity::Column::Version.eq(activity.version))
                    .exec(&txn)
                    .await
                    .for_entity(KIND)?;

                if result.rows_affected == 0 {
                    txn.rollback().await.for_entity(KIND)?;
                    return Err(stale(KIND, id));
                }
                id
            }
        };

        Self::replace_links(&txn, id, activity).await?;

        let saved = activity::Entity::find_by_id(id)
            .one(&txn)
            .await
            .for_entity(KIND)?
            .ok_or_else(|| stale(KIND, id))?;
        let saved = Self::hydrate(&txn, saved).await?;

        txn.commit().await.for_entity(KIND)?;

        tracing::debug!(activity_id = id, version = saved.version, "Activity row written");
        Ok(saved)
    }

    async fn delete(&self, activity: &Activity) -> StoreResult<()> {
        const KIND: EntityKind = EntityKind::Activity;

        let Some(id) = activity.id else {
            return Ok(());
        };

        let txn = self.db.begin().await.for_entity(KIND)?;

        activity_technology::Entity::delete_many()
            .filter(activity_technology::Column::ActivityId.eq(id))
            .exec(&txn)
            .await
            .for_entity(KIND)?;
        activity_activity_type::Entity::delete_many()
            .filter(activity_activity_type::Column::ActivityId.eq(id))
            .exec(&txn)
            .await
            .for_entity(KIND)?;
        activity::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .for_entity(KIND)?;

        txn.commit().await.for_entity(KIND)?;
        Ok(())
    }
}

// ===== User Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find(&self, id: i32) -> StoreResult<Option<User>> {
        let result = user::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .for_entity(EntityKind::User)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> StoreResult<Vec<User>> {
        let results = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&*self.db)
            .await
            .for_entity(EntityKind::User)?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn save(&self, user: &User) -> StoreResult<User> {
        const KIND: EntityKind = EntityKind::User;

        let saved = match user.id {
            None => user::ActiveModel {
                id: NotSet,
                version: Set(1),
                email: Set(user.email.clone()),
                first_name: Set(user.first_name.clone()),
                last_name: Set(user.last_name.clone()),
                bio: Set(user.bio.clone()),
                created_at: Set(user.created_at),
                updated_at: Set(user.updated_at),
            }
            .insert(&*self.db)
            .await
            .for_entity(KIND)?,
            Some(id) => {
                let txn = self.db.begin().await.for_entity(KIND)?;

                let result = user::Entity::update_many()
                    .col_expr(user::Column::Email, Expr::value(user.email.clone()))
                    .col_expr(user::Column::FirstName, Expr::value(user.first_name.clone()))
                    .col_expr(user::Column::LastName, Expr::value(user.last_name.clone()))
                    .col_expr(user::Column::Bio, Expr::value(user.bio.clone()))
                    .col_expr(user::Column::CreatedAt, Expr::value(user.created_at))
                    .col_expr(user::Column::UpdatedAt, Expr::value(user.updated_at))
                    .col_expr(user::Column::Version, Expr::col(user::Column::Version).add(1))
                    .filter(user::Column::Id.eq(id))
                    .filter(user::Column::Version.eq(user.version))
                    .exec(&txn)
                    .await
                    .for_entity(KIND)?;

                if result.rows_affected == 0 {
                    txn.rollback().await.for_entity(KIND)?;
                    return Err(stale(KIND, id));
                }

                let saved = user::Entity::find_by_id(id)
                    .one(&txn)
                    .await
                    .for_entity(KIND)?
                    .ok_or_else(|| stale(KIND, id))?;
                txn.commit().await.for_entity(KIND)?;
                saved
            }
        };

        Ok(saved.into())
    }

    async fn delete(&self, user: &User) -> StoreResult<()> {
        let Some(id) = user.id else {
            return Ok(());
        };

        user::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .for_entity(EntityKind::User)?;

        Ok(())
    }
}

// ===== Lookup Repositories =====

pub struct SeaOrmTechnologyRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTechnologyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TechnologyRepository for SeaOrmTechnologyRepository {
    async fn find(&self, id: i32) -> StoreResult<Option<Technology>> {
        let result = technology::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .for_entity(EntityKind::Technology)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> StoreResult<Vec<Technology>> {
        let results = technology::Entity::find()
            .order_by_asc(technology::Column::Id)
            .all(&*self.db)
            .await
            .for_entity(EntityKind::Technology)?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn create(&self, name: &str) -> StoreResult<Technology> {
        let result = technology::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(&*self.db)
        .await
        .for_entity(EntityKind::Technology)?;

        Ok(result.into())
    }
}

pub struct SeaOrmActivityTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmActivityTypeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityTypeRepository for SeaOrmActivityTypeRepository {
    async fn find(&self, id: i32) -> StoreResult<Option<ActivityType>> {
        let result = activity_type::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .for_entity(EntityKind::ActivityType)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> StoreResult<Vec<ActivityType>> {
        let results = activity_type::Entity::find()
            .order_by_asc(activity_type::Column::Id)
            .all(&*self.db)
            .await
            .for_entity(EntityKind::ActivityType)?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn create(&self, name: &str) -> StoreResult<ActivityType> {
        let result = activity_type::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(&*self.db)
        .await
        .for_entity(EntityKind::ActivityType)?;

        Ok(result.into())
    }
}

// ===== Feedback Repository =====

pub struct SeaOrmFeedbackRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmFeedbackRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

#[async_trait]
impl FeedbackRepository for SeaOrmFeedbackRepository {
    async fn save(&self, new_feedback: &NewFeedback) -> StoreResult<Feedback> {
        let result = feedback::ActiveModel {
            id: NotSet,
            user_to_id: Set(new_feedback.user_to),
            user_from_id: Set(new_feedback.user_from),
            stars: Set(new_feedback.stars),
            comment: Set(new_feedback.comment.clone()),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&*self.db)
        .await
        .for_entity(EntityKind::Feedback)?;

        Ok(result.into())
    }

    async fn average_stars(&self, user_id: i32) -> StoreResult<Option<f64>> {
        let totals: Option<(Option<i64>, i64)> = feedback::Entity::find()
            .select_only()
            .column_as(Expr::col(feedback::Column::Stars).sum(), "total")
            .column_as(Expr::col(feedback::Column::Id).count(), "n")
            .filter(feedback::Column::UserToId.eq(user_id))
            .into_tuple()
            .one(&*self.db)
            .await
            .for_entity(EntityKind::Feedback)?;

        match totals {
            Some((Some(total), n)) if n > 0 => Ok(Some(total as f64 / n as f64)),
            _ => Ok(None),
        }
    }

    async fn find_for_user(
        &self,
        user_id: i32,
        sort: FeedbackSort,
        page: FeedbackPage,
    ) -> StoreResult<Vec<Feedback>> {
        let mut query = feedback::Entity::find().filter(feedback::Column::UserToId.eq(user_id));

        // A stars ordering replaces a creation-date ordering
        if let Some(direction) = sort.stars {
            query = query.order_by(feedback::Column::Stars, order(direction));
        } else if let Some(direction) = sort.created_at {
            query = query.order_by(feedback::Column::CreatedAt, order(direction));
        }

        let results = query
            .order_by_asc(feedback::Column::Id)
            .offset(page.offset())
            .limit(page.page_size)
            .all(&*self.db)
            .await
            .for_entity(EntityKind::Feedback)?;

        Ok(results.into_iter().map(Into::into).collect())
    }
}
