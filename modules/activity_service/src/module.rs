//! Module declaration and lifecycle implementation

use crate::config::Config;
use crate::domain::{Repositories, Service};
use crate::infra::storage::{
    Migrator, SeaOrmActivityRepository, SeaOrmActivityTypeRepository, SeaOrmFeedbackRepository,
    SeaOrmTechnologyRepository, SeaOrmUserRepository,
};
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Activity service module
///
/// Lifecycle: `migrate` once the database is reachable, `init` with the
/// typed configuration, then `register_rest` to mount the routes.
pub struct ActivityServiceModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for ActivityServiceModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl ActivityServiceModule {
    /// Create the schema
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None).await?;
        tracing::info!("Activity service migrations completed");
        Ok(())
    }

    /// Build the domain service on top of `db` and ensure seeded lookups
    pub async fn init(&self, cfg: Config, db: Arc<DatabaseConnection>) -> Result<()> {
        let repos = Repositories {
            activities: Arc::new(SeaOrmActivityRepository::new(db.clone())),
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            technologies: Arc::new(SeaOrmTechnologyRepository::new(db.clone())),
            activity_types: Arc::new(SeaOrmActivityTypeRepository::new(db.clone())),
            feedback: Arc::new(SeaOrmFeedbackRepository::new(db)),
        };

        let service = Arc::new(Service::new(repos, &cfg));
        service.seed_lookups(&cfg.seed).await?;

        *self.config.write() = cfg;
        *self.service.write() = Some(service);

        tracing::info!(
            timestamp_policy = ?self.config.read().timestamp_policy,
            "Activity service initialized"
        );
        Ok(())
    }

    /// Domain service, available after `init`
    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// Mount the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;

        tracing::info!("Registering activity service REST routes");
        crate::api::rest::routes::register_routes(router, service)
    }
}
