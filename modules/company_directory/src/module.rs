//! Module wiring and lifecycle: database, migrations, services and HTTP serving

use crate::api::rest::routes::build_router;
use crate::config::{AppConfig, DatabaseConfig};
use crate::domain::{BroadcastEventPublisher, DirectoryEvent, SeoService, Service};
use crate::infra::storage::{
    Migrator, SeaOrmCompanyPageRepository, SeaOrmSeoRepository, SeaOrmTabRepository,
};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Company directory module
pub struct DirectoryModule {
    config: AppConfig,
    db: Arc<DatabaseConnection>,
    service: Arc<Service>,
    seo: Arc<SeoService>,
    events: Arc<BroadcastEventPublisher>,
}

impl DirectoryModule {
    /// Connect to the database, run migrations and build the services
    pub async fn init(config: AppConfig) -> Result<Self> {
        let db = Arc::new(connect(&config.database).await?);
        migrate(&db).await?;
        Ok(Self::with_connection(config, db))
    }

    /// Build the services over an already migrated connection
    pub fn with_connection(config: AppConfig, db: Arc<DatabaseConnection>) -> Self {
        // Build repositories
        let pages = Arc::new(SeaOrmCompanyPageRepository::new(db.clone()));
        let tabs = Arc::new(SeaOrmTabRepository::new(db.clone()));
        let seo_repo = Arc::new(SeaOrmSeoRepository::new(db.clone()));

        let events = Arc::new(BroadcastEventPublisher::new(
            config.directory.event_capacity,
        ));

        // Build domain services
        let service = Arc::new(Service::with_config(
            pages,
            tabs,
            events.clone(),
            config.directory.clone(),
        ));
        let seo = Arc::new(SeoService::new(seo_repo, events.clone()));

        tracing::info!("Company directory initialized");
        Self {
            config,
            db,
            service,
            seo,
            events,
        }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn seo(&self) -> Arc<SeoService> {
        self.seo.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.db.clone()
    }

    /// Receive every domain event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.events.subscribe()
    }

    /// HTTP router with all routes and middleware
    pub fn router(&self) -> axum::Router {
        build_router(self.service(), self.seo(), &self.config.server)
    }

    /// Serve HTTP until `cancel` fires, then drain in-flight requests
    pub async fn serve(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let address = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .with_context(|| format!("failed to bind {}", address))?;

        tracing::info!(%address, "Company directory listening");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
            .context("HTTP server failed")?;

        tracing::info!("Company directory stopped");
        Ok(())
    }
}

/// Open a sea-orm connection pool
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to database at {}", redact(&config.url)))
}

/// Apply all pending migrations
pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .context("failed to run migrations")?;
    tracing::info!("Company directory migrations completed");
    Ok(())
}

/// Strip credentials from a connection URL before logging it
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_credentials() {
        assert_eq!(
            redact("postgres://user:secret@db:5432/directory"),
            "postgres://***@db:5432/directory"
        );
        assert_eq!(
            redact("sqlite://data/directory.db?mode=rwc"),
            "sqlite://data/directory.db?mode=rwc"
        );
    }
}
