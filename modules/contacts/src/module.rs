use std::sync::Arc;

use anyhow::anyhow;
use axum::Router;
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::ContactsConfig;
use crate::domain::service::{ContactService, ServiceConfig};
use crate::domain::validate::parse_region;
use crate::infra::storage::SeaOrmContactsRepository;

/// Wires the SeaORM repository to the domain service and exposes its routes.
#[derive(Clone)]
pub struct ContactsModule {
    service: Arc<ContactService>,
}

impl ContactsModule {
    pub fn init(conn: DatabaseConnection, cfg: &ContactsConfig) -> anyhow::Result<Self> {
        info!("Initializing contacts module");

        let default_region = parse_region(&cfg.default_region)
            .ok_or_else(|| anyhow!("unknown default_region '{}'", cfg.default_region))?;
        debug!(?default_region, "loaded contacts config");

        let repo = SeaOrmContactsRepository::new(conn);
        let service = ContactService::new(Arc::new(repo), ServiceConfig { default_region });

        Ok(Self {
            service: Arc::new(service),
        })
    }

    pub fn service(&self) -> Arc<ContactService> {
        self.service.clone()
    }

    pub fn router(&self) -> Router {
        routes::router(self.service.clone())
    }
}
