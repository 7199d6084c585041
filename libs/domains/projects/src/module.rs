//! Explicit wiring for the projects domain.
//!
//! Assembled once at startup and passed down to whatever composes the
//! transport layer; no process-wide singletons.

use std::sync::Arc;

use database::postgres::PostgresConfig;
use domain_users::PostgresUserRepository;
use sea_orm::{DatabaseConnection, DbErr};

use crate::postgres::PgProjectRepository;
use crate::query::ProjectQuery;
use crate::service::ProjectService;

/// The projects domain, fully wired against PostgreSQL.
pub struct ProjectsModule {
    pub service: ProjectService<PgProjectRepository, PostgresUserRepository>,
    pub query: ProjectQuery<PgProjectRepository, PostgresUserRepository>,
}

impl ProjectsModule {
    /// Assemble the module over an existing connection.
    pub fn new(db: DatabaseConnection) -> Self {
        let projects = Arc::new(PgProjectRepository::new(db.clone()));
        let users = Arc::new(PostgresUserRepository::new(db));

        Self {
            service: ProjectService::new(projects.clone(), users.clone()),
            query: ProjectQuery::new(projects, users),
        }
    }

    /// Connect and assemble in one step. Migrations are run separately via
    /// the `migration` binary.
    pub async fn connect(config: PostgresConfig) -> Result<Self, DbErr> {
        let db = database::postgres::connect_from_config(config).await?;
        Ok(Self::new(db))
    }
}
