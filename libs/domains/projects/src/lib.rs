//! Projects Domain
//!
//! Write-path orchestration and consistency model for the Project aggregate:
//! find-or-create resolution of contributors, tags, and technologies,
//! visibility-based read access, and a transactional like/unlike toggle that
//! keeps the denormalized like counter in step with the like rows.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  ┌─────────────┐
//! │   Service   │  │    Query    │  ← aggregate store / viewer-scoped reads
//! └──────┬──────┘  └──────┬──────┘
//!        │                │
//! ┌──────▼────────────────▼──────┐
//! │  Reader / Writer capability  │  ← traits + in-memory and Postgres impls
//! └──────┬───────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │  Entities   │  ← projects, tags, technologies, join tables
//! └─────────────┘
//! ```
//!
//! Transport (HTTP, auth, pagination parsing) lives outside this crate: the
//! services consume an already-authenticated username (or none) and numeric
//! pagination bounds, and hand back aggregates for an external projection
//! step.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_projects::ProjectsModule;
//! use database::postgres::PostgresConfig;
//!
//! # async fn wire() -> Result<(), sea_orm::DbErr> {
//! let module = ProjectsModule::connect(PostgresConfig::new(
//!     "postgresql://localhost/showcase",
//! ))
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod module;
pub mod postgres;
pub mod query;
pub mod relations;
pub mod repository;
pub mod service;
pub mod visibility;

// Re-export commonly used types
pub use error::{ProjectError, ProjectResult};
pub use models::{
    Contributor, CreateProject, NewProject, Project, ProjectView, Tag, Technology, Visibility,
};
pub use module::ProjectsModule;
pub use postgres::PgProjectRepository;
pub use query::ProjectQuery;
pub use repository::{
    InMemoryProjectRepository, ProjectReader, ProjectRepository, ProjectWriter,
};
pub use service::ProjectService;
