use thiserror::Error;

/// Errors surfaced by the database layer itself (connection management,
/// health checks). Query-level errors stay as `sea_orm::DbErr` and are
/// mapped by the domain crates.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
