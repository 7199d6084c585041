use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    /// Project absent or hidden by visibility; callers cannot tell which.
    #[error("Project not found: {0}")]
    NotFound(i32),

    #[error("Project with title '{0}' already exists")]
    DuplicateTitle(String),

    #[error("One or more contributors not found")]
    ContributorNotFound,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

impl From<domain_users::UserError> for ProjectError {
    fn from(err: domain_users::UserError) -> Self {
        ProjectError::Internal(err.to_string())
    }
}
