use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Status label assigned to every freshly created project
pub const STATUS_ACTIVE: &str = "active";

/// Who a project may be shown to. Stored as an integer; `Public` is 0.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    #[default]
    #[sea_orm(num_value = 0)]
    Public,
    #[sea_orm(num_value = 1)]
    Private,
}

/// Creator/contributor details embedded in a project aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Contributor {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub image: Option<String>,
}

impl From<domain_users::User> for Contributor {
    fn from(user: domain_users::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            image: user.image,
        }
    }
}

/// Tag shared across projects; created lazily on first reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// Technology shared across projects; created lazily on first reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Technology {
    pub id: i32,
    pub name: String,
}

/// Project aggregate - the scalar row plus all resolved relations, treated
/// as one consistency unit on write
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Project {
    /// Unique identifier
    pub id: i32,
    /// Title (unique across projects)
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub github_link: String,
    pub live_url: Option<String>,
    /// Free-form status label; `"active"` at creation
    pub status: String,
    pub visibility: Visibility,
    pub category: String,
    /// Denormalized count of like rows, kept in sync by the toggle
    pub likes: i32,
    /// View counter; owned by a different module, never mutated here
    pub views: i32,
    /// Owning user id, immutable after creation
    pub created_by: i32,
    /// Last mutating user id
    pub modified_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creator: Contributor,
    /// Ordered; the creator is always first
    pub contributors: Vec<Contributor>,
    pub tags: Vec<Tag>,
    pub technologies: Vec<Technology>,
}

/// A project as seen by a specific (possibly anonymous) viewer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    /// Whether the resolved viewer has liked this project
    pub is_liked: bool,
}

/// DTO for creating a new project
///
/// Tag, technology, and contributor entries are plain names; splitting any
/// legacy comma-joined input is the transport layer's job.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(url)]
    pub image: Option<String>,
    #[serde(default)]
    pub github_link: String,
    #[validate(url)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Usernames of additional contributors; the creator is implicit
    #[serde(default)]
    pub contributors: Vec<String>,
}

/// Fully resolved creation record handed to the write capability
///
/// Contributors are resolved users in final order (creator first). Tag and
/// technology names are find-or-created inside the storage transaction so an
/// aborted creation leaves no orphan rows behind.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub github_link: String,
    pub live_url: Option<String>,
    pub category: String,
    pub visibility: Visibility,
    pub created_by: i32,
    pub contributors: Vec<domain_users::User>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_project_deserializes_with_defaults() {
        let input: CreateProject = serde_json::from_str(
            r#"{
                "title": "Alpha",
                "description": "An IoT dashboard",
                "github_link": "https://github.com/alice/alpha",
                "tags": ["iot", "go"],
                "technologies": ["Go", "Gin"]
            }"#,
        )
        .unwrap();

        assert_eq!(input.title, "Alpha");
        assert!(input.contributors.is_empty());
        assert!(input.image.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_project_rejects_empty_title() {
        let input: CreateProject = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_project_rejects_malformed_live_url() {
        let input: CreateProject =
            serde_json::from_str(r#"{"title": "Alpha", "live_url": "not a url"}"#).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_visibility_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Visibility::Public).unwrap(), r#""public""#);
        assert_eq!(Visibility::default(), Visibility::Public);
    }
}
