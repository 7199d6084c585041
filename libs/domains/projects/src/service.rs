use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

use domain_users::{User, UserRepository};

use crate::error::{ProjectError, ProjectResult};
use crate::models::{CreateProject, NewProject, Project, Visibility};
use crate::relations;
use crate::repository::ProjectRepository;
use crate::visibility;

/// Aggregate store for projects: owns creation, anonymous point lookup, the
/// like toggle entrypoint, and the total count.
#[derive(Clone)]
pub struct ProjectService<R: ProjectRepository, U: UserRepository> {
    projects: Arc<R>,
    users: Arc<U>,
}

/// Drop empty entries and repeats while preserving first-occurrence order;
/// tag and technology lists are sets.
fn dedup_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

impl<R: ProjectRepository, U: UserRepository> ProjectService<R, U> {
    pub fn new(projects: Arc<R>, users: Arc<U>) -> Self {
        Self { projects, users }
    }

    /// Create a project on behalf of `creator_username`.
    ///
    /// Resolution order: creator, then contributors (fail-closed), then the
    /// persisted write. Tags and technologies are find-or-created inside the
    /// storage transaction, so any failure leaves nothing behind.
    pub async fn create(
        &self,
        creator_username: &str,
        input: CreateProject,
    ) -> ProjectResult<Project> {
        input
            .validate()
            .map_err(|e| ProjectError::Validation(e.to_string()))?;

        let creator = self.resolve_user(creator_username).await?;
        let contributors =
            relations::resolve_contributors(self.users.as_ref(), &creator, &input.contributors)
                .await?;

        let record = NewProject {
            title: input.title,
            description: input.description,
            image: input.image,
            github_link: input.github_link,
            live_url: input.live_url,
            category: input.category,
            visibility: Visibility::default(),
            created_by: creator.id,
            contributors,
            tags: dedup_names(input.tags.into_iter()),
            // Technology names carry whitespace when split from legacy
            // comma-joined input upstream; trim before resolution.
            technologies: dedup_names(
                input
                    .technologies
                    .into_iter()
                    .map(|name| name.trim().to_string()),
            ),
        };

        self.projects.create(record).await
    }

    /// Point lookup with no viewer context. A private project surfaces as
    /// `NotFound`, identical in shape to a missing row.
    pub async fn get_by_id(&self, id: i32) -> ProjectResult<Project> {
        let project = self
            .projects
            .get_aggregate(id)
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        if !visibility::can_view(project.visibility, project.created_by, None) {
            return Err(ProjectError::NotFound(id));
        }

        Ok(project)
    }

    /// Total number of projects, all visibilities
    pub async fn count(&self) -> ProjectResult<u64> {
        self.projects.count().await
    }

    /// Flip the like state of `project_id` for the acting user; returns
    /// whether the project is now liked.
    pub async fn toggle_like(&self, username: &str, project_id: i32) -> ProjectResult<bool> {
        let user = self.resolve_user(username).await?;
        let now_liked = self.projects.toggle_like(user.id, project_id).await?;

        tracing::info!(
            user_id = user.id,
            project_id,
            now_liked,
            "Toggled project like"
        );
        Ok(now_liked)
    }

    async fn resolve_user(&self, username: &str) -> ProjectResult<User> {
        self.users
            .get_by_username(username)
            .await?
            .ok_or_else(|| ProjectError::UserNotFound(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryProjectRepository, ProjectReader, ProjectWriter};
    use async_trait::async_trait;
    use domain_users::{CreateUser, InMemoryUserRepository};

    async fn seed_user(users: &InMemoryUserRepository, username: &str) -> User {
        users
            .create(CreateUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                image: None,
            })
            .await
            .unwrap()
    }

    fn in_memory() -> (
        ProjectService<InMemoryProjectRepository, InMemoryUserRepository>,
        Arc<InMemoryProjectRepository>,
        Arc<InMemoryUserRepository>,
    ) {
        let projects = Arc::new(InMemoryProjectRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let service = ProjectService::new(projects.clone(), users.clone());
        (service, projects, users)
    }

    fn creation(title: &str) -> CreateProject {
        CreateProject {
            title: title.to_string(),
            description: String::new(),
            image: None,
            github_link: String::new(),
            live_url: None,
            category: String::new(),
            tags: Vec::new(),
            technologies: Vec::new(),
            contributors: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_project_full_scenario() {
        let (service, _, users) = in_memory();
        seed_user(&users, "alice").await;

        let mut input = creation("Alpha");
        input.tags = vec!["iot".to_string(), "go".to_string()];
        input.technologies = vec!["Go".to_string(), " Gin".to_string()];

        let project = service.create("alice", input).await.unwrap();

        assert_eq!(project.status, "active");
        assert_eq!(project.likes, 0);
        assert_eq!(project.visibility, Visibility::Public);
        assert_eq!(project.creator.username, "alice");
        assert_eq!(project.contributors.len(), 1);
        assert_eq!(project.contributors[0].username, "alice");

        let tag_names: Vec<&str> = project.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tag_names, ["iot", "go"]);

        let tech_names: Vec<&str> = project
            .technologies
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(tech_names, ["Go", "Gin"]);
    }

    #[tokio::test]
    async fn test_create_with_contributors_keeps_creator_first() {
        let (service, _, users) = in_memory();
        seed_user(&users, "alice").await;
        seed_user(&users, "bob").await;

        let mut input = creation("Beta");
        input.contributors = vec!["bob".to_string(), "alice".to_string()];

        let project = service.create("alice", input).await.unwrap();

        let names: Vec<&str> = project
            .contributors
            .iter()
            .map(|c| c.username.as_str())
            .collect();
        assert_eq!(names, ["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_create_unknown_creator() {
        let (service, _, _) = in_memory();
        let result = service.create("ghost", creation("Alpha")).await;
        assert!(matches!(result, Err(ProjectError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_unknown_contributor_persists_nothing() {
        let (service, projects, users) = in_memory();
        seed_user(&users, "alice").await;

        let mut input = creation("Alpha");
        input.tags = vec!["iot".to_string()];
        input.contributors = vec!["ghost".to_string()];

        let result = service.create("alice", input).await;
        assert!(matches!(result, Err(ProjectError::ContributorNotFound)));
        assert_eq!(projects.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_title_leaves_count_unchanged() {
        let (service, projects, users) = in_memory();
        seed_user(&users, "alice").await;

        service.create("alice", creation("Alpha")).await.unwrap();
        let result = service.create("alice", creation("Alpha")).await;

        assert!(matches!(result, Err(ProjectError::DuplicateTitle(_))));
        assert_eq!(projects.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let (service, _, users) = in_memory();
        seed_user(&users, "alice").await;

        let result = service.create("alice", creation("")).await;
        assert!(matches!(result, Err(ProjectError::Validation(_))));
    }

    #[tokio::test]
    async fn test_toggle_like_round_trip() {
        let (service, projects, users) = in_memory();
        seed_user(&users, "alice").await;
        seed_user(&users, "bob").await;

        let project = service.create("alice", creation("Alpha")).await.unwrap();

        assert!(service.toggle_like("bob", project.id).await.unwrap());
        assert!(!service.toggle_like("bob", project.id).await.unwrap());

        let after = projects.get_aggregate(project.id).await.unwrap().unwrap();
        assert_eq!(after.likes, project.likes);
    }

    #[tokio::test]
    async fn test_toggle_like_unknown_user() {
        let (service, _, users) = in_memory();
        seed_user(&users, "alice").await;
        let project = service.create("alice", creation("Alpha")).await.unwrap();

        let result = service.toggle_like("ghost", project.id).await;
        assert!(matches!(result, Err(ProjectError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_by_id_hides_private_from_anonymous() {
        let (service, projects, users) = in_memory();
        let alice = seed_user(&users, "alice").await;

        let record = NewProject {
            title: "secret".to_string(),
            description: String::new(),
            image: None,
            github_link: String::new(),
            live_url: None,
            category: String::new(),
            visibility: Visibility::Private,
            created_by: alice.id,
            contributors: vec![alice],
            tags: Vec::new(),
            technologies: Vec::new(),
        };
        let hidden = projects.create(record).await.unwrap();

        let missing = service.get_by_id(404).await.unwrap_err();
        let private = service.get_by_id(hidden.id).await.unwrap_err();
        assert!(matches!(missing, ProjectError::NotFound(_)));
        assert!(matches!(private, ProjectError::NotFound(_)));
    }

    // Interaction tests against mocked capabilities, for paths the
    // in-memory store cannot steer.
    mockall::mock! {
        ProjectRepo {}

        #[async_trait]
        impl ProjectReader for ProjectRepo {
            async fn get_aggregate(&self, id: i32) -> ProjectResult<Option<Project>>;
            async fn list(
                &self,
                viewer: Option<i32>,
                limit: u64,
                offset: u64,
            ) -> ProjectResult<Vec<Project>>;
            async fn count(&self) -> ProjectResult<u64>;
            async fn is_liked(&self, user_id: i32, project_id: i32) -> ProjectResult<bool>;
            async fn liked_project_ids(
                &self,
                user_id: i32,
                project_ids: &[i32],
            ) -> ProjectResult<HashSet<i32>>;
        }

        #[async_trait]
        impl ProjectWriter for ProjectRepo {
            async fn create(&self, record: NewProject) -> ProjectResult<Project>;
            async fn toggle_like(&self, user_id: i32, project_id: i32) -> ProjectResult<bool>;
        }
    }

    #[tokio::test]
    async fn test_count_passes_through() {
        let mut mock = MockProjectRepo::new();
        mock.expect_count().returning(|| Ok(7));

        let service =
            ProjectService::new(Arc::new(mock), Arc::new(InMemoryUserRepository::new()));
        assert_eq!(service.count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_create_propagates_storage_duplicate() {
        let users = Arc::new(InMemoryUserRepository::new());
        seed_user(&users, "alice").await;

        let mut mock = MockProjectRepo::new();
        mock.expect_create()
            .returning(|record| Err(ProjectError::DuplicateTitle(record.title)));

        let service = ProjectService::new(Arc::new(mock), users);
        let result = service.create("alice", creation("Alpha")).await;
        assert!(matches!(result, Err(ProjectError::DuplicateTitle(_))));
    }
}
