use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProjectError, ProjectResult};
use crate::models::{Contributor, NewProject, Project, Tag, Technology, STATUS_ACTIVE};
use crate::visibility;

/// Read capability over the project store
#[async_trait]
pub trait ProjectReader: Send + Sync {
    /// Load a full aggregate by id. No visibility applied - the service and
    /// query layers own that policy.
    async fn get_aggregate(&self, id: i32) -> ProjectResult<Option<Project>>;

    /// List aggregates readable by `viewer`, newest first
    async fn list(
        &self,
        viewer: Option<i32>,
        limit: u64,
        offset: u64,
    ) -> ProjectResult<Vec<Project>>;

    /// Total number of projects, all visibilities
    async fn count(&self) -> ProjectResult<u64>;

    /// Whether `user_id` has liked `project_id`
    async fn is_liked(&self, user_id: i32, project_id: i32) -> ProjectResult<bool>;

    /// The subset of `project_ids` liked by `user_id`; one batched lookup
    /// instead of a query per listed row
    async fn liked_project_ids(
        &self,
        user_id: i32,
        project_ids: &[i32],
    ) -> ProjectResult<HashSet<i32>>;
}

/// Write capability over the project store
#[async_trait]
pub trait ProjectWriter: Send + Sync {
    /// Persist a new project with all its relation rows in one transaction.
    /// Tag and technology names are find-or-created inside that transaction.
    async fn create(&self, record: NewProject) -> ProjectResult<Project>;

    /// Flip the (user, project) like state and return the new state. The
    /// like row and the denormalized `likes` counter move together.
    async fn toggle_like(&self, user_id: i32, project_id: i32) -> ProjectResult<bool>;
}

/// Full repository: both capabilities
pub trait ProjectRepository: ProjectReader + ProjectWriter {}

impl<T: ProjectReader + ProjectWriter> ProjectRepository for T {}

/// In-memory implementation of the project store (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProjectRepository {
    inner: Arc<RwLock<Store>>,
}

#[derive(Debug, Default)]
struct Store {
    projects: HashMap<i32, Project>,
    tags: Vec<Tag>,
    technologies: Vec<Technology>,
    likes: HashSet<(i32, i32)>, // (user_id, project_id)
    next_project_id: i32,
    next_tag_id: i32,
    next_technology_id: i32,
}

impl Store {
    fn find_or_create_tag(&mut self, name: &str) -> Tag {
        if let Some(tag) = self.tags.iter().find(|t| t.name == name) {
            return tag.clone();
        }
        self.next_tag_id += 1;
        let tag = Tag {
            id: self.next_tag_id,
            name: name.to_string(),
        };
        self.tags.push(tag.clone());
        tag
    }

    fn find_or_create_technology(&mut self, name: &str) -> Technology {
        if let Some(tech) = self.technologies.iter().find(|t| t.name == name) {
            return tech.clone();
        }
        self.next_technology_id += 1;
        let tech = Technology {
            id: self.next_technology_id,
            name: name.to_string(),
        };
        self.technologies.push(tech.clone());
        tech
    }
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectWriter for InMemoryProjectRepository {
    async fn create(&self, record: NewProject) -> ProjectResult<Project> {
        let mut store = self.inner.write().await;

        if store.projects.values().any(|p| p.title == record.title) {
            return Err(ProjectError::DuplicateTitle(record.title));
        }

        let contributors: Vec<Contributor> = record
            .contributors
            .into_iter()
            .map(Contributor::from)
            .collect();
        let creator = contributors.first().cloned().ok_or_else(|| {
            ProjectError::Internal("Contributor list must start with the creator".to_string())
        })?;

        let tags: Vec<Tag> = record
            .tags
            .iter()
            .map(|name| store.find_or_create_tag(name))
            .collect();
        let technologies: Vec<Technology> = record
            .technologies
            .iter()
            .map(|name| store.find_or_create_technology(name))
            .collect();

        store.next_project_id += 1;
        let now = chrono::Utc::now();
        let project = Project {
            id: store.next_project_id,
            title: record.title,
            description: record.description,
            image: record.image,
            github_link: record.github_link,
            live_url: record.live_url,
            status: STATUS_ACTIVE.to_string(),
            visibility: record.visibility,
            category: record.category,
            likes: 0,
            views: 0,
            created_by: record.created_by,
            modified_by: Some(record.created_by),
            created_at: now,
            updated_at: now,
            creator,
            contributors,
            tags,
            technologies,
        };
        store.projects.insert(project.id, project.clone());

        tracing::info!(project_id = project.id, title = %project.title, "Created project");
        Ok(project)
    }

    async fn toggle_like(&self, user_id: i32, project_id: i32) -> ProjectResult<bool> {
        let mut guard = self.inner.write().await;
        let store = &mut *guard;

        let project = store
            .projects
            .get_mut(&project_id)
            .ok_or(ProjectError::NotFound(project_id))?;

        let key = (user_id, project_id);
        let now_liked = if store.likes.remove(&key) {
            if project.likes == 0 {
                tracing::warn!(
                    project_id,
                    "Like counter out of sync with like rows; clamping at zero"
                );
            }
            project.likes = (project.likes - 1).max(0);
            false
        } else {
            store.likes.insert(key);
            project.likes += 1;
            true
        };
        project.updated_at = chrono::Utc::now();

        Ok(now_liked)
    }
}

#[async_trait]
impl ProjectReader for InMemoryProjectRepository {
    async fn get_aggregate(&self, id: i32) -> ProjectResult<Option<Project>> {
        let store = self.inner.read().await;
        Ok(store.projects.get(&id).cloned())
    }

    async fn list(
        &self,
        viewer: Option<i32>,
        limit: u64,
        offset: u64,
    ) -> ProjectResult<Vec<Project>> {
        let store = self.inner.read().await;

        let mut result: Vec<Project> = store
            .projects
            .values()
            .filter(|p| visibility::can_view(p.visibility, p.created_by, viewer))
            .cloned()
            .collect();

        // Newest first, id as the tiebreak for same-instant rows
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(result
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> ProjectResult<u64> {
        let store = self.inner.read().await;
        Ok(store.projects.len() as u64)
    }

    async fn is_liked(&self, user_id: i32, project_id: i32) -> ProjectResult<bool> {
        let store = self.inner.read().await;
        Ok(store.likes.contains(&(user_id, project_id)))
    }

    async fn liked_project_ids(
        &self,
        user_id: i32,
        project_ids: &[i32],
    ) -> ProjectResult<HashSet<i32>> {
        let store = self.inner.read().await;
        Ok(project_ids
            .iter()
            .copied()
            .filter(|id| store.likes.contains(&(user_id, *id)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;
    use domain_users::User;

    fn user(id: i32, username: &str) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_project(title: &str, creator: User) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: String::new(),
            image: None,
            github_link: String::new(),
            live_url: None,
            category: String::new(),
            visibility: Visibility::Public,
            created_by: creator.id,
            contributors: vec![creator],
            tags: Vec::new(),
            technologies: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_project() {
        let repo = InMemoryProjectRepository::new();

        let created = repo.create(new_project("dashboard", user(1, "alice"))).await.unwrap();
        assert_eq!(created.title, "dashboard");
        assert_eq!(created.status, STATUS_ACTIVE);
        assert_eq!(created.likes, 0);
        assert_eq!(created.creator.username, "alice");

        let fetched = repo.get_aggregate(created.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_title_leaves_count_unchanged() {
        let repo = InMemoryProjectRepository::new();
        repo.create(new_project("dashboard", user(1, "alice"))).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        let result = repo.create(new_project("dashboard", user(2, "bob"))).await;
        assert!(matches!(result, Err(ProjectError::DuplicateTitle(_))));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_tag_resolution_is_idempotent_across_creates() {
        let repo = InMemoryProjectRepository::new();

        let mut first = new_project("one", user(1, "alice"));
        first.tags = vec!["iot".to_string()];
        let mut second = new_project("two", user(1, "alice"));
        second.tags = vec!["iot".to_string(), "rust".to_string()];

        let first = repo.create(first).await.unwrap();
        let second = repo.create(second).await.unwrap();

        assert_eq!(first.tags[0].id, second.tags[0].id);
        assert_ne!(second.tags[0].id, second.tags[1].id);
    }

    #[tokio::test]
    async fn test_toggle_like_pair_restores_state() {
        let repo = InMemoryProjectRepository::new();
        let project = repo.create(new_project("dashboard", user(1, "alice"))).await.unwrap();

        assert!(repo.toggle_like(2, project.id).await.unwrap());
        assert!(repo.is_liked(2, project.id).await.unwrap());
        assert_eq!(repo.get_aggregate(project.id).await.unwrap().unwrap().likes, 1);

        assert!(!repo.toggle_like(2, project.id).await.unwrap());
        assert!(!repo.is_liked(2, project.id).await.unwrap());
        assert_eq!(repo.get_aggregate(project.id).await.unwrap().unwrap().likes, 0);
    }

    #[tokio::test]
    async fn test_toggle_like_unknown_project() {
        let repo = InMemoryProjectRepository::new();
        let result = repo.toggle_like(1, 404).await;
        assert!(matches!(result, Err(ProjectError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_list_applies_visibility_and_pagination() {
        let repo = InMemoryProjectRepository::new();
        let alice = user(1, "alice");

        repo.create(new_project("public-one", alice.clone())).await.unwrap();
        let mut hidden = new_project("secret", alice.clone());
        hidden.visibility = Visibility::Private;
        repo.create(hidden).await.unwrap();
        repo.create(new_project("public-two", alice.clone())).await.unwrap();

        let anonymous = repo.list(None, 10, 0).await.unwrap();
        assert_eq!(anonymous.len(), 2);
        assert!(anonymous.iter().all(|p| p.visibility == Visibility::Public));

        let owner = repo.list(Some(alice.id), 10, 0).await.unwrap();
        assert_eq!(owner.len(), 3);

        let paged = repo.list(Some(alice.id), 2, 1).await.unwrap();
        assert_eq!(paged.len(), 2);
    }

    #[tokio::test]
    async fn test_liked_project_ids_batches() {
        let repo = InMemoryProjectRepository::new();
        let alice = user(1, "alice");
        let a = repo.create(new_project("a", alice.clone())).await.unwrap();
        let b = repo.create(new_project("b", alice.clone())).await.unwrap();
        let c = repo.create(new_project("c", alice)).await.unwrap();

        repo.toggle_like(7, a.id).await.unwrap();
        repo.toggle_like(7, c.id).await.unwrap();

        let liked = repo
            .liked_project_ids(7, &[a.id, b.id, c.id])
            .await
            .unwrap();
        assert_eq!(liked, HashSet::from([a.id, c.id]));
    }
}
