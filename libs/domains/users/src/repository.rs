use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, User};

/// Repository trait for User lookups
///
/// The project core consumes this read-side; `create` exists for the owning
/// module and for seeding test fixtures.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>>;

    /// Get a user by username
    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>>;

    /// Batch-resolve users by username. Unknown usernames are simply absent
    /// from the result; callers decide whether that is an error.
    async fn get_by_usernames(&self, usernames: &[String]) -> UserResult<Vec<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Store>>,
}

#[derive(Debug, Default)]
struct Store {
    users: HashMap<i32, User>,
    next_id: i32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut store = self.inner.write().await;

        if store.users.values().any(|u| u.username == input.username) {
            return Err(UserError::DuplicateUsername(input.username));
        }
        if store.users.values().any(|u| u.email == input.email) {
            return Err(UserError::DuplicateEmail(input.email));
        }

        store.next_id += 1;
        let now = chrono::Utc::now();
        let user = User {
            id: store.next_id,
            username: input.username,
            email: input.email,
            image: input.image,
            created_at: now,
            updated_at: now,
        };
        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, username = %user.username, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let store = self.inner.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let store = self.inner.read().await;
        Ok(store.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_by_usernames(&self, usernames: &[String]) -> UserResult<Vec<User>> {
        let store = self.inner.read().await;
        Ok(store
            .users
            .values()
            .filter(|u| usernames.contains(&u.username))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_username() {
        let repo = InMemoryUserRepository::new();

        let user = repo.create(new_user("alice")).await.unwrap();
        assert_eq!(user.username, "alice");

        let fetched = repo.get_by_username("alice").await.unwrap();
        assert_eq!(fetched.unwrap().id, user.id);

        assert!(repo.get_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_error() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice")).await.unwrap();

        let result = repo
            .create(CreateUser {
                username: "alice".to_string(),
                email: "other@example.com".to_string(),
                image: None,
            })
            .await;
        assert!(matches!(result, Err(UserError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_get_by_usernames_returns_only_known() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice")).await.unwrap();
        repo.create(new_user("bob")).await.unwrap();

        let found = repo
            .get_by_usernames(&["alice".to_string(), "ghost".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "alice");
    }
}
