/*
 * Responsibility
 * - users の in-memory ストア (email -> UserRow)
 * - 起動時に seed を入れる (foo@gmail.com / bar@gmail.com)
 * - 永続化はしない (プロセス終了で消える)
 */
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
}

impl UserRow {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserRepo {
    users: Arc<RwLock<HashMap<String, UserRow>>>,
}

impl UserRepo {
    pub fn seeded() -> Self {
        let users = ["foo@gmail.com", "bar@gmail.com"]
            .into_iter()
            .map(|email| (email.to_string(), UserRow::new(email)))
            .collect();

        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub async fn get(&self, email: &str) -> Option<UserRow> {
        self.users.read().await.get(email).cloned()
    }

    /// Insert or overwrite by email.
    pub async fn create(&self, user: UserRow) {
        self.users.write().await.insert(user.email.clone(), user);
    }

    /// Drop the entry under `email` (if any) and store `user` under its own email.
    pub async fn update(&self, email: &str, user: UserRow) {
        let mut users = self.users.write().await;
        users.remove(email);
        users.insert(user.email.clone(), user);
    }

    pub async fn delete(&self, email: &str) -> bool {
        self.users.write().await.remove(email).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_repo_contains_demo_users() {
        let repo = UserRepo::seeded();

        assert!(repo.get("foo@gmail.com").await.is_some());
        assert!(repo.get("bar@gmail.com").await.is_some());
        assert!(repo.get("baz@gmail.com").await.is_none());
    }

    #[tokio::test]
    async fn create_overwrites_same_email() {
        let repo = UserRepo::default();
        let first = UserRow::new("a@example.com");
        let second = UserRow::new("a@example.com");

        repo.create(first).await;
        repo.create(second.clone()).await;

        assert_eq!(repo.get("a@example.com").await, Some(second));
    }

    #[tokio::test]
    async fn update_moves_entry_to_new_email() {
        let repo = UserRepo::seeded();

        repo.update("foo@gmail.com", UserRow::new("foo@example.com"))
            .await;

        assert!(repo.get("foo@gmail.com").await.is_none());
        assert!(repo.get("foo@example.com").await.is_some());
    }

    #[tokio::test]
    async fn delete_reports_whether_entry_existed() {
        let repo = UserRepo::seeded();

        assert!(repo.delete("bar@gmail.com").await);
        assert!(!repo.delete("bar@gmail.com").await);
    }
}
