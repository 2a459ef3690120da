//! Credential store.

use std::collections::HashMap;

use evently_id::UserId;
use tokio::sync::RwLock;

use super::StoreError;
use crate::model::User;

#[derive(Default)]
struct Users {
    by_id: HashMap<UserId, User>,
    id_by_email: HashMap<String, UserId>,
}

/// Owns every [`User`] record, indexed by id and by email.
#[derive(Default)]
pub struct UserStore {
    users: RwLock<Users>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user. Email uniqueness is checked under the same write
    /// guard as the insert.
    pub async fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;

        if users.id_by_email.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        if users.by_id.contains_key(&user.id) {
            return Err(StoreError::DuplicateUser(user.id));
        }

        users.id_by_email.insert(user.email.clone(), user.id);
        users.by_id.insert(user.id, user);
        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().await;
        users
            .id_by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned()
    }

    pub async fn find_by_id(&self, id: &UserId) -> Option<User> {
        self.users.read().await.by_id.get(id).cloned()
    }

    pub async fn contains(&self, id: &UserId) -> bool {
        self.users.read().await.by_id.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Role;

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Attendee,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = UserStore::new();
        let u = user("a@example.com");
        let id = u.id;
        store.insert(u).await.unwrap();

        assert_eq!(store.find_by_email("a@example.com").await.unwrap().id, id);
        assert_eq!(store.find_by_id(&id).await.unwrap().email, "a@example.com");
        assert!(store.contains(&id).await);
        assert!(store.find_by_email("b@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = UserStore::new();
        store.insert(user("a@example.com")).await.unwrap();
        let err = store.insert(user("a@example.com")).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateEmail("a@example.com".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_email_single_winner() {
        let store = Arc::new(UserStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(user("race@example.com")).await.is_ok()
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(store.len().await, 1);
    }
}
