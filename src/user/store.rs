//! User store trait and the in-memory implementation.

use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use uuid::Uuid;

use super::{NewUser, User, UserUpdate};
use crate::Result;

/// Storage operations for users.
///
/// Implementations must be shareable across request handlers.
pub trait UserStore: Send + Sync {
    /// List all users in creation order.
    fn list(&self) -> Result<Vec<User>>;

    /// Get a user by ID.
    fn get(&self, id: &str) -> Result<Option<User>>;

    /// Create a user and return it with its assigned ID.
    fn create(&self, new_user: NewUser) -> Result<User>;

    /// Update a user by ID. Returns `None` if no such user exists.
    fn update(&self, id: &str, update: UserUpdate) -> Result<Option<User>>;

    /// Delete a user by ID. Returns `false` if no such user existed.
    fn delete(&self, id: &str) -> Result<bool>;
}

/// Process-local user store.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryUserStore {
    fn list(&self) -> Result<Vec<User>> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.clone())
    }

    fn get(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    fn create(&self, new_user: NewUser) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new_user.email,
            name: new_user.name,
            role: new_user.role,
            avatar: new_user.avatar,
            created_at: now,
            updated_at: now,
        };

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users.push(user.clone());
        Ok(user)
    }

    fn update(&self, id: &str, update: UserUpdate) -> Result<Option<User>> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            user.apply(update);
            user.clone()
        }))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}
