use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    models::{User, UserId},
    ports::outbound::UserDirectory,
    TimeTrackingError,
};

/// In-memory user store.
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Bump the revision of a user whose derived data changed.
    pub async fn touch(&self, user_id: &UserId) {
        if let Some(user) = self.users.write().await.get_mut(user_id) {
            user.revision += 1;
        }
    }

    pub async fn contains(&self, user_id: &UserId) -> bool {
        self.users.read().await.contains_key(user_id)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn fresh(&self, user_id: &UserId) -> Result<User, TimeTrackingError> {
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or(TimeTrackingError::UserNotFound(*user_id))
    }
}
