use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskChanges, User};

/// Process-local store backing both traits. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    // Insertion order is kept so listings are stable.
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.users.read().await.contains_key(email))
    }

    async fn create(&self, user: NewUser) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(AppError::Conflict("Email already exists".into()));
        }
        users.insert(user.email.clone(), user.into());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(email).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, task: Task) -> Result<Task, AppError> {
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn list_by_owner(&self, email: &str) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().filter(|t| t.email == email).cloned().collect())
    }

    async fn exists(&self, id: Uuid, email: &str) -> Result<bool, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().any(|t| t.id == id && t.email == email))
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Option<&str>,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id && owner.map_or(true, |email| t.email == email));

        Ok(task.map(|task| {
            changes.apply_to(task);
            task.clone()
        }))
    }

    async fn delete(&self, id: Uuid, email: &str) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.email == email));
        Ok(tasks.len() != before)
    }
}
