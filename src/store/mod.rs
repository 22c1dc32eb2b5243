//! Persistence boundary for users and tasks.
//!
//! Handlers only see the [`UserStore`] and [`TaskStore`] traits. Two backends
//! implement them: [`postgres::PgStore`] for deployments and
//! [`memory::MemoryStore`] for local runs without a database and for tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskChanges, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists(&self, email: &str) -> Result<bool, AppError>;

    /// Inserts a user. Fails with [`AppError::Conflict`] if the email is already
    /// taken, including when a concurrent registration won the race.
    async fn create(&self, user: NewUser) -> Result<(), AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

/// Task store. Tasks are keyed by id and scoped by owner email.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, task: Task) -> Result<Task, AppError>;

    async fn list_by_owner(&self, email: &str) -> Result<Vec<Task>, AppError>;

    async fn exists(&self, id: Uuid, email: &str) -> Result<bool, AppError>;

    /// Applies `changes` to the task with `id`. With `owner` set, only a task
    /// owned by that email matches. Returns the updated task, or `None` when
    /// nothing matched.
    async fn update(
        &self,
        id: Uuid,
        owner: Option<&str>,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, AppError>;

    /// Deletes the task matching both `id` and `email`. Returns whether a row
    /// was removed.
    async fn delete(&self, id: Uuid, email: &str) -> Result<bool, AppError>;
}
