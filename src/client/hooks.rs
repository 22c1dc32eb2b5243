//! One state object per user action.
//!
//! Each hook owns a single [`Action`] instead of separate loading, error and
//! success flags, so a hook can never be loading and succeeded at once. Hooks
//! that change the task list also update a local [`TaskBoard`].

use std::fmt;

use uuid::Uuid;

use super::{ApiClient, ClientError};
use crate::auth::{LoginRequest, RegisterRequest};
use crate::models::{NewTaskRequest, Task, TaskChanges, UpdateTaskRequest};

/// Lifecycle of an asynchronous user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for Action<T> {
    fn default() -> Self {
        Action::Idle
    }
}

impl<T> Action<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Action::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Action::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Action::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Action::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn settle<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Action::Succeeded(value),
            Err(err) => Action::Failed(err.to_string()),
        }
    }
}

/// Client-side copy of the caller's tasks.
#[derive(Debug, Default, Clone)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn apply(&mut self, id: Uuid, changes: &TaskChanges) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            changes.apply_to(task);
        }
    }

    pub fn remove(&mut self, id: Uuid) {
        self.tasks.retain(|t| t.id != id);
    }
}

/// Logged-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Default)]
pub struct RegisterHook {
    state: Action<String>,
}

impl RegisterHook {
    pub fn state(&self) -> &Action<String> {
        &self.state
    }

    /// On success the state holds the server message followed by a prompt
    /// to log in.
    pub async fn run(&mut self, client: &ApiClient, request: RegisterRequest) -> &Action<String> {
        self.state = Action::Pending;
        let result = client
            .register(&request)
            .await
            .map(|r| format!("{}. Please login to continue", r.message));
        self.state = Action::settle(result);
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = Action::Idle;
    }
}

#[derive(Debug, Default)]
pub struct LoginHook {
    state: Action<Session>,
}

impl LoginHook {
    pub fn state(&self) -> &Action<Session> {
        &self.state
    }

    /// Logs in and, on success, stores the token in `client` for later task calls.
    pub async fn run(
        &mut self,
        client: &mut ApiClient,
        email: &str,
        password: &str,
    ) -> &Action<Session> {
        self.state = Action::Pending;
        let request = LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let result = client.login(&request).await.map(|r| Session {
            email: email.to_string(),
            token: r.token,
        });
        if let Ok(session) = &result {
            client.set_token(session.token.clone());
            log::debug!("logged in as {}", session.email);
        }
        self.state = Action::settle(result);
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = Action::Idle;
    }
}

#[derive(Debug, Default)]
pub struct AddTaskHook {
    state: Action<String>,
}

impl AddTaskHook {
    pub fn state(&self) -> &Action<String> {
        &self.state
    }

    pub async fn run(
        &mut self,
        client: &ApiClient,
        board: &mut TaskBoard,
        request: NewTaskRequest,
    ) -> &Action<String> {
        self.state = Action::Pending;
        let result = client.add_task(&request).await.map(|response| {
            board.add(response.data);
            response.message
        });
        self.state = Action::settle(result);
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = Action::Idle;
    }
}

#[derive(Debug, Default)]
pub struct ListTasksHook {
    state: Action<usize>,
}

impl ListTasksHook {
    pub fn state(&self) -> &Action<usize> {
        &self.state
    }

    /// Replaces the board with the server's list. Succeeds with the task count.
    pub async fn run(&mut self, client: &ApiClient, board: &mut TaskBoard) -> &Action<usize> {
        self.state = Action::Pending;
        let result = client.list_tasks().await.map(|tasks| {
            let count = tasks.len();
            board.replace_all(tasks);
            count
        });
        self.state = Action::settle(result);
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = Action::Idle;
    }
}

#[derive(Debug, Default)]
pub struct UpdateTaskHook {
    state: Action<String>,
}

impl UpdateTaskHook {
    pub fn state(&self) -> &Action<String> {
        &self.state
    }

    pub async fn run(
        &mut self,
        client: &ApiClient,
        board: &mut TaskBoard,
        request: UpdateTaskRequest,
    ) -> &Action<String> {
        self.state = Action::Pending;
        let result = client.update_task(&request).await.map(|status| {
            board.apply(request.id, &request.changes);
            status
        });
        self.state = Action::settle(result);
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = Action::Idle;
    }
}

#[derive(Debug, Default)]
pub struct DeleteTaskHook {
    state: Action<String>,
}

impl DeleteTaskHook {
    pub fn state(&self) -> &Action<String> {
        &self.state
    }

    pub async fn run(&mut self, client: &ApiClient, board: &mut TaskBoard, id: Uuid) -> &Action<String> {
        self.state = Action::Pending;
        let result: Result<String, ClientError> = client.delete_task(id).await.map(|status| {
            board.remove(id);
            status
        });
        self.state = Action::settle(result);
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = Action::Idle;
    }
}
