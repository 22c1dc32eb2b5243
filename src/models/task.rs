use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Every task starts here.
    Pending,
    InProgress,
    Completed,
}

/// A task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    /// Email of the owning user.
    pub email: String,
    pub name: String,
    pub description: String,
    pub priority: TaskPriority,
    pub deadline: NaiveDate,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /task/add`. Every field is required; they are optional here
/// so a missing field is reported as a validation error rather than a JSON
/// parse failure.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct NewTaskRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required)]
    pub priority: Option<TaskPriority>,
    #[validate(required)]
    pub deadline: Option<NaiveDate>,
}

/// A task creation request that passed validation.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub priority: TaskPriority,
    pub deadline: NaiveDate,
}

impl NewTaskRequest {
    /// Returns `None` if any field is missing or empty.
    pub fn into_new_task(self) -> Option<NewTask> {
        if self.validate().is_err() {
            return None;
        }
        Some(NewTask {
            name: self.name?,
            description: self.description?,
            priority: self.priority?,
            deadline: self.deadline?,
        })
    }
}

/// Fields an update may overwrite. Absent fields are left unchanged.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TaskChanges {
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    /// Applies the supplied fields to `task`. Id and owner are never touched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.updated_at = Utc::now();
    }
}

/// Body of `PUT /task/update`. Clients usually send back a whole task, so the
/// id is also accepted as `_id` and unrelated fields such as `email` are ignored.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[serde(alias = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    #[validate]
    pub changes: TaskChanges,
}

impl Task {
    /// Creates a task owned by `email`. The status is always `Pending`.
    pub fn new(input: NewTask, email: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: input.name,
            description: input.description,
            priority: input.priority,
            deadline: input.deadline,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> NewTaskRequest {
        NewTaskRequest {
            name: Some("A".to_string()),
            description: Some("d".to_string()),
            priority: Some(TaskPriority::High),
            deadline: NaiveDate::from_ymd_opt(2025, 1, 1),
        }
    }

    #[test]
    fn test_task_creation_forces_pending() {
        let input = sample_request().into_new_task().unwrap();
        let task = Task::new(input, "owner@example.com");

        assert_eq!(task.email, "owner@example.com");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_new_task_request_requires_every_field() {
        assert!(sample_request().into_new_task().is_some());

        let mut missing_name = sample_request();
        missing_name.name = None;
        assert!(missing_name.into_new_task().is_none());

        let mut empty_description = sample_request();
        empty_description.description = Some(String::new());
        assert!(empty_description.into_new_task().is_none());

        let mut missing_priority = sample_request();
        missing_priority.priority = None;
        assert!(missing_priority.into_new_task().is_none());

        let mut missing_deadline = sample_request();
        missing_deadline.deadline = None;
        assert!(missing_deadline.into_new_task().is_none());
    }

    #[test]
    fn test_wire_format() {
        let request: NewTaskRequest = serde_json::from_value(json!({
            "name": "A",
            "description": "d",
            "priority": "high",
            "deadline": "2025-01-01"
        }))
        .unwrap();
        let task = Task::new(request.into_new_task().unwrap(), "u@example.com");

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["status"], "PENDING");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["deadline"], "2025-01-01");
    }

    #[test]
    fn test_update_request_accepts_full_task_with_underscore_id() {
        let id = Uuid::new_v4();
        let request: UpdateTaskRequest = serde_json::from_value(json!({
            "_id": id,
            "email": "someone-else@example.com",
            "name": "renamed",
            "status": "COMPLETED"
        }))
        .unwrap();

        assert_eq!(request.id, id);
        assert_eq!(request.changes.name.as_deref(), Some("renamed"));
        assert_eq!(request.changes.status, Some(TaskStatus::Completed));
        assert_eq!(request.changes.description, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let mut task = Task::new(sample_request().into_new_task().unwrap(), "u@example.com");
        let original = task.clone();

        let changes = TaskChanges {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        changes.apply_to(&mut task);

        assert_eq!(task.id, original.id);
        assert_eq!(task.email, original.email);
        assert_eq!(task.name, original.name);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.updated_at >= original.updated_at);
    }

    #[test]
    fn test_changes_reject_empty_name() {
        let changes = TaskChanges {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }
}
