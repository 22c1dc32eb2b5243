use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTaskRequest, Task, UpdateTaskRequest},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Creates a new task for the authenticated user.
///
/// The task is owned by the caller's email and always starts as `PENDING`.
///
/// ## Request Body:
/// `name`, `description`, `priority` and `deadline`, all required.
///
/// ## Responses:
/// - `201 Created`: `{"message": "Task Successfully Added", "data": Task}`.
/// - `400 Bad Request`: a field is missing or empty. Nothing is stored.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: the caller's email is not a registered user.
#[post("/add")]
pub async fn add_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<NewTaskRequest>,
) -> Result<HttpResponse, AppError> {
    if !state.users.exists(&user.email).await? {
        return Err(AppError::NotFound("Email Not Found".into()));
    }

    let input = payload
        .into_inner()
        .into_new_task()
        .ok_or_else(|| AppError::ValidationError("All fields are required".into()))?;

    let task = state.tasks.create(Task::new(input, &user.email)).await?;

    log::info!("task {} added for {}", task.id, user.email);
    Ok(HttpResponse::Created().json(json!({
        "message": "Task Successfully Added",
        "data": task
    })))
}

/// Deletes one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: `{"status": "Task Deleted Successfully"}`.
/// - `404 Not Found`: the id is malformed or no task with this id belongs to
///   the caller.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let not_found = || AppError::NotFound("Invalid Email Or Taskid".into());
    let id = Uuid::parse_str(&task_id).map_err(|_| not_found())?;

    if !state.tasks.exists(id, &user.email).await? {
        return Err(not_found());
    }
    state.tasks.delete(id, &user.email).await?;

    log::info!("task {} deleted by {}", id, user.email);
    Ok(HttpResponse::Ok().json(json!({ "status": "Task Deleted Successfully" })))
}

/// Updates a task by id.
///
/// Only the fields present in the body are overwritten; `id` and the owner
/// email never change. The update is limited to the caller's own tasks unless
/// `unscoped_update` is enabled, in which case any task id is accepted.
///
/// ## Responses:
/// - `200 OK`: `{"status": "Task updated successfully"}`.
/// - `400 Bad Request`: a supplied text field is empty.
/// - `404 Not Found`: no matching task.
#[put("/update")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();
    request.validate()?;

    let owner = if state.compat.unscoped_update {
        None
    } else {
        Some(user.email.as_str())
    };

    let task = state
        .tasks
        .update(request.id, owner, &request.changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.email != user.email {
        log::warn!(
            "task {} owned by {} updated by {}",
            task.id,
            task.email,
            user.email
        );
    } else {
        log::info!("task {} updated by {}", task.id, user.email);
    }
    Ok(HttpResponse::Ok().json(json!({ "status": "Task updated successfully" })))
}

/// Lists every task owned by the caller.
///
/// ## Responses:
/// - `200 OK`: `{"status": [Task, ...]}`.
#[get("/all")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let tasks = state.tasks.list_by_owner(&user.email).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": tasks })))
}
