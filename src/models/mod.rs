pub mod task;
pub mod user;

pub use task::{
    NewTask, NewTaskRequest, Task, TaskChanges, TaskPriority, TaskStatus, UpdateTaskRequest,
};
pub use user::{NewUser, User};
