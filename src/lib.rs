#![doc = "The `todolist` library crate."]
#![doc = ""]
#![doc = "A small task list service: users register and log in to obtain a bearer"]
#![doc = "token, then manage their own tasks over a JSON REST API. The crate also"]
#![doc = "ships a typed client (`client`) with one action object per user action."]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::config::{Compatibility, Config};
pub use crate::error::AppError;
pub use crate::state::AppState;
