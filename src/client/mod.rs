//! Typed HTTP client for the todolist REST API.
//!
//! [`ApiClient`] wraps one request per endpoint and keeps the bearer token
//! obtained at login. The per-action state objects built on top of it live in
//! [`hooks`].

pub mod hooks;

use std::fmt;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{LoginRequest, RegisterRequest, TokenResponse};
use crate::models::{NewTaskRequest, Task, UpdateTaskRequest};

/// Errors returned by [`ApiClient`].
#[derive(Debug)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    Http(reqwest::Error),
    /// The server answered with an unexpected status.
    Api { status: StatusCode, message: String },
    /// A task endpoint was called before logging in.
    NotAuthenticated,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientError::Http(err) => write!(f, "Server Error: {}", err),
            ClientError::Api { message, .. } => write!(f, "{}", message),
            ClientError::NotAuthenticated => write!(f, "Not logged in"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Http(error)
    }
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            ClientError::NotAuthenticated => None,
        }
    }
}

/// `{"message": ...}` bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of a successful `POST /task/add`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddTaskResponse {
    pub message: String,
    pub data: Task,
}

#[derive(Debug, Deserialize)]
struct StatusResponse<T> {
    status: T,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// `POST /user/register`. Only `201 Created` counts as success; the
    /// server's `200 "All fields required"` answer is returned as an error.
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ClientError> {
        let response = self
            .request(Method::POST, "/user/register")
            .json(request)
            .send()
            .await?;
        if response.status() != StatusCode::CREATED {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// `POST /user/login`. Does not store the token; see [`hooks::LoginHook`].
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ClientError> {
        let response = self
            .request(Method::POST, "/user/login")
            .json(request)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn add_task(&self, request: &NewTaskRequest) -> Result<AddTaskResponse, ClientError> {
        let response = self
            .authorized(Method::POST, "/task/add")?
            .json(request)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.authorized(Method::GET, "/task/all")?.send().await?;
        let body: StatusResponse<Vec<Task>> = parse(response).await?;
        Ok(body.status)
    }

    pub async fn update_task(&self, request: &UpdateTaskRequest) -> Result<String, ClientError> {
        let response = self
            .authorized(Method::PUT, "/task/update")?
            .json(request)
            .send()
            .await?;
        let body: StatusResponse<String> = parse(response).await?;
        Ok(body.status)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<String, ClientError> {
        let path = format!("/task/{}", id);
        let response = self.authorized(Method::DELETE, &path)?.send().await?;
        let body: StatusResponse<String> = parse(response).await?;
        Ok(body.status)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json().await?)
}

/// Builds an error from a response, preferring the body's `error` or
/// `message` field over the bare status.
async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let body = response.json::<serde_json::Value>().await.ok();
    let message = body
        .as_ref()
        .and_then(|b| b.get("error").or_else(|| b.get("message")))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());

    ClientError::Api { status, message }
}
