use crate::{
    auth::{hash_password, verify_password, LoginRequest, RegisterRequest, TokenResponse},
    error::AppError,
    models::NewUser,
    state::AppState,
};
use actix_web::{post, web, HttpResponse};
use serde_json::json;

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: `{"message": "User Successfully Registered"}`.
/// - `200 OK`: `{"message": "All fields required"}` when `email`, `password` or
///   `name` is missing. Clients have long relied on this status; it becomes
///   `400 Bad Request` when `strict_register_status` is enabled.
/// - `409 Conflict`: the email is already registered.
/// - `500 Internal Server Error`: hashing or store failure.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(registration) = payload.into_inner().into_registration() else {
        let body = json!({ "message": "All fields required" });
        let response = if state.compat.strict_register_status {
            HttpResponse::BadRequest().json(body)
        } else {
            HttpResponse::Ok().json(body)
        };
        return Ok(response);
    };

    if state.users.exists(&registration.email).await? {
        return Err(AppError::Conflict("Email already exists".into()));
    }

    // bcrypt is CPU bound; keep it off the worker thread.
    let (password, cost) = (registration.password, state.bcrypt_cost);
    let password_hash = web::block(move || hash_password(&password, cost)).await??;

    // A concurrent registration can still win between the check above and
    // this insert; the store reports that as a conflict too.
    state
        .users
        .create(NewUser {
            email: registration.email.clone(),
            name: registration.name,
            password_hash,
        })
        .await?;

    log::info!("registered user {}", registration.email);
    Ok(HttpResponse::Created().json(json!({ "message": "User Successfully Registered" })))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{"token": "..."}`.
/// - `400 Bad Request`: a field is missing, or the credentials are invalid.
/// - `500 Internal Server Error`: store or token failure.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let (email, password) = payload
        .into_inner()
        .into_credentials()
        .ok_or_else(|| AppError::BadRequest("All fields required".into()))?;

    let invalid = || AppError::BadRequest("Invalid Credentials".into());

    let user = state.users.find_by_email(&email).await?.ok_or_else(invalid)?;
    let password_hash = user.password_hash.clone();
    if !web::block(move || verify_password(&password, &password_hash)).await?? {
        log::warn!("failed login for {}", email);
        return Err(invalid());
    }

    let token = state.tokens.create_token(&user)?;
    log::info!("user {} logged in", email);
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
