pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Payload of `POST /user/register`.
///
/// Fields are optional so that a missing field is answered with the
/// "All fields required" message instead of a JSON parse error.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
}

/// A registration with every field present.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    pub fn into_registration(self) -> Option<Registration> {
        if self.validate().is_err() {
            return None;
        }
        Some(Registration {
            email: self.email?,
            password: self.password?,
            name: self.name?,
        })
    }
}

/// Payload of `POST /user/login`.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(email, password)` if both are present and non-empty.
    pub fn into_credentials(self) -> Option<(String, String)> {
        if self.validate().is_err() {
            return None;
        }
        Some((self.email?, self.password?))
    }
}

/// Response of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
