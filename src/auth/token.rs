use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::User;

/// Represents the claims encoded within an issued bearer token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Email of the user the token was issued to.
    pub email: String,
    pub name: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies HS256 tokens.
///
/// Cheap to clone; the keys are shared.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    ttl: Duration,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            ttl,
        }
    }

    /// Generates a token embedding the user's email and name.
    ///
    /// # Returns
    /// The encoded token, or `AppError::InternalServerError` if encoding fails.
    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::InternalServerError("Token lifetime overflow".into()))?;

        let claims = Claims {
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and returns its claims.
    ///
    /// Returns `AppError::Unauthorized` if the token is malformed, signed with
    /// another key or expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.keys.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            email: "token@example.com".to_string(),
            name: "Token".to_string(),
            password_hash: String::new(),
        }
    }

    #[test]
    fn test_token_generation_and_verification() {
        let service = TokenService::new("test_secret_for_gen_verify", Duration::hours(24));
        let token = service.create_token(&user()).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.email, "token@example.com");
        assert_eq!(claims.name, "Token");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_expiration() {
        let service = TokenService::new("test_secret_for_expiration", Duration::hours(24));
        let issued = Utc::now() - Duration::hours(3);
        let claims = Claims {
            email: "token@example.com".to_string(),
            name: "Token".to_string(),
            iat: issued.timestamp() as usize,
            exp: (issued + Duration::hours(1)).timestamp() as usize,
        };
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_for_expiration".as_bytes()),
        )
        .unwrap();

        match service.verify(&expired) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("ExpiredSignature"), "{}", msg),
            other => panic!("Token should have been rejected as expired, got {:?}", other),
        }
    }

    #[test]
    fn test_forged_token_is_rejected() {
        let issuer = TokenService::new("attacker_secret", Duration::hours(1));
        let forged = issuer.create_token(&user()).unwrap();

        let service = TokenService::new("server_secret", Duration::hours(1));
        match service.verify(&forged) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("InvalidSignature"), "{}", msg),
            other => panic!("Forged token should have been rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new("server_secret", Duration::hours(1));
        assert!(matches!(
            service.verify("not.a.token"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
