use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Duration, Utc};

use crate::error::AppError;

/// Work factors bcrypt accepts.
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Process configuration, read from the environment at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    /// The single cross-origin client allowed to call the API.
    pub cors_origin: String,
    pub jwt_secret: String,
    /// Lifetime of issued tokens, from `JWT_TTL_HOURS`.
    pub jwt_ttl: Duration,
    pub bcrypt_cost: u32,
    pub compat: Compatibility,
}

/// Switches that restore historical behaviour of the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compatibility {
    /// Answer a register request with missing fields with 400 instead of the
    /// historical 200.
    pub strict_register_status: bool,
    /// Let any authenticated caller update any task by id.
    pub unscoped_update: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::Configuration("JWT_SECRET must be set".into()))?;
        if jwt_secret.is_empty() {
            return Err(AppError::Configuration("JWT_SECRET must not be empty".into()));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            server_port: parse_var("SERVER_PORT", 3000)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_secret,
            jwt_ttl: token_ttl(parse_var("JWT_TTL_HOURS", 24)?)?,
            bcrypt_cost: bcrypt_cost(parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?)?,
            compat: Compatibility {
                strict_register_status: parse_var("TODOLIST_STRICT_REGISTER_STATUS", false)?,
                unscoped_update: parse_var("TODOLIST_UNSCOPED_UPDATE", false)?,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// The lifetime must be positive and leave a representable expiry time.
fn token_ttl(hours: i64) -> Result<Duration, AppError> {
    let invalid = || {
        AppError::Configuration(format!(
            "JWT_TTL_HOURS must be a positive number of hours, got {}",
            hours
        ))
    };
    if hours <= 0 {
        return Err(invalid());
    }
    let ttl = Duration::try_hours(hours).ok_or_else(invalid)?;
    Utc::now().checked_add_signed(ttl).ok_or_else(invalid)?;
    Ok(ttl)
}

fn bcrypt_cost(cost: u32) -> Result<u32, AppError> {
    if !BCRYPT_COST_RANGE.contains(&cost) {
        return Err(AppError::Configuration(format!(
            "BCRYPT_COST must be between {} and {}, got {}",
            BCRYPT_COST_RANGE.start(),
            BCRYPT_COST_RANGE.end(),
            cost
        )));
    }
    Ok(cost)
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
