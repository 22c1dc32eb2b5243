use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account. The email is the primary key and also the owner key
/// stored on every task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Fields needed to create a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl From<NewUser> for User {
    fn from(new_user: NewUser) -> Self {
        Self {
            email: new_user.email,
            name: new_user.name,
            password_hash: new_user.password_hash,
        }
    }
}
