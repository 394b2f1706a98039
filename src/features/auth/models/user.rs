use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_CONSUMER, ROLE_CREATOR};

/// User role. Creators upload media, consumers search and browse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Consumer,
    Creator,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Consumer => write!(f, "{}", ROLE_CONSUMER),
            UserRole::Creator => write!(f, "{}", ROLE_CREATOR),
        }
    }
}

/// User account document. Created on registration, immutable thereafter,
/// never deleted. The password is only ever stored as a salted hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
