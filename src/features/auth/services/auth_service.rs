use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{RegisterDto, UserResponseDto};
use crate::features::auth::models::User;
use crate::modules::store::{DynCollection, Filter, Stored};

/// Identity service: registration and credential verification against the
/// user collection.
pub struct AuthService {
    users: DynCollection<User>,
}

impl AuthService {
    pub fn new(users: DynCollection<User>) -> Self {
        Self { users }
    }

    fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal("Failed to hash password".to_string()))?
            .to_string();

        Ok(hash)
    }

    fn verify_password(stored_hash: &str, candidate: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// Create a user account.
    ///
    /// Email uniqueness is not enforced: registering twice with the same
    /// email creates two records. Known gap carried over from the data
    /// model, not a feature.
    pub async fn register(&self, dto: RegisterDto) -> Result<Stored<User>> {
        let user = User {
            name: dto.name,
            email: dto.email,
            password_hash: Self::hash_password(&dto.password)?,
            role: dto.role,
            created_at: Utc::now(),
        };

        let stored = self.users.insert(user).await?;
        info!("User registered: id={}, role={}", stored.id, stored.doc.role);

        Ok(stored)
    }

    /// Verify credentials. Both an unknown email and a hash mismatch yield
    /// the same unauthorized error; the caller learns nothing about which.
    pub async fn login(&self, email: &str, password: &str) -> Result<Stored<User>> {
        let user = self
            .users
            .find_one(&Filter::new().eq("email", email))
            .await?;

        match user {
            Some(stored) if Self::verify_password(&stored.doc.password_hash, password) => {
                info!("Login succeeded: id={}", stored.id);
                Ok(stored)
            }
            _ => Err(AppError::Unauthorized("Invalid credentials".to_string())),
        }
    }

    pub fn to_response(stored: &Stored<User>) -> UserResponseDto {
        UserResponseDto {
            id: stored.id.to_string(),
            name: stored.doc.name.clone(),
            email: stored.doc.email.clone(),
            role: stored.doc.role,
            created_at: stored.doc.created_at,
        }
    }
}
