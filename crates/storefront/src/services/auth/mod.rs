//! Authentication service.
//!
//! Username and password accounts. Passwords are hashed with Argon2id.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::instrument;

use nepal_clothing_core::{UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user and their customer profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    #[instrument(skip(self, password, confirmation))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;

        if password != confirmation {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(password, &username)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create_with_customer(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the user no longer exists.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate password meets requirements.
fn validate_password(password: &str, username: &Username) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword(
            "This password is entirely numeric.".to_owned(),
        ));
    }

    if password.eq_ignore_ascii_case(username.as_str()) {
        return Err(AuthError::WeakPassword(
            "The password is too similar to the username.".to_owned(),
        ));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn name(s: &str) -> Username {
        Username::parse(s).unwrap()
    }

    #[test]
    fn test_validate_password_too_short() {
        let err = validate_password("abc123", &name("sita")).unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[test]
    fn test_validate_password_entirely_numeric() {
        let err = validate_password("1234567890", &name("sita")).unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(ref m) if m.contains("numeric")));
    }

    #[test]
    fn test_validate_password_same_as_username() {
        let err = validate_password("Sita.Sharma", &name("sita.sharma")).unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(ref m) if m.contains("username")));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("himalaya-2024", &name("sita")).is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("himalaya-2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("himalaya-2024", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_user_facing_errors() {
        assert!(AuthError::PasswordMismatch.is_user_facing());
        assert!(AuthError::UserAlreadyExists.is_user_facing());
        assert!(!AuthError::PasswordHash.is_user_facing());
    }
}
