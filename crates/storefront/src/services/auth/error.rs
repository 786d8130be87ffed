//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] nepal_clothing_core::UsernameError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("a user with that username already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("{0}")]
    WeakPassword(String),

    /// Password and confirmation differ.
    #[error("the two password fields didn't match")]
    PasswordMismatch,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether the error is caused by user input and can be shown on the form.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Repository(_) | Self::PasswordHash)
    }
}
