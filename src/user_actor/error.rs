//! Error types for the User actor.

use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    /// The requested user was not found.
    #[error("User not found: {0}")]
    NotFound(String),

    /// Another account already uses this email (compared case-insensitively).
    #[error("Email already exists: {0}")]
    EmailTaken(String),

    /// Unknown email or wrong password. Deliberately not told apart.
    #[error("Invalid email or password")]
    AuthenticationFailed,

    /// The user data provided is invalid.
    #[error("User validation error: {0}")]
    Validation(String),

    /// The users table could not be read or written.
    #[error("User storage error: {0}")]
    Storage(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
