//! [`ActorEntity`] implementation for [`UserRecord`].
//!
//! Registration hashes the password here, inside the actor, so plaintext never
//! reaches the table and digests never leave it.

use super::password;
use super::UserError;
use crate::framework::ActorEntity;
use crate::model::{User, UserCreate, UserId, UserRecord, UserUpdate};
use async_trait::async_trait;
use std::fmt;

/// Operations on an account beyond profile edits.
pub enum UserAction {
    /// Check a password; yields the profile on success.
    Authenticate { password: String },
}

impl fmt::Debug for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserAction::Authenticate { .. } => f.write_str("Authenticate { .. }"),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), UserError> {
    if value.trim().is_empty() {
        return Err(UserError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for UserRecord {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = UserAction;
    type ActionResult = User;
    type Context = ();
    type Error = UserError;

    fn id(&self) -> &UserId {
        &self.profile.id
    }

    fn assign_id(params: &UserCreate) -> UserId {
        params.id.clone().unwrap_or_else(UserId::generate)
    }

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, UserError> {
        require("password", &params.password)?;
        let salt = password::new_salt();
        let password_hash = password::digest(&salt, &params.password);
        Ok(Self {
            profile: User {
                id,
                name: params.name.trim().to_string(),
                email: params.email.trim().to_string(),
                role: params.role,
                avatar: params.avatar,
            },
            password_hash,
            salt,
        })
    }

    fn validate(&self) -> Result<(), UserError> {
        require("name", &self.profile.name)?;
        require("email", &self.profile.email)?;
        if !self.profile.email.contains('@') {
            return Err(UserError::Validation(format!(
                "invalid email: {}",
                self.profile.email
            )));
        }
        if self.password_hash.is_empty() {
            return Err(UserError::Validation("missing password digest".into()));
        }
        Ok(())
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.profile
            .email
            .eq_ignore_ascii_case(&other.profile.email)
    }

    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), UserError> {
        if let Some(name) = update.name {
            self.profile.name = name.trim().to_string();
        }
        if let Some(avatar) = update.avatar {
            self.profile.avatar = avatar;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: UserAction, _ctx: &()) -> Result<User, UserError> {
        match action {
            UserAction::Authenticate { password: candidate } => {
                if password::verify(&self.salt, &candidate, &self.password_hash) {
                    Ok(self.profile.clone())
                } else {
                    Err(UserError::AuthenticationFailed)
                }
            }
        }
    }
}
