//! # User Client
//!
//! High-level API for the `User` actor. Every method hands back the public
//! [`User`] profile; stored password digests stay inside the actor.

use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{User, UserCreate, UserId, UserRecord, UserUpdate};
use crate::user_actor::{UserAction, UserError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<UserRecord>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<UserRecord>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<UserRecord> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<UserRecord> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            FrameworkError::Conflict(id) => UserError::EmailTaken(id),
            FrameworkError::Storage(e) => UserError::Storage(e.to_string()),
            other => other
                .into_entity_error::<UserError>()
                .unwrap_or_else(|e| UserError::ActorCommunication(e.to_string())),
        }
    }
}

impl UserClient {
    /// Create an account. Fails with `EmailTaken` if the email is in use in any case.
    #[instrument(skip(self))]
    pub async fn register(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        let email = params.email.clone();
        let id = self.inner.create(params).await.map_err(|e| match e {
            FrameworkError::Conflict(_) => UserError::EmailTaken(email),
            other => Self::map_error(other),
        })?;
        self.get_profile(&id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    /// Check credentials. Unknown email and wrong password fail the same way.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, UserError> {
        let wanted = email.trim().to_string();
        let found = self
            .inner
            .query(Filter::new(move |r: &UserRecord| {
                r.profile.email.eq_ignore_ascii_case(&wanted)
            }))
            .await
            .map_err(Self::map_error)?;
        let Some(record) = found.into_iter().next() else {
            return Err(UserError::AuthenticationFailed);
        };
        let action = UserAction::Authenticate {
            password: password.to_string(),
        };
        self.inner
            .perform_action(record.profile.id, action)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.get(id.clone()).await?.map(|record| record.profile))
    }

    #[instrument(skip(self))]
    pub async fn update_profile(&self, id: &UserId, update: UserUpdate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner
            .update(id.clone(), update)
            .await
            .map(|record| record.profile)
            .map_err(Self::map_error)
    }
}
