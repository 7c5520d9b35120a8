//! User registration.

use super::{TrackerError, TrackerResult};
use crate::tracker::{
    domain::{User, UserAlias},
    ports::TrackerStore,
};
use std::sync::Arc;
use tracing::Level;

/// Request payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    alias: String,
    name: String,
}

impl RegisterUserRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            name: name.into(),
        }
    }
}

/// Registers users under unique aliases.
#[derive(Clone)]
pub struct UserRegistrationService<S>
where
    S: TrackerStore,
{
    store: Arc<S>,
}

impl<S> UserRegistrationService<S>
where
    S: TrackerStore,
{
    /// Creates a new registration service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Registers a user and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidValue`] for a blank alias and
    /// [`TrackerError::DuplicateKey`] when the alias is already registered;
    /// the existing user is left untouched.
    #[tracing::instrument(
        name = "register_user",
        skip(self, request),
        fields(alias = %request.alias),
        err(level = Level::DEBUG)
    )]
    pub async fn register(&self, request: RegisterUserRequest) -> TrackerResult<User> {
        let user = User::new(UserAlias::new(request.alias)?, request.name);
        let registered = self
            .store
            .atomically(move |tx| -> TrackerResult<User> {
                if tx.find_user(user.alias())?.is_some() {
                    return Err(TrackerError::DuplicateKey(user.alias().clone()));
                }
                tx.insert_user(&user)?;
                Ok(user)
            })
            .await?;
        tracing::info!(alias = %registered.alias(), "user registered");
        Ok(registered)
    }
}
