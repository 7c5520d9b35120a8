//! Registered users.

use super::UserAlias;
use serde::{Deserialize, Serialize};

/// A registered user, keyed by alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    alias: UserAlias,
    name: String,
}

impl User {
    /// Creates a user record.
    #[must_use]
    pub fn new(alias: UserAlias, name: impl Into<String>) -> Self {
        Self {
            alias,
            name: name.into(),
        }
    }

    /// Returns the user's alias.
    #[must_use]
    pub const fn alias(&self) -> &UserAlias {
        &self.alias
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
