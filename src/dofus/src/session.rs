//! Signed-in user.
//!
//! Everything the tools persist is scoped by the user id, which serves
//! as the storage namespace.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// Storage namespace of this session
    pub fn namespace(&self) -> &str {
        &self.user.id
    }

    pub fn display_name(&self) -> &str {
        self.user
            .name
            .as_deref()
            .or(self.user.email.as_deref())
            .unwrap_or(&self.user.id)
    }
}
