use crate::core::error::FixtureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account status of a registered user.
///
/// An unregistered user has no status at all: it is simply absent from the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
}

impl UserStatus {
    pub const ALL: [UserStatus; 2] = [UserStatus::Active, UserStatus::Blocked];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "blocked" => Ok(UserStatus::Blocked),
            other => Err(FixtureError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique within a store
    pub login: String,
    pub password: String,
    pub status: UserStatus,
}

impl User {
    pub fn new(login: impl Into<String>, password: impl Into<String>, status: UserStatus) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            status,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.status == UserStatus::Blocked
    }
}
