//! Authentication status as reported by `GET /api/auth/status`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub credits: i64,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub reputation: i64,
}

/// Session slice of the application state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Auth status has not been fetched yet.
    #[default]
    Unknown,
    Anonymous,
    SignedIn(User),
}

impl From<AuthStatus> for SessionState {
    fn from(status: AuthStatus) -> Self {
        match (status.authenticated, status.user) {
            (true, Some(user)) => SessionState::SignedIn(user),
            _ => SessionState::Anonymous,
        }
    }
}
