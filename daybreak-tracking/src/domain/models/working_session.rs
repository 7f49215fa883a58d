use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Opaque reference to a status of the working-session state machine.
///
/// The states themselves are owned by the session store; this crate only
/// passes them back and forth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionState(String);

impl SessionState {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionState {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A user's currently active working session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSession {
    pub id: i32,
    pub user_id: UserId,
    pub status: SessionState,
}

impl WorkingSession {
    pub fn new(id: i32, user_id: impl Into<UserId>, status: impl Into<SessionState>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            status: status.into(),
        }
    }
}
