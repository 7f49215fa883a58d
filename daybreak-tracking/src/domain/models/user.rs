use serde::{Deserialize, Serialize};

use super::{LocationId, UserId};

/// Snapshot of the acting user as last read from the user store.
///
/// `revision` is bumped by the store whenever data derived from the user's
/// entries changes, so callers can tell a refreshed snapshot from a stale one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub current_location: LocationId,
    pub revision: u64,
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        current_location: impl Into<LocationId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_location: current_location.into(),
            revision: 0,
        }
    }
}
