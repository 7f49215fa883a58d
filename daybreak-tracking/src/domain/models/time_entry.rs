use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{LocationId, ProjectId, TimeEntryId, UserId};

/// Project attribution carried by an entry when project billing is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    pub project_id: Option<ProjectId>,
    pub billable: bool,
}

impl Default for ProjectFields {
    fn default() -> Self {
        Self {
            project_id: None,
            billable: true,
        }
    }
}

impl ProjectFields {
    pub fn for_project(project_id: impl Into<ProjectId>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }

    pub fn non_billable(mut self) -> Self {
        self.billable = false;
        self
    }
}

/// A break inside an entry, as absolute timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseInterval {
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
}

impl PauseInterval {
    pub fn new(starts_at: OffsetDateTime, ends_at: OffsetDateTime) -> Self {
        Self { starts_at, ends_at }
    }
}

/// A persisted time-tracking record with its breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: TimeEntryId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
    pub description: Option<String>,
    pub project: Option<ProjectFields>,
    pub pauses: Vec<PauseInterval>,
}

impl TimeEntry {
    pub fn new(
        id: impl Into<TimeEntryId>,
        user_id: impl Into<UserId>,
        location_id: impl Into<LocationId>,
        starts_at: OffsetDateTime,
        ends_at: OffsetDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            location_id: location_id.into(),
            starts_at,
            ends_at,
            description: None,
            project: None,
            pauses: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_project(mut self, project: ProjectFields) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_pause(mut self, pause: PauseInterval) -> Self {
        self.pauses.push(pause);
        self
    }
}

/// Form fields that pass through to the write service untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryAttributes {
    pub description: Option<String>,
    #[serde(flatten)]
    pub project: Option<ProjectFields>,
}

/// Payload handed to the write services: absolute span plus attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntryFields {
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
    #[serde(flatten)]
    pub attributes: EntryAttributes,
}
