use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::InMemoryUserDirectory;
use crate::domain::{
    models::{LocationId, PauseInterval, TimeEntry, TimeEntryFields, TimeEntryId, User, UserId},
    ports::outbound::{TimeEntryReader, TimeEntryRemover, TimeEntryWriter},
    TimeTrackingError, ValidationErrors,
};

#[derive(Default)]
struct Store {
    entries: BTreeMap<TimeEntryId, TimeEntry>,
    last_id: i32,
}

/// In-memory time entry store.
///
/// Plays the part of the persistence services: it loads and removes entries
/// and hands out the plain and project-aware writers, both of which validate
/// the payload before storing anything.
#[derive(Clone)]
pub struct InMemoryTimeTracking {
    store: Arc<RwLock<Store>>,
    users: InMemoryUserDirectory,
}

impl InMemoryTimeTracking {
    pub fn new(users: InMemoryUserDirectory) -> Self {
        Self {
            store: Arc::default(),
            users,
        }
    }

    /// Store an entry as-is, keeping its id.
    pub async fn insert(&self, entry: TimeEntry) {
        let mut store = self.store.write().await;
        store.last_id = store.last_id.max(entry.id.as_i32());
        store.entries.insert(entry.id, entry);
    }

    pub async fn get(&self, entry_id: &TimeEntryId) -> Option<TimeEntry> {
        self.store.read().await.entries.get(entry_id).cloned()
    }

    /// Entries of a location, newest first.
    pub async fn latest(&self, location: &LocationId) -> Vec<TimeEntry> {
        let store = self.store.read().await;
        let mut entries: Vec<TimeEntry> = store
            .entries
            .values()
            .filter(|entry| entry.location_id == *location)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));
        entries
    }

    pub fn plain_writer(&self) -> InMemoryTimeEntryWriter {
        InMemoryTimeEntryWriter {
            tracking: self.clone(),
            project_billing: false,
        }
    }

    pub fn project_writer(&self) -> InMemoryTimeEntryWriter {
        InMemoryTimeEntryWriter {
            tracking: self.clone(),
            project_billing: true,
        }
    }

    async fn touch(&self, actor: &UserId, employee: &UserId) {
        self.users.touch(actor).await;
        if employee != actor {
            self.users.touch(employee).await;
        }
    }
}

#[async_trait]
impl TimeEntryReader for InMemoryTimeTracking {
    async fn find_with_pauses(
        &self,
        location: &LocationId,
        entry_id: &TimeEntryId,
    ) -> Result<TimeEntry, TimeTrackingError> {
        self.store
            .read()
            .await
            .entries
            .get(entry_id)
            .filter(|entry| entry.location_id == *location)
            .cloned()
            .ok_or(TimeTrackingError::EntryNotFound(*entry_id))
    }
}

#[async_trait]
impl TimeEntryRemover for InMemoryTimeTracking {
    async fn remove(
        &self,
        actor: &User,
        location: &LocationId,
        entry_id: &TimeEntryId,
    ) -> Result<(), TimeTrackingError> {
        let removed = {
            let mut store = self.store.write().await;
            let in_location = store
                .entries
                .get(entry_id)
                .is_some_and(|entry| entry.location_id == *location);
            if in_location {
                store.entries.remove(entry_id)
            } else {
                None
            }
        };
        let entry = removed.ok_or(TimeTrackingError::EntryNotFound(*entry_id))?;

        self.touch(&actor.id, &entry.user_id).await;
        Ok(())
    }
}

/// Writer over [`InMemoryTimeTracking`]; the plain variant drops project fields.
#[derive(Clone)]
pub struct InMemoryTimeEntryWriter {
    tracking: InMemoryTimeTracking,
    project_billing: bool,
}

impl InMemoryTimeEntryWriter {
    fn validate(
        &self,
        fields: &TimeEntryFields,
        pauses: &[PauseInterval],
    ) -> Result<(), TimeTrackingError> {
        let mut errors = ValidationErrors::new();

        if fields.ends_at <= fields.starts_at {
            errors.add("ends_at", "The end must be after the start.");
        }

        for (index, pause) in pauses.iter().enumerate() {
            let field = format!("pauses.{index}");
            if pause.ends_at <= pause.starts_at {
                errors.add(&field, "The pause must end after it starts.");
            } else if pause.starts_at < fields.starts_at || pause.ends_at > fields.ends_at {
                errors.add(&field, "The pause must lie within the time tracking.");
            } else if pauses[..index]
                .iter()
                .any(|other| pause.starts_at < other.ends_at && other.starts_at < pause.ends_at)
            {
                errors.add(&field, "Pauses must not overlap.");
            }
        }

        if self.project_billing {
            let has_project = fields
                .attributes
                .project
                .as_ref()
                .is_some_and(|project| project.project_id.is_some());
            if !has_project {
                errors.add("project_id", "A project is required.");
            }
        }

        errors.into_result()
    }

    fn build_entry(
        &self,
        entry_id: TimeEntryId,
        location: &LocationId,
        employee: &UserId,
        fields: &TimeEntryFields,
        pauses: &[PauseInterval],
    ) -> TimeEntry {
        TimeEntry {
            id: entry_id,
            user_id: *employee,
            location_id: *location,
            starts_at: fields.starts_at,
            ends_at: fields.ends_at,
            description: fields.attributes.description.clone(),
            project: if self.project_billing {
                fields.attributes.project.clone()
            } else {
                None
            },
            pauses: pauses.to_vec(),
        }
    }

    async fn ensure_employee(&self, employee: &UserId) -> Result<(), TimeTrackingError> {
        if self.tracking.users.contains(employee).await {
            Ok(())
        } else {
            Err(TimeTrackingError::UserNotFound(*employee))
        }
    }
}

#[async_trait]
impl TimeEntryWriter for InMemoryTimeEntryWriter {
    fn project_billing(&self) -> bool {
        self.project_billing
    }

    async fn add(
        &self,
        actor: &User,
        location: &LocationId,
        employee: &UserId,
        fields: &TimeEntryFields,
        pauses: &[PauseInterval],
    ) -> Result<(), TimeTrackingError> {
        self.ensure_employee(employee).await?;
        self.validate(fields, pauses)?;

        {
            let mut store = self.tracking.store.write().await;
            let next_id = store
                .last_id
                .checked_add(1)
                .ok_or_else(|| TimeTrackingError::unknown("time entry ids exhausted"))?;
            store.last_id = next_id;
            let entry_id = TimeEntryId::new(next_id);
            let entry = self.build_entry(entry_id, location, employee, fields, pauses);
            store.entries.insert(entry_id, entry);
        }

        self.tracking.touch(&actor.id, employee).await;
        Ok(())
    }

    async fn update(
        &self,
        actor: &User,
        location: &LocationId,
        employee: &UserId,
        entry_id: &TimeEntryId,
        fields: &TimeEntryFields,
        pauses: &[PauseInterval],
    ) -> Result<(), TimeTrackingError> {
        self.ensure_employee(employee).await?;
        self.validate(fields, pauses)?;

        {
            let mut store = self.tracking.store.write().await;
            let exists = store
                .entries
                .get(entry_id)
                .is_some_and(|entry| entry.location_id == *location);
            if !exists {
                return Err(TimeTrackingError::EntryNotFound(*entry_id));
            }
            let entry = self.build_entry(*entry_id, location, employee, fields, pauses);
            store.entries.insert(*entry_id, entry);
        }

        self.tracking.touch(&actor.id, employee).await;
        Ok(())
    }
}
