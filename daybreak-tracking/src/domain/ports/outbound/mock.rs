//! Recording test doubles for the outbound ports.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use super::{TimeEntryReader, TimeEntryRemover, TimeEntryWriter, UserDirectory, WorkingSessionStore};
use crate::domain::{
    models::{
        LocationId, PauseInterval, SessionState, TimeEntry, TimeEntryFields, TimeEntryId, User,
        UserId, WorkingSession,
    },
    TimeTrackingError,
};

/// A call received by [`RecordingWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterCall {
    Add {
        actor: UserId,
        location: LocationId,
        employee: UserId,
        fields: TimeEntryFields,
        pauses: Vec<PauseInterval>,
    },
    Update {
        actor: UserId,
        location: LocationId,
        employee: UserId,
        entry_id: TimeEntryId,
        fields: TimeEntryFields,
        pauses: Vec<PauseInterval>,
    },
}

/// Writer that records every call and optionally fails them all.
#[derive(Clone, Default)]
pub struct RecordingWriter {
    project_billing: bool,
    calls: Arc<RwLock<Vec<WriterCall>>>,
    failure: Arc<RwLock<Option<TimeTrackingError>>>,
}

impl RecordingWriter {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn project_aware() -> Self {
        Self {
            project_billing: true,
            ..Self::default()
        }
    }

    pub fn failing_with(self, error: TimeTrackingError) -> Self {
        *self.failure.write().unwrap() = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<WriterCall> {
        self.calls.read().unwrap().clone()
    }

    fn outcome(&self) -> Result<(), TimeTrackingError> {
        match self.failure.read().unwrap().as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TimeEntryWriter for RecordingWriter {
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
        self.calls.write().unwrap().push(WriterCall::Add {
            actor: actor.id,
            location: *location,
            employee: *employee,
            fields: fields.clone(),
            pauses: pauses.to_vec(),
        });
        self.outcome()
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
        self.calls.write().unwrap().push(WriterCall::Update {
            actor: actor.id,
            location: *location,
            employee: *employee,
            entry_id: *entry_id,
            fields: fields.clone(),
            pauses: pauses.to_vec(),
        });
        self.outcome()
    }
}

/// Reader over a fixed set of entries.
#[derive(Clone, Default)]
pub struct StubReader {
    entries: Arc<RwLock<HashMap<TimeEntryId, TimeEntry>>>,
}

impl StubReader {
    pub fn with_entry(self, entry: TimeEntry) -> Self {
        self.entries.write().unwrap().insert(entry.id, entry);
        self
    }
}

#[async_trait]
impl TimeEntryReader for StubReader {
    async fn find_with_pauses(
        &self,
        location: &LocationId,
        entry_id: &TimeEntryId,
    ) -> Result<TimeEntry, TimeTrackingError> {
        self.entries
            .read()
            .unwrap()
            .get(entry_id)
            .filter(|entry| entry.location_id == *location)
            .cloned()
            .ok_or(TimeTrackingError::EntryNotFound(*entry_id))
    }
}

#[derive(Clone, Default)]
pub struct RecordingRemover {
    calls: Arc<RwLock<Vec<(UserId, LocationId, TimeEntryId)>>>,
    missing: Arc<RwLock<HashSet<TimeEntryId>>>,
}

impl RecordingRemover {
    pub fn with_missing(self, entry_id: TimeEntryId) -> Self {
        self.missing.write().unwrap().insert(entry_id);
        self
    }

    pub fn calls(&self) -> Vec<(UserId, LocationId, TimeEntryId)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl TimeEntryRemover for RecordingRemover {
    async fn remove(
        &self,
        actor: &User,
        location: &LocationId,
        entry_id: &TimeEntryId,
    ) -> Result<(), TimeTrackingError> {
        self.calls
            .write()
            .unwrap()
            .push((actor.id, *location, *entry_id));

        if self.missing.read().unwrap().contains(entry_id) {
            return Err(TimeTrackingError::EntryNotFound(*entry_id));
        }
        Ok(())
    }
}

/// User directory that bumps the revision on every refresh.
#[derive(Clone, Default)]
pub struct CountingUserDirectory {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl CountingUserDirectory {
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }

    pub fn refreshes(&self, user_id: &UserId) -> u64 {
        self.users
            .read()
            .unwrap()
            .get(user_id)
            .map(|user| user.revision)
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserDirectory for CountingUserDirectory {
    async fn fresh(&self, user_id: &UserId) -> Result<User, TimeTrackingError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(user_id)
            .ok_or(TimeTrackingError::UserNotFound(*user_id))?;
        user.revision += 1;
        Ok(user.clone())
    }
}

/// Session store with a fixed table of allowed `(from, to)` transitions.
#[derive(Clone, Default)]
pub struct ScriptedSessionStore {
    status: Arc<RwLock<Option<SessionState>>>,
    allowed: Arc<HashSet<(String, String)>>,
    fresh_calls: Arc<RwLock<usize>>,
}

impl ScriptedSessionStore {
    pub fn new(status: &str, allowed: &[(&str, &str)]) -> Self {
        Self {
            status: Arc::new(RwLock::new(Some(SessionState::from(status)))),
            allowed: Arc::new(
                allowed
                    .iter()
                    .map(|(from, to)| (from.to_string(), to.to_string()))
                    .collect(),
            ),
            fresh_calls: Arc::default(),
        }
    }

    pub fn end_session(&self) {
        *self.status.write().unwrap() = None;
    }

    pub fn status(&self) -> Option<SessionState> {
        self.status.read().unwrap().clone()
    }

    pub fn fresh_calls(&self) -> usize {
        *self.fresh_calls.read().unwrap()
    }

    fn knows(&self, label: &str) -> bool {
        self.allowed
            .iter()
            .any(|(from, to)| from == label || to == label)
    }
}

#[async_trait]
impl WorkingSessionStore for ScriptedSessionStore {
    async fn resolve_state(&self, _session: &WorkingSession, label: &str) -> Option<SessionState> {
        self.knows(label).then(|| SessionState::from(label))
    }

    async fn can_transition_to(&self, _session: &WorkingSession, state: &SessionState) -> bool {
        match self.status.read().unwrap().as_ref() {
            Some(current) => self
                .allowed
                .contains(&(current.as_str().to_string(), state.as_str().to_string())),
            None => false,
        }
    }

    async fn transition_to(
        &self,
        _session: &WorkingSession,
        state: &SessionState,
    ) -> Result<(), TimeTrackingError> {
        let mut status = self.status.write().unwrap();
        match status.as_mut() {
            Some(current) => {
                *current = state.clone();
                Ok(())
            }
            None => Err(TimeTrackingError::SessionNotFound),
        }
    }

    async fn fresh(&self, session: &WorkingSession) -> Result<WorkingSession, TimeTrackingError> {
        *self.fresh_calls.write().unwrap() += 1;
        let status = self
            .status
            .read()
            .unwrap()
            .clone()
            .ok_or(TimeTrackingError::SessionNotFound)?;
        Ok(WorkingSession {
            status,
            ..session.clone()
        })
    }
}
