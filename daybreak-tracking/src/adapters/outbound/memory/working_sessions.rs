use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    models::{SessionState, WorkingSession},
    ports::outbound::WorkingSessionStore,
    TimeTrackingError,
};

/// In-memory sessions driven by a caller-supplied transition table.
#[derive(Clone)]
pub struct InMemoryWorkingSessions {
    sessions: Arc<RwLock<HashMap<i32, WorkingSession>>>,
    transitions: Arc<HashMap<SessionState, HashSet<SessionState>>>,
}

impl InMemoryWorkingSessions {
    pub fn new<'a>(transitions: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut table: HashMap<SessionState, HashSet<SessionState>> = HashMap::new();
        for (from, to) in transitions {
            table.entry(from.into()).or_default().insert(to.into());
            table.entry(to.into()).or_default();
        }

        Self {
            sessions: Arc::default(),
            transitions: Arc::new(table),
        }
    }

    pub async fn insert(&self, session: WorkingSession) {
        self.sessions.write().await.insert(session.id, session);
    }

    pub async fn remove(&self, session_id: i32) {
        self.sessions.write().await.remove(&session_id);
    }
}

#[async_trait]
impl WorkingSessionStore for InMemoryWorkingSessions {
    async fn resolve_state(&self, _session: &WorkingSession, label: &str) -> Option<SessionState> {
        let state = SessionState::from(label);
        self.transitions.contains_key(&state).then_some(state)
    }

    async fn can_transition_to(&self, session: &WorkingSession, state: &SessionState) -> bool {
        let sessions = self.sessions.read().await;
        let Some(current) = sessions.get(&session.id) else {
            return false;
        };

        self.transitions
            .get(&current.status)
            .is_some_and(|targets| targets.contains(state))
    }

    async fn transition_to(
        &self,
        session: &WorkingSession,
        state: &SessionState,
    ) -> Result<(), TimeTrackingError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&session.id)
            .ok_or(TimeTrackingError::SessionNotFound)?;
        stored.status = state.clone();
        Ok(())
    }

    async fn fresh(&self, session: &WorkingSession) -> Result<WorkingSession, TimeTrackingError> {
        self.sessions
            .read()
            .await
            .get(&session.id)
            .cloned()
            .ok_or(TimeTrackingError::SessionNotFound)
    }
}
