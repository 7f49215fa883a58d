use std::sync::Arc;

use tracing::instrument;

use crate::domain::{
    models::WorkingSession, ports::outbound::WorkingSessionStore, TimeTrackingError,
};

/// Best-effort status changes on a user's working session.
pub struct WorkingSessionBridge {
    store: Arc<dyn WorkingSessionStore>,
}

impl WorkingSessionBridge {
    pub fn new(store: Arc<dyn WorkingSessionStore>) -> Self {
        Self { store }
    }

    /// Try to move the session to `target` and return the re-read session.
    ///
    /// A target that cannot be resolved, or that the current status does not
    /// allow, is skipped without error. The session is re-read either way.
    #[instrument(
        name = "WorkingSessionBridge::transition",
        skip(self, session),
        fields(session = session.id, from = %session.status)
    )]
    pub async fn transition(
        &self,
        session: &WorkingSession,
        target: &str,
    ) -> Result<WorkingSession, TimeTrackingError> {
        match self.store.resolve_state(session, target).await {
            Some(state) => {
                if self.store.can_transition_to(session, &state).await {
                    self.store.transition_to(session, &state).await?;
                    tracing::info!(to = %state, "working session transitioned");
                } else {
                    tracing::warn!(to = %state, "working session transition not allowed");
                }
            }
            None => tracing::warn!("unknown working session state"),
        }

        self.store.fresh(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{models::SessionState, ports::outbound::mock::ScriptedSessionStore};

    const TRANSITIONS: [(&str, &str); 3] = [
        ("clocked_out", "clocked_in"),
        ("clocked_in", "paused"),
        ("paused", "clocked_in"),
    ];

    fn session() -> WorkingSession {
        WorkingSession::new(1, 5, "clocked_in")
    }

    #[tokio::test]
    async fn allowed_transition_is_performed() {
        let store = ScriptedSessionStore::new("clocked_in", &TRANSITIONS);
        let bridge = WorkingSessionBridge::new(Arc::new(store.clone()));

        let refreshed = bridge.transition(&session(), "paused").await.unwrap();

        assert_eq!(refreshed.status, SessionState::from("paused"));
        assert_eq!(store.fresh_calls(), 1);
    }

    #[tokio::test]
    async fn disallowed_transition_is_a_silent_noop() {
        let store = ScriptedSessionStore::new("clocked_in", &TRANSITIONS);
        let bridge = WorkingSessionBridge::new(Arc::new(store.clone()));

        let refreshed = bridge.transition(&session(), "clocked_out").await.unwrap();

        assert_eq!(refreshed.status, SessionState::from("clocked_in"));
        assert_eq!(store.status(), Some(SessionState::from("clocked_in")));
        assert_eq!(store.fresh_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_target_is_a_silent_noop() {
        let store = ScriptedSessionStore::new("clocked_in", &TRANSITIONS);
        let bridge = WorkingSessionBridge::new(Arc::new(store.clone()));

        let refreshed = bridge.transition(&session(), "on_vacation").await.unwrap();

        assert_eq!(refreshed, session());
        assert_eq!(store.fresh_calls(), 1);
    }

    #[tokio::test]
    async fn vanished_session_is_reported() {
        let store = ScriptedSessionStore::new("clocked_in", &TRANSITIONS);
        store.end_session();
        let bridge = WorkingSessionBridge::new(Arc::new(store));

        let err = bridge.transition(&session(), "paused").await.unwrap_err();

        assert_eq!(err, TimeTrackingError::SessionNotFound);
    }
}
