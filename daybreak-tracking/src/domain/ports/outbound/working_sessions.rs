use async_trait::async_trait;

use crate::domain::{
    models::{SessionState, WorkingSession},
    TimeTrackingError,
};

/// Outbound port onto the working-session state machine.
///
/// The set of states and the allowed transitions live behind this trait.
#[async_trait]
pub trait WorkingSessionStore: Send + Sync + 'static {
    /// Resolve a target label against the session's current status.
    async fn resolve_state(&self, session: &WorkingSession, label: &str) -> Option<SessionState>;

    async fn can_transition_to(&self, session: &WorkingSession, state: &SessionState) -> bool;

    async fn transition_to(
        &self,
        session: &WorkingSession,
        state: &SessionState,
    ) -> Result<(), TimeTrackingError>;

    /// Re-read the session. Returns `SessionNotFound` when it is gone.
    async fn fresh(&self, session: &WorkingSession) -> Result<WorkingSession, TimeTrackingError>;
}
