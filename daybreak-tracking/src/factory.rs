//! Composition root: picks concrete adapters and wires the services.

use std::sync::Arc;

use crate::{
    adapters::outbound::memory::{
        InMemoryTimeTracking, InMemoryUserDirectory, InMemoryWorkingSessions,
    },
    config::Settings,
    domain::{
        ports::outbound::TimeEntryWriter,
        services::{TimeEntryWorkflow, WorkingSessionBridge},
        Clock, SystemClock, TimeTrackingError,
    },
};

/// Pick the write service once, from the project billing flag.
pub fn select_writer(
    project_billing: bool,
    plain: Arc<dyn TimeEntryWriter>,
    project_aware: Arc<dyn TimeEntryWriter>,
) -> Arc<dyn TimeEntryWriter> {
    if project_billing {
        project_aware
    } else {
        plain
    }
}

/// The services a UI layer drives.
pub struct TrackingServices {
    pub entries: TimeEntryWorkflow,
    pub sessions: WorkingSessionBridge,
}

/// The in-memory stores behind [`TrackingServices::in_memory`].
#[derive(Clone)]
pub struct InMemoryBackend {
    pub users: InMemoryUserDirectory,
    pub tracking: InMemoryTimeTracking,
    pub sessions: InMemoryWorkingSessions,
}

impl InMemoryBackend {
    pub fn new<'a>(session_transitions: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let users = InMemoryUserDirectory::new();
        Self {
            tracking: InMemoryTimeTracking::new(users.clone()),
            sessions: InMemoryWorkingSessions::new(session_transitions),
            users,
        }
    }
}

impl TrackingServices {
    /// Wire the services over in-memory stores using the system clock.
    pub fn in_memory(
        settings: &Settings,
        backend: &InMemoryBackend,
    ) -> Result<Self, TimeTrackingError> {
        let clock = SystemClock::new(settings.display.utc_offset()?);
        Self::in_memory_with_clock(settings, backend, Arc::new(clock))
    }

    pub fn in_memory_with_clock(
        settings: &Settings,
        backend: &InMemoryBackend,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TimeTrackingError> {
        let writer = select_writer(
            settings.features.project_billing,
            Arc::new(backend.tracking.plain_writer()),
            Arc::new(backend.tracking.project_writer()),
        );
        tracing::debug!(
            project_billing = writer.project_billing(),
            "wiring in-memory time tracking services"
        );

        let entries = TimeEntryWorkflow::new(
            Arc::new(backend.tracking.clone()),
            writer,
            Arc::new(backend.tracking.clone()),
            Arc::new(backend.users.clone()),
            Arc::new(settings.display.date_formatter()?),
            clock,
        )
        .with_defaults(settings.form);

        Ok(Self {
            entries,
            sessions: WorkingSessionBridge::new(Arc::new(backend.sessions.clone())),
        })
    }
}
