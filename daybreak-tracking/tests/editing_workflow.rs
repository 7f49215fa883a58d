use std::sync::Arc;

use config::{Config, File, FileFormat};
use daybreak_tracking::{
    config::Settings,
    domain::{
        models::{
            ClockTime, PauseForm, PauseInterval, ProjectFields, SessionState, Surface, TimeEntry,
            TimeEntryId, User, UserId, WorkingSession,
        },
        FixedClock, TimeTrackingError,
    },
    factory::{InMemoryBackend, TrackingServices},
};
use time::macros::{date, datetime};

const TRANSITIONS: [(&str, &str); 4] = [
    ("clocked_out", "clocked_in"),
    ("clocked_in", "paused"),
    ("paused", "clocked_in"),
    ("clocked_in", "clocked_out"),
];

fn settings(project_billing: bool) -> Settings {
    let mut settings: Settings = Config::builder()
        .add_source(File::from_str(include_str!("../config/base.yaml"), FileFormat::Yaml))
        .build()
        .and_then(Config::try_deserialize)
        .expect("base config");
    settings.features.project_billing = project_billing;
    settings
}

async fn setup(project_billing: bool) -> (TrackingServices, InMemoryBackend, User) {
    let backend = InMemoryBackend::new(TRANSITIONS);
    let actor = User::new(1, "Ada", 10);
    backend.users.insert(actor.clone()).await;
    backend.users.insert(User::new(5, "Grace", 10)).await;

    let services = TrackingServices::in_memory_with_clock(
        &settings(project_billing),
        &backend,
        Arc::new(FixedClock(date!(2024 - 01 - 10))),
    )
    .expect("services");

    (services, backend, actor)
}

#[tokio::test]
async fn create_entry_with_default_pause() {
    let (services, backend, actor) = setup(false).await;
    let workflow = &services.entries;

    let initial = workflow.initial_state(&actor).unwrap();
    let mut state = workflow.begin_create(&actor, &initial).unwrap();
    state.add_pause();
    state.form.start_hour = 9;
    state.form.end_hour = 17;

    let outcome = workflow.confirm_add(&actor, &state).await.unwrap();

    let stored = backend.tracking.latest(&actor.current_location).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].starts_at, datetime!(2024-01-10 09:00 UTC));
    assert_eq!(stored[0].ends_at, datetime!(2024-01-10 17:00 UTC));
    assert_eq!(
        stored[0].pauses,
        vec![PauseInterval::new(
            datetime!(2024-01-10 12:00 UTC),
            datetime!(2024-01-10 12:30 UTC),
        )]
    );
    assert_eq!(outcome.user.revision, 1);
    assert_eq!(outcome.state.surface, Surface::Closed);
}

#[tokio::test]
async fn rejected_entry_keeps_form_open_for_correction() {
    let (services, backend, actor) = setup(false).await;
    let workflow = &services.entries;

    let initial = workflow.initial_state(&actor).unwrap();
    let mut state = workflow.begin_create(&actor, &initial).unwrap();
    let pause = state.add_pause();
    state.form.start_hour = 13;
    state.form.end_hour = 17;

    let err = workflow.confirm_add(&actor, &state).await.unwrap_err();
    state.record_failure(&err);

    assert!(state.is_open());
    assert_eq!(
        state.errors.first(&format!("pauses.{pause}")),
        Some("The pause must lie within the time tracking.")
    );

    state.remove_pause(pause);
    let outcome = workflow.confirm_add(&actor, &state).await.unwrap();

    assert!(outcome.state.errors.is_empty());
    assert_eq!(
        backend.tracking.latest(&actor.current_location).await.len(),
        1
    );
}

#[tokio::test]
async fn pause_errors_keep_their_index_after_removal() {
    let (services, backend, actor) = setup(false).await;
    let workflow = &services.entries;

    let initial = workflow.initial_state(&actor).unwrap();
    let mut state = workflow.begin_create(&actor, &initial).unwrap();
    let first = state.add_pause();
    let second = state.add_pause();
    state.remove_pause(first);
    state
        .replace_pause(
            second,
            PauseForm::new(
                ClockTime::new(20, 0).unwrap(),
                ClockTime::new(21, 0).unwrap(),
            ),
        )
        .unwrap();

    let err = workflow.confirm_add(&actor, &state).await.unwrap_err();
    state.record_failure(&err);

    let fields: Vec<&str> = state.errors.fields().collect();
    assert_eq!(fields, vec!["pauses.1"]);
    assert_eq!(
        state.errors.first(&format!("pauses.{second}")),
        Some("The pause must lie within the time tracking.")
    );
    assert!(backend
        .tracking
        .latest(&actor.current_location)
        .await
        .is_empty());
}

#[tokio::test]
async fn edit_then_cancel_restores_defaults() {
    let (services, backend, actor) = setup(false).await;
    let workflow = &services.entries;
    backend
        .tracking
        .insert(
            TimeEntry::new(
                42,
                5,
                10,
                datetime!(2024-01-08 08:00 UTC),
                datetime!(2024-01-08 16:30 UTC),
            )
            .with_pause(PauseInterval::new(
                datetime!(2024-01-08 10:00 UTC),
                datetime!(2024-01-08 10:15 UTC),
            ))
            .with_pause(PauseInterval::new(
                datetime!(2024-01-08 12:00 UTC),
                datetime!(2024-01-08 12:30 UTC),
            )),
        )
        .await;

    let initial = workflow.initial_state(&actor).unwrap();
    let editing = workflow
        .begin_edit(&actor, &initial, TimeEntryId::new(42))
        .await
        .unwrap();
    assert_eq!(editing.pauses.len(), 2);
    assert_eq!(editing.target_employee, UserId::new(5));

    let cancelled = workflow.cancel_editing(&actor, &editing).unwrap();

    assert_eq!(cancelled, initial);
    assert_eq!(cancelled.editing_entry_id(), None);
}

#[tokio::test]
async fn update_with_project_billing_persists_project() {
    let (services, backend, actor) = setup(true).await;
    let workflow = &services.entries;
    backend
        .tracking
        .insert(TimeEntry::new(
            3,
            5,
            10,
            datetime!(2024-01-09 08:00 UTC),
            datetime!(2024-01-09 12:00 UTC),
        ))
        .await;

    let initial = workflow.initial_state(&actor).unwrap();
    let mut editing = workflow
        .begin_edit(&actor, &initial, TimeEntryId::new(3))
        .await
        .unwrap();
    assert_eq!(editing.form.project, Some(ProjectFields::default()));

    let err = workflow.confirm_update(&actor, &editing).await.unwrap_err();
    editing.record_failure(&err);
    assert_eq!(
        editing.errors.first("project_id"),
        Some("A project is required.")
    );
    assert_eq!(editing.editing_entry_id(), Some(TimeEntryId::new(3)));

    editing.form.project = Some(ProjectFields::for_project("P-7"));
    editing.form.set_description("  Audit ");
    let outcome = workflow.confirm_update(&actor, &editing).await.unwrap();

    let stored = backend.tracking.get(&TimeEntryId::new(3)).await.unwrap();
    assert_eq!(stored.project, Some(ProjectFields::for_project("P-7")));
    assert_eq!(stored.description.as_deref(), Some("Audit"));
    assert_eq!(stored.user_id, UserId::new(5));
    assert_eq!(outcome.state, initial);
}

#[tokio::test]
async fn confirmed_removal_deletes_entry() {
    let (services, backend, actor) = setup(false).await;
    let workflow = &services.entries;
    backend
        .tracking
        .insert(TimeEntry::new(
            7,
            1,
            10,
            datetime!(2024-01-09 08:00 UTC),
            datetime!(2024-01-09 12:00 UTC),
        ))
        .await;

    let mut state = workflow.initial_state(&actor).unwrap();
    state.confirm_removal(TimeEntryId::new(7));
    let outcome = workflow.execute_removal(&actor, &state).await.unwrap();

    assert!(backend.tracking.get(&TimeEntryId::new(7)).await.is_none());
    assert_eq!(outcome.state.pending_removal, None);
    assert!(!outcome.state.confirming_removal);

    let mut again = outcome.state.clone();
    again.confirm_removal(TimeEntryId::new(7));
    let err = workflow.execute_removal(&actor, &again).await.unwrap_err();
    assert_eq!(err, TimeTrackingError::EntryNotFound(TimeEntryId::new(7)));
}

#[tokio::test]
async fn session_transitions_are_best_effort() {
    let (services, backend, _) = setup(false).await;
    let session = WorkingSession::new(1, 1, "clocked_in");
    backend.sessions.insert(session.clone()).await;

    let paused = services
        .sessions
        .transition(&session, "paused")
        .await
        .unwrap();
    assert_eq!(paused.status, SessionState::from("paused"));

    let unchanged = services
        .sessions
        .transition(&paused, "clocked_out")
        .await
        .unwrap();
    assert_eq!(unchanged.status, SessionState::from("paused"));

    let unknown = services
        .sessions
        .transition(&paused, "lunch")
        .await
        .unwrap();
    assert_eq!(unknown.status, SessionState::from("paused"));

    backend.sessions.remove(1).await;
    let err = services
        .sessions
        .transition(&paused, "clocked_in")
        .await
        .unwrap_err();
    assert_eq!(err, TimeTrackingError::SessionNotFound);
}
