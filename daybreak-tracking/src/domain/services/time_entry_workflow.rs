use std::sync::Arc;

use tracing::instrument;

use super::build_pause_intervals;
use crate::domain::{
    models::{
        EditingState, FormDefaults, PauseForm, PauseInterval, PauseList, Surface, TimeEntryFields,
        TimeEntryForm, TimeEntryId, User,
    },
    ports::outbound::{TimeEntryReader, TimeEntryRemover, TimeEntryWriter, UserDirectory},
    Clock, DateFormatter, TimeTrackingError,
};

/// Result of a successful write: the editor state to show next and the
/// re-read acting user.
///
/// The user is re-read after the write has been stored. If that read fails
/// the write still stands and the operation returns the read error, so the
/// caller must not resubmit the same form. Reopen it from the stored entry
/// instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub state: EditingState,
    pub user: User,
}

/// Orchestrates creating, editing and removing time entries.
///
/// Every operation takes the caller's current [`EditingState`] by reference
/// and hands back a new one. When an operation fails the caller still owns
/// the old state, so the form stays open with the user's input intact.
pub struct TimeEntryWorkflow {
    reader: Arc<dyn TimeEntryReader>,
    writer: Arc<dyn TimeEntryWriter>,
    remover: Arc<dyn TimeEntryRemover>,
    users: Arc<dyn UserDirectory>,
    formatter: Arc<dyn DateFormatter>,
    clock: Arc<dyn Clock>,
    defaults: FormDefaults,
}

impl TimeEntryWorkflow {
    pub fn new(
        reader: Arc<dyn TimeEntryReader>,
        writer: Arc<dyn TimeEntryWriter>,
        remover: Arc<dyn TimeEntryRemover>,
        users: Arc<dyn UserDirectory>,
        formatter: Arc<dyn DateFormatter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reader,
            writer,
            remover,
            users,
            formatter,
            clock,
            defaults: FormDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: FormDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Whether the injected writer is the project-aware one.
    pub fn project_billing(&self) -> bool {
        self.writer.project_billing()
    }

    /// A closed editor with today's date and the default times.
    pub fn initial_state(&self, actor: &User) -> Result<EditingState, TimeTrackingError> {
        let today = self.formatter.format_date_for_display(self.clock.today())?;
        let form = TimeEntryForm::new(today, &self.defaults, self.project_billing());

        Ok(EditingState::new(form, actor.id, self.defaults))
    }

    /// Open an empty form for a new entry owned by the acting user.
    pub fn begin_create(
        &self,
        actor: &User,
        state: &EditingState,
    ) -> Result<EditingState, TimeTrackingError> {
        let mut next = self.reset_editing(actor, state)?;
        next.surface = Surface::Creating;

        tracing::debug!(user = %actor.id, "opened time entry form");
        Ok(next)
    }

    /// Load an existing entry into the form.
    #[instrument(
        name = "TimeEntryWorkflow::begin_edit",
        skip(self, actor, state),
        fields(user = %actor.id)
    )]
    pub async fn begin_edit(
        &self,
        actor: &User,
        state: &EditingState,
        entry_id: TimeEntryId,
    ) -> Result<EditingState, TimeTrackingError> {
        let entry = self
            .reader
            .find_with_pauses(&actor.current_location, &entry_id)
            .await?;

        let mut next = self.reset_editing(actor, state)?;
        let form = &mut next.form;
        form.date = self.formatter.display_date_of(entry.starts_at)?;
        form.set_start(self.formatter.clock_time_of(entry.starts_at));
        form.set_end(self.formatter.clock_time_of(entry.ends_at));
        form.description = entry.description.clone();
        if self.project_billing() {
            form.project = Some(entry.project.clone().unwrap_or_default());
        }

        next.pauses = entry
            .pauses
            .iter()
            .map(|pause| {
                PauseForm::new(
                    self.formatter.clock_time_of(pause.starts_at),
                    self.formatter.clock_time_of(pause.ends_at),
                )
            })
            .collect::<PauseList>();
        next.target_employee = entry.user_id;
        next.surface = Surface::Editing(entry_id);

        tracing::debug!(pauses = entry.pauses.len(), "loaded time entry for editing");
        Ok(next)
    }

    /// Store the form as a new entry.
    ///
    /// On success the editor closes; the form values are left in place.
    #[instrument(
        name = "TimeEntryWorkflow::confirm_add",
        skip(self, actor, state),
        fields(user = %actor.id, employee = %state.target_employee)
    )]
    pub async fn confirm_add(
        &self,
        actor: &User,
        state: &EditingState,
    ) -> Result<EditOutcome, TimeTrackingError> {
        let composed = self.compose(state)?;

        self.writer
            .add(
                actor,
                &actor.current_location,
                &state.target_employee,
                &composed.fields,
                &composed.pauses,
            )
            .await
            .map_err(|err| composed.restore_pause_indices(err))?;
        tracing::info!(
            project_billing = self.project_billing(),
            pauses = composed.pauses.len(),
            "added time entry"
        );

        let user = self.users.fresh(&actor.id).await?;
        let mut next = state.clone();
        next.errors.clear();
        next.surface = Surface::Closed;

        Ok(EditOutcome { state: next, user })
    }

    /// Store the form over the entry being edited, then reset the editor.
    ///
    /// The reset only happens when the write succeeds.
    #[instrument(
        name = "TimeEntryWorkflow::confirm_update",
        skip(self, actor, state),
        fields(user = %actor.id, employee = %state.target_employee)
    )]
    pub async fn confirm_update(
        &self,
        actor: &User,
        state: &EditingState,
    ) -> Result<EditOutcome, TimeTrackingError> {
        let entry_id = state
            .editing_entry_id()
            .ok_or(TimeTrackingError::NoEntryBeingEdited)?;
        let composed = self.compose(state)?;

        self.writer
            .update(
                actor,
                &actor.current_location,
                &state.target_employee,
                &entry_id,
                &composed.fields,
                &composed.pauses,
            )
            .await
            .map_err(|err| composed.restore_pause_indices(err))?;
        tracing::info!(
            entry = %entry_id,
            project_billing = self.project_billing(),
            pauses = composed.pauses.len(),
            "updated time entry"
        );

        let user = self.users.fresh(&actor.id).await?;
        let next = self.reset_editing(actor, state)?;

        Ok(EditOutcome { state: next, user })
    }

    /// Close the editor and discard the form without writing anything.
    pub fn cancel_editing(
        &self,
        actor: &User,
        state: &EditingState,
    ) -> Result<EditingState, TimeTrackingError> {
        tracing::debug!(user = %actor.id, "cancelled time entry editing");
        self.reset_editing(actor, state)
    }

    /// Remove the entry staged by [`EditingState::confirm_removal`].
    #[instrument(
        name = "TimeEntryWorkflow::execute_removal",
        skip(self, actor, state),
        fields(user = %actor.id)
    )]
    pub async fn execute_removal(
        &self,
        actor: &User,
        state: &EditingState,
    ) -> Result<EditOutcome, TimeTrackingError> {
        let entry_id = state
            .pending_removal
            .ok_or(TimeTrackingError::NoRemovalPending)?;

        self.remover
            .remove(actor, &actor.current_location, &entry_id)
            .await?;
        tracing::info!(entry = %entry_id, "removed time entry");

        let user = self.users.fresh(&actor.id).await?;
        let mut next = state.clone();
        next.cancel_removal();

        Ok(EditOutcome { state: next, user })
    }

    /// Absolute span, pass-through attributes and pauses for the writer.
    fn compose(&self, state: &EditingState) -> Result<Composed, TimeTrackingError> {
        let form = &state.form;
        let (pause_indices, pauses) =
            build_pause_intervals(self.formatter.as_ref(), &form.date, &state.pauses)?
                .into_iter()
                .unzip();

        let fields = TimeEntryFields {
            starts_at: self.formatter.compose_timestamp(&form.date, form.start()?)?,
            ends_at: self.formatter.compose_timestamp(&form.date, form.end()?)?,
            attributes: form.filtered_fields(),
        };

        Ok(Composed {
            fields,
            pauses,
            pause_indices,
        })
    }

    /// Initial editor state, keeping any removal the user is confirming.
    fn reset_editing(
        &self,
        actor: &User,
        state: &EditingState,
    ) -> Result<EditingState, TimeTrackingError> {
        let mut next = self.initial_state(actor)?;
        next.pending_removal = state.pending_removal;
        next.confirming_removal = state.confirming_removal;
        Ok(next)
    }
}

/// Writer payload built from the form.
struct Composed {
    fields: TimeEntryFields,
    pauses: Vec<PauseInterval>,
    /// `PauseList` index of each entry in `pauses`.
    pause_indices: Vec<usize>,
}

impl Composed {
    /// The writer keys pause messages by position in `pauses`; the form
    /// addresses pauses by their list index.
    fn restore_pause_indices(&self, err: TimeTrackingError) -> TimeTrackingError {
        match err {
            TimeTrackingError::Validation(errors) => {
                errors.reindex("pauses", &self.pause_indices).into()
            }
            other => other,
        }
    }
}
