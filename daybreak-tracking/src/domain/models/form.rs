use serde::{Deserialize, Serialize};

use super::{ClockTime, EntryAttributes, PauseForm, PauseList, ProjectFields, TimeEntryId, UserId};
use crate::domain::{TimeTrackingError, ValidationErrors};

/// Default times used when a form is opened or a pause is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefaults {
    pub start: ClockTime,
    pub end: ClockTime,
    pub pause: PauseDefaults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseDefaults {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl Default for FormDefaults {
    fn default() -> Self {
        let at = |hour, minute| ClockTime::new(hour, minute).unwrap_or(ClockTime::MIDNIGHT);
        Self {
            start: at(0, 0),
            end: at(8, 0),
            pause: PauseDefaults {
                start: at(12, 0),
                end: at(12, 30),
            },
        }
    }
}

/// The entry being created or edited, as the user sees it.
///
/// Serializes to a fixed key set; project keys are present only when project
/// billing is on, and unset optional values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntryForm {
    pub date: String,
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
    pub description: Option<String>,
    #[serde(flatten)]
    pub project: Option<ProjectFields>,
}

impl TimeEntryForm {
    pub fn new(date: impl Into<String>, defaults: &FormDefaults, project_billing: bool) -> Self {
        Self {
            date: date.into(),
            start_hour: defaults.start.hour(),
            start_minute: defaults.start.minute(),
            end_hour: defaults.end.hour(),
            end_minute: defaults.end.minute(),
            description: None,
            project: project_billing.then(ProjectFields::default),
        }
    }

    pub fn start(&self) -> Result<ClockTime, TimeTrackingError> {
        ClockTime::new(self.start_hour, self.start_minute)
    }

    pub fn end(&self) -> Result<ClockTime, TimeTrackingError> {
        ClockTime::new(self.end_hour, self.end_minute)
    }

    pub fn set_start(&mut self, start: ClockTime) {
        self.start_hour = start.hour();
        self.start_minute = start.minute();
    }

    pub fn set_end(&mut self, end: ClockTime) {
        self.end_hour = end.hour();
        self.end_minute = end.minute();
    }

    /// Trims the input; blank input clears the description.
    pub fn set_description(&mut self, description: &str) {
        let trimmed = description.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Everything except the date and the start/end clock fields.
    pub fn filtered_fields(&self) -> EntryAttributes {
        EntryAttributes {
            description: self.description.clone(),
            project: self.project.clone(),
        }
    }
}

/// Which editing mode the form is in. Creating and editing are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    #[default]
    Closed,
    Creating,
    Editing(TimeEntryId),
}

/// Complete UI-facing state of the time entry editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingState {
    pub form: TimeEntryForm,
    pub pauses: PauseList,
    pub target_employee: UserId,
    pub surface: Surface,
    pub pending_removal: Option<TimeEntryId>,
    pub confirming_removal: bool,
    pub errors: ValidationErrors,
    defaults: FormDefaults,
}

impl EditingState {
    pub fn new(form: TimeEntryForm, target_employee: UserId, defaults: FormDefaults) -> Self {
        Self {
            form,
            pauses: PauseList::new(),
            target_employee,
            surface: Surface::Closed,
            pending_removal: None,
            confirming_removal: false,
            errors: ValidationErrors::new(),
            defaults,
        }
    }

    pub fn defaults(&self) -> &FormDefaults {
        &self.defaults
    }

    pub fn is_open(&self) -> bool {
        self.surface != Surface::Closed
    }

    pub fn editing_entry_id(&self) -> Option<TimeEntryId> {
        match self.surface {
            Surface::Editing(id) => Some(id),
            _ => None,
        }
    }

    /// Appends a pause with the default break times and returns its index.
    pub fn add_pause(&mut self) -> usize {
        let pause = PauseForm::new(self.defaults.pause.start, self.defaults.pause.end);
        self.pauses.push(pause)
    }

    pub fn remove_pause(&mut self, index: usize) {
        self.pauses.remove(index);
    }

    pub fn replace_pause(
        &mut self,
        index: usize,
        pause: PauseForm,
    ) -> Result<(), TimeTrackingError> {
        self.pauses.replace(index, pause)
    }

    /// Stages an entry for removal and raises the confirmation prompt.
    pub fn confirm_removal(&mut self, entry_id: TimeEntryId) {
        self.pending_removal = Some(entry_id);
        self.confirming_removal = true;
    }

    pub fn cancel_removal(&mut self) {
        self.pending_removal = None;
        self.confirming_removal = false;
    }

    /// Routes validation messages from a failed confirm into the error channel.
    ///
    /// Messages from an earlier attempt are dropped even when the failure
    /// carries none of its own.
    pub fn record_failure(&mut self, error: &TimeTrackingError) {
        self.errors = error.validation_errors().cloned().unwrap_or_default();
    }
}
