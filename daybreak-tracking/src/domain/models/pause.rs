use serde::{Deserialize, Serialize};

use super::ClockTime;
use crate::domain::TimeTrackingError;

/// A break as entered in the form: hour/minute pairs relative to the entry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseForm {
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
}

impl PauseForm {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self {
            start_hour: start.hour(),
            start_minute: start.minute(),
            end_hour: end.hour(),
            end_minute: end.minute(),
        }
    }

    pub fn start(&self) -> Result<ClockTime, TimeTrackingError> {
        ClockTime::new(self.start_hour, self.start_minute)
    }

    pub fn end(&self) -> Result<ClockTime, TimeTrackingError> {
        ClockTime::new(self.end_hour, self.end_minute)
    }
}

/// Ordered list of pauses being edited.
///
/// Removing a pause leaves an empty slot behind, so an index handed to the UI
/// keeps pointing at the same pause for the rest of the edit session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseList {
    slots: Vec<Option<PauseForm>>,
}

impl PauseList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pause and returns its index.
    pub fn push(&mut self, pause: PauseForm) -> usize {
        self.slots.push(Some(pause));
        self.slots.len() - 1
    }

    /// Removes the pause at `index`. Removing an absent index is a no-op.
    pub fn remove(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    pub fn replace(&mut self, index: usize, pause: PauseForm) -> Result<(), TimeTrackingError> {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_some() => {
                *slot = Some(pause);
                Ok(())
            }
            _ => Err(TimeTrackingError::PauseNotFound(index)),
        }
    }

    pub fn get(&self, index: usize) -> Option<&PauseForm> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Live pauses with their stable indices, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PauseForm)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|pause| (index, pause)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl FromIterator<PauseForm> for PauseList {
    fn from_iter<I: IntoIterator<Item = PauseForm>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(Some).collect(),
        }
    }
}
