use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use thiserror::Error;

use super::models::{TimeEntryId, UserId};

/// Errors that can occur while editing time entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeTrackingError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("time entry not found: {0}")]
    EntryNotFound(TimeEntryId),
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    #[error("working session not found")]
    SessionNotFound,
    #[error("invalid time of day {hour:02}:{minute:02}")]
    InvalidClockTime { hour: u8, minute: u8 },
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("no pause at index {0}")]
    PauseNotFound(usize),
    #[error("no time entry is being edited")]
    NoEntryBeingEdited,
    #[error("no time entry is staged for removal")]
    NoRemovalPending,
    #[error("{0}")]
    Unknown(String),
}

impl TimeTrackingError {
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Field-level messages when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for TimeTrackingError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Field-keyed validation messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Re-keys `{prefix}.{position}` fields to `{prefix}.{indices[position]}`.
    ///
    /// Fields outside `prefix`, or with a position past `indices`, keep their key.
    pub fn reindex(self, prefix: &str, indices: &[usize]) -> Self {
        let mut reindexed = Self::new();
        for (field, messages) in self.0 {
            let index = field
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .and_then(|position| position.parse::<usize>().ok())
                .and_then(|position| indices.get(position));
            let field = match index {
                Some(index) => format!("{prefix}.{index}"),
                None => field,
            };
            reindexed.0.entry(field).or_default().extend(messages);
        }
        reindexed
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<(), TimeTrackingError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(TimeTrackingError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}
