use async_trait::async_trait;

use crate::domain::{
    models::{LocationId, PauseInterval, TimeEntry, TimeEntryFields, TimeEntryId, User, UserId},
    TimeTrackingError,
};

/// Outbound port for loading entries into the editor.
#[async_trait]
pub trait TimeEntryReader: Send + Sync + 'static {
    /// Load an entry of `location` together with its pauses.
    ///
    /// Returns `EntryNotFound` when the entry does not exist in that location.
    async fn find_with_pauses(
        &self,
        location: &LocationId,
        entry_id: &TimeEntryId,
    ) -> Result<TimeEntry, TimeTrackingError>;
}

/// Outbound port for persisting entries.
///
/// There are two implementations in practice: a plain one and a
/// project-aware one. Which one is used is decided once, when the editor is
/// built, and `project_billing` reports which kind this is.
///
/// Writes are atomic: the entry and its pauses are stored together or not at
/// all. Field problems come back as `TimeTrackingError::Validation`.
#[async_trait]
pub trait TimeEntryWriter: Send + Sync + 'static {
    /// Whether this writer stores project billing fields.
    fn project_billing(&self) -> bool;

    async fn add(
        &self,
        actor: &User,
        location: &LocationId,
        employee: &UserId,
        fields: &TimeEntryFields,
        pauses: &[PauseInterval],
    ) -> Result<(), TimeTrackingError>;

    async fn update(
        &self,
        actor: &User,
        location: &LocationId,
        employee: &UserId,
        entry_id: &TimeEntryId,
        fields: &TimeEntryFields,
        pauses: &[PauseInterval],
    ) -> Result<(), TimeTrackingError>;
}

/// Outbound port for deleting entries.
#[async_trait]
pub trait TimeEntryRemover: Send + Sync + 'static {
    async fn remove(
        &self,
        actor: &User,
        location: &LocationId,
        entry_id: &TimeEntryId,
    ) -> Result<(), TimeTrackingError>;
}
