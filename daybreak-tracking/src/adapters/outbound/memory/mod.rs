//! In-memory adapters for every outbound port.

mod time_entries;
mod users;
mod working_sessions;

pub use time_entries::{InMemoryTimeEntryWriter, InMemoryTimeTracking};
pub use users::InMemoryUserDirectory;
pub use working_sessions::InMemoryWorkingSessions;
