mod pause_intervals;
mod time_entry_workflow;
mod working_session;

pub use pause_intervals::build_pause_intervals;
pub use time_entry_workflow::{EditOutcome, TimeEntryWorkflow};
pub use working_session::WorkingSessionBridge;
