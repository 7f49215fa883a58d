#[cfg(test)]
pub mod mock;
mod time_entries;
mod users;
mod working_sessions;

pub use time_entries::*;
pub use users::*;
pub use working_sessions::*;
