mod clock_time;
mod form;
mod ids;
mod pause;
mod time_entry;
mod user;
mod working_session;

pub use clock_time::*;
pub use form::*;
pub use ids::*;
pub use pause::*;
pub use time_entry::*;
pub use user::*;
pub use working_session::*;
