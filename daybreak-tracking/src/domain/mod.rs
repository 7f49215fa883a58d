mod date_formatter;
mod error;
pub mod models;
pub mod ports;
pub mod services;

pub use date_formatter::*;
pub use error::*;
