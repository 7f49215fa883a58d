//! Editing workflow for employee time entries: form state, pause handling,
//! add/update/remove orchestration and working-session transitions.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod factory;
pub mod telemetry;
