use tracing_subscriber::{filter::EnvFilter, fmt::SubscriberBuilder};

use crate::{config::ApplicationSettings, domain::TimeTrackingError};

/// Install the fmt subscriber at the configured log level.
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(settings: &ApplicationSettings) -> Result<(), TimeTrackingError> {
    let filter = env_filter(
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        &settings.log_level,
    )?;

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| TimeTrackingError::unknown(err.to_string()))
}

fn env_filter(from_env: Option<String>, configured: &str) -> Result<EnvFilter, TimeTrackingError> {
    let directives = from_env
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| configured.to_string());

    EnvFilter::try_new(&directives).map_err(|err| {
        TimeTrackingError::unknown(format!("invalid log filter {directives:?}: {err}"))
    })
}
