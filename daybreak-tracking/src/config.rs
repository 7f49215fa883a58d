use std::{path::Path, str::FromStr};

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};
use time::UtcOffset;

use crate::domain::{models::FormDefaults, DisplayDateFormatter, TimeTrackingError};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub features: FeatureSettings,
    pub display: DisplaySettings,
    pub form: FormDefaults,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub log_level: String,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct FeatureSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub project_billing: bool,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct DisplaySettings {
    /// `time` format description for dates shown in the form.
    pub date_format: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub utc_offset_hours: i8,
}

impl DisplaySettings {
    pub fn utc_offset(&self) -> Result<UtcOffset, TimeTrackingError> {
        let hours = self.utc_offset_hours;
        UtcOffset::from_hms(hours, 0, 0).map_err(|e| {
            TimeTrackingError::unknown(format!("invalid utc offset {hours}: {e}"))
        })
    }

    pub fn date_formatter(&self) -> Result<DisplayDateFormatter, TimeTrackingError> {
        DisplayDateFormatter::new(&self.date_format, self.utc_offset()?)
    }
}

/// Read settings from `./config`, after loading an optional `.env` file.
pub fn read_config() -> Result<Settings, config::ConfigError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    read_config_from(&base_path.join("config"))
}

/// Layer `base.yaml`, the environment's yaml file (if any) and `DAYBREAK_*`
/// variables from `config_directory`.
pub fn read_config_from(config_directory: &Path) -> Result<Settings, config::ConfigError> {
    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|e| {
        config::ConfigError::Message(format!("failed to parse APP_ENVIRONMENT: {e}"))
    })?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(
            config::File::from(config_directory.join(environment_filename))
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("DAYBREAK")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString, PartialEq, Eq)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
