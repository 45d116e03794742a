//! Configuration loading
//!
//! Sources, later ones winning:
//! - `config/default.{toml,json,yaml,...}` relative to the working directory (optional)
//! - environment variables prefixed `TAGSUB`, nested with `__`,
//!   e.g. `TAGSUB_CLIENT__INTAKE_BUFFER=64`

mod settings;

use config::{Config, Environment, File};

pub use config::ConfigError;
pub use settings::{ClientSettings, HubSettings, LoggingSettings, PartialSettings, Settings};

/// Loads the configuration from the default file and environment variables
/// and merges it over the defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("TAGSUB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge_into(Settings::default()))
}
