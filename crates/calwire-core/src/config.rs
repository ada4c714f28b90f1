use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE, DEFAULT_METHOD, DEFAULT_PRODID, DEFAULT_VERSION, ENV_PREFIX,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Values written to a VCALENDAR root on export when the calendar does not
/// carry its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportConfig {
    pub version: String,
    pub prodid: String,
    pub method: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            prodid: DEFAULT_PRODID.to_string(),
            method: DEFAULT_METHOD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads settings from defaults, an optional `calwire.toml` and
    /// `CALWIRE_`-prefixed environment variables, in increasing precedence.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it or
    /// validating it fails.
    pub fn load() -> CoreResult<Self> {
        let settings = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Layers a TOML document over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is not valid TOML or fails validation.
    pub fn from_toml(source: &str) -> CoreResult<Self> {
        let settings = defaults()?
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Rejects export defaults that would produce an unusable calendar.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidConfiguration`] naming the empty field.
    pub fn validate(&self) -> CoreResult<()> {
        let fields = [
            ("export.version", &self.export.version),
            ("export.prodid", &self.export.prodid),
            ("export.method", &self.export.method),
        ];
        for (key, value) in fields {
            if value.trim().is_empty() {
                return Err(CoreError::InvalidConfiguration(format!(
                    "{key} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

fn defaults() -> CoreResult<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("export.version", DEFAULT_VERSION)?
        .set_default("export.prodid", DEFAULT_PRODID)?
        .set_default("export.method", DEFAULT_METHOD)?
        .set_default("logging.level", "info")?)
}

/// ## Summary
/// Loads `.env` into the process environment, then the settings.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::trace!(error = %e, "No .env file loaded");
    }

    Settings::load()
}
