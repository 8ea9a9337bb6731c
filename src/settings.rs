//! Process settings, read with the `config` crate.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults;
//! 2. `atmofuzz.toml` in the working directory (optional), or the file given
//!    explicitly, which then must exist;
//! 3. `ATMOFUZZ_*` environment variables, `__` separating nested keys
//!    (`ATMOFUZZ_SERVER__ADDRESS=0.0.0.0:9000`).
//!
//! ```toml
//! horizon_hours = 24
//! missing_as_zero = false
//! log_filter = "info"
//!
//! [server]
//! address = "127.0.0.1:8080"
//! ```

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{AtmoError, Result};
use crate::forecast::DEFAULT_HORIZON_HOURS;

const DEFAULT_FILE: &str = "atmofuzz";
const ENV_PREFIX: &str = "ATMOFUZZ";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hours of hourly data the forecast looks at.
    pub horizon_hours: usize,
    /// Substitute 0.0 for missing current readings instead of reporting the
    /// dependent stage as incomplete.
    pub missing_as_zero: bool,
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub server: ServerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            horizon_hours: DEFAULT_HORIZON_HOURS,
            missing_as_zero: false,
            log_filter: "info".into(),
            server: ServerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".into(),
        }
    }
}

impl Settings {
    /// Loads settings from the optional default file (or `path`, required)
    /// and the environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
    pub fn validate(&self) -> Result<()> {
        if self.horizon_hours == 0 {
            return Err(AtmoError::Config("horizon_hours must be at least 1".into()));
        }
        if self.server.address.trim().is_empty() {
            return Err(AtmoError::Config("server.address must not be empty".into()));
        }
        Ok(())
    }
}
