//! Bridge configuration, loaded from TOML.
//!
//! ```toml
//! device_time_zone = "Europe/Paris"
//!
//! [profile]
//! name = "event_store"
//! floating_encoding = "local"
//! all_day_end = "inclusive_end_of_day"
//! all_day_time_zone = "omit"
//! supports_single_instance_mutation = true
//! max_query_span_days = 1461
//! ```
//!
//! Omitted profile keys take the content-provider defaults.

use std::io;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use devcal_backend::BackendProfile;
use devcal_core::{TimeError, resolve_time_zone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid device timezone: {0}")]
    TimeZone(#[from] TimeError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// IANA zone used for floating dates. `None` reads the host's zone.
    pub device_time_zone: Option<String>,
    pub profile: BackendProfile,
}

impl BridgeConfig {
    pub fn new(profile: BackendProfile) -> Self {
        Self {
            device_time_zone: None,
            profile,
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_device_time_zone(mut self, name: impl Into<String>) -> Self {
        self.device_time_zone = Some(name.into());
        self
    }

    /// The configured zone, or the host's.
    pub fn time_zone(&self) -> Result<Tz, ConfigError> {
        Ok(resolve_time_zone(self.device_time_zone.as_deref())?)
    }
}
