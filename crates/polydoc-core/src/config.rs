//! Runtime configuration for builders and result streams.

use crate::error::{ErrorClass, ErrorDetail, ErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Largest page size the remote API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid config: {field} {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Parse(_) | Self::Invalid { .. } => ErrorClass::InvalidInput,
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::with_detail(err.class(), ErrorOrigin::Config, ErrorDetail::Config(err))
    }
}

///
/// Config
///
/// Pagination limits shared by the query builder and result streams.
/// Missing TOML keys fall back to the defaults above.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Check the page-size bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "max_page_size",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid {
                field: "default_page_size",
                message: format!("must be in 1..={}", self.max_page_size),
            });
        }

        Ok(())
    }

    /// Clamp a requested page size into `1..=max_page_size`.
    #[must_use]
    pub fn cap_page_size(&self, requested: u32) -> u32 {
        requested.clamp(1, self.max_page_size)
    }
}
