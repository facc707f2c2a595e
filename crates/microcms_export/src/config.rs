use std::num::{NonZeroU32, NonZeroU64};
use std::path::PathBuf;

use crate::fetch::FetchSettings;

pub const BASE_URL_VAR: &str = "MICROCMS_BASE_URL";
pub const API_KEY_VAR: &str = "X_MICROCMS_API_KEY";
pub const OUTPUT_DIR_VAR: &str = "MD_OUTPUT_DIR";
pub const PAGE_SIZE_VAR: &str = "MICROCMS_PAGE_SIZE";
pub const MAX_RESPONSE_BYTES_VAR: &str = "MICROCMS_MAX_RESPONSE_BYTES";

pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set or empty")]
    Missing(&'static str),
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Everything one export run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub base_url: String,
    pub api_key: String,
    pub output_dir: PathBuf,
    pub page_size: NonZeroU32,
    pub fetch: FetchSettings,
}

impl ExportConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let base_url = required(BASE_URL_VAR)?;
        let api_key = required(API_KEY_VAR)?;
        let output_dir = PathBuf::from(required(OUTPUT_DIR_VAR)?);

        let positive = |key: &'static str| -> Result<Option<NonZeroU64>, ConfigError> {
            match lookup(key).filter(|value| !value.trim().is_empty()) {
                None => Ok(None),
                Some(value) => {
                    let parsed = value.trim().parse::<NonZeroU64>();
                    match parsed {
                        Ok(number) => Ok(Some(number)),
                        Err(_) => Err(ConfigError::InvalidNumber { var: key, value }),
                    }
                }
            }
        };

        let page_size = match positive(PAGE_SIZE_VAR)? {
            None => DEFAULT_PAGE_SIZE,
            Some(size) => u32::try_from(size.get())
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    var: PAGE_SIZE_VAR,
                    value: size.to_string(),
                })?,
        };

        let mut fetch = FetchSettings::default();
        if let Some(max_bytes) = positive(MAX_RESPONSE_BYTES_VAR)? {
            fetch.max_bytes = max_bytes.get();
        }

        Ok(Self {
            base_url,
            api_key,
            output_dir,
            page_size,
            fetch,
        })
    }
}
