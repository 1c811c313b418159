use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigurationError;

pub const DEFAULT_DB_PATH: &str = "pigeon.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Where and how the store connects. Built once at startup and handed to
/// [`crate::Database::open`]; nothing in the store reads the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `PIGEON_DB_PATH` and `PIGEON_DB_BUSY_TIMEOUT_MS` through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match lookup("PIGEON_DB_PATH") {
            None => PathBuf::from(DEFAULT_DB_PATH),
            Some(v) if v.trim().is_empty() => {
                return Err(ConfigurationError::Missing("PIGEON_DB_PATH"));
            }
            Some(v) => PathBuf::from(v.trim()),
        };

        let busy_ms: u64 = parse_var(
            &lookup,
            "PIGEON_DB_BUSY_TIMEOUT_MS",
            DEFAULT_BUSY_TIMEOUT_MS,
        )?;

        Ok(Self {
            path,
            busy_timeout: Duration::from_millis(busy_ms),
        })
    }
}

/// Parse `key` from `lookup`, falling back to `default` when unset.
pub fn parse_var<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigurationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(e) => Err(ConfigurationError::Invalid {
                key,
                reason: e.to_string(),
                value: raw,
            }),
        },
    }
}
