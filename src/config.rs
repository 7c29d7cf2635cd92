use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: &str = "5000";
pub const DEFAULT_DB_HOST: &str = "cluster0.5eoqrw2.mongodb.net";
pub const DEFAULT_DB_NAME: &str = "rciLastCallsDB";
pub const DEFAULT_MAX_PAGE_LIMIT: &str = "100";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} is required")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub struct Config {
    pub port: u16,
    pub mongodb_uri: String,
    pub database: String,
    pub max_page_limit: u64,
}

impl Config {
    /// Reads the process environment, after applying any `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_ok() {
            info!("Loaded variables from .env");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_page_limit: u64 = try_load(&lookup, "MAX_PAGE_LIMIT", DEFAULT_MAX_PAGE_LIMIT)?;
        if max_page_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_PAGE_LIMIT",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            port: try_load(&lookup, "PORT", DEFAULT_PORT)?,
            mongodb_uri: mongodb_uri(&lookup)?,
            database: try_load(&lookup, "DB_NAME", DEFAULT_DB_NAME)?,
            max_page_limit,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

/// `MONGODB_URI` wins; otherwise the Atlas SRV URI is assembled from parts.
/// The password is read from `DB_PASS`, falling back to `DB_PASSWORD`.
fn mongodb_uri<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = lookup("MONGODB_URI") {
        return Ok(uri);
    }

    let user = lookup("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
    let password = lookup("DB_PASS")
        .or_else(|| {
            let password = lookup("DB_PASSWORD");
            if password.is_some() {
                warn!("DB_PASSWORD is deprecated, use DB_PASS");
            }
            password
        })
        .ok_or(ConfigError::Missing("DB_PASS"))?;
    let host = lookup("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string());

    Ok(format!(
        "mongodb+srv://{}:{}@{host}/?retryWrites=true&w=majority",
        urlencoding::encode(&user),
        urlencoding::encode(&password),
    ))
}
