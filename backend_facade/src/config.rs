//! Backend configuration read from the environment.

use std::{env, fmt, str::FromStr};

use crate::errors::StorageError;

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 27017;
pub const DEFAULT_DB_DATABASE: &str = "files_manager";
pub const DEFAULT_CACHE_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mongodb" | "mongo" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            t => Err(StorageError::Config(format!(
                "Unsupported data store type: {t}. Supported types are 'mongodb' and 'memory'"
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mongo => write!(f, "mongodb"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            t => Err(StorageError::Config(format!(
                "Unsupported cache store type: {t}. Supported types are 'redis' and 'memory'"
            ))),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redis => write!(f, "redis"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Document store settings (`DB_HOST`, `DB_PORT`, `DB_DATABASE`, `DB_STORE_TYPE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Mongo,
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            database: DEFAULT_DB_DATABASE.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend = match lookup("DB_STORE_TYPE") {
            Some(t) => t.parse()?,
            None => defaults.backend,
        };
        let port = match lookup("DB_PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| StorageError::Config(format!("Invalid DB_PORT: {p}")))?,
            None => defaults.port,
        };

        let host = lookup("DB_HOST").unwrap_or(defaults.host);
        if host.is_empty()
            || host
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | ','))
        {
            return Err(StorageError::Config(format!("Invalid DB_HOST: {host:?}")));
        }

        Ok(Self {
            backend,
            host,
            port,
            database: lookup("DB_DATABASE").unwrap_or(defaults.database),
        })
    }

    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}

/// Cache settings (`CACHE_STORE_TYPE`, `CACHE_URL`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            url: DEFAULT_CACHE_URL.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend = match lookup("CACHE_STORE_TYPE") {
            Some(t) => t.parse()?,
            None => defaults.backend,
        };

        Ok(Self {
            backend,
            url: lookup("CACHE_URL").unwrap_or(defaults.url),
        })
    }
}
