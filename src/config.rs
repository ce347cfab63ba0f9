use std::env;
use std::str::FromStr;

use crate::db::postgres::is_valid_collection_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: StoreBackend,
    pub collection: String,
    pub max_connections: u32,
    pub bind_address: String,
    pub telemetry_key: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

impl Settings {
    /// Reads settings from the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("EMPLOYEE_STORE").as_deref().unwrap_or("postgres") {
            "postgres" => {
                let database_url = lookup("DATABASE_URL")
                    .filter(|url| !url.is_empty())
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?;
                StoreBackend::Postgres { database_url }
            }
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "EMPLOYEE_STORE",
                    value: other.to_string(),
                })
            }
        };

        let collection = lookup("EMPLOYEE_COLLECTION").unwrap_or_else(|| "employees".to_string());
        if !is_valid_collection_name(&collection) {
            return Err(ConfigError::Invalid {
                name: "EMPLOYEE_COLLECTION",
                value: collection,
            });
        }

        Ok(Settings {
            backend,
            collection,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            telemetry_key: lookup("TELEMETRY_KEY").filter(|key| !key.is_empty()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
