use std::env;

use crate::error::ConfigError;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    /// Reads the service configuration from the process environment.
    ///
    /// Call `dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("HTTP_PORT").ok_or(ConfigError::Missing("HTTP_PORT"))?;
        let port = port.parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "HTTP_PORT",
            value: port.clone(),
        })?;

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse::<u32>().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_MAX_CONNECTIONS",
                value: value.clone(),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Config {
            host: lookup("HTTP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url,
            max_connections,
        })
    }
}
