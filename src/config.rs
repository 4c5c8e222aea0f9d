use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

/// PostgreSQL connection settings, read once at startup and passed to the
/// services that need them. The target database itself is chosen at runtime,
/// so only the server coordinates live here.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database used for CREATE/DROP DATABASE statements.
    pub maintenance_db: String,
}

impl DbConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            host: get_env("DB_HOST")?,
            port: get_env_parse("DB_PORT")?,
            user: get_env("DB_USER")?,
            password: get_env("DB_PASSWORD")?,
            maintenance_db: env::var("DB_MAINTENANCE").unwrap_or_else(|_| "postgres".to_string()),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}
