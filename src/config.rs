use crate::errors::ConfigError;
use crate::models::EarningsPolicy;
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/records.json";

/// Settings read once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub admin_password: String,
    pub earnings_policy: EarningsPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let admin_password = lookup("ADMIN_PASSWORD")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?;

        let earnings_policy = match lookup("EARNINGS_POLICY") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "EARNINGS_POLICY",
                value,
            })?,
            None => EarningsPolicy::default(),
        };

        Ok(Self {
            port,
            data_path,
            admin_password,
            earnings_policy,
        })
    }
}
