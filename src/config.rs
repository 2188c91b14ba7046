use crate::listing::{Owner, DEFAULT_MAX_KEYS};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Buckets created at startup.
    pub initial_buckets: Vec<String>,
    pub owner_id: String,
    pub owner_display_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    /// Page size used when a request carries no `max-keys`.
    pub default_max_keys: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 9090,
            },
            storage: StorageConfig {
                initial_buckets: Vec::new(),
                owner_id: "79a59df900b949e55d96a1e698fbacedfd6e09d98eacf8f8d5218e7cd47ef2be"
                    .to_string(),
                owner_display_name: "s3-mock-file-store".to_string(),
            },
            listing: ListingConfig {
                default_max_keys: DEFAULT_MAX_KEYS,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or(defaults.server.host),
                port: match env::var("PORT") {
                    Ok(port) => port.parse()?,
                    Err(_) => defaults.server.port,
                },
            },
            storage: StorageConfig {
                initial_buckets: env::var("INITIAL_BUCKETS")
                    .map(|buckets| parse_list(&buckets))
                    .unwrap_or(defaults.storage.initial_buckets),
                owner_id: env::var("OWNER_ID").unwrap_or(defaults.storage.owner_id),
                owner_display_name: env::var("OWNER_DISPLAY_NAME")
                    .unwrap_or(defaults.storage.owner_display_name),
            },
            listing: ListingConfig {
                default_max_keys: match env::var("DEFAULT_MAX_KEYS") {
                    Ok(max_keys) => max_keys.parse()?,
                    Err(_) => defaults.listing.default_max_keys,
                },
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.listing.default_max_keys < 0 {
            bail!(
                "DEFAULT_MAX_KEYS must not be negative, got {}",
                self.listing.default_max_keys
            );
        }
        Ok(())
    }

    pub fn owner(&self) -> Owner {
        Owner {
            id: self.storage.owner_id.clone(),
            display_name: self.storage.owner_display_name.clone(),
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_buckets_are_comma_separated() {
        assert_eq!(parse_list("a-bucket, b-bucket,,"), vec!["a-bucket", "b-bucket"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn negative_default_page_size_is_rejected() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.listing.default_max_keys = -1;
        assert!(config.validate().is_err());
    }
}
