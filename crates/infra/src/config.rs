//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_IMAGE_STORAGE_DIR: &str = "storage/app/public";
pub const DEFAULT_PUBLIC_STORAGE_PREFIX: &str = "/storage";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be set")]
    Missing { key: &'static str },

    #[error("invalid {key} {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which product store backs the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Sqlite { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub storage: StorageConfig,
    /// Root directory uploaded images are written under.
    pub image_storage_dir: PathBuf,
    /// URL path prefix uploaded images are served from (no trailing slash).
    pub public_storage_prefix: String,
    pub seed_demo_products: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let storage = if flag(get("USE_PERSISTENT_STORES"), "USE_PERSISTENT_STORES")? {
            let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing {
                key: "DATABASE_URL",
            })?;
            StorageConfig::Sqlite { database_url }
        } else {
            StorageConfig::InMemory
        };

        let image_storage_dir = PathBuf::from(
            get("IMAGE_STORAGE_DIR").unwrap_or_else(|| DEFAULT_IMAGE_STORAGE_DIR.to_string()),
        );

        let prefix_raw = get("PUBLIC_STORAGE_PREFIX")
            .unwrap_or_else(|| DEFAULT_PUBLIC_STORAGE_PREFIX.to_string());
        let public_storage_prefix = prefix_raw.trim_end_matches('/').to_string();
        if !public_storage_prefix.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "PUBLIC_STORAGE_PREFIX",
                value: prefix_raw,
                reason: "must be an absolute path such as /storage".to_string(),
            });
        }

        let seed_demo_products = flag(get("SEED_DEMO_PRODUCTS"), "SEED_DEMO_PRODUCTS")?;

        Ok(Self {
            bind_addr,
            jwt_secret,
            storage,
            image_storage_dir,
            public_storage_prefix,
            seed_demo_products,
        })
    }
}

fn flag(value: Option<String>, key: &'static str) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}
