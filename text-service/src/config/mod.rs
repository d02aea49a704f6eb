use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct TextConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub repository: RepositoryConfig,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    pub backend: RepositoryBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryBackend {
    Mongo,
    Memory,
}

impl TextConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let backend: RepositoryBackend = get_env("REPOSITORY_BACKEND", Some("mongo"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        // The URI is only mandatory when it is actually going to be dialled.
        let uri = match backend {
            RepositoryBackend::Mongo => get_env("MONGODB_URI", None, is_prod)?,
            RepositoryBackend::Memory => env::var("MONGODB_URI").unwrap_or_default(),
        };

        Ok(TextConfig {
            common: common_config,
            repository: RepositoryConfig { backend },
            mongodb: MongoConfig {
                uri: Secret::new(uri),
                database: get_env("MONGODB_DATABASE", Some("text_db"), is_prod)?,
                collection: get_env("MONGODB_COLLECTION", Some("text"), is_prod)?,
            },
        })
    }
}

impl std::str::FromStr for RepositoryBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(RepositoryBackend::Mongo),
            "memory" => Ok(RepositoryBackend::Memory),
            _ => Err(format!("Invalid repository backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
