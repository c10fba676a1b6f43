use error_stack::{Report, ResultExt};
use repositories::mongodb::{DEFAULT_COLLECTION_NAME, DEFAULT_DB_NAME};

const DATABASE_URL_VAR: &str = "DATABASE_URL";
const DB_NAME_VAR: &str = "DISCUSSIONS_DB_NAME";
const COLLECTION_VAR: &str = "DISCUSSIONS_COLLECTION";
const PORT_VAR: &str = "DISCUSSIONS_PORT";
const METRICS_VAR: &str = "DISCUSSIONS_METRICS";

const DEFAULT_DATABASE_URL: &str = "mongodb://127.0.0.1:27017";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, thiserror::Error)]
#[error("invalid service configuration")]
pub struct ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub db_name: String,
    pub collection: String,
    pub port: u16,
    pub metrics_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, Report<ConfigError>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Report<ConfigError>> {
        let port = match lookup(PORT_VAR) {
            Some(port) => port
                .parse::<u16>()
                .change_context(ConfigError)
                .attach_with(|| format!("{PORT_VAR} must be a port number, got '{port}'"))?,
            None => DEFAULT_PORT,
        };

        let metrics_enabled = match lookup(METRICS_VAR) {
            Some(enabled) => enabled
                .parse::<bool>()
                .change_context(ConfigError)
                .attach_with(|| format!("{METRICS_VAR} must be true or false, got '{enabled}'"))?,
            None => true,
        };

        Ok(Self {
            database_url: lookup(DATABASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            db_name: lookup(DB_NAME_VAR).unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            collection: lookup(COLLECTION_VAR)
                .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string()),
            port,
            metrics_enabled,
        })
    }
}
