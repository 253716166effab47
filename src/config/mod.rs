//! Builds an `AppConfig` from environment variables.
//!
//! `SERVER_*` variables configure the listener, `DB_*` variables the database connection.
//! A `DATABASE_URL` overrides every `DB_*` variable when it is set.
//! Nothing is cached here; the caller owns the loaded config and passes it on.

mod error;
mod types;

use std::collections::BTreeMap;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use tracing::{info, warn};

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, DbConfig, DbKind, ServerConfig, SslRequire};

impl AppConfig {
    /// Loads and validates the configuration, failing on the first missing or invalid value.
    pub fn load() -> ConfigResult<Self> {
        info!("{:<20} - Loading the configuration", "AppConfig::load");

        let server_config: ServerConfig = Figment::new()
            .merge(Env::prefixed("SERVER_"))
            .merge(text_env("SERVER_", SERVER_TEXT_KEYS))
            .extract()?;
        server_config.validate()?;

        let db_config = match std::env::var("DATABASE_URL") {
            Ok(url) => DbConfig::try_from(url.as_str())?,
            Err(_) => Figment::new()
                .merge(Env::prefixed("DB_"))
                .merge(text_env("DB_", DB_TEXT_KEYS))
                .extract::<DbConfig>()?,
        };
        db_config.validate()?;

        if db_config.is_default_endpoint() {
            warn!("using the default database endpoint localhost:5432");
        }

        Ok(AppConfig {
            server_config,
            db_config,
        })
    }
}

const SERVER_TEXT_KEYS: &[&str] = &["host"];
const DB_TEXT_KEYS: &[&str] = &["host", "user", "password", "name"];

/// `Env` parses values, so `DB_PASSWORD=12345` would arrive as a number and `007` as `7`.
/// Layers the raw text back on top for the keys that are plain strings.
fn text_env(prefix: &str, keys: &[&str]) -> Serialized<BTreeMap<String, String>> {
    let text = Env::prefixed(prefix)
        .only(keys)
        .iter()
        .map(|(key, value)| (key.as_str().to_string(), value))
        .collect();

    Serialized::defaults(text)
}

// ###################################
// ->   TESTS
// ###################################
