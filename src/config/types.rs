//! The configuration structs used to build the AppConfig, and their impls.
use std::time::Duration;

use lazy_regex::regex_captures;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};

use crate::config::{ConfigError, ConfigResult};

// ###################################
// ->   STRUCTS
// ###################################
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_config: ServerConfig,
    pub db_config: DbConfig,
}

/// Read from the `SERVER_*` environment variables.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

/// Read from the `DB_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct DbConfig {
    #[serde(rename = "type", default)]
    pub kind: DbKind,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(rename = "user", default = "default_db_user")]
    pub username: String,
    pub password: SecretString,
    #[serde(rename = "name", default = "default_db_name")]
    pub db_name: String,
    #[serde(rename = "sslmode", default)]
    pub require_ssl: SslRequire,
}

/// Only postgres has a driver compiled in.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DbKind {
    #[default]
    Postgres,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SslRequire {
    #[default]
    Disable,
    Prefer,
    #[serde(alias = "enable")]
    Require,
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}
fn default_db_host() -> String {
    "localhost".into()
}
fn default_db_port() -> u16 {
    5432
}
fn default_db_user() -> String {
    "user".into()
}
fn default_db_name() -> String {
    "db".into()
}

// ###################################
// ->   IMPLs
// ###################################
impl ServerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("SERVER_HOST is required"));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "SERVER_PORT must be in the range 1-65535",
            ));
        }
        Ok(())
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl DbConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("DB_PORT must be in the range 1-65535"));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("DB_HOST is required"));
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::Invalid("DB_USER is required"));
        }
        if self.db_name.trim().is_empty() {
            return Err(ConfigError::Invalid("DB_NAME is required"));
        }
        if self.password.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid("DB_PASSWORD is required"));
        }
        Ok(())
    }

    pub fn is_default_endpoint(&self) -> bool {
        self.host.trim() == "localhost" && self.port == 5432
    }

    pub fn connection_options(&self) -> PgConnectOptions {
        self.connection_options_without_db().database(&self.db_name)
    }
    pub fn connection_options_without_db(&self) -> PgConnectOptions {
        // Create new PgConnectOptions struct but don't try to use the '$HOME/.pgpass' file.
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(self.require_ssl.into())
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

impl From<SslRequire> for PgSslMode {
    fn from(value: SslRequire) -> Self {
        match value {
            SslRequire::Require => PgSslMode::Require,
            SslRequire::Disable => PgSslMode::Disable,
            SslRequire::Prefer => PgSslMode::Prefer,
        }
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<&str> for DbConfig {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // postgres://{username}:{password}@{hostname}:{port}/{database}?{options}
        let (_whole, username, password, host, port, db_name, options) = regex_captures!(
            r#"^postgres(?:ql)?:\/\/([^:]+):([^@]+)@([^:\/]+):(\d+)\/([^\s\/?]+)(\?[^\s]*)?$"#,
            value
        )
        .ok_or(Self::Error::StringToDbConfigFail)?;

        let (username, db_name, host) =
            (username.to_string(), db_name.to_string(), host.to_string());
        let password = SecretString::from(password.to_string());
        let port = port
            .parse()
            .map_err(|_| Self::Error::StringToDbConfigFail)?;

        let mut require_ssl = SslRequire::default();
        if let Some(options) = options.strip_prefix('?') {
            for option in options.split(['&', ',']) {
                if let Some(("sslmode", val)) = option.split_once('=') {
                    match val {
                        "disable" => require_ssl = SslRequire::Disable,
                        "prefer" => require_ssl = SslRequire::Prefer,
                        "require" | "enable" => require_ssl = SslRequire::Require,
                        _ => return Err(Self::Error::StringToDbConfigFail),
                    }
                }
            }
        }

        Ok(DbConfig {
            kind: DbKind::Postgres,
            username,
            password,
            port,
            host,
            db_name,
            require_ssl,
        })
    }
}

// ###################################
// ->   TESTS
// ###################################
