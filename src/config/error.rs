pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse 'DbConfig' from the provided DATABASE_URL.")]
    StringToDbConfigFail,
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),

    #[error("failed to load configuration from the environment: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        ConfigError::Figment(Box::new(value))
    }
}
