use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;

use crate::config::DbConfig;

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Opens the pool, checks that the database answers and brings the schema up to date.
    pub async fn init(db_config: &DbConfig) -> Result<Self> {
        info!(
            "{:<20} - Initializing the DB pool for '{}' at {}:{}",
            "DbManager::init", db_config.db_name, db_config.host, db_config.port
        );
        let max_cons = if cfg!(test) { 1 } else { 5 };

        let db_pool = PgPoolOptions::new()
            .max_connections(max_cons)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(db_config.connection_options())
            .await
            .map_err(Error::FailToCreatePool)?;

        let dm = Self { db: db_pool };
        dm.ping().await?;
        dm.migrate().await?;

        info!("{:<20} - Connected to the database", "DbManager::init");
        Ok(dm)
    }

    /// Creates `db_config.db_name` on the server and migrates it. Used to give every test its own database.
    pub async fn init_fresh(db_config: &DbConfig) -> Result<Self> {
        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;

        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;
        connection.close().await?;

        Self::init(db_config).await
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }

    async fn ping(&self) -> Result<()> {
        let mut connection = self.db.acquire().await?;
        connection.ping().await?;
        Ok(())
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }

    /// Waits for checked-out connections to return and closes the pool.
    pub async fn close(&self) {
        info!("{:<20} - Closing the DB pool", "DbManager::close");
        self.db.close().await;
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(sqlx::Error),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}
