mod serve;
mod shutdown;

// re-export
pub use serve::{serve, ServeError};
pub use shutdown::shutdown_signal;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::AppConfig, database::DbManager, manager::Manager, storage::PgStorage,
    storage::SubscriptionStorage, Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
    /// How long in-flight requests get to finish once shutdown has been triggered.
    pub shutdown_timeout: Duration,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener, shutdown_timeout: Duration) -> Self {
        App {
            app_state,
            listener,
            shutdown_timeout,
        }
    }

    /// Connects to the database and binds the listener described by `config`.
    /// The returned `DbManager` is handed back so the caller can close the pool after serving.
    pub async fn build_from_config(config: &AppConfig) -> Result<(Self, DbManager)> {
        let dm = DbManager::init(&config.db_config).await?;
        let storage = Arc::new(PgStorage::new(dm.db().clone()));
        let app_state = AppState::new(Manager::new(storage));

        let server_config = &config.server_config;
        let listener = TcpListener::bind((server_config.host.as_str(), server_config.port))
            .await
            .with_context(|| {
                format!(
                    "failed to bind {}:{}",
                    server_config.host, server_config.port
                )
            })?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener, server_config.shutdown_timeout());
        Ok((app, dm))
    }
}

pub struct InternalState {
    pub manager: Manager,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(manager: Manager) -> Self {
        AppState(Arc::new(InternalState { manager }))
    }

    /// State over an arbitrary storage backend.
    pub fn with_storage(storage: Arc<dyn SubscriptionStorage>) -> Self {
        Self::new(Manager::new(storage))
    }
}
