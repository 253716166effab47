use subscription_aggregator::{config::AppConfig, App, Result};

use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    // We have a different logging mechanism for production
    #[cfg(not(debug_assertions))]
    {
        subscription_aggregator::init_production_tracing()
    }
    #[cfg(debug_assertions)]
    {
        subscription_aggregator::init_dbg_tracing();
    }

    let config = AppConfig::load()?;
    let (app, dm) = App::build_from_config(&config).await?;

    let served = subscription_aggregator::serve(app, CancellationToken::new()).await;
    dm.close().await;

    Ok(served?)
}
