use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Resolves on the first of Ctrl+C, SIGTERM, SIGHUP, SIGQUIT or `token` being cancelled,
/// and cancels `token` so every other listener learns about it too.
pub async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(er) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {er}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let unix_signals = async {
        use signal::unix::SignalKind;

        tokio::select! {
            () = wait_for(SignalKind::terminate(), "SIGTERM") => {},
            () = wait_for(SignalKind::hangup(), "SIGHUP") => {},
            () = wait_for(SignalKind::quit(), "SIGQUIT") => {},
        }
    };

    #[cfg(not(unix))]
    let unix_signals = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = unix_signals => {},
        () = token.cancelled() => info!("Shutdown requested"),
    }

    token.cancel();
}

#[cfg(unix)]
async fn wait_for(kind: signal::unix::SignalKind, name: &str) {
    match signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
            info!("Received {name} signal");
        }
        Err(er) => {
            error!("failed to install {name} handler: {er}");
            std::future::pending::<()>().await;
        }
    }
}
