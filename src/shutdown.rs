use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Install a shutdown handler that listens for SIGTERM and SIGINT.
///
/// Returns a `CancellationToken` that is cancelled when either signal is
/// received. `PredictionService::run` then stops in this order:
///
/// 1. The API server stops accepting connections and finishes in-flight
///    requests, including synchronous predictions.
/// 2. The task queue is closed. Async submissions arriving after this point
///    get `ShuttingDown`.
/// 3. Workers keep dequeuing until every already-queued task is resolved in
///    the job store, then exit.
/// 4. The worker pool is joined and `run` returns.
pub fn install_shutdown_handler() -> std::io::Result<CancellationToken> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, initiating graceful shutdown");
            }
        }

        token_clone.cancel();
    });

    Ok(token)
}
