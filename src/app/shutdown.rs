//! Graceful shutdown handling.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Stops the poll loop and the status server and waits for both.
///
/// `server` is `None` when the server task has already finished.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    poller: JoinHandle<()>,
    server: Option<JoinHandle<Result<(), anyhow::Error>>>,
) {
    cancel.cancel();
    if let Err(e) = poller.await {
        log::warn!("Poll task ended abnormally: {}", e);
    }
    if let Some(server) = server {
        match server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("{:#}", e),
            Err(e) => log::warn!("Status server task ended abnormally: {}", e),
        }
    }
}
