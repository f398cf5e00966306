//! Cooperative cancellation of a check run
//!
//! A run stops dispatching new fetches and checks once its token is
//! cancelled. Work already in flight is allowed to finish, and everything
//! resolved so far stays in the report.

use tokio::task::JoinHandle;
pub use tokio_util::sync::CancellationToken;

/// Cancels `token` when the process receives Ctrl+C
///
/// The listener exits quietly if the token is cancelled first.
pub fn spawn_interrupt_listener(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => {
                        tracing::warn!("Interrupt received, finishing in-flight checks");
                        token.cancel();
                    }
                    Err(e) => tracing::error!("Failed to listen for interrupt: {}", e),
                }
            }
            _ = token.cancelled() => {}
        }
    })
}
