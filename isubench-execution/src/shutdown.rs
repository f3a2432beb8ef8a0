//! Run-wide cancellation

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Owns the root token of a run plus any deadline armed on it
#[derive(Debug, Default)]
pub struct RunContext {
    token: CancellationToken,
    deadline: Option<JoinHandle<()>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context cancelled along with `parent`
    pub fn from_parent(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
            deadline: None,
        }
    }

    /// A context whose token fires by itself after `limit`
    pub fn with_deadline(limit: Duration) -> Self {
        let mut ctx = Self::new();
        ctx.arm_deadline(limit);
        ctx
    }

    /// Cancel the token after `limit`; replaces any earlier deadline
    pub fn arm_deadline(&mut self, limit: Duration) {
        if let Some(previous) = self.deadline.take() {
            previous.abort();
        }
        let token = self.token.clone();
        self.deadline = Some(tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(limit) => {
                    debug!("Run deadline of {:?} reached", limit);
                    token.cancel();
                }
            }
        }));
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// A token cancelled with this context but cancellable on its own
    pub fn child(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for RunContext {
    fn drop(&mut self) {
        if let Some(deadline) = self.deadline.take() {
            deadline.abort();
        }
    }
}

/// Sleep unless cancelled first; `true` when the full duration elapsed
pub async fn sleep_with_cancel(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, cancelling the run");
}
