//! Graceful shutdown: one signal, one bounded drain.
//!
//! The server is either [`Phase::Serving`] or [`Phase::Draining`]. The only transition is
//! `Serving -> Draining`, made by [`ShutdownController::trigger`] (usually from
//! [`listen_for_signals`]). Once draining, the listener stops accepting connections and
//! in-flight requests get `drain_timeout` to finish before [`serve`] gives up on them.

use axum::Router;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Serving,
    Draining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every in-flight request finished within the deadline (or the server stopped on its own).
    Completed,
    /// The deadline elapsed with requests still running; their connections were abandoned.
    TimedOut,
}

#[derive(Clone, Debug)]
pub struct ShutdownController {
    phase: Arc<watch::Sender<Phase>>,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Phase::Serving);
        Self { phase: Arc::new(tx) }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Enters `Draining`. Returns `false` if shutdown was already triggered.
    pub fn trigger(&self) -> bool {
        self.phase.send_if_modified(|phase| match phase {
            Phase::Serving => {
                *phase = Phase::Draining;
                true
            }
            Phase::Draining => false,
        })
    }

    /// Resolves once the controller has entered `Draining`.
    pub async fn draining(&self) {
        let mut rx = self.phase.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|phase| *phase == Phase::Draining).await;
    }
}

/// Waits for Ctrl+C (or SIGTERM on unix) and then triggers `controller`.
pub async fn listen_for_signals(controller: ShutdownController) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
    controller.trigger();
}

/// Serves `router` on `listener` until `controller` enters `Draining`, then drains for at most
/// `drain_timeout`.
///
/// A drain that overruns the deadline is logged and reported as [`DrainOutcome::TimedOut`];
/// it is not an error. The caller releases the store after this returns.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    controller: ShutdownController,
    drain_timeout: Duration,
) -> std::io::Result<DrainOutcome> {
    let signal = controller.clone();
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move { signal.draining().await })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result?;
            return Ok(DrainOutcome::Completed);
        }
        _ = controller.draining() => {}
    }

    tracing::info!(
        timeout_ms = drain_timeout.as_millis() as u64,
        "draining in-flight requests"
    );
    match tokio::time::timeout(drain_timeout, &mut server).await {
        Ok(result) => {
            result?;
            tracing::info!("drain completed");
            Ok(DrainOutcome::Completed)
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = drain_timeout.as_millis() as u64,
                "drain deadline elapsed with requests in flight, forcing close"
            );
            Ok(DrainOutcome::TimedOut)
        }
    }
}
