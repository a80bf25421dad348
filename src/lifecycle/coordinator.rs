//! Server lifecycle coordination.
//!
//! Runs the HTTP server on its own task and waits for whichever comes
//! first: the server failing, or a termination signal. A signal starts a
//! bounded drain; if the drain overruns, the server task is aborted, which
//! drops the listener and every open connection.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::config::ConfigSnapshot;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::{SignalListener, TerminationSignal};
use crate::lifecycle::state::{LifecycleState, StateMachine};
use crate::net::ListenerError;

/// Error type for a server run.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server error: listener failed to start: {0}")]
    ListenerStart(#[source] ListenerError),

    #[error("server error: {0}")]
    ListenerRuntime(#[source] ListenerError),

    #[error("server error: listener exited unexpectedly")]
    ListenerExited,

    #[error("could not stop server gracefully within {timeout:?}")]
    ShutdownTimeout { timeout: Duration },

    #[error("failed to register signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    #[error("server lifecycle already started")]
    AlreadyStarted,
}

impl From<ListenerError> for ServerError {
    fn from(error: ListenerError) -> Self {
        match error {
            ListenerError::Bind { .. } => ServerError::ListenerStart(error),
            _ => ServerError::ListenerRuntime(error),
        }
    }
}

/// Owns the HTTP listener for one run.
#[derive(Debug)]
pub struct ServerLifecycle {
    config: Arc<ConfigSnapshot>,
    state: StateMachine,
}

impl ServerLifecycle {
    pub fn new(config: Arc<ConfigSnapshot>) -> Self {
        Self {
            config,
            state: StateMachine::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state.current()
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn history(&self) -> Vec<LifecycleState> {
        self.state.history()
    }

    /// Serve `handler` until SIGINT/SIGTERM or a server failure.
    pub async fn run(&self, handler: Router) -> Result<(), ServerError> {
        // Registered before the listener exists so an early signal is not lost.
        let signals = SignalListener::register().map_err(ServerError::Signal)?;
        self.run_until(handler, signals.recv()).await
    }

    /// Serve `handler` until `shutdown` resolves or the server fails.
    pub async fn run_until<F>(&self, handler: Router, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = TerminationSignal>,
    {
        let stop = Shutdown::new();
        let server = HttpServer::new(handler, self.config.web.clone());
        let server_stop = stop.subscribe();
        self.supervise(server.run(server_stop), stop, shutdown).await
    }

    /// Drive `server` on its own task against `shutdown`.
    async fn supervise<S, F>(&self, server: S, stop: Shutdown, shutdown: F) -> Result<(), ServerError>
    where
        S: Future<Output = Result<(), ListenerError>> + Send + 'static,
        F: Future<Output = TerminationSignal>,
    {
        self.state
            .advance(LifecycleState::Running)
            .map_err(|_| ServerError::AlreadyStarted)?;
        tracing::info!(host = %self.config.web.api_host, "Starting API router");

        let (failure_tx, mut failure_rx) = oneshot::channel();
        let mut server_task = tokio::spawn(async move {
            if let Err(e) = server.await {
                tracing::error!(error = %e, "HTTP server failed");
                let _ = failure_tx.send(e);
            }
        });

        tokio::pin!(shutdown);

        tokio::select! {
            biased;

            failure = &mut failure_rx => {
                let error = match failure {
                    Ok(e) => ServerError::from(e),
                    Err(_) => ServerError::ListenerExited,
                };
                self.enter(LifecycleState::Stopped);
                Err(error)
            }
            signal = &mut shutdown => {
                tracing::info!(signal = %signal, "Shutdown started");
                self.enter(LifecycleState::ShuttingDown);
                stop.trigger();

                let timeout = self.config.web.shutdown_timeout;
                let result = match tokio::time::timeout(timeout, &mut server_task).await {
                    Ok(Err(e)) => {
                        tracing::error!(error = %e, "HTTP server task panicked during shutdown");
                        Err(ServerError::ListenerExited)
                    }
                    // A listener that failed while draining, e.g. never bound, is still a failure.
                    Ok(Ok(())) => match failure_rx.try_recv() {
                        Ok(e) => Err(ServerError::from(e)),
                        Err(_) => Ok(()),
                    },
                    Err(_) => {
                        tracing::warn!(timeout = ?timeout, "Drain timed out, closing listener");
                        server_task.abort();
                        let _ = server_task.await;
                        Err(ServerError::ShutdownTimeout { timeout })
                    }
                };

                self.enter(LifecycleState::Stopped);
                tracing::info!(signal = %signal, "Shutdown complete");
                result
            }
        }
    }

    fn enter(&self, next: LifecycleState) {
        if let Err(e) = self.state.advance(next) {
            tracing::warn!(error = %e, "Ignoring lifecycle transition");
        }
    }
}
