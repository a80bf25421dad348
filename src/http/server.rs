//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the supplied handler with middleware (timeout, request ID, tracing)
//! - Bind the listener and run the accept loop
//! - Serve each connection over HTTP/1.1 or HTTP/2
//! - Enforce read, write and idle timeouts
//! - Stop accepting and drain connections when asked to

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper::{body::Incoming, service::service_fn, Request};
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::conn::auto,
};
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tower::ServiceExt;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::WebConfig;
use crate::lifecycle::shutdown::ShutdownListener;
use crate::net::listener::ConnectionPermit;
use crate::net::{ConnectionTracker, IdleClock, Listener, ListenerError};

/// HTTP server hosting a single router.
pub struct HttpServer {
    router: Router,
    web: WebConfig,
    tracker: ConnectionTracker,
}

impl HttpServer {
    /// Create a server for `handler` using the listener settings in `web`.
    pub fn new(handler: Router, web: WebConfig) -> Self {
        let router = Self::build_router(handler, &web);
        Self {
            router,
            web,
            tracker: ConnectionTracker::new(),
        }
    }

    /// Wrap the handler with all middleware layers.
    #[allow(deprecated)]
    fn build_router(handler: Router, web: &WebConfig) -> Router {
        handler
            .layer(TimeoutLayer::new(web.write_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Bind the configured address and serve until `stop` fires.
    ///
    /// Returns once every connection has finished. Dropping the returned
    /// future closes the listener and aborts all open connections.
    pub async fn run(self, mut stop: ShutdownListener) -> Result<(), ListenerError> {
        let listener = Listener::bind(&self.web.api_host, self.web.max_connections).await?;
        let addr = listener.local_addr().map_err(|source| ListenerError::Bind {
            addr: self.web.api_host.clone(),
            source,
        })?;
        tracing::info!(address = %addr, "HTTP server started");

        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                _ = stop.wait() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        self.spawn_connection(&mut connections, stream, peer, permit, stop.clone());
                    }
                    Err(e) if e.is_transient() => {
                        tracing::debug!(error = %e, "Transient accept error");
                    }
                    Err(e) => return Err(e),
                },
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    log_join(joined);
                }
            }
        }

        drop(listener);
        tracing::info!(
            address = %addr,
            open_connections = self.tracker.active_count(),
            "Listener closed, draining connections"
        );

        while let Some(joined) = connections.join_next().await {
            log_join(joined);
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    fn spawn_connection(
        &self,
        connections: &mut JoinSet<()>,
        stream: TcpStream,
        peer: SocketAddr,
        permit: ConnectionPermit,
        stop: ShutdownListener,
    ) {
        let guard = self.tracker.track();
        let router = self.router.clone();
        let read_timeout = self.web.read_timeout;
        let idle_timeout = self.web.idle_timeout;

        connections.spawn(async move {
            let _permit = permit;
            let id = guard.id();
            tracing::debug!(connection_id = %id, peer_addr = %peer, "Serving connection");

            if let Err(e) = serve_connection(stream, router, read_timeout, idle_timeout, stop).await {
                tracing::debug!(connection_id = %id, peer_addr = %peer, error = %e, "Connection error");
            }

            drop(guard);
        });
    }
}

async fn serve_connection(
    stream: TcpStream,
    router: Router,
    read_timeout: Duration,
    idle_timeout: Duration,
    mut stop: ShutdownListener,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let clock = IdleClock::new();
    let service = {
        let clock = Arc::clone(&clock);
        service_fn(move |request: Request<Incoming>| {
            let activity = clock.begin();
            let router = router.clone();
            async move {
                let response = router.oneshot(request).await;
                drop(activity);
                response
            }
        })
    };

    let mut builder = auto::Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(read_timeout);

    let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
    tokio::pin!(conn);

    let mut closing = false;
    loop {
        tokio::select! {
            result = conn.as_mut() => return result,
            _ = stop.wait(), if !closing => {
                conn.as_mut().graceful_shutdown();
                closing = true;
            }
            _ = tokio::time::sleep_until(clock.next_deadline(idle_timeout)), if !closing => {
                if clock.is_idle(idle_timeout) {
                    tracing::debug!(idle_timeout = ?idle_timeout, "Closing idle connection");
                    conn.as_mut().graceful_shutdown();
                    closing = true;
                }
            }
        }
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::error!(error = %e, "Connection task panicked");
        }
    }
}
