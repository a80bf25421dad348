//! Shared utilities for lifecycle integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use skydio_webhook::config::{ConfigSnapshot, WebConfig};
use tokio::net::TcpStream;

/// Snapshot serving on `addr` with test-friendly timeouts.
pub fn test_config(addr: SocketAddr, shutdown_timeout: Duration) -> Arc<ConfigSnapshot> {
    let mut config = ConfigSnapshot::default();
    config.database.hosts = vec!["127.0.0.1".into()];
    config.web = WebConfig {
        api_host: addr.to_string(),
        read_timeout: Duration::from_secs(5),
        write_timeout: Duration::from_secs(30),
        idle_timeout: Duration::from_secs(30),
        shutdown_timeout,
        max_connections: 64,
    };
    Arc::new(config)
}

/// Poll until something accepts connections on `addr`.
pub async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("server never started listening on {addr}");
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
