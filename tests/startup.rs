//! Startup aborts before any listener exists when configuration is invalid.

use skydio_webhook::config::{ConfigError, ValidationError};
use skydio_webhook::lifecycle::startup::{start, StartupError};

#[tokio::test]
async fn test_empty_host_list_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.env"), "DB_HOSTS=\nWEB_API_HOST=127.0.0.1:28290\n").unwrap();

    let err = start(dir.path()).await.unwrap_err();

    match err {
        StartupError::Config(ConfigError::Invalid(errors)) => {
            assert_eq!(errors, vec![ValidationError::EmptyHostList { key: "DB_HOSTS" }]);
        }
        other => panic!("expected invalid configuration, got {other:?}"),
    }
    assert!(tokio::net::TcpStream::connect("127.0.0.1:28290").await.is_err());
}

#[tokio::test]
async fn test_missing_env_file_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();

    let err = start(dir.path()).await.unwrap_err();
    assert!(matches!(err, StartupError::Config(ConfigError::Unreadable { .. })));
}
