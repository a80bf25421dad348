//! Skydio webhook service.
//!
//! # Architecture Overview
//!
//! ```text
//!   app.env ──▶ config ──▶ Arc<ConfigSnapshot>
//!                                 │
//!                                 ▼
//!   SIGINT/SIGTERM ──▶ lifecycle coordinator ◀── server failure
//!                                 │
//!                                 ▼
//!               net listener ──▶ http server ──▶ routes
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use skydio_webhook::lifecycle::startup;
use skydio_webhook::observability::{init_logging, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "skydio-webhook", version, about = "Skydio webhook service")]
struct Args {
    /// Directory holding app.env, or the env file itself.
    #[arg(long, env = "CONFIG_PATH", default_value = "./")]
    config_path: PathBuf,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = %args.config_path.display(),
        "skydio-webhook starting"
    );

    match startup::start(&args.config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}
