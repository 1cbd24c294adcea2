//! Dashboard backend: liveness endpoint.
//!
//! This is the application entry point. It parses the command line, loads
//! the optional TOML configuration, initializes tracing, builds the router
//! and runs the HTTP server until SIGINT or SIGTERM.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use dashboard_backend::config::{AppConfig, DEFAULT_CONFIG_PATH};
use dashboard_backend::http::start_server;
use dashboard_backend::{create_router, logging, AppError};

/// Dashboard backend: answers GET /health for liveness probes
#[derive(Parser, Debug)]
#[command(name = "dashboard-backend", version, about)]
struct Args {
    /// Path to configuration file (optional unless given explicitly)
    #[arg(short, long, env = "DASHBOARD_CONFIG")]
    config: Option<String>,

    /// IP address to bind (overrides http.host)
    #[arg(long, env = "DASHBOARD_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides http.port)
    #[arg(short, long, env = "DASHBOARD_PORT")]
    port: Option<u16>,

    /// Log level filter (e.g., "dashboard_backend=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Config errors can happen before the subscriber exists
            if tracing::dispatcher::has_been_set() {
                tracing::error!(error = %e, "Fatal error");
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let explicit = args.config.is_some();
    let config_path = args
        .config
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config_source = if explicit || Path::new(&config_path).exists() {
        config_path.clone()
    } else {
        "built-in defaults".to_string()
    };

    // Load configuration before tracing so the log format can be honored
    let mut config = AppConfig::load_or_default(&config_path, explicit)?;
    config.apply_overrides(args.host, args.port);

    let log_filter = logging::resolve_filter(args.log_level, std::env::var("RUST_LOG").ok());
    logging::init(&log_filter, config.logging.log_format()?)?;

    tracing::info!(
        source = %config_source,
        host = %config.http.host,
        port = config.http.port,
        "Loaded configuration"
    );

    let app = create_router();
    start_server(app, &config).await
}
