//! urlshort: path-based redirect server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ JSON table ──▶ YAML table ──▶ static paths ──▶ terminal
//!                                        │               │               │              │
//!     Client Response                    ▼               ▼               ▼              ▼
//!     ◀──────────────────────────── 302 Found       302 Found       302 Found     fallback body
//! ```
//!
//! Without `--config` the demo tables are served on 0.0.0.0:8080.

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, Method, Request},
};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower::ServiceExt;

use urlshort::config::{load_config, validate_config, ConfigError, ServerConfig};
use urlshort::http::HttpServer;
use urlshort::lifecycle::{signals, startup, Shutdown};
use urlshort::observability::logging;

#[derive(Parser)]
#[command(name = "urlshort", version)]
#[command(about = "Redirects request paths to configured URLs", long_about = None)]
struct Cli {
    /// Server configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long, global = true)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the redirect server (default)
    Serve,
    /// Validate configuration and redirect tables
    Check,
    /// Show how a single request path would be answered
    Resolve {
        /// Request path, e.g. /urlshort
        path: String,

        /// Request method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init(&config.observability)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::Check => check(&config)?,
        Commands::Resolve { path, method } => resolve(config, &path, &method).await?,
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ServerConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::demo(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    Ok(config)
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("urlshort v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        signals::forward_to(&shutdown).await;
    });

    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let chain = startup::build_chain(
        &config.redirects,
        startup::terminal_handler(&config.fallback),
    )?;

    for (source, paths) in startup::route_counts(&chain) {
        println!("{:<8} {} path(s)", source, paths);
    }
    println!("configuration OK");
    Ok(())
}

async fn resolve(config: ServerConfig, path: &str, method: &str) -> Result<(), Box<dyn std::error::Error>> {
    let server = HttpServer::new(config)?;
    let request = Request::builder()
        .method(Method::from_bytes(method.as_bytes())?)
        .uri(path)
        .body(Body::empty())?;

    let response = server.router().oneshot(request).await?;
    println!("{}", response.status());

    match response.headers().get(header::LOCATION) {
        Some(location) => println!("Location: {}", location.to_str()?),
        None => {
            let body = axum::body::to_bytes(response.into_body(), 64 * 1024).await?;
            print!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}
