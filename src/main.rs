//! SSL proxy entry point.
//!
//! Startup order: configuration first, then the request-path context
//! (registry, router, transport pool), TLS material last so the listener
//! only binds once everything behind it is ready.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use ssl_proxy::config::{load_config, ProxyConfig};
use ssl_proxy::http::HttpServer;
use ssl_proxy::{lifecycle, net, observability, transport};

#[derive(Parser)]
#[command(name = "ssl-proxy")]
#[command(about = "TLS-terminating routing reverse proxy", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Without it, the built-in
    /// reference deployment is used.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    observability::logging::init(&config.observability.log_level);
    transport::tls::ensure_crypto_provider();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstreams = config.upstreams.len(),
        routes = config.routes.len(),
        default_upstream = %config.default_upstream,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let addr: SocketAddr = config.listener.bind_address.parse()?;
    let tls = net::tls::load_tls_config(&config.listener.tls)?;
    let server = HttpServer::new(config)?;

    let handle = axum_server::Handle::new();
    tokio::spawn(lifecycle::shutdown_on_signal(handle.clone()));

    server.run(addr, tls, handle).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
