//! Kindergate -- tenant-isolation signed-URL proxy server.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use kindergate::access::{BucketResolver, UnifiedValidator};
use kindergate::oss::{AliyunOssClient, OssClient};

/// Command-line arguments for the Kindergate server.
#[derive(Parser, Debug)]
#[command(
    name = "kindergate",
    version,
    about = "Tenant-isolation signed-URL proxy for OSS-backed assets"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "kindergate.example.yaml")]
    config: String,

    /// Override the bind address (host:port).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing / logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Loading configuration from {}", cli.config);
    let config = kindergate::config::load_config(&cli.config)?;

    let bind_addr = cli
        .bind
        .unwrap_or_else(|| format!("{}:{}", config.server.host, config.server.port));

    // Initialize Prometheus metrics recorder and register metric descriptions.
    if config.observability.metrics {
        kindergate::metrics::init_metrics();
        kindergate::metrics::describe_metrics();
        info!("Prometheus metrics initialized");
    }

    // Bucket hostname patterns and namespace allow-lists are loaded once
    // here and stay immutable for the process lifetime.
    let unified = UnifiedValidator::new(BucketResolver::new(
        config.buckets.guangzhou.host(),
        config.buckets.shanghai.host(),
    ));
    info!(
        guangzhou = %config.buckets.guangzhou.host(),
        shanghai = %config.buckets.shanghai.host(),
        "Bucket resolver initialized"
    );

    let guangzhou: Arc<dyn OssClient> = Arc::new(AliyunOssClient::new(&config.buckets.guangzhou));
    let shanghai: Arc<dyn OssClient> = Arc::new(AliyunOssClient::new(&config.buckets.shanghai));

    let state = Arc::new(kindergate::AppState {
        config,
        unified,
        guangzhou,
        shanghai,
    });

    let app = kindergate::server::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Kindergate listening on {}", bind_addr);

    // Graceful shutdown: on SIGTERM/SIGINT, stop accepting new connections,
    // wait for in-flight requests to complete, then exit.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Kindergate shut down");

    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C), then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        },
    }
}
