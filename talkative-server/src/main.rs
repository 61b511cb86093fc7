use clap::Parser;
use talkative_server::{observability, Args, LogConfig, RelayServer, Result, ServerConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_config = if args.verbose {
        LogConfig::dev()
    } else {
        LogConfig::default()
    };
    log_config.with_json(args.log_json).init()?;

    let config = ServerConfig::from(&args);
    let server = RelayServer::bind(config).await?;
    info!(addr = %server.local_addr(), "Health check at /health");

    let result = server.run_until(shutdown_signal()).await;

    observability::shutdown();
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
