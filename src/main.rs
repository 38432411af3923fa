use anyhow::Context;
use redis_lite::server::RedisServer;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = RedisServer::new(std::env::args()).context("failed to parse command line")?;

    tokio::select! {
        result = server.run() => {
            result.with_context(|| format!("failed to serve on {}", server.address()))?;
        }
        _ = signal::ctrl_c() => {
            info!("received SIGINT, shutting down");
        }
    }

    Ok(())
}
