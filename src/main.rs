use anyhow::Context;
use clap::Parser;
use redis_lite::{RedisServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    log::debug!("Starting with {:?}", config);

    let server = RedisServer::bind(&config)
        .await
        .with_context(|| format!("failed to listen on {}", config.addr()))?;
    server.run().await?;

    Ok(())
}
