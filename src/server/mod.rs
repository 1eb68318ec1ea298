pub mod client;

pub use client::{accept_connection, Client, ConnectionError};

use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::commands::RedisCommandExecutor;
use crate::config::ServerConfig;
use crate::storage::MemoryStorage;

pub struct RedisServer {
    listener: TcpListener,
    executor: RedisCommandExecutor,
    idle_timeout: Option<Duration>,
    sweep_interval: Option<Duration>,
}

impl RedisServer {
    /// Bind the listening socket and seed the keyspace from `config`.
    pub async fn bind(config: &ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(config.addr()).await?;
        log::info!("Redis server listening on {}", listener.local_addr()?);

        let storage = MemoryStorage::new();
        storage.seed(config.seed_entries());

        Ok(Self {
            listener,
            executor: RedisCommandExecutor::new(storage),
            idle_timeout: config.idle_timeout(),
            sweep_interval: config.sweep_interval(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn storage(&self) -> &MemoryStorage {
        self.executor.storage()
    }

    /// Accept connections forever, one task per client.
    pub async fn run(self) -> io::Result<()> {
        log::info!("Starting Redis server accept loop");

        if let Some(period) = self.sweep_interval {
            spawn_expiry_sweep(self.storage().clone(), period);
        }

        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    if let Err(e) = socket.set_nodelay(true) {
                        log::debug!("Could not disable Nagle for {}: {}", addr, e);
                    }
                    let client = Client::new(socket).with_idle_timeout(self.idle_timeout);
                    let id = client.id();
                    log::info!("New client connection from {} with id {}", addr, id);

                    let executor = self.executor.clone();
                    tokio::spawn(async move {
                        match client.run(&executor).await {
                            Ok(()) => log::info!("Closing client connection {}", id),
                            Err(e) => log::error!("Closing client connection {}: {}", id, e),
                        }
                    });
                }
                Err(e) => {
                    // Usually fd exhaustion; back off instead of spinning.
                    log::error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            }
        }
    }
}

fn spawn_expiry_sweep(storage: MemoryStorage, period: Duration) {
    log::info!("Evicting expired keys every {:?}", period);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let removed = storage.purge_expired();
            if removed > 0 {
                log::debug!("Expiry sweep removed {} keys", removed);
            }
        }
    });
}
