use bytes::Bytes;
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 6379;

#[derive(Debug, Clone, Parser)]
#[command(name = "redis-lite", version, about = "In-memory string store speaking RESP")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Stored as the `dir` key, readable with CONFIG GET dir
    #[arg(long)]
    pub dir: Option<String>,

    /// Stored as the `dbfilename` key, readable with CONFIG GET dbfilename
    #[arg(long)]
    pub dbfilename: Option<String>,

    /// Close connections that stay silent this long
    #[arg(long, value_name = "MILLIS")]
    pub idle_timeout_ms: Option<u64>,

    /// Evict expired keys on this period; 0 leaves eviction to reads
    #[arg(long, value_name = "MILLIS", default_value_t = 0)]
    pub sweep_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dir: None,
            dbfilename: None,
            idle_timeout_ms: None,
            sweep_interval_ms: 0,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_ms > 0).then(|| Duration::from_millis(self.sweep_interval_ms))
    }

    /// Keyspace entries written before the first client connects.
    pub fn seed_entries(&self) -> Vec<(Bytes, Bytes)> {
        [("dir", &self.dir), ("dbfilename", &self.dbfilename)]
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_ref()
                    .map(|v| (Bytes::copy_from_slice(name.as_bytes()), Bytes::from(v.clone())))
            })
            .collect()
    }
}
