pub mod commands;
pub mod config;
pub mod protocol;
pub mod server;
pub mod storage;

pub use commands::{CommandExecutor, RedisCommand, RedisCommandExecutor, RedisResponse};
pub use config::ServerConfig;
pub use protocol::RespParser;
pub use server::{accept_connection, RedisServer};
pub use storage::{MemoryStorage, Storage};
