pub mod executor;
pub mod parser;
pub mod response;

pub use executor::{CommandExecutor, RedisCommandExecutor};
pub use parser::{CommandError, CommandParser};
pub use response::RedisResponse;

use bytes::Bytes;

#[derive(Debug, Clone, PartialEq)]
pub enum RedisCommand {
    Ping(Option<Bytes>),
    Echo(Bytes),
    Get(Bytes),
    Set(Bytes, Bytes),
    /// Key, value and time to live in milliseconds.
    SetWithExpiry(Bytes, Bytes, i64),
    Del(Vec<Bytes>),
    Exists(Vec<Bytes>),
    ConfigGet(Bytes),
}
