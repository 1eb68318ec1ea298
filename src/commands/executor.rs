use super::{CommandParser, RedisCommand, RedisResponse};
use crate::storage::{MemoryStorage, Storage};
use bytes::Bytes;

pub trait CommandExecutor {
    fn execute(&self, command: RedisCommand) -> RedisResponse;

    /// Parse raw arguments and run them; parse failures become error replies.
    fn dispatch(&self, args: Vec<Bytes>) -> RedisResponse {
        match CommandParser::parse(args) {
            Ok(command) => self.execute(command),
            Err(error) => RedisResponse::error(&error.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedisCommandExecutor {
    storage: MemoryStorage,
}

impl RedisCommandExecutor {
    pub fn new(storage: MemoryStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }
}

impl CommandExecutor for RedisCommandExecutor {
    fn execute(&self, command: RedisCommand) -> RedisResponse {
        log::debug!("Executing command: {:?}", command);

        match command {
            RedisCommand::Ping(message) => match message {
                Some(msg) => RedisResponse::bulk(msg),
                None => RedisResponse::pong(),
            },
            RedisCommand::Echo(message) => RedisResponse::bulk(message),
            RedisCommand::Get(key) => match self.storage.get(&key) {
                Some(value) => RedisResponse::bulk(value),
                None => RedisResponse::nil(),
            },
            RedisCommand::Set(key, value) => {
                self.storage.set(key, value);
                RedisResponse::ok()
            }
            RedisCommand::SetWithExpiry(key, value, ttl_millis) => {
                self.storage.set_with_expiry(key, value, ttl_millis);
                RedisResponse::ok()
            }
            RedisCommand::Del(keys) => {
                let deleted = keys.iter().filter(|key| self.storage.delete(key)).count();
                RedisResponse::Integer(deleted as i64)
            }
            RedisCommand::Exists(keys) => {
                let exists = keys.iter().filter(|key| self.storage.has(key)).count();
                RedisResponse::Integer(exists as i64)
            }
            RedisCommand::ConfigGet(parameter) => match self.storage.get(&parameter) {
                Some(value) => RedisResponse::Array(vec![
                    RedisResponse::bulk(parameter),
                    RedisResponse::bulk(value),
                ]),
                None => RedisResponse::Array(vec![]),
            },
        }
    }
}

impl Default for RedisCommandExecutor {
    fn default() -> Self {
        Self::new(MemoryStorage::new())
    }
}
