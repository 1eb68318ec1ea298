use super::RedisCommand;
use bytes::Bytes;
use thiserror::Error;

/// Per-request failures. They become `-ERR` replies and never close the
/// connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("unknown subcommand '{0}'")]
    UnknownSubcommand(String),

    #[error("value is not an integer or out of range")]
    NotAnInteger,

    #[error("syntax error")]
    Syntax,
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(args: Vec<Bytes>) -> Result<RedisCommand, CommandError> {
        let Some(name) = args.first() else {
            return Err(CommandError::UnknownCommand(String::new()));
        };

        let command = String::from_utf8_lossy(name).to_ascii_uppercase();

        match command.as_str() {
            "PING" => Self::parse_ping(args),
            "ECHO" => Self::parse_echo(args),
            "GET" => Self::parse_get(args),
            "SET" => Self::parse_set(args),
            "DEL" => Self::parse_del(args),
            "EXISTS" => Self::parse_exists(args),
            "CONFIG" => Self::parse_config(args),
            _ => Err(CommandError::UnknownCommand(
                String::from_utf8_lossy(name).into_owned(),
            )),
        }
    }

    fn parse_ping(args: Vec<Bytes>) -> Result<RedisCommand, CommandError> {
        match <[Bytes; 1]>::try_from(args) {
            Ok(_) => Ok(RedisCommand::Ping(None)),
            Err(args) => match <[Bytes; 2]>::try_from(args) {
                Ok([_, message]) => Ok(RedisCommand::Ping(Some(message))),
                Err(_) => Err(CommandError::WrongArity("ping")),
            },
        }
    }

    fn parse_echo(args: Vec<Bytes>) -> Result<RedisCommand, CommandError> {
        let [_, message] = <[Bytes; 2]>::try_from(args).map_err(|_| CommandError::WrongArity("echo"))?;
        Ok(RedisCommand::Echo(message))
    }

    fn parse_get(args: Vec<Bytes>) -> Result<RedisCommand, CommandError> {
        let [_, key] = <[Bytes; 2]>::try_from(args).map_err(|_| CommandError::WrongArity("get"))?;
        Ok(RedisCommand::Get(key))
    }

    fn parse_set(args: Vec<Bytes>) -> Result<RedisCommand, CommandError> {
        match args.len() {
            3 => {
                let [_, key, value] = Self::exact::<3>(args, "set")?;
                Ok(RedisCommand::Set(key, value))
            }
            5 => {
                let [_, key, value, option, amount] = Self::exact::<5>(args, "set")?;
                let ttl_millis = if option.eq_ignore_ascii_case(b"PX") {
                    Self::parse_integer(&amount)?
                } else if option.eq_ignore_ascii_case(b"EX") {
                    // Convert seconds to milliseconds
                    Self::parse_integer(&amount)?
                        .checked_mul(1000)
                        .ok_or(CommandError::NotAnInteger)?
                } else {
                    return Err(CommandError::Syntax);
                };
                Ok(RedisCommand::SetWithExpiry(key, value, ttl_millis))
            }
            _ => Err(CommandError::WrongArity("set")),
        }
    }

    fn parse_del(args: Vec<Bytes>) -> Result<RedisCommand, CommandError> {
        if args.len() < 2 {
            return Err(CommandError::WrongArity("del"));
        }
        Ok(RedisCommand::Del(args.into_iter().skip(1).collect()))
    }

    fn parse_exists(args: Vec<Bytes>) -> Result<RedisCommand, CommandError> {
        if args.len() < 2 {
            return Err(CommandError::WrongArity("exists"));
        }
        Ok(RedisCommand::Exists(args.into_iter().skip(1).collect()))
    }

    fn parse_config(args: Vec<Bytes>) -> Result<RedisCommand, CommandError> {
        let Some(subcommand) = args.get(1) else {
            return Err(CommandError::WrongArity("config"));
        };
        if !subcommand.eq_ignore_ascii_case(b"GET") {
            return Err(CommandError::UnknownSubcommand(
                String::from_utf8_lossy(subcommand).into_owned(),
            ));
        }
        let [_, _, parameter] = Self::exact::<3>(args, "config|get")?;
        Ok(RedisCommand::ConfigGet(parameter))
    }

    fn exact<const N: usize>(
        args: Vec<Bytes>,
        name: &'static str,
    ) -> Result<[Bytes; N], CommandError> {
        <[Bytes; N]>::try_from(args).map_err(|_| CommandError::WrongArity(name))
    }

    fn parse_integer(arg: &[u8]) -> Result<i64, CommandError> {
        std::str::from_utf8(arg)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(CommandError::NotAnInteger)
    }
}
