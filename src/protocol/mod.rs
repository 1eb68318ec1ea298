pub mod resp;

pub use resp::{encode_command, RespParser};

use thiserror::Error;

/// Framing errors. Any of these leaves the stream misaligned, so the
/// connection that produced it is closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("expected '{expected}', got {found:?}")]
    UnexpectedByte { expected: char, found: char },

    #[error("invalid length {0:?}")]
    InvalidLength(String),

    #[error("header line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("bulk string not terminated by CRLF")]
    MissingTerminator,

    #[error("connection closed in the middle of a command")]
    Truncated,
}
