use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::str;

use super::ProtocolError;

/// Longest `*<n>` or `$<len>` header accepted before its CRLF.
pub const MAX_HEADER_LEN: usize = 32;

/// Cap on how much buffer space is reserved up front for a declared bulk
/// length; larger payloads grow the buffer as bytes arrive.
const MAX_PREALLOC: usize = 64 * 1024;

/// Incremental command decoder.
///
/// Completed headers and arguments are taken out of the buffer as soon as
/// they are parsed, so a command that arrives over many reads is scanned
/// once. The parser remembers how far into the command it got.
#[derive(Debug, Default)]
pub struct RespParser {
    /// Arguments still expected by the command in flight.
    remaining: Option<usize>,
    /// Length of the bulk string whose header has been consumed.
    bulk_len: Option<usize>,
    args: Vec<Bytes>,
}

impl RespParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no command is partially decoded.
    pub fn is_idle(&self) -> bool {
        self.remaining.is_none()
    }

    /// Decode the next command from the front of `buffer`.
    ///
    /// Returns `Ok(None)` while the command is incomplete; the bytes parsed
    /// so far are kept and the call picks up where it left off once more
    /// data is appended. Bytes of a following command are left in `buffer`.
    pub fn parse_command(&mut self, buffer: &mut BytesMut) -> Result<Option<Vec<Bytes>>, ProtocolError> {
        if self.remaining.is_none() {
            let Some(count) = Self::parse_header(buffer, b'*')? else {
                return Ok(None);
            };
            self.remaining = Some(count);
            self.args = Vec::with_capacity(count.min(16));
        }

        while let Some(remaining) = self.remaining.filter(|n| *n > 0) {
            let length = match self.bulk_len {
                Some(length) => length,
                None => {
                    let Some(length) = Self::parse_header(buffer, b'$')? else {
                        return Ok(None);
                    };
                    self.bulk_len = Some(length);
                    length
                }
            };

            let end = length
                .checked_add(2)
                .ok_or_else(|| ProtocolError::InvalidLength(length.to_string()))?;
            if buffer.len() < end {
                buffer.reserve((end - buffer.len()).min(MAX_PREALLOC));
                return Ok(None);
            }
            if &buffer[length..end] != b"\r\n" {
                return Err(ProtocolError::MissingTerminator);
            }

            self.args.push(buffer.split_to(length).freeze());
            buffer.advance(2);
            self.bulk_len = None;
            self.remaining = Some(remaining - 1);
        }

        self.remaining = None;
        Ok(Some(std::mem::take(&mut self.args)))
    }

    /// Consume a `<sigil><digits>\r\n` header once all of it has arrived.
    fn parse_header(buffer: &mut BytesMut, sigil: u8) -> Result<Option<usize>, ProtocolError> {
        let Some(&first) = buffer.first() else {
            return Ok(None);
        };
        Self::expect_sigil(first, sigil)?;

        let Some((length, consumed)) = Self::parse_length(&buffer[1..])? else {
            return Ok(None);
        };
        buffer.advance(1 + consumed);
        Ok(Some(length))
    }

    /// Parse the `<digits>\r\n` that follows a sigil.
    /// Returns (length, bytes_consumed) once the CRLF has arrived.
    fn parse_length(buffer: &[u8]) -> Result<Option<(usize, usize)>, ProtocolError> {
        let Some(line_end) = buffer.windows(2).position(|w| w == b"\r\n") else {
            if buffer.len() > MAX_HEADER_LEN + 1 {
                return Err(ProtocolError::LineTooLong(MAX_HEADER_LEN));
            }
            return Ok(None);
        };
        if line_end > MAX_HEADER_LEN {
            return Err(ProtocolError::LineTooLong(MAX_HEADER_LEN));
        }

        let digits = &buffer[..line_end];
        let invalid = || ProtocolError::InvalidLength(String::from_utf8_lossy(digits).into_owned());
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let length = str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(invalid)?;

        Ok(Some((length, line_end + 2)))
    }

    fn expect_sigil(found: u8, expected: u8) -> Result<(), ProtocolError> {
        if found == expected {
            Ok(())
        } else {
            Err(ProtocolError::UnexpectedByte {
                expected: expected as char,
                found: found as char,
            })
        }
    }
}

/// Frame `args` the way a client sends a command.
pub fn encode_command<A: AsRef<[u8]>>(args: &[A]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_slice(format!("*{}\r\n", args.len()).as_bytes());
    for arg in args {
        put_bulk_string(&mut buf, arg.as_ref());
    }
    buf.freeze()
}

pub(crate) fn put_bulk_string(buf: &mut BytesMut, data: &[u8]) {
    buf.put_slice(format!("${}\r\n", data.len()).as_bytes());
    buf.put_slice(data);
    buf.put_slice(b"\r\n");
}
