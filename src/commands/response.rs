use bytes::{BufMut, Bytes, BytesMut};

use crate::protocol::resp::put_bulk_string;

#[derive(Debug, Clone, PartialEq)]
pub enum RedisResponse {
    SimpleString(String),
    BulkString(Option<Bytes>), // None represents null
    Integer(i64),
    Array(Vec<RedisResponse>),
    Error(String),
}

impl RedisResponse {
    pub fn to_resp(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.write_to(&mut buf);
        buf.freeze()
    }

    pub fn write_to(&self, buf: &mut BytesMut) {
        match self {
            RedisResponse::SimpleString(s) => put_line(buf, b"+", s),
            RedisResponse::BulkString(Some(data)) => put_bulk_string(buf, data),
            RedisResponse::BulkString(None) => buf.put_slice(b"$-1\r\n"),
            RedisResponse::Integer(i) => buf.put_slice(format!(":{}\r\n", i).as_bytes()),
            RedisResponse::Array(items) => {
                buf.put_slice(format!("*{}\r\n", items.len()).as_bytes());
                for item in items {
                    item.write_to(buf);
                }
            }
            RedisResponse::Error(e) => put_line(buf, b"-ERR ", e),
        }
    }

    pub fn ok() -> Self {
        RedisResponse::SimpleString("OK".to_string())
    }

    pub fn pong() -> Self {
        RedisResponse::SimpleString("PONG".to_string())
    }

    pub fn nil() -> Self {
        RedisResponse::BulkString(None)
    }

    pub fn bulk(data: Bytes) -> Self {
        RedisResponse::BulkString(Some(data))
    }

    pub fn error(msg: &str) -> Self {
        RedisResponse::Error(msg.to_string())
    }
}

/// Status and error replies are single lines; CR and LF in the text (which
/// may echo client input) are written as spaces.
fn put_line(buf: &mut BytesMut, prefix: &[u8], text: &str) {
    buf.put_slice(prefix);
    buf.extend(
        text.bytes()
            .map(|b| if b == b'\r' || b == b'\n' { b' ' } else { b }),
    );
    buf.put_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_each_reply_kind() {
        assert_eq!(RedisResponse::pong().to_resp(), Bytes::from("+PONG\r\n"));
        assert_eq!(RedisResponse::ok().to_resp(), Bytes::from("+OK\r\n"));
        assert_eq!(
            RedisResponse::bulk(Bytes::from("hello")).to_resp(),
            Bytes::from("$5\r\nhello\r\n")
        );
        assert_eq!(RedisResponse::nil().to_resp(), Bytes::from("$-1\r\n"));
        assert_eq!(RedisResponse::Integer(-3).to_resp(), Bytes::from(":-3\r\n"));
        assert_eq!(
            RedisResponse::error("unknown command 'FOO'").to_resp(),
            Bytes::from("-ERR unknown command 'FOO'\r\n")
        );
    }

    #[test]
    fn encodes_arrays_of_bulk_strings() {
        let reply = RedisResponse::Array(vec![
            RedisResponse::bulk(Bytes::from("dir")),
            RedisResponse::bulk(Bytes::from("/tmp")),
        ]);
        assert_eq!(reply.to_resp(), Bytes::from("*2\r\n$3\r\ndir\r\n$4\r\n/tmp\r\n"));
        assert_eq!(RedisResponse::Array(vec![]).to_resp(), Bytes::from("*0\r\n"));
    }

    #[test]
    fn line_replies_cannot_span_lines() {
        let reply = RedisResponse::error("unknown command 'X'\r\n+OK\r\n'");
        assert_eq!(
            reply.to_resp(),
            Bytes::from("-ERR unknown command 'X'  +OK  '\r\n")
        );
        let status = RedisResponse::SimpleString("a\nb".to_string());
        assert_eq!(status.to_resp(), Bytes::from("+a b\r\n"));
    }

    #[test]
    fn bulk_strings_are_binary_safe() {
        let reply = RedisResponse::bulk(Bytes::from_static(b"\x00\r\n\xff"));
        assert_eq!(reply.to_resp().as_ref(), b"$4\r\n\x00\r\n\xff\r\n");
    }
}
