use bytes::{Bytes, BytesMut};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::commands::{CommandExecutor, RedisResponse};
use crate::protocol::{ProtocolError, RespParser};

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Reasons a connection ends other than a clean close by the peer.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("no data received for {0:?}")]
    IdleTimeout(Duration),
}

/// One client connection, its read buffer and its decode progress.
pub struct Client<S> {
    id: u64,
    stream: S,
    read_buffer: BytesMut,
    parser: RespParser,
    idle_timeout: Option<Duration>,
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            id: NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed),
            stream,
            read_buffer: BytesMut::with_capacity(4096),
            parser: RespParser::new(),
            idle_timeout: None,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Read the next command.
    ///
    /// `Ok(None)` means the peer closed the connection between commands.
    /// Bytes received past the end of the returned command stay buffered for
    /// the next call.
    pub async fn read_command(&mut self) -> Result<Option<Vec<Bytes>>, ConnectionError> {
        loop {
            if let Some(args) = self.parser.parse_command(&mut self.read_buffer)? {
                return Ok(Some(args));
            }

            let read = self.stream.read_buf(&mut self.read_buffer);
            let bytes_read = match self.idle_timeout {
                Some(limit) => timeout(limit, read)
                    .await
                    .map_err(|_| ConnectionError::IdleTimeout(limit))??,
                None => read.await?,
            };

            if bytes_read == 0 {
                if self.read_buffer.is_empty() && self.parser.is_idle() {
                    return Ok(None);
                }
                return Err(ProtocolError::Truncated.into());
            }
            log::debug!("Read {} bytes from client {}", bytes_read, self.id);
        }
    }

    pub async fn write_response(&mut self, response: &RedisResponse) -> io::Result<()> {
        self.stream.write_all(&response.to_resp()).await?;
        self.stream.flush().await
    }

    /// Serve commands until the peer disconnects or the stream becomes
    /// unusable. Errors end only this connection.
    pub async fn run<E: CommandExecutor>(mut self, executor: &E) -> Result<(), ConnectionError> {
        loop {
            let Some(args) = self.read_command().await? else {
                log::debug!("Client {} closed connection", self.id);
                return Ok(());
            };
            if args.is_empty() {
                continue;
            }

            log::debug!("Processing command from client {}: {:?}", self.id, args);
            let response = executor.dispatch(args);
            self.write_response(&response).await?;
        }
    }
}

/// Serve one accepted stream to completion. The stream is dropped, and so
/// closed, when this returns.
pub async fn accept_connection<S, E>(stream: S, executor: &E) -> Result<(), ConnectionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    E: CommandExecutor,
{
    Client::new(stream).run(executor).await
}
