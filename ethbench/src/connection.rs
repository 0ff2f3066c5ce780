//! Transport seam between the senders and a node.
//!
//! The engine only needs an ordered, reliable byte stream. `IpcConnection` provides one over a
//! Unix domain socket; tests substitute in-memory stubs.
use crate::error::TransportError;
use std::future::Future;
use std::io;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::sync::Mutex;
#[allow(unused)]
use tracing::{debug, trace};

/// A bidirectional byte stream shared by every sender of one endpoint.
pub trait Connection: Send {
    /// Writes `request`, then performs a single read into `response`. No other round trip on the
    /// same connection is interleaved between the two. `Ok(0)` means the peer closed.
    fn round_trip(
        &self,
        request: &[u8],
        response: &mut [u8],
    ) -> impl Future<Output = Result<usize, TransportError>> + Send;
}

/// Opens one connection per endpoint before any sender starts.
pub trait Connector: Send + Sync {
    type Conn: Connection + Sync + 'static;

    fn connect(&self, endpoint: &Path) -> impl Future<Output = io::Result<Self::Conn>> + Send;
}

/// Unix socket connection serialising round trips.
///
/// Replies are not tagged with the request they answer, so a sender holds the stream from its
/// write until its read returns. Otherwise a short reply could be read together with the head of
/// the next one, leaving a later sender waiting for bytes that were already consumed.
#[derive(Debug)]
pub struct IpcConnection {
    stream: Mutex<UnixStream>,
}

impl IpcConnection {
    pub fn new(stream: UnixStream) -> Self {
        Self {
            stream: Mutex::new(stream),
        }
    }

    pub async fn connect(path: &Path) -> io::Result<Self> {
        let stream = UnixStream::connect(path).await?;
        debug!("Connected to {}", path.display());
        Ok(Self::new(stream))
    }
}

impl Connection for IpcConnection {
    async fn round_trip(
        &self,
        request: &[u8],
        response: &mut [u8],
    ) -> Result<usize, TransportError> {
        let mut stream = self.stream.lock().await;
        stream
            .write_all(request)
            .await
            .map_err(TransportError::Write)?;
        let n = stream.read(response).await.map_err(TransportError::Read)?;
        trace!("Read {n} bytes");
        Ok(n)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IpcConnector;

impl Connector for IpcConnector {
    type Conn = IpcConnection;

    async fn connect(&self, endpoint: &Path) -> io::Result<IpcConnection> {
        IpcConnection::connect(endpoint).await
    }
}
