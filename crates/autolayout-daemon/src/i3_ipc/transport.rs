//! Byte-stream transport to the i3 IPC socket
//!
//! `Connection` owns one stream and offers exactly two primitives: write a
//! whole buffer, and read exactly `n` bytes. A short read is never retried
//! at a higher level; if the peer hangs up mid-message the stream is lost.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::info;

use super::I3Error;

/// One open connection to the window manager
///
/// Generic over the stream so tests can substitute an in-memory pipe.
#[derive(Debug)]
pub struct Connection<S = UnixStream> {
    stream: S,
}

impl Connection<UnixStream> {
    /// Connect to the i3 IPC socket at `path`
    ///
    /// # Errors
    ///
    /// Returns `I3Error::ConnectionFailed` if the socket cannot be reached.
    pub async fn connect(path: &Path) -> Result<Self, I3Error> {
        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| I3Error::ConnectionFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        info!(path = %path.display(), "Connected to i3 IPC socket");

        Ok(Self { stream })
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already-connected stream
    #[allow(dead_code)]
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Write the whole buffer, continuing across short writes
    ///
    /// # Errors
    ///
    /// Returns `I3Error::SendFailed` on any write error.
    pub async fn send_exact(&mut self, bytes: &[u8]) -> Result<(), I3Error> {
        self.stream
            .write_all(bytes)
            .await
            .map_err(I3Error::SendFailed)?;
        self.stream.flush().await.map_err(I3Error::SendFailed)
    }

    /// Read until exactly `n` bytes have been collected
    ///
    /// # Errors
    ///
    /// Returns `I3Error::Truncated` if the peer closes the connection before
    /// `n` bytes arrive, and `I3Error::ReceiveFailed` on a read error.
    pub async fn recv_exact(&mut self, n: usize) -> Result<Vec<u8>, I3Error> {
        let mut buf = vec![0u8; n];
        let mut received = 0;

        while received < n {
            match self.stream.read(&mut buf[received..]).await {
                Ok(0) => {
                    return Err(I3Error::Truncated {
                        expected: n,
                        received,
                    });
                }
                Ok(count) => received += count,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(I3Error::ReceiveFailed(e)),
            }
        }

        Ok(buf)
    }
}
