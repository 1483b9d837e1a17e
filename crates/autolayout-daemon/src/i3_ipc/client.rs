//! i3 IPC client implementation
//!
//! This module provides the `I3Client` for communicating with i3 over one
//! connection, plus discovery of the socket path.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;
use tracing::{debug, info};

use super::transport::Connection;
use super::types::{CommandOutcome, MessageType, SubscribeReply};
use super::I3Error;

/// Environment variable i3 exports to its children with the socket path
const I3_SOCKET_ENV: &str = "I3SOCK";

/// Exit status a shell reports for a command that does not exist
const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Discover the i3 IPC socket path
///
/// Tries, in order: the configured path, `$I3SOCK`, and finally the output
/// of `<wm_command> --get-socketpath`.
///
/// # Errors
///
/// Returns `I3Error::WmNotInstalled` if `wm_command` cannot be found.
/// Returns `I3Error::WmNotRunning` if it exits unsuccessfully or prints nothing.
/// Returns `I3Error::SocketNotFound` if the resolved path doesn't exist.
pub fn resolve_socket_path(
    configured: Option<&Path>,
    wm_command: &str,
) -> Result<PathBuf, I3Error> {
    if let Some(path) = configured {
        debug!(path = %path.display(), "Using configured i3 socket path");
        return existing(path.to_path_buf());
    }

    if let Some(path) = std::env::var_os(I3_SOCKET_ENV).filter(|value| !value.is_empty()) {
        debug!("Using i3 socket path from ${}", I3_SOCKET_ENV);
        return existing(PathBuf::from(path));
    }

    let output = Command::new(wm_command)
        .arg("--get-socketpath")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                I3Error::WmNotInstalled {
                    command: wm_command.to_string(),
                }
            } else {
                I3Error::DiscoveryFailed {
                    command: wm_command.to_string(),
                    source: e,
                }
            }
        })?;

    if !output.status.success() {
        if output.status.code() == Some(EXIT_COMMAND_NOT_FOUND) {
            return Err(I3Error::WmNotInstalled {
                command: wm_command.to_string(),
            });
        }
        return Err(I3Error::WmNotRunning {
            command: wm_command.to_string(),
            status: output.status.to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = stdout.lines().next().unwrap_or_default();
    if path.is_empty() {
        return Err(I3Error::WmNotRunning {
            command: wm_command.to_string(),
            status: "empty socket path".to_string(),
        });
    }

    existing(PathBuf::from(path))
}

fn existing(path: PathBuf) -> Result<PathBuf, I3Error> {
    if !path.exists() {
        return Err(I3Error::SocketNotFound { path });
    }
    Ok(path)
}

/// Client for one i3 IPC connection
///
/// Every call is a strict request→reply round trip; the client never holds
/// more than one message in flight.
///
/// # Example
///
/// ```ignore
/// let mut client = I3Client::connect(&socket_path).await?;
/// client.run_command("split h").await?;
/// ```
#[derive(Debug)]
pub struct I3Client<S = UnixStream> {
    connection: Connection<S>,
}

impl I3Client<UnixStream> {
    /// Open a new connection to the i3 socket at `path`
    ///
    /// # Errors
    ///
    /// Returns `I3Error::ConnectionFailed` if the connection fails.
    pub async fn connect(path: &Path) -> Result<Self, I3Error> {
        Ok(Self {
            connection: Connection::connect(path).await?,
        })
    }
}

impl<S> I3Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Build a client over an existing stream
    #[allow(dead_code)]
    pub fn new(stream: S) -> Self {
        Self {
            connection: Connection::new(stream),
        }
    }

    /// Run one command and check i3 accepted it
    ///
    /// # Errors
    ///
    /// Returns `I3Error::CommandFailed` naming the command if the first
    /// outcome in the reply is not successful (or the reply is empty), plus
    /// any framing or transport error.
    pub async fn run_command(&mut self, command: &str) -> Result<(), I3Error> {
        self.connection
            .send_message(MessageType::Command, command.as_bytes())
            .await?;
        let payload = self.connection.read_message(MessageType::Command).await?;

        let outcomes: Vec<CommandOutcome> =
            serde_json::from_slice(&payload).map_err(I3Error::DeserializeFailed)?;

        match outcomes.into_iter().next() {
            Some(CommandOutcome { success: true, .. }) => {
                debug!(command, "i3 command succeeded");
                Ok(())
            }
            Some(CommandOutcome { error, .. }) => Err(I3Error::CommandFailed {
                command: command.to_string(),
                reason: error.unwrap_or_else(|| "i3 reported failure".to_string()),
            }),
            None => Err(I3Error::CommandFailed {
                command: command.to_string(),
                reason: "empty reply".to_string(),
            }),
        }
    }

    /// Subscribe this connection to the given event topics
    ///
    /// The request payload is the JSON array of topic names, e.g.
    /// `["window"]`. i3 has no unsubscribe, so after this succeeds the
    /// connection should only be used to wait for events.
    ///
    /// # Errors
    ///
    /// Returns `I3Error::SubscribeFailed` if the reply's `success` is false
    /// or missing.
    pub async fn subscribe(&mut self, topics: &[&str]) -> Result<(), I3Error> {
        let payload = serde_json::to_vec(topics).map_err(I3Error::SerializeFailed)?;

        self.connection
            .send_message(MessageType::Subscribe, &payload)
            .await?;
        let reply = self.connection.read_message(MessageType::Subscribe).await?;

        let reply: SubscribeReply =
            serde_json::from_slice(&reply).map_err(I3Error::DeserializeFailed)?;

        if !reply.success {
            return Err(I3Error::SubscribeFailed {
                topics: topics.join(", "),
            });
        }

        info!(?topics, "Subscribed to i3 events");
        Ok(())
    }

    /// Block until the next window event arrives and return its raw payload
    ///
    /// Any other message type on this connection is a protocol violation.
    pub async fn wait_for_window_event(&mut self) -> Result<Vec<u8>, I3Error> {
        self.connection.read_message(MessageType::WindowEvent).await
    }
}
