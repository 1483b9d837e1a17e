//! Error types for i3 IPC operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when communicating with the i3 window manager
///
/// None of these are recoverable: the protocol has no way to resynchronize
/// a stream once framing is lost, so callers are expected to give up.
#[derive(Debug, Error)]
pub enum I3Error {
    /// The window manager binary could not be found
    #[error("{command} isn't installed on your computer")]
    WmNotInstalled { command: String },

    /// The window manager binary ran but could not report a socket path
    #[error("{command} isn't running ({status})")]
    WmNotRunning { command: String, status: String },

    /// Running `<wm> --get-socketpath` failed for another reason
    #[error("Failed to run `{command} --get-socketpath`: {source}")]
    DiscoveryFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The socket path does not exist
    #[error("i3 socket not found at {path}")]
    SocketNotFound { path: PathBuf },

    /// Failed to connect to the i3 socket
    #[error("Failed to connect to unix socket at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a request to the socket
    #[error("Error while writing to socket: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Failed to read from the socket
    #[error("Error while reading from socket: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The peer closed the connection in the middle of a message
    #[error("Data truncated, expected: {expected}, received: {received}")]
    Truncated { expected: usize, received: usize },

    /// The header did not start with the protocol magic
    #[error("Corrupted i3 message (bad magic {magic:?})")]
    CorruptedMessage { magic: [u8; 6] },

    /// The header announced a different message type than the one awaited
    #[error("Invalid message type, expected: {expected}, received: {received}")]
    UnexpectedMessageType { expected: i32, received: i32 },

    /// The header announced a negative payload length
    #[error("Invalid payload length in message header: {0}")]
    InvalidLength(i32),

    /// An outgoing payload does not fit the 32-bit length field
    #[error("Payload too large for an i3 message: {0} bytes")]
    PayloadTooLarge(usize),

    /// i3 rejected a command
    #[error("Failed to run command `{command}`: {reason}")]
    CommandFailed { command: String, reason: String },

    /// i3 rejected an event subscription
    #[error("Failed to subscribe to {topics} events")]
    SubscribeFailed { topics: String },

    /// Failed to serialize a request payload
    #[error("Failed to serialize request: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    /// Failed to parse a reply or event payload
    #[error("Failed to deserialize payload: {0}")]
    DeserializeFailed(#[source] serde_json::Error),
}
