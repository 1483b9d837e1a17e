//! i3 IPC message framing
//!
//! Every message, in both directions, has the same layout:
//!
//! ```text
//! offset 0   : 6 bytes  magic "i3-ipc"
//! offset 6   : 4 bytes  payload length (i32, little-endian)
//! offset 10  : 4 bytes  message type / event code (i32, little-endian)
//! offset 14  : payload
//! ```
//!
//! There is no resynchronization marker beyond the magic, so `read_message`
//! either consumes exactly one whole message or fails.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::trace;

use super::transport::Connection;
use super::types::MessageType;
use super::I3Error;

/// Protocol magic at the start of every header
pub const MAGIC: [u8; 6] = *b"i3-ipc";

/// Size of the fixed message header
pub const HEADER_LEN: usize = 14;

/// Decoded message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub magic: [u8; 6],
    pub length: i32,
    pub message_type: i32,
}

impl MessageHeader {
    /// Check the header against the protocol and the awaited type
    ///
    /// Returns the payload length on success.
    pub fn validate(&self, expected: i32) -> Result<usize, I3Error> {
        if self.magic != MAGIC {
            return Err(I3Error::CorruptedMessage { magic: self.magic });
        }

        if self.message_type != expected {
            return Err(I3Error::UnexpectedMessageType {
                expected,
                received: self.message_type,
            });
        }

        usize::try_from(self.length).map_err(|_| I3Error::InvalidLength(self.length))
    }
}

/// Encode a message: magic, payload length, type, then the raw payload
///
/// # Errors
///
/// Returns `I3Error::PayloadTooLarge` if the payload length does not fit in
/// the signed 32-bit length field.
pub fn encode_request(message_type: i32, payload: &[u8]) -> Result<Vec<u8>, I3Error> {
    let length =
        i32::try_from(payload.len()).map_err(|_| I3Error::PayloadTooLarge(payload.len()))?;

    let mut message = Vec::with_capacity(HEADER_LEN + payload.len());
    message.extend_from_slice(&MAGIC);
    message.extend_from_slice(&length.to_le_bytes());
    message.extend_from_slice(&message_type.to_le_bytes());
    message.extend_from_slice(payload);

    Ok(message)
}

/// Parse a raw header. Pure; performs no validation.
pub fn decode_header(bytes: &[u8; HEADER_LEN]) -> MessageHeader {
    let mut magic = [0u8; 6];
    magic.copy_from_slice(&bytes[0..6]);

    MessageHeader {
        magic,
        length: i32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
        message_type: i32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]),
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Frame and send one request
    pub async fn send_message(
        &mut self,
        message_type: MessageType,
        payload: &[u8],
    ) -> Result<(), I3Error> {
        let message = encode_request(message_type.code(), payload)?;
        self.send_exact(&message).await
    }

    /// Read one whole message of the expected type and return its payload
    ///
    /// # Errors
    ///
    /// Returns `I3Error::CorruptedMessage` on a bad magic,
    /// `I3Error::UnexpectedMessageType` if another type arrives,
    /// `I3Error::InvalidLength` on a negative length, and any transport
    /// error from `recv_exact`.
    pub async fn read_message(&mut self, expected: MessageType) -> Result<Vec<u8>, I3Error> {
        let raw = self.recv_exact(HEADER_LEN).await?;
        let mut header_bytes = [0u8; HEADER_LEN];
        header_bytes.copy_from_slice(&raw);
        let header = decode_header(&header_bytes);

        trace!(
            length = header.length,
            message_type = header.message_type,
            "Received i3 message header"
        );

        let length = header.validate(expected.code())?;
        self.recv_exact(length).await
    }
}
