//! Wire-level types for the i3 IPC protocol
//!
//! Reply payloads are JSON; only the fields autolayout inspects are
//! modelled here and everything else is ignored by serde.

use serde::Deserialize;

/// High bit of the type field, set on every event pushed by i3
pub const EVENT_MASK_BIT: u32 = 1 << 31;

/// Low bits of the window event code
const WINDOW_EVENT_CODE: u32 = 3;

/// Message kinds autolayout sends or expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// `RUN_COMMAND` request and its reply
    Command,
    /// `SUBSCRIBE` request and its reply
    Subscribe,
    /// Pushed `window` event
    WindowEvent,
}

impl MessageType {
    /// The signed 32-bit code carried in the message header
    pub const fn code(self) -> i32 {
        match self {
            Self::Command => 0,
            Self::Subscribe => 2,
            Self::WindowEvent => (EVENT_MASK_BIT | WINDOW_EVENT_CODE) as i32,
        }
    }
}

/// One entry of a `RUN_COMMAND` reply
///
/// i3 answers with one outcome per command in the request, e.g.
/// `[{"success":false,"parse_error":true,"error":"Expected one of ..."}]`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CommandOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply to a `SUBSCRIBE` request; a missing `success` counts as failure
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SubscribeReply {
    #[serde(default)]
    pub success: bool,
}
