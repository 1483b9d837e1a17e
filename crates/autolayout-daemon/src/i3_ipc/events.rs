//! i3 window event subscription and decoding
//!
//! The event connection is separate from the command connection: once
//! subscribed, i3 pushes events on it at any time, and mixing command
//! replies into that stream would break the one-message-at-a-time framing.
//!
//! ## Protocol
//!
//! 1. Connect to the i3 socket
//! 2. Send `SUBSCRIBE` with payload `["window"]`
//! 3. Receive `{"success":true}`
//! 4. Receive window events (type `0x80000003`) until the process exits
//!
//! Event payloads vary by `change`; e.g. `close` and `title` events may not
//! carry useful geometry, so decoding treats every field as optional.

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;
use tracing::debug;

use super::client::I3Client;
use super::I3Error;

/// The only topic autolayout subscribes to
pub const WINDOW_TOPIC: &str = "window";

/// What happened to the window, as far as autolayout cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    New,
    Focus,
    Move,
    /// Any other change (`close`, `title`, `fullscreen_mode`, ...)
    Unknown,
}

impl ChangeKind {
    pub fn from_change(change: &str) -> Self {
        match change {
            "new" => Self::New,
            "focus" => Self::Focus,
            "move" => Self::Move,
            _ => Self::Unknown,
        }
    }
}

/// Normalized window event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEvent {
    pub change: ChangeKind,
    pub width: i64,
    pub height: i64,
}

/// Decode a window event payload
///
/// Missing or mistyped `change`, `container` or `window_rect` fields are not
/// errors: the change falls back to `Unknown` and geometry to zero.
///
/// # Errors
///
/// Returns `I3Error::DeserializeFailed` if the payload is not valid JSON.
pub fn decode_window_event(payload: &[u8]) -> Result<WindowEvent, I3Error> {
    let root: Value = serde_json::from_slice(payload).map_err(I3Error::DeserializeFailed)?;

    let change = root
        .get("change")
        .and_then(Value::as_str)
        .map_or(ChangeKind::Unknown, ChangeKind::from_change);

    let dimension = |name: &str| {
        root.get("container")
            .and_then(|container| container.get("window_rect"))
            .and_then(|rect| rect.get(name))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    };

    Ok(WindowEvent {
        change,
        width: dimension("width"),
        height: dimension("height"),
    })
}

/// A connection subscribed to window events
///
/// Only obtainable through a successful `subscribe`, so holding one means
/// i3 has acknowledged the subscription.
#[derive(Debug)]
pub struct I3EventStream<S = UnixStream> {
    client: I3Client<S>,
}

impl<S> I3EventStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Subscribe `client` to window events, consuming it
    ///
    /// # Errors
    ///
    /// Returns any error from `I3Client::subscribe`.
    pub async fn subscribe(mut client: I3Client<S>) -> Result<Self, I3Error> {
        client.subscribe(&[WINDOW_TOPIC]).await?;
        Ok(Self { client })
    }

    /// Wait for the next window event and decode it
    pub async fn next_window_event(&mut self) -> Result<WindowEvent, I3Error> {
        let payload = self.client.wait_for_window_event().await?;
        let event = decode_window_event(&payload)?;

        debug!(
            change = ?event.change,
            width = event.width,
            height = event.height,
            "Received window event"
        );

        Ok(event)
    }
}
