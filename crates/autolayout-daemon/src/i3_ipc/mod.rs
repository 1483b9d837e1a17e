//! i3 IPC client for window manager integration
//!
//! This module speaks i3's binary IPC protocol over its Unix socket. It
//! enables autolayout to:
//! - Run layout commands (`split h` / `split v`)
//! - Subscribe to window events
//! - Decode window events into change kind and geometry
//!
//! ## Architecture
//!
//! - `Connection`: exact-length reads and whole-buffer writes over one stream
//! - `framer`: the 14-byte header codec and `read_message`
//! - `I3Client`: request/reply operations on one connection
//! - `I3EventStream`: a connection that has been subscribed to window events
//! - `I3Error`: error types for IPC operations
//!
//! Every failure is final. The protocol cannot resynchronize after a bad or
//! short message, so errors propagate to the caller and nothing retries.

mod client;
mod error;
mod events;
mod framer;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{resolve_socket_path, I3Client};
pub use error::I3Error;
pub use events::{ChangeKind, I3EventStream, WindowEvent};
pub use types::MessageType;
