//! Split orientation driven by window events
//!
//! For every `new`, `focus` or `move` event the focused container is told to
//! split along the window's longer side, so the next window opened beside it
//! keeps tiles close to square. Events are handled strictly one at a time:
//! the command round trip finishes before the next event is read.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;
use tracing::{debug, trace};

use crate::i3_ipc::{ChangeKind, I3Client, I3Error, I3EventStream, WindowEvent};

/// Orientation for the next split of the focused container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

impl SplitDirection {
    /// Wide windows split horizontally; everything else, ties included, vertically
    pub fn for_geometry(width: i64, height: i64) -> Self {
        if width > height {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// The i3 command selecting this orientation
    pub fn command(self) -> &'static str {
        match self {
            Self::Horizontal => "split h",
            Self::Vertical => "split v",
        }
    }
}

/// Decide whether an event calls for a split, and which one
pub fn decide(event: &WindowEvent) -> Option<SplitDirection> {
    match event.change {
        ChangeKind::New | ChangeKind::Focus | ChangeKind::Move => {
            Some(SplitDirection::for_geometry(event.width, event.height))
        }
        ChangeKind::Unknown => None,
    }
}

/// The event loop: one command connection, one subscribed event connection
#[derive(Debug)]
pub struct AutoLayout<S = UnixStream> {
    commands: I3Client<S>,
    events: I3EventStream<S>,
}

impl<S> AutoLayout<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(commands: I3Client<S>, events: I3EventStream<S>) -> Self {
        Self { commands, events }
    }

    /// Wait for one window event and act on it
    ///
    /// Returns the split that was applied, or `None` if the event was ignored.
    pub async fn step(&mut self) -> Result<Option<SplitDirection>, I3Error> {
        let event = self.events.next_window_event().await?;

        let Some(direction) = decide(&event) else {
            trace!(change = ?event.change, "Ignoring window event");
            return Ok(None);
        };

        self.commands.run_command(direction.command()).await?;
        debug!(
            ?direction,
            width = event.width,
            height = event.height,
            "Applied split"
        );

        Ok(Some(direction))
    }

    /// Process events until an error occurs
    ///
    /// Never returns `Ok`: the only way out is a fatal protocol or I/O error.
    pub async fn run(mut self) -> Result<(), I3Error> {
        loop {
            self.step().await?;
        }
    }
}
