//! Error types for the wire protocol.

use std::fmt;
use std::io;

/// Errors that can occur while framing, sending, or decoding messages.
///
/// "No data yet" is not an error; see
/// [`ReadOutcome::Pending`](crate::ReadOutcome::Pending).
#[derive(Debug)]
pub enum WireError {
    /// An I/O error occurred on the underlying stream.
    Io(io::Error),
    /// The frame's type tag is not recognized.
    UnknownMessageType {
        /// The unrecognized tag.
        tag: u8,
    },
    /// The length prefix is larger than the configured maximum.
    FrameTooLarge {
        /// Announced length.
        len: u32,
        /// Configured maximum.
        max: u32,
    },
    /// The length prefix is zero, so there is not even a type tag.
    EmptyFrame,
    /// The peer closed the stream in the middle of a frame.
    Truncated {
        /// Bytes of the incomplete frame that had arrived.
        buffered: usize,
    },
    /// A frame body could not be decoded.
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
}

impl WireError {
    /// Whether the error means the peer is gone.
    pub fn is_disconnect(&self) -> bool {
        match self {
            Self::Truncated { .. } => true,
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnknownMessageType { tag } => write!(f, "unknown message type tag {tag}"),
            Self::FrameTooLarge { len, max } => {
                write!(f, "frame length {len} exceeds maximum {max}")
            }
            Self::EmptyFrame => write!(f, "zero-length frame"),
            Self::Truncated { buffered } => {
                write!(f, "stream closed mid-frame after {buffered} bytes")
            }
            Self::Malformed { detail } => write!(f, "malformed frame: {detail}"),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for WireError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
