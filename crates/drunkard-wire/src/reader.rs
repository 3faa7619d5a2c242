//! Message reader with three-way poll outcomes.
//!
//! [`MessageReader`] reads from any `Read` source, feeding a
//! [`FrameAssembler`] and decoding complete frames. A non-blocking source
//! that has nothing to offer, a peer that closed cleanly, and a peer that
//! vanished mid-frame are three different results.

use std::io::{ErrorKind, Read};

use drunkard_core::Message;

use crate::codec::decode_message;
use crate::error::WireError;
use crate::frame::FrameAssembler;

const READ_CHUNK: usize = 4096;

/// Result of one [`MessageReader::poll`].
#[derive(Debug, PartialEq)]
pub enum ReadOutcome {
    /// A complete message arrived.
    Message(Message),
    /// No complete message yet; the source would block or timed out.
    Pending,
    /// The peer closed the stream on a frame boundary.
    Closed,
}

/// Reads framed messages from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production code
/// can use a `TcpStream`.
pub struct MessageReader<R: Read> {
    reader: R,
    assembler: FrameAssembler,
    messages_read: u64,
}

impl<R: Read> MessageReader<R> {
    /// Wrap a byte source.
    pub fn new(reader: R) -> Self {
        Self::with_assembler(reader, FrameAssembler::new())
    }

    /// Wrap a byte source with a custom-bounded assembler.
    pub fn with_assembler(reader: R, assembler: FrameAssembler) -> Self {
        Self {
            reader,
            assembler,
            messages_read: 0,
        }
    }

    /// Read until a message is complete, the source has nothing more to
    /// give right now, or the stream ends.
    ///
    /// EOF with a partial frame buffered is [`WireError::Truncated`], not
    /// [`ReadOutcome::Closed`].
    pub fn poll(&mut self) -> Result<ReadOutcome, WireError> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(frame) = self.assembler.next_frame()? {
                let msg = decode_message(&frame)?;
                self.messages_read += 1;
                return Ok(ReadOutcome::Message(msg));
            }
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    if self.assembler.is_empty() {
                        return Ok(ReadOutcome::Closed);
                    }
                    return Err(WireError::Truncated {
                        buffered: self.assembler.buffered(),
                    });
                }
                Ok(n) => self.assembler.push(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(ReadOutcome::Pending);
                }
                Err(e) => return Err(WireError::Io(e)),
            }
        }
    }

    /// Block until the next message, or `None` when the peer has closed.
    ///
    /// Intended for blocking sources; on a non-blocking source this spins
    /// through [`ReadOutcome::Pending`].
    pub fn recv(&mut self) -> Result<Option<Message>, WireError> {
        loop {
            match self.poll()? {
                ReadOutcome::Message(msg) => return Ok(Some(msg)),
                ReadOutcome::Closed => return Ok(None),
                ReadOutcome::Pending => continue,
            }
        }
    }

    /// Number of messages decoded so far.
    pub fn messages_read(&self) -> u64 {
        self.messages_read
    }

    /// Access the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }
}
