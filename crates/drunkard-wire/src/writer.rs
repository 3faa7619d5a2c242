//! Framed message writer.

use std::io::Write;

use drunkard_core::Message;

use crate::codec::encode_frame;
use crate::error::WireError;

/// Writes framed messages to a byte stream.
///
/// Each message is written whole and flushed, so a peer never waits on a
/// half-sent frame sitting in a buffer.
///
/// # Examples
///
/// ```
/// use drunkard_core::{ControlCommand, Message};
/// use drunkard_wire::{MessageReader, MessageWriter};
///
/// let mut buf = Vec::new();
/// let mut writer = MessageWriter::new(&mut buf);
/// writer.send(&Message::Control(ControlCommand::Pause)).unwrap();
/// assert_eq!(writer.messages_sent(), 1);
/// drop(writer);
///
/// let mut reader = MessageReader::new(buf.as_slice());
/// assert_eq!(
///     reader.recv().unwrap(),
///     Some(Message::Control(ControlCommand::Pause))
/// );
/// ```
pub struct MessageWriter<W: Write> {
    writer: W,
    messages_sent: u64,
}

impl<W: Write> MessageWriter<W> {
    /// Wrap a byte sink.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            messages_sent: 0,
        }
    }

    /// Frame, write and flush one message.
    pub fn send(&mut self, msg: &Message) -> Result<(), WireError> {
        let frame = encode_frame(msg)?;
        self.writer.write_all(&frame)?;
        self.writer.flush()?;
        self.messages_sent += 1;
        Ok(())
    }

    /// Number of messages successfully sent.
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    /// Access the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the writer, returning the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
