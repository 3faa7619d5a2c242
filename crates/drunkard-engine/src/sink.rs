//! Outbound message sinks.

use std::io::{self, Write};

use crossbeam_channel::Sender;
use drunkard_core::Message;
use drunkard_wire::{MessageWriter, WireError};

/// Where the compute side sends messages to the viewer.
///
/// A send error for which [`WireError::is_disconnect`] holds means the
/// viewer is gone; the run halts rather than failing outright.
pub trait Outbound {
    /// Deliver one message, in order.
    fn send(&mut self, msg: &Message) -> Result<(), WireError>;
}

impl<W: Write> Outbound for MessageWriter<W> {
    fn send(&mut self, msg: &Message) -> Result<(), WireError> {
        MessageWriter::send(self, msg)
    }
}

/// In-process viewer on the other end of a channel. A dropped receiver
/// reads as a broken pipe.
impl Outbound for Sender<Message> {
    fn send(&mut self, msg: &Message) -> Result<(), WireError> {
        Sender::send(self, msg.clone())
            .map_err(|_| WireError::Io(io::Error::from(io::ErrorKind::BrokenPipe)))
    }
}

impl<O: Outbound + ?Sized> Outbound for &mut O {
    fn send(&mut self, msg: &Message) -> Result<(), WireError> {
        (**self).send(msg)
    }
}
