//! Reassembly of length-prefixed frames from arbitrary stream reads.

use crate::error::WireError;
use crate::{LEN_PREFIX, MAX_FRAME_LEN};

/// Accumulates raw bytes and yields complete frame bodies.
///
/// A stream read may return half a frame, several frames, or a frame and
/// a half; the assembler never assumes one read equals one message.
///
/// # Examples
///
/// ```
/// use drunkard_wire::FrameAssembler;
///
/// let mut asm = FrameAssembler::new();
/// asm.push(&[2, 0]);
/// assert_eq!(asm.next_frame().unwrap(), None);
/// asm.push(&[0, 0, 4, 1]);
/// assert_eq!(asm.next_frame().unwrap(), Some(vec![4, 1]));
/// assert!(asm.is_empty());
/// ```
#[derive(Debug)]
pub struct FrameAssembler {
    buf: Vec<u8>,
    max_frame_len: u32,
}

impl FrameAssembler {
    /// Assembler with the default [`MAX_FRAME_LEN`] bound.
    pub fn new() -> Self {
        Self::with_max_frame_len(MAX_FRAME_LEN)
    }

    /// Assembler rejecting frames whose length prefix exceeds `max`.
    pub fn with_max_frame_len(max: u32) -> Self {
        Self {
            buf: Vec::new(),
            max_frame_len: max,
        }
    }

    /// Append bytes received from the stream.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of buffered bytes not yet returned as a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Whether no partial frame is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Pop the next complete frame body (`TAG + BODY`), if one has fully
    /// arrived.
    ///
    /// A bad length prefix is reported as soon as its four bytes are
    /// buffered, without waiting for the body.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, WireError> {
        if self.buf.len() < LEN_PREFIX {
            return Ok(None);
        }
        let mut prefix = [0u8; LEN_PREFIX];
        prefix.copy_from_slice(&self.buf[..LEN_PREFIX]);
        let len = u32::from_le_bytes(prefix);
        if len == 0 {
            return Err(WireError::EmptyFrame);
        }
        if len > self.max_frame_len {
            return Err(WireError::FrameTooLarge {
                len,
                max: self.max_frame_len,
            });
        }
        let end = LEN_PREFIX + len as usize;
        if self.buf.len() < end {
            return Ok(None);
        }
        let body = self.buf[LEN_PREFIX..end].to_vec();
        self.buf.drain(..end);
        Ok(Some(body))
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_message, encode_frame};
    use drunkard_core::{Cell, ControlCommand, Message, StateUpdate};

    fn sample_stream() -> (Vec<Message>, Vec<u8>) {
        let msgs = vec![
            Message::Control(ControlCommand::Pause),
            Message::StateUpdate(StateUpdate {
                position: Cell::new(3, 4),
                step: 17,
                replication: 2,
                total_replications: 9,
            }),
            Message::Error {
                text: "nope".into(),
            },
        ];
        let mut bytes = Vec::new();
        for m in &msgs {
            bytes.extend(encode_frame(m).unwrap());
        }
        (msgs, bytes)
    }

    #[test]
    fn byte_at_a_time_reassembles_every_message() {
        let (msgs, bytes) = sample_stream();
        let mut asm = FrameAssembler::new();
        let mut out = Vec::new();
        for b in bytes {
            asm.push(&[b]);
            while let Some(frame) = asm.next_frame().unwrap() {
                out.push(decode_message(&frame).unwrap());
            }
        }
        assert_eq!(out, msgs);
        assert!(asm.is_empty());
    }

    #[test]
    fn one_push_with_many_frames() {
        let (msgs, bytes) = sample_stream();
        let mut asm = FrameAssembler::new();
        asm.push(&bytes);
        let mut out = Vec::new();
        while let Some(frame) = asm.next_frame().unwrap() {
            out.push(decode_message(&frame).unwrap());
        }
        assert_eq!(out, msgs);
    }

    #[test]
    fn split_inside_prefix_waits() {
        let mut asm = FrameAssembler::new();
        asm.push(&[2, 0, 0]);
        assert_eq!(asm.next_frame().unwrap(), None);
        assert_eq!(asm.buffered(), 3);
    }

    #[test]
    fn zero_length_is_rejected() {
        let mut asm = FrameAssembler::new();
        asm.push(&[0, 0, 0, 0]);
        assert!(matches!(asm.next_frame(), Err(WireError::EmptyFrame)));
    }

    #[test]
    fn oversized_prefix_is_rejected_before_body() {
        let mut asm = FrameAssembler::with_max_frame_len(16);
        asm.push(&17u32.to_le_bytes());
        assert!(matches!(
            asm.next_frame(),
            Err(WireError::FrameTooLarge { len: 17, max: 16 })
        ));
    }
}
