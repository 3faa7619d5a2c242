//! Framed binary protocol between the viewer and the compute side.
//!
//! Messages travel over a byte stream that preserves order but has no
//! record boundaries of its own. Every message is therefore wrapped in a
//! frame with an explicit length prefix, and receivers reassemble frames
//! from however the stream happens to split them.
//!
//! # Architecture
//!
//! - [`codec`] encodes and decodes a [`Message`](drunkard_core::Message)
//!   to and from a frame body
//! - [`FrameAssembler`] buffers partial reads and yields complete frames
//! - [`MessageReader`] polls any `Read` source and reports one of three
//!   outcomes: a message, nothing yet, or a closed peer
//! - [`MessageWriter`] frames and flushes messages to any `Write` sink
//!
//! # Format
//!
//! ```text
//! [LEN u32][TAG u8][BODY ...]
//! ```
//!
//! `LEN` counts the tag and body bytes. All integers are little-endian.
//! Strings and byte arrays are length-prefixed with a `u32`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod frame;
pub mod reader;
pub mod writer;

pub use codec::{decode_message, encode_frame, encode_message};
pub use error::WireError;
pub use frame::FrameAssembler;
pub use reader::{MessageReader, ReadOutcome};
pub use writer::MessageWriter;

/// Default upper bound on a frame's `LEN` field.
///
/// Comfortably above the largest legitimate frame (a configuration with a
/// full 100 × 100 obstacle map).
pub const MAX_FRAME_LEN: u32 = 1 << 20;

/// Size of the length prefix in bytes.
pub const LEN_PREFIX: usize = 4;

// ── Message type tags ───────────────────────────────────────────

/// Tag for `Message::Config`.
pub const TAG_CONFIG: u8 = 0;
/// Tag for `Message::LoadConfig`.
pub const TAG_LOAD_CONFIG: u8 = 1;
/// Tag for `Message::StateUpdate`.
pub const TAG_STATE_UPDATE: u8 = 2;
/// Tag for `Message::StatsUpdate`.
pub const TAG_STATS_UPDATE: u8 = 3;
/// Tag for `Message::Control`.
pub const TAG_CONTROL: u8 = 4;
/// Tag for `Message::GameOver`.
pub const TAG_GAME_OVER: u8 = 5;
/// Tag for `Message::Error`.
pub const TAG_ERROR: u8 = 6;
