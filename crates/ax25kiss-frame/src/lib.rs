//! KISS stream framing for serial TNC links.
//!
//! Every frame on the wire is:
//! - A FEND (0xC0) delimiter
//! - A type byte: TNC port in the high nibble, command in the low nibble
//! - The frame body, with FEND and FESC (0xDB) escaped
//! - A closing FEND
//!
//! The decoder is a streaming state machine: bytes may arrive in any
//! chunking, malformed escapes drop only the damaged frame, and nothing it
//! sees on the wire is treated as a hard error.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod command;
pub mod error;
pub mod pump;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::KissCodec;
pub use codec::{
    encode_frame, encode_to_vec, escape_into, escaped_len, DecoderStats, FramerConfig,
    KissDecoder, KissFrame, DEFAULT_MAX_FRAME_SIZE, DEFAULT_READ_CHUNK_SIZE, FEND, FESC, TFEND,
    TFESC,
};
pub use command::{command_name, type_byte, DATA, RETURN};
pub use error::{FrameError, Result};
pub use pump::{FramePump, PumpSummary};
pub use reader::KissReader;
pub use writer::KissWriter;
