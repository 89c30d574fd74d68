//! KISS framing and AX.25 header decoding for TNC test harnesses.
//!
//! ax25kiss recovers frames from the escaped byte stream a KISS TNC speaks
//! over a serial line, decodes their AX.25 headers, and builds UI frames to
//! send back.
//!
//! # Crate Structure
//!
//! - [`frame`]: KISS stream framing, blocking reader/writer, reader thread
//! - [`header`]: AX.25 address chain, control, PID, checksum, UI builder
//! - [`inspect`]: Splits received KISS frames into decoded data frames and
//!   opaque TNC commands

/// Re-export frame types.
pub mod frame {
    pub use ax25kiss_frame::*;
}

/// Re-export header types.
pub mod header {
    pub use ax25kiss_header::*;
}

pub mod inspect;

pub use inspect::{inspect, IntoKiss, Inspected};
