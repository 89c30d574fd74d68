//! AX.25 link-layer header codec.
//!
//! Decodes the address chain, control field and protocol identifier of a
//! frame body, and builds UI frames in the same wire format. Decoding is
//! infallible: truncated or unusual input produces partial headers and
//! explicit `Unknown` variants rather than errors.
//!
//! ```
//! use ax25kiss_header::{decode_header, FrameType, UiFrameBuilder};
//!
//! let body = UiFrameBuilder::new("N0CALL-1", "APRS")?.payload("hello").build();
//! let header = decode_header(&body);
//!
//! assert_eq!(header.chain().to_string(), "N0CALL-1>APRS");
//! assert_eq!(header.frame_type(), Some(FrameType::Unnumbered));
//! # Ok::<(), ax25kiss_header::HeaderError>(())
//! ```

pub mod address;
pub mod builder;
pub mod checksum;
pub mod control;
pub mod error;
pub mod header;
pub mod pid;

pub use address::{
    clamp_ssid, decode_address, encode_address, Address, Callsign, ADDRESS_LEN, CALLSIGN_LEN,
    MAX_SSID,
};
pub use builder::UiFrameBuilder;
pub use checksum::{checksum, Checksum, Crc16};
pub use control::{decode_control, Control, FrameType, SupervisoryKind, UnnumberedKind};
pub use error::{HeaderError, Result};
pub use header::{decode_header, AddressChain, Header, Role, MAX_ADDRESSES};
pub use pid::{decode_pid, Pid};
