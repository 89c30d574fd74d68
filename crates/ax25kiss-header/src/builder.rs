//! UI frame construction.

use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;

use crate::address::{Address, ADDRESS_LEN};
use crate::control::Control;
use crate::error::Result;
use crate::pid::Pid;

/// Lowest printable ASCII filler octet.
pub const FILLER_MIN: u8 = 32;
/// Highest printable ASCII filler octet.
pub const FILLER_MAX: u8 = 126;

/// Builds the body of a UI frame: destination, source, control 0x03, PID
/// 0xF0, then the information field.
///
/// ```
/// use ax25kiss_header::{decode_header, UiFrameBuilder};
///
/// let body = UiFrameBuilder::new("0TEST0-5", "STNDRD-7")?
///     .payload("HELLO")
///     .build();
/// let header = decode_header(&body);
/// assert_eq!(header.source().unwrap().identifier(), "0TEST0-5");
/// assert_eq!(header.payload().as_ref(), b"HELLO");
/// # Ok::<(), ax25kiss_header::HeaderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UiFrameBuilder {
    source: Address,
    destination: Address,
    payload: Bytes,
    pad_to: usize,
}

impl UiFrameBuilder {
    /// Parse `CALL-SSID` identifiers for both stations.
    pub fn new(source: &str, destination: &str) -> Result<Self> {
        Ok(Self::from_addresses(source.parse()?, destination.parse()?))
    }

    /// Use already parsed addresses. Flag bits are set by the builder.
    pub fn from_addresses(source: Address, destination: Address) -> Self {
        Self {
            source: Address::new(source.callsign, source.ssid).with_last(true),
            destination: Address::new(destination.callsign, destination.ssid).with_command(true),
            payload: Bytes::new(),
            pad_to: 0,
        }
    }

    /// Information field contents, before any filler.
    pub fn payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Copy a borrowed information field.
    pub fn payload_slice(self, payload: &[u8]) -> Self {
        self.payload(Bytes::copy_from_slice(payload))
    }

    /// Pad the information field with random printable ASCII up to `len`
    /// octets. Shorter than the payload means no padding.
    pub fn pad_to(mut self, len: usize) -> Self {
        self.pad_to = len;
        self
    }

    pub fn source(&self) -> &Address {
        &self.source
    }

    pub fn destination(&self) -> &Address {
        &self.destination
    }

    /// Length of the information field `build` will produce.
    pub fn info_len(&self) -> usize {
        self.payload.len().max(self.pad_to)
    }

    /// Total body length `build` will produce.
    pub fn frame_len(&self) -> usize {
        2 * ADDRESS_LEN + 2 + self.info_len()
    }

    /// Build with filler from the thread-local generator.
    pub fn build(&self) -> Bytes {
        self.build_with_rng(&mut rand::thread_rng())
    }

    /// Build with filler drawn from `rng`.
    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Bytes {
        let mut out = BytesMut::with_capacity(self.frame_len());
        out.put_slice(&self.destination.to_bytes());
        out.put_slice(&self.source.to_bytes());
        out.put_u8(Control::UI.to_byte());
        out.put_u8(Pid::NoLayer3.to_byte());
        out.put_slice(&self.payload);
        for _ in self.payload.len()..self.pad_to {
            out.put_u8(rng.gen_range(FILLER_MIN..=FILLER_MAX));
        }
        out.freeze()
    }
}
