//! Station addresses.
//!
//! On the wire an address is seven octets: six callsign characters, each
//! shifted left one bit and space padded, then an SSID octet:
//!
//! ```text
//!  bit  7     6   5     4   3   2   1     0
//!     ┌─────┬───────┬───────────────┬─────┐
//!     │ C/H │ R   R │     SSID      │ EXT │
//!     └─────┴───────┴───────────────┴─────┘
//! ```
//!
//! C/H is the command/response bit on destination and source entries and the
//! has-been-repeated bit on via entries. EXT marks the last address.

use std::fmt;
use std::str::FromStr;

use crate::error::{HeaderError, Result};

/// Callsign characters on the wire.
pub const CALLSIGN_LEN: usize = 6;

/// Octets per encoded address.
pub const ADDRESS_LEN: usize = 7;

/// Largest SSID the four-bit field can carry.
pub const MAX_SSID: u8 = 15;

const EXTENSION_BIT: u8 = 0x01;
const SSID_MASK: u8 = 0x1E;
const RESERVED_MASK: u8 = 0x60;
const COMMAND_BIT: u8 = 0x80;
const PAD: u8 = b' ';

/// Clamp an SSID into 0..=15.
///
/// Out-of-range values are pinned to 15 and logged.
pub fn clamp_ssid(ssid: u32) -> u8 {
    if ssid > MAX_SSID as u32 {
        tracing::warn!(ssid, max = MAX_SSID, "SSID out of range, clamping");
        return MAX_SSID;
    }
    ssid as u8
}

/// Up to six callsign characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Callsign {
    chars: [u8; CALLSIGN_LEN],
    len: u8,
}

impl Callsign {
    /// Parse a callsign of 1-6 ASCII letters or digits. Lowercase is
    /// accepted and stored uppercase.
    pub fn new(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(HeaderError::EmptyCallsign);
        }
        if let Some(ch) = text.chars().find(|ch| !ch.is_ascii_alphanumeric()) {
            return Err(HeaderError::InvalidCallsignChar {
                callsign: text.to_string(),
                ch,
            });
        }
        if text.len() > CALLSIGN_LEN {
            return Err(HeaderError::CallsignTooLong(text.to_string()));
        }

        let mut chars = [0u8; CALLSIGN_LEN];
        for (slot, byte) in chars.iter_mut().zip(text.bytes()) {
            *slot = byte.to_ascii_uppercase();
        }
        Ok(Self {
            chars,
            len: text.len() as u8,
        })
    }

    /// The callsign text.
    pub fn as_str(&self) -> &str {
        // Only ever holds 7-bit characters.
        std::str::from_utf8(&self.chars[..self.len as usize]).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn from_wire(octets: &[u8]) -> Self {
        let mut chars = [0u8; CALLSIGN_LEN];
        for (slot, &octet) in chars.iter_mut().zip(octets) {
            *slot = octet >> 1;
        }
        let len = chars
            .iter()
            .rposition(|&ch| ch != PAD && ch != 0)
            .map_or(0, |last| last + 1);
        // Keep one representation per callsign so equality ignores padding.
        chars[len..].fill(0);
        Self {
            chars,
            len: len as u8,
        }
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Callsign {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// One entry of an address chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address {
    pub callsign: Callsign,
    /// 0..=15.
    pub ssid: u8,
    /// C bit on destination/source, H bit on via entries.
    pub command: bool,
    /// The two reserved bits (5 and 6) exactly as seen on the wire.
    pub reserved: u8,
    /// Extension bit: this is the last address of the chain.
    pub last: bool,
}

impl Address {
    /// Address with both reserved bits set and no flags.
    pub fn new(callsign: Callsign, ssid: u8) -> Self {
        Self {
            callsign,
            ssid: clamp_ssid(ssid as u32),
            command: false,
            reserved: RESERVED_MASK,
            last: false,
        }
    }

    pub fn with_command(mut self, command: bool) -> Self {
        self.command = command;
        self
    }

    pub fn with_last(mut self, last: bool) -> Self {
        self.last = last;
        self
    }

    /// Encode into the seven wire octets.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LEN] {
        let mut out = [PAD << 1; ADDRESS_LEN];
        for (slot, &ch) in out.iter_mut().zip(&self.callsign.chars[..self.callsign.len as usize]) {
            *slot = ch << 1;
        }
        let mut ssid_octet = ((self.ssid & 0x0F) << 1) | (self.reserved & RESERVED_MASK);
        if self.command {
            ssid_octet |= COMMAND_BIT;
        }
        if self.last {
            ssid_octet |= EXTENSION_BIT;
        }
        out[CALLSIGN_LEN] = ssid_octet;
        out
    }

    /// Decode seven wire octets.
    pub fn from_bytes(octets: &[u8; ADDRESS_LEN]) -> Self {
        let ssid_octet = octets[CALLSIGN_LEN];
        Self {
            callsign: Callsign::from_wire(&octets[..CALLSIGN_LEN]),
            ssid: (ssid_octet & SSID_MASK) >> 1,
            command: ssid_octet & COMMAND_BIT != 0,
            reserved: ssid_octet & RESERVED_MASK,
            last: ssid_octet & EXTENSION_BIT != 0,
        }
    }

    /// `CALL` or `CALL-N`, without the C/H marker.
    pub fn identifier(&self) -> String {
        if self.ssid == 0 {
            self.callsign.to_string()
        } else {
            format!("{}-{}", self.callsign, self.ssid)
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())?;
        if self.command {
            f.write_str("*")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = HeaderError;

    /// Parse `CALL` or `CALL-SSID`. The SSID is one or two digits; values
    /// above 15 are clamped.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (call, ssid) = match s.split_once('-') {
            Some((call, ssid)) => (call, Some(ssid)),
            None => (s, None),
        };

        let callsign = Callsign::new(call)?;
        let ssid = match ssid {
            None => 0,
            Some(digits) => {
                if digits.is_empty()
                    || digits.len() > 2
                    || !digits.bytes().all(|b| b.is_ascii_digit())
                {
                    return Err(HeaderError::InvalidSsid(digits.to_string()));
                }
                let value: u32 = digits
                    .parse()
                    .map_err(|_| HeaderError::InvalidSsid(digits.to_string()))?;
                clamp_ssid(value)
            }
        };

        Ok(Self::new(callsign, ssid))
    }
}

/// Encode a callsign and SSID into seven octets with no flag bits set.
///
/// The name is uppercased, truncated or space padded to six characters, and
/// the SSID clamped to 15. Callers that need validation should parse an
/// [`Address`] instead.
pub fn encode_address(name: &str, ssid: u8) -> [u8; ADDRESS_LEN] {
    let mut out = [PAD << 1; ADDRESS_LEN];
    for (slot, byte) in out.iter_mut().zip(name.trim().bytes().take(CALLSIGN_LEN)) {
        *slot = byte.to_ascii_uppercase() << 1;
    }
    out[CALLSIGN_LEN] = (clamp_ssid(ssid as u32) & 0x0F) << 1;
    out
}

/// Decode seven octets into an address, trimming callsign padding.
pub fn decode_address(octets: &[u8; ADDRESS_LEN]) -> Address {
    Address::from_bytes(octets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_matches_wire_layout() {
        let octets = encode_address("n0call", 7);
        assert_eq!(
            octets,
            [b'N' << 1, b'0' << 1, b'C' << 1, b'A' << 1, b'L' << 1, b'L' << 1, 7 << 1]
        );
    }

    #[test]
    fn encode_pads_short_callsigns() {
        let octets = encode_address("AB", 0);
        assert_eq!(&octets[2..6], &[0x40, 0x40, 0x40, 0x40]);
    }

    #[test]
    fn encode_truncates_long_callsigns() {
        let decoded = decode_address(&encode_address("ABCDEFGH", 3));
        assert_eq!(decoded.callsign.as_str(), "ABCDEF");
        assert_eq!(decoded.ssid, 3);
    }

    #[test]
    fn roundtrip_identity() {
        for name in ["A", "K1", "N0CALL", "0TEST0", "STNDRD", "W1AW"] {
            for ssid in 0..=MAX_SSID {
                let decoded = decode_address(&encode_address(name, ssid));
                assert_eq!(decoded.callsign.as_str(), name);
                assert_eq!(decoded.ssid, ssid);
                assert!(!decoded.last);
                assert!(!decoded.command);
            }
        }
    }

    #[test]
    fn ssid_above_range_clamps_to_fifteen() {
        assert_eq!(clamp_ssid(16), 15);
        assert_eq!(clamp_ssid(99), 15);
        assert_eq!(decode_address(&encode_address("X", 200)).ssid, 15);
    }

    #[test]
    fn decode_reads_flags() {
        let mut octets = encode_address("VIA", 2);
        octets[6] |= 0x80 | 0x60 | 0x01;
        let address = decode_address(&octets);

        assert!(address.command);
        assert!(address.last);
        assert_eq!(address.reserved, 0x60);
        assert_eq!(address.to_string(), "VIA-2*");
    }

    #[test]
    fn decode_trims_nul_padding() {
        let octets = [b'A' << 1, b'B' << 1, 0, 0, 0, 0, 0];
        assert_eq!(decode_address(&octets).callsign.as_str(), "AB");
    }

    #[test]
    fn address_bytes_roundtrip_with_flags() {
        let address = "0TEST0-5".parse::<Address>().unwrap().with_last(true);
        assert_eq!(address.to_bytes()[6], 0x61 | (5 << 1));
        assert_eq!(Address::from_bytes(&address.to_bytes()), address);
    }

    #[test]
    fn parse_identifiers() {
        let address: Address = "stndrd-7".parse().unwrap();
        assert_eq!(address.callsign.as_str(), "STNDRD");
        assert_eq!(address.ssid, 7);

        let bare: Address = "W1AW".parse().unwrap();
        assert_eq!(bare.ssid, 0);
        assert_eq!(bare.identifier(), "W1AW");

        let clamped: Address = "N0CALL-16".parse().unwrap();
        assert_eq!(clamped.ssid, 15);
    }

    #[test]
    fn ssid_needs_a_hyphen() {
        // Trailing digits belong to the callsign.
        let bare: Address = "K1A7".parse().unwrap();
        assert_eq!(bare.callsign.as_str(), "K1A7");
        assert_eq!(bare.ssid, 0);

        assert!(matches!(
            "N0CALL7".parse::<Address>(),
            Err(HeaderError::CallsignTooLong(_))
        ));
    }

    #[test]
    fn parse_rejects_bad_identifiers() {
        assert_eq!("".parse::<Address>(), Err(HeaderError::EmptyCallsign));
        assert_eq!("-3".parse::<Address>(), Err(HeaderError::EmptyCallsign));
        assert!(matches!(
            "TOOLONG1".parse::<Address>(),
            Err(HeaderError::CallsignTooLong(_))
        ));
        assert!(matches!(
            "N0 CALL".parse::<Address>(),
            Err(HeaderError::InvalidCallsignChar { ch: ' ', .. })
        ));
        assert!(matches!(
            "N0CALL-".parse::<Address>(),
            Err(HeaderError::InvalidSsid(_))
        ));
        assert!(matches!(
            "N0CALL-1x".parse::<Address>(),
            Err(HeaderError::InvalidSsid(_))
        ));
        assert!(matches!(
            "N0CALL-123".parse::<Address>(),
            Err(HeaderError::InvalidSsid(_))
        ));
    }
}
