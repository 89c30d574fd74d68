//! Header decoding.
//!
//! A frame body (KISS type byte already stripped) is walked as:
//! 1. Seven-octet address entries until one carries the extension bit, the
//!    input runs out, or the chain is full.
//! 2. One control octet, only if the chain was terminated.
//! 3. One PID octet, for I and UI frames only.
//! 4. Everything left is payload.
//!
//! Decoding never fails. A short buffer yields a partial chain and absent
//! fields; unknown codes decode to explicit `Unknown` variants.

use std::fmt;

use bytes::Bytes;

use crate::address::{decode_address, Address, ADDRESS_LEN};
use crate::control::{decode_control, Control, FrameType, UnnumberedKind};
use crate::pid::{decode_pid, Pid};

/// Destination, source and up to eight via hops.
pub const MAX_ADDRESSES: usize = 10;

/// Position of an entry within the address chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Destination,
    Source,
    /// Via hop, numbered from 1.
    Via(usize),
}

impl Role {
    pub fn of_index(index: usize) -> Self {
        match index {
            0 => Role::Destination,
            1 => Role::Source,
            n => Role::Via(n - 1),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Destination => f.write_str("Destination"),
            Role::Source => f.write_str("Source"),
            Role::Via(n) => write!(f, "Via-{n}"),
        }
    }
}

/// Fixed-capacity address list with an explicit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddressChain {
    entries: [Address; MAX_ADDRESSES],
    len: usize,
    terminated: bool,
}

impl AddressChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Returns `false` and drops it when the chain is full.
    ///
    /// An entry with its extension bit set marks the chain terminated.
    pub fn push(&mut self, address: Address) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries[self.len] = address;
        self.len += 1;
        if address.last {
            self.terminated = true;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_ADDRESSES
    }

    /// Whether an entry with the extension bit was seen.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.entries[..self.len]
    }

    pub fn get(&self, index: usize) -> Option<&Address> {
        self.as_slice().get(index)
    }

    pub fn destination(&self) -> Option<&Address> {
        self.get(0)
    }

    pub fn source(&self) -> Option<&Address> {
        self.get(1)
    }

    /// Digipeater hops, in path order.
    pub fn vias(&self) -> &[Address] {
        self.as_slice().get(2..).unwrap_or_default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Address> {
        self.as_slice().iter()
    }

    /// Entries tagged with their role.
    pub fn roles(&self) -> impl Iterator<Item = (Role, &Address)> + '_ {
        self.iter()
            .enumerate()
            .map(|(index, address)| (Role::of_index(index), address))
    }

    /// Wire encoding of the whole chain.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.iter().flat_map(|address| address.to_bytes()).collect()
    }
}

impl<'a> IntoIterator for &'a AddressChain {
    type Item = &'a Address;
    type IntoIter = std::slice::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Monitor notation: `SOURCE>DEST,VIA1*,VIA2`.
///
/// Only via entries show the has-been-repeated marker.
impl fmt::Display for AddressChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.destination(), self.source()) {
            (None, _) => return Ok(()),
            (Some(dest), None) => f.write_str(&dest.identifier())?,
            (Some(dest), Some(src)) => write!(f, "{}>{}", src.identifier(), dest.identifier())?,
        }
        for via in self.vias() {
            write!(f, ",{via}")?;
        }
        Ok(())
    }
}

/// One decoded frame header. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    chain: AddressChain,
    control: Option<Control>,
    pid: Option<Pid>,
    payload: Bytes,
    raw: Bytes,
}

impl Header {
    /// Decode a frame body without copying it; the payload is a slice of
    /// `body`.
    pub fn from_bytes(body: Bytes) -> Self {
        let mut chain = AddressChain::new();
        let mut offset = 0;

        while !chain.is_terminated() && !chain.is_full() {
            let Some(octets) = body
                .get(offset..offset + ADDRESS_LEN)
                .and_then(|group| <&[u8; ADDRESS_LEN]>::try_from(group).ok())
            else {
                break;
            };
            chain.push(decode_address(octets));
            offset += ADDRESS_LEN;
        }

        // Without an extension bit there is no control field, whether the
        // buffer ended inside the chain or the chain filled up. Whatever is
        // left over is kept as payload.
        let chain_complete = chain.is_terminated();
        if !chain_complete {
            tracing::debug!(
                entries = chain.len(),
                remaining = body.len() - offset,
                "address chain not terminated"
            );
        }

        let control = if chain_complete {
            body.get(offset).map(|&byte| decode_control(byte))
        } else {
            None
        };
        if control.is_some() {
            offset += 1;
        }

        let pid = match control {
            Some(control) if control.carries_pid() => body.get(offset).map(|&byte| decode_pid(byte)),
            _ => None,
        };
        if pid.is_some() {
            offset += 1;
        }

        Self {
            chain,
            control,
            pid,
            payload: body.slice(offset..),
            raw: body,
        }
    }

    pub fn chain(&self) -> &AddressChain {
        &self.chain
    }

    pub fn destination(&self) -> Option<&Address> {
        self.chain.destination()
    }

    pub fn source(&self) -> Option<&Address> {
        self.chain.source()
    }

    pub fn vias(&self) -> &[Address] {
        self.chain.vias()
    }

    pub fn control(&self) -> Option<Control> {
        self.control
    }

    pub fn frame_type(&self) -> Option<FrameType> {
        self.control.map(|control| control.frame_type())
    }

    pub fn pid(&self) -> Option<Pid> {
        self.pid
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// The full frame body this header was decoded from.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Octets before the payload.
    pub fn header_len(&self) -> usize {
        self.raw.len() - self.payload.len()
    }

    pub fn is_ui(&self) -> bool {
        matches!(
            self.control.and_then(|control| control.unnumbered_kind()),
            Some(UnnumberedKind::Ui)
        )
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chain)?;
        match self.control {
            Some(control) => write!(f, " <{control}>")?,
            None => f.write_str(" <truncated>")?,
        }
        if let Some(pid) = self.pid {
            write!(f, " [{pid}]")?;
        }
        write!(f, " len={}", self.payload.len())
    }
}

/// Decode a frame body (type byte already stripped).
pub fn decode_header(body: &[u8]) -> Header {
    Header::from_bytes(Bytes::copy_from_slice(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::encode_address;

    fn entry(name: &str, ssid: u8, last: bool) -> [u8; ADDRESS_LEN] {
        let mut octets = encode_address(name, ssid);
        octets[6] |= 0x60;
        if last {
            octets[6] |= 0x01;
        }
        octets
    }

    fn body(entries: &[[u8; ADDRESS_LEN]], tail: &[u8]) -> Vec<u8> {
        let mut out: Vec<u8> = entries.iter().flatten().copied().collect();
        out.extend_from_slice(tail);
        out
    }

    #[test]
    fn decodes_ui_frame() {
        let mut dest = entry("STNDRD", 7, false);
        dest[6] |= 0x80;
        let raw = body(&[dest, entry("0TEST0", 5, true)], b"\x03\xF0HELLO");
        let header = decode_header(&raw);

        let destination = header.destination().unwrap();
        assert_eq!(destination.callsign.as_str(), "STNDRD");
        assert_eq!(destination.ssid, 7);
        assert_eq!(destination.to_string(), "STNDRD-7*");

        let source = header.source().unwrap();
        assert_eq!(source.callsign.as_str(), "0TEST0");
        assert_eq!(source.ssid, 5);

        assert_eq!(header.frame_type(), Some(FrameType::Unnumbered));
        assert_eq!(
            header.control().and_then(|c| c.unnumbered_kind()),
            Some(UnnumberedKind::Ui)
        );
        assert!(header.is_ui());
        assert_eq!(header.pid().map(Pid::name), Some("No Layer 3"));
        assert_eq!(header.payload().as_ref(), b"HELLO");
        assert_eq!(header.header_len(), 16);
        assert_eq!(header.to_string(), "0TEST0-5>STNDRD-7 <UI> [No Layer 3] len=5");
    }

    #[test]
    fn two_entry_chain_stops_after_source() {
        // Payload bytes look like another address group; they must not be
        // read as one.
        let raw = body(
            &[entry("DEST", 0, false), entry("SRC", 1, true)],
            &[0x03, 0xF0, 0x88, 0x8A, 0xA6, 0xA8, 0x40, 0x40, 0x61],
        );
        let header = decode_header(&raw);

        assert_eq!(header.chain().len(), 2);
        assert!(header.chain().is_terminated());
        assert!(header.vias().is_empty());
        assert_eq!(header.payload().len(), 7);
    }

    #[test]
    fn three_entry_chain_stops_after_via() {
        let mut via = entry("RELAY", 2, true);
        via[6] |= 0x80;
        let raw = body(
            &[entry("DEST", 0, false), entry("SRC", 0, false), via],
            b"\x03\xF0data",
        );
        let header = decode_header(&raw);

        assert_eq!(header.chain().len(), 3);
        let roles: Vec<String> = header.chain().roles().map(|(r, _)| r.to_string()).collect();
        assert_eq!(roles, ["Destination", "Source", "Via-1"]);
        assert_eq!(header.vias()[0].identifier(), "RELAY-2");
        assert_eq!(header.chain().to_string(), "SRC>DEST,RELAY-2*");
        assert_eq!(header.payload().as_ref(), b"data");
    }

    #[test]
    fn truncated_inside_chain() {
        let mut raw = body(&[entry("DEST", 0, false)], &[]);
        raw.extend_from_slice(&[0x82, 0x84]);
        let header = decode_header(&raw);

        assert_eq!(header.chain().len(), 1);
        assert!(!header.chain().is_terminated());
        assert!(header.source().is_none());
        assert!(header.control().is_none());
        assert!(header.pid().is_none());
        assert_eq!(header.payload().as_ref(), &[0x82, 0x84]);
    }

    #[test]
    fn truncated_after_chain() {
        let raw = body(&[entry("DEST", 0, false), entry("SRC", 0, true)], &[]);
        let header = decode_header(&raw);

        assert!(header.chain().is_terminated());
        assert!(header.control().is_none());
        assert!(header.payload().is_empty());
        assert_eq!(header.to_string(), "SRC>DEST <truncated> len=0");
    }

    #[test]
    fn ui_without_pid_byte() {
        let raw = body(&[entry("DEST", 0, false), entry("SRC", 0, true)], &[0x03]);
        let header = decode_header(&raw);

        assert!(header.is_ui());
        assert!(header.pid().is_none());
        assert!(header.payload().is_empty());
    }

    #[test]
    fn empty_body() {
        let header = decode_header(&[]);
        assert!(header.chain().is_empty());
        assert!(header.control().is_none());
        assert_eq!(header.to_string(), " <truncated> len=0");
    }

    #[test]
    fn supervisory_frame_has_no_pid() {
        let raw = body(&[entry("DEST", 0, false), entry("SRC", 0, true)], &[0x41, 0xF0]);
        let header = decode_header(&raw);

        assert_eq!(header.frame_type(), Some(FrameType::Supervisory));
        assert!(header.pid().is_none());
        assert_eq!(header.payload().as_ref(), &[0xF0]);
    }

    #[test]
    fn unknown_pid_is_explicit() {
        let raw = body(&[entry("DEST", 0, false), entry("SRC", 0, true)], &[0x00, 0x42, 0x01]);
        let header = decode_header(&raw);

        assert_eq!(header.frame_type(), Some(FrameType::Information));
        assert_eq!(header.pid(), Some(Pid::Unknown(0x42)));
        assert_eq!(header.payload().as_ref(), &[0x01]);
    }

    #[test]
    fn full_unterminated_chain_has_no_control() {
        let entries: Vec<[u8; ADDRESS_LEN]> =
            (0..12).map(|i| entry(&format!("HOP{i}"), 0, false)).collect();
        let raw = body(&entries, &[]);
        let header = decode_header(&raw);

        assert_eq!(header.chain().len(), MAX_ADDRESSES);
        assert!(!header.chain().is_terminated());
        assert_eq!(header.vias().len(), MAX_ADDRESSES - 2);
        assert!(header.control().is_none());
        assert!(header.pid().is_none());
        assert_eq!(header.payload().len(), 2 * ADDRESS_LEN);
    }

    #[test]
    fn eleven_hop_chain_is_not_read_as_control() {
        let entries: Vec<[u8; ADDRESS_LEN]> = (0..11)
            .map(|i| entry(&format!("HOP{i}"), 0, i == 10))
            .collect();
        let raw = body(&entries, b"\x03\xF0HI");
        let header = decode_header(&raw);

        assert_eq!(header.chain().len(), MAX_ADDRESSES);
        assert!(!header.chain().is_terminated());
        assert_eq!(header.control(), None);
        assert_eq!(header.frame_type(), None);
        assert_eq!(header.pid(), None);

        let mut leftover = entries[10].to_vec();
        leftover.extend_from_slice(b"\x03\xF0HI");
        assert_eq!(header.payload().as_ref(), leftover.as_slice());
        assert_eq!(header.header_len(), MAX_ADDRESSES * ADDRESS_LEN);
    }

    #[test]
    fn payload_shares_the_input_buffer() {
        let raw = Bytes::from(body(
            &[entry("DEST", 0, false), entry("SRC", 0, true)],
            b"\x03\xF0abc",
        ));
        let header = Header::from_bytes(raw.clone());
        assert_eq!(header.raw(), &raw);
        assert_eq!(header.clone().into_payload(), Bytes::from_static(b"abc"));
    }

    #[test]
    fn chain_push_refuses_past_capacity() {
        let mut chain = AddressChain::new();
        for _ in 0..MAX_ADDRESSES {
            assert!(chain.push(Address::default()));
        }
        assert!(!chain.push(Address::default()));
        assert_eq!(chain.len(), MAX_ADDRESSES);
    }
}
