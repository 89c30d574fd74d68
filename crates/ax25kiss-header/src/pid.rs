//! Protocol identifiers.

use std::fmt;

/// Layer-3 protocol carried by an I or UI frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pid {
    Iso8208,
    CompressedTcpIp,
    UncompressedTcpIp,
    SegmentationFragment,
    Texnet,
    LinkQuality,
    Appletalk,
    ArpaIp,
    ArpaAddressResolution,
    NetRom,
    NoLayer3,
    Escape,
    Unknown(u8),
}

/// Map a PID octet. Codes outside the table become [`Pid::Unknown`].
pub fn decode_pid(code: u8) -> Pid {
    match code {
        0x01 => Pid::Iso8208,
        0x06 => Pid::CompressedTcpIp,
        0x07 => Pid::UncompressedTcpIp,
        0x08 => Pid::SegmentationFragment,
        0xC3 => Pid::Texnet,
        0xC4 => Pid::LinkQuality,
        0xCA => Pid::Appletalk,
        0xCC => Pid::ArpaIp,
        0xCD => Pid::ArpaAddressResolution,
        0xCF => Pid::NetRom,
        0xF0 => Pid::NoLayer3,
        0xFF => Pid::Escape,
        other => Pid::Unknown(other),
    }
}

impl Pid {
    pub fn to_byte(self) -> u8 {
        match self {
            Pid::Iso8208 => 0x01,
            Pid::CompressedTcpIp => 0x06,
            Pid::UncompressedTcpIp => 0x07,
            Pid::SegmentationFragment => 0x08,
            Pid::Texnet => 0xC3,
            Pid::LinkQuality => 0xC4,
            Pid::Appletalk => 0xCA,
            Pid::ArpaIp => 0xCC,
            Pid::ArpaAddressResolution => 0xCD,
            Pid::NetRom => 0xCF,
            Pid::NoLayer3 => 0xF0,
            Pid::Escape => 0xFF,
            Pid::Unknown(code) => code,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Pid::Iso8208 => "ISO 8208",
            Pid::CompressedTcpIp => "Compressed TCP/IP",
            Pid::UncompressedTcpIp => "Uncompressed TCP/IP",
            Pid::SegmentationFragment => "Segmentation Fragment",
            Pid::Texnet => "TEXNET",
            Pid::LinkQuality => "Link Quality Protocol",
            Pid::Appletalk => "Appletalk",
            Pid::ArpaIp => "ARPA Internet Protocol",
            Pid::ArpaAddressResolution => "ARPA Address Resolution",
            Pid::NetRom => "TheNET (NET/ROM)",
            Pid::NoLayer3 => "No Layer 3",
            Pid::Escape => "Escape",
            Pid::Unknown(_) => "Unknown",
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Pid::Unknown(_))
    }
}

impl From<u8> for Pid {
    fn from(code: u8) -> Self {
        decode_pid(code)
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pid::Unknown(code) => write!(f, "Unknown (0x{code:02X})"),
            known => f.write_str(known.name()),
        }
    }
}
