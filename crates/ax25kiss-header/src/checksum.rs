//! 16-bit checksums for diagnostic display.
//!
//! Nothing in this crate accepts or rejects a frame based on a checksum. The
//! algorithm is pluggable: anything implementing [`Checksum`], including a
//! plain `fn(&[u8]) -> u16`, can be handed to callers that print one.

/// A 16-bit checksum over a byte buffer.
pub trait Checksum {
    /// Compute the checksum of `bytes`.
    fn checksum(&self, bytes: &[u8]) -> u16;

    /// Short name for display.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> Checksum for F
where
    F: Fn(&[u8]) -> u16,
{
    fn checksum(&self, bytes: &[u8]) -> u16 {
        self(bytes)
    }
}

/// Built-in CRC-16 variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crc16 {
    /// CRC-16/X.25, the AX.25 frame check sequence.
    /// Polynomial: 0x1021 reflected, Init: 0xFFFF, XorOut: 0xFFFF
    #[default]
    X25,
    /// CRC-16/CCITT-FALSE.
    /// Polynomial: 0x1021, Init: 0xFFFF, RefIn: false, RefOut: false
    CcittFalse,
    /// CRC-16/XMODEM.
    /// Polynomial: 0x1021, Init: 0x0000, RefIn: false, RefOut: false
    Xmodem,
}

impl Crc16 {
    /// Every built-in variant.
    pub fn all() -> &'static [Crc16] {
        &[Crc16::X25, Crc16::CcittFalse, Crc16::Xmodem]
    }
}

impl Checksum for Crc16 {
    fn checksum(&self, bytes: &[u8]) -> u16 {
        match self {
            Crc16::X25 => crc16_x25(bytes),
            Crc16::CcittFalse => crc16_ccitt_false(bytes),
            Crc16::Xmodem => crc16_xmodem(bytes),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Crc16::X25 => "CRC-16/X.25",
            Crc16::CcittFalse => "CRC-16/CCITT-FALSE",
            Crc16::Xmodem => "CRC-16/XMODEM",
        }
    }
}

/// Checksum with the default variant (CRC-16/X.25).
pub fn checksum(bytes: &[u8]) -> u16 {
    Crc16::default().checksum(bytes)
}

/// CRC-16/X.25
pub fn crc16_x25(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;

    for &byte in data {
        crc ^= byte as u16;
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ 0x8408;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}

/// CRC-16/CCITT-FALSE
pub fn crc16_ccitt_false(data: &[u8]) -> u16 {
    crc16_msb_first(data, 0xFFFF)
}

/// CRC-16/XMODEM
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    crc16_msb_first(data, 0x0000)
}

fn crc16_msb_first(data: &[u8], init: u16) -> u16 {
    let mut crc = init;

    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}
