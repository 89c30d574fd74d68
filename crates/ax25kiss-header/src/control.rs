//! Control field classification (modulo-8 frames).
//!
//! ```text
//!               bit 7 6 5   4    3 2 1   0
//! Information       N(R)   P    N(S)     0
//! Supervisory       N(R)  P/F   S S  0   1
//! Unnumbered        M M M P/F   M M  1   1
//! ```

use std::fmt;

const POLL_FINAL: u8 = 0x10;

/// Broad frame family, derived from the low control bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Information,
    Supervisory,
    Unnumbered,
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameType::Information => "Information",
            FrameType::Supervisory => "Supervisory",
            FrameType::Unnumbered => "Unnumbered",
        })
    }
}

/// Supervisory function, bits 2-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupervisoryKind {
    /// Receive ready.
    Rr,
    /// Receive not ready.
    Rnr,
    /// Reject.
    Rej,
    /// Selective reject.
    Srej,
}

impl SupervisoryKind {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => SupervisoryKind::Rr,
            1 => SupervisoryKind::Rnr,
            2 => SupervisoryKind::Rej,
            _ => SupervisoryKind::Srej,
        }
    }

    fn bits(self) -> u8 {
        match self {
            SupervisoryKind::Rr => 0,
            SupervisoryKind::Rnr => 1,
            SupervisoryKind::Rej => 2,
            SupervisoryKind::Srej => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SupervisoryKind::Rr => "RR",
            SupervisoryKind::Rnr => "RNR",
            SupervisoryKind::Rej => "REJ",
            SupervisoryKind::Srej => "SREJ",
        }
    }
}

/// Unnumbered subtype, looked up with the P/F bit masked off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnnumberedKind {
    Sabme,
    Sabm,
    Disc,
    Dm,
    Ua,
    Frmr,
    Ui,
    Xid,
    Test,
    /// Any other modifier pattern; holds the masked control value.
    Unknown(u8),
}

impl UnnumberedKind {
    /// Look up a control byte. The P/F bit is ignored.
    pub fn from_control(control: u8) -> Self {
        match control & !POLL_FINAL {
            0x6F => UnnumberedKind::Sabme,
            0x2F => UnnumberedKind::Sabm,
            0x43 => UnnumberedKind::Disc,
            0x0F => UnnumberedKind::Dm,
            0x63 => UnnumberedKind::Ua,
            0x87 => UnnumberedKind::Frmr,
            0x03 => UnnumberedKind::Ui,
            0xAF => UnnumberedKind::Xid,
            0xE3 => UnnumberedKind::Test,
            other => UnnumberedKind::Unknown(other),
        }
    }

    /// Control value with P/F clear.
    pub fn code(self) -> u8 {
        match self {
            UnnumberedKind::Sabme => 0x6F,
            UnnumberedKind::Sabm => 0x2F,
            UnnumberedKind::Disc => 0x43,
            UnnumberedKind::Dm => 0x0F,
            UnnumberedKind::Ua => 0x63,
            UnnumberedKind::Frmr => 0x87,
            UnnumberedKind::Ui => 0x03,
            UnnumberedKind::Xid => 0xAF,
            UnnumberedKind::Test => 0xE3,
            UnnumberedKind::Unknown(code) => code & !POLL_FINAL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UnnumberedKind::Sabme => "SABME",
            UnnumberedKind::Sabm => "SABM",
            UnnumberedKind::Disc => "DISC",
            UnnumberedKind::Dm => "DM",
            UnnumberedKind::Ua => "UA",
            UnnumberedKind::Frmr => "FRMR",
            UnnumberedKind::Ui => "UI",
            UnnumberedKind::Xid => "XID",
            UnnumberedKind::Test => "TEST",
            UnnumberedKind::Unknown(_) => "Unknown",
        }
    }
}

/// A decoded control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Information {
        send_seq: u8,
        recv_seq: u8,
        poll: bool,
    },
    Supervisory {
        kind: SupervisoryKind,
        recv_seq: u8,
        poll_final: bool,
    },
    Unnumbered {
        kind: UnnumberedKind,
        poll_final: bool,
    },
}

/// Classify a control byte. Every value maps to something.
pub fn decode_control(byte: u8) -> Control {
    let poll_final = byte & POLL_FINAL != 0;
    if byte & 0x01 == 0 {
        Control::Information {
            send_seq: (byte >> 1) & 0x07,
            recv_seq: (byte >> 5) & 0x07,
            poll: poll_final,
        }
    } else if byte & 0x02 == 0 {
        Control::Supervisory {
            kind: SupervisoryKind::from_bits(byte >> 2),
            recv_seq: (byte >> 5) & 0x07,
            poll_final,
        }
    } else {
        Control::Unnumbered {
            kind: UnnumberedKind::from_control(byte),
            poll_final,
        }
    }
}

impl Control {
    /// A UI frame, P/F clear.
    pub const UI: Control = Control::Unnumbered {
        kind: UnnumberedKind::Ui,
        poll_final: false,
    };

    pub fn frame_type(&self) -> FrameType {
        match self {
            Control::Information { .. } => FrameType::Information,
            Control::Supervisory { .. } => FrameType::Supervisory,
            Control::Unnumbered { .. } => FrameType::Unnumbered,
        }
    }

    /// Unnumbered subtype, if this is an unnumbered frame.
    pub fn unnumbered_kind(&self) -> Option<UnnumberedKind> {
        match self {
            Control::Unnumbered { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Only I and UI frames carry a protocol-ID octet.
    pub fn carries_pid(&self) -> bool {
        matches!(
            self,
            Control::Information { .. }
                | Control::Unnumbered {
                    kind: UnnumberedKind::Ui,
                    ..
                }
        )
    }

    pub fn poll_final(&self) -> bool {
        match self {
            Control::Information { poll, .. } => *poll,
            Control::Supervisory { poll_final, .. } | Control::Unnumbered { poll_final, .. } => {
                *poll_final
            }
        }
    }

    /// Short mnemonic: `I`, `RR`, `UI`, ...
    pub fn name(&self) -> &'static str {
        match self {
            Control::Information { .. } => "I",
            Control::Supervisory { kind, .. } => kind.name(),
            Control::Unnumbered { kind, .. } => kind.name(),
        }
    }

    /// Encode back into a control byte.
    pub fn to_byte(&self) -> u8 {
        let pf = if self.poll_final() { POLL_FINAL } else { 0 };
        match *self {
            Control::Information {
                send_seq, recv_seq, ..
            } => ((recv_seq & 0x07) << 5) | pf | ((send_seq & 0x07) << 1),
            Control::Supervisory { kind, recv_seq, .. } => {
                ((recv_seq & 0x07) << 5) | pf | (kind.bits() << 2) | 0x01
            }
            Control::Unnumbered { kind, .. } => kind.code() | pf,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Information {
                send_seq,
                recv_seq,
                poll,
            } => write!(f, "I N(S)={send_seq} N(R)={recv_seq}{}", if *poll { " P" } else { "" }),
            Control::Supervisory {
                kind,
                recv_seq,
                poll_final,
            } => write!(
                f,
                "{} N(R)={recv_seq}{}",
                kind.name(),
                if *poll_final { " P/F" } else { "" }
            ),
            Control::Unnumbered {
                kind: UnnumberedKind::Unknown(code),
                poll_final,
            } => write!(
                f,
                "U?(0x{code:02X}){}",
                if *poll_final { " P/F" } else { "" }
            ),
            Control::Unnumbered { kind, poll_final } => {
                write!(f, "{}{}", kind.name(), if *poll_final { " P/F" } else { "" })
            }
        }
    }
}
