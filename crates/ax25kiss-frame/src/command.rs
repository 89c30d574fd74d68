//! KISS type byte: port number in the high nibble, command in the low nibble.
//!
//! Command 0 carries a link-layer frame. The rest configure the TNC; their
//! parameters are device specific and are passed through untouched.

/// Data frame, body is an AX.25 frame.
pub const DATA: u8 = 0x00;

/// Transmitter keyup delay, in 10 ms units.
pub const TX_DELAY: u8 = 0x01;

/// Persistence parameter for p-persistent CSMA.
pub const PERSISTENCE: u8 = 0x02;

/// Slot interval, in 10 ms units.
pub const SLOT_TIME: u8 = 0x03;

/// Time to hold up the transmitter after the frame, in 10 ms units.
pub const TX_TAIL: u8 = 0x04;

/// 0 = half duplex, anything else = full duplex.
pub const FULL_DUPLEX: u8 = 0x05;

/// Hardware specific command.
pub const SET_HARDWARE: u8 = 0x06;

/// Exit KISS mode. Sent as a whole type byte, not a nibble.
pub const RETURN: u8 = 0xFF;

/// Highest addressable TNC port.
pub const MAX_PORT: u8 = 0x0F;

/// Build a type byte from a port and a command.
pub fn type_byte(port: u8, command: u8) -> u8 {
    ((port & MAX_PORT) << 4) | (command & 0x0F)
}

/// Port number carried in a type byte.
pub fn port_of(type_byte: u8) -> u8 {
    type_byte >> 4
}

/// Command nibble carried in a type byte.
pub fn command_of(type_byte: u8) -> u8 {
    type_byte & 0x0F
}

/// Returns a human-readable name for the command in a type byte.
pub fn command_name(type_byte: u8) -> &'static str {
    if type_byte == RETURN {
        return "RETURN";
    }
    match command_of(type_byte) {
        DATA => "DATA",
        TX_DELAY => "TXDELAY",
        PERSISTENCE => "P",
        SLOT_TIME => "SLOTTIME",
        TX_TAIL => "TXTAIL",
        FULL_DUPLEX => "FULLDUPLEX",
        SET_HARDWARE => "SETHARDWARE",
        _ => "VENDOR",
    }
}

/// Returns true if the type byte announces a data frame.
pub fn is_data(type_byte: u8) -> bool {
    type_byte != RETURN && command_of(type_byte) == DATA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_byte_packs_port_and_command() {
        assert_eq!(type_byte(0, DATA), 0x00);
        assert_eq!(type_byte(1, TX_DELAY), 0x11);
        assert_eq!(type_byte(3, SET_HARDWARE), 0x36);
        // Out of range inputs are masked rather than spilling into the other nibble.
        assert_eq!(type_byte(0x1F, 0x1A), 0xFA);
    }

    #[test]
    fn port_and_command_unpack() {
        assert_eq!(port_of(0x36), 3);
        assert_eq!(command_of(0x36), SET_HARDWARE);
    }

    #[test]
    fn names() {
        assert_eq!(command_name(0x00), "DATA");
        assert_eq!(command_name(0x20), "DATA");
        assert_eq!(command_name(0x03), "SLOTTIME");
        assert_eq!(command_name(0x0A), "VENDOR");
        assert_eq!(command_name(RETURN), "RETURN");
    }

    #[test]
    fn return_is_not_data() {
        assert!(is_data(0x10));
        assert!(!is_data(0x01));
        assert!(!is_data(RETURN));
    }
}
