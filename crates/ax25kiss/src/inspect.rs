//! Glue between the framer and the header decoder.

use bytes::Bytes;

use ax25kiss_frame::{command_name, type_byte, KissFrame};
use ax25kiss_header::{Header, UiFrameBuilder};

/// A received KISS frame, classified by its command nibble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspected {
    /// Command 0: the body is an AX.25 frame.
    Data { port: u8, header: Header },
    /// Any other command. Parameters are device specific and left as-is.
    Command {
        port: u8,
        command: u8,
        params: Bytes,
    },
}

impl Inspected {
    pub fn port(&self) -> u8 {
        match self {
            Inspected::Data { port, .. } | Inspected::Command { port, .. } => *port,
        }
    }

    pub fn header(&self) -> Option<&Header> {
        match self {
            Inspected::Data { header, .. } => Some(header),
            Inspected::Command { .. } => None,
        }
    }

    /// `DATA` for data frames, otherwise the KISS command name.
    pub fn command_name(&self) -> &'static str {
        match self {
            Inspected::Data { .. } => command_name(0),
            Inspected::Command { port, command, .. } => command_name(type_byte(*port, *command)),
        }
    }
}

/// Classify a frame; data frame bodies are decoded without copying.
pub fn inspect(frame: &KissFrame) -> Inspected {
    if frame.is_data() {
        Inspected::Data {
            port: frame.port(),
            header: Header::from_bytes(frame.body.clone()),
        }
    } else {
        Inspected::Command {
            port: frame.port(),
            command: frame.command(),
            params: frame.body.clone(),
        }
    }
}

/// Wrap a frame body into a KISS data frame.
pub trait IntoKiss {
    fn into_kiss(self, port: u8) -> KissFrame;
}

impl IntoKiss for UiFrameBuilder {
    /// Builds with thread-local random filler.
    fn into_kiss(self, port: u8) -> KissFrame {
        KissFrame::data(port, self.build())
    }
}

impl IntoKiss for Bytes {
    fn into_kiss(self, port: u8) -> KissFrame {
        KissFrame::data(port, self)
    }
}
