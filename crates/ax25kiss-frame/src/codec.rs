use bytes::{BufMut, Bytes, BytesMut};

use crate::command::{self, DATA};

/// Frame delimiter.
pub const FEND: u8 = 0xC0;

/// Escape introducer.
pub const FESC: u8 = 0xDB;

/// Escaped form of FEND (follows FESC).
pub const TFEND: u8 = 0xDC;

/// Escaped form of FESC (follows FESC).
pub const TFESC: u8 = 0xDD;

/// Default upper bound on an unescaped frame, type byte included: 16 KiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024;

/// Default size of a single transport read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// One frame recovered from (or destined for) the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KissFrame {
    /// Port and command, see [`crate::command`].
    pub type_byte: u8,
    /// Unescaped frame body, type byte already stripped.
    pub body: Bytes,
}

impl KissFrame {
    /// Create a new frame.
    pub fn new(type_byte: u8, body: impl Into<Bytes>) -> Self {
        Self {
            type_byte,
            body: body.into(),
        }
    }

    /// Create a data frame for a TNC port.
    pub fn data(port: u8, body: impl Into<Bytes>) -> Self {
        Self::new(command::type_byte(port, DATA), body)
    }

    /// TNC port this frame belongs to.
    pub fn port(&self) -> u8 {
        command::port_of(self.type_byte)
    }

    /// Command nibble of the type byte.
    pub fn command(&self) -> u8 {
        command::command_of(self.type_byte)
    }

    /// True when the body is a link-layer frame.
    pub fn is_data(&self) -> bool {
        command::is_data(self.type_byte)
    }

    /// Number of bytes this frame occupies on the wire, delimiters included.
    pub fn wire_size(&self) -> usize {
        2 + escaped_len(&[self.type_byte]) + escaped_len(&self.body)
    }
}

/// Escape `src` into `dst`.
///
/// Every FEND becomes `FESC TFEND` and every FESC becomes `FESC TFESC`. Only
/// the original bytes are scanned, so inserted bytes are never re-escaped.
pub fn escape_into(src: &[u8], dst: &mut BytesMut) {
    dst.reserve(src.len());
    for &byte in src {
        match byte {
            FEND => dst.put_slice(&[FESC, TFEND]),
            FESC => dst.put_slice(&[FESC, TFESC]),
            other => dst.put_u8(other),
        }
    }
}

/// Length of `src` once escaped.
pub fn escaped_len(src: &[u8]) -> usize {
    src.len()
        + src
            .iter()
            .filter(|&&byte| byte == FEND || byte == FESC)
            .count()
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────┬───────────┬──────────────────────┬──────┐
/// │ FEND │ type byte │ escaped body         │ FEND │
/// │ 0xC0 │ port|cmd  │ FEND/FESC substituted│ 0xC0 │
/// └──────┴───────────┴──────────────────────┴──────┘
/// ```
///
/// The type byte is escaped like the body. For every real port/command pair
/// that is a no-op; it only matters for port 12 data (0xC0) and similar.
pub fn encode_frame(type_byte: u8, body: &[u8], dst: &mut BytesMut) {
    dst.reserve(escaped_len(body) + 4);
    dst.put_u8(FEND);
    escape_into(&[type_byte], dst);
    escape_into(body, dst);
    dst.put_u8(FEND);
}

/// Encode a frame into a freshly allocated buffer.
pub fn encode_to_vec(type_byte: u8, body: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_frame(type_byte, body, &mut buf);
    buf.to_vec()
}

/// Configuration for the KISS framer.
#[derive(Debug, Clone)]
pub struct FramerConfig {
    /// Largest unescaped frame (type byte included) the decoder will
    /// accumulate before dropping it. Default: 16 KiB.
    pub max_frame_size: usize,
    /// Bytes requested per transport read. Default: 1 KiB.
    pub read_chunk_size: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

/// Counters kept by a [`KissDecoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Frames emitted.
    pub frames: u64,
    /// Frames dropped because FESC was followed by something other than
    /// TFEND or TFESC.
    pub violations: u64,
    /// Frames dropped for exceeding the size limit.
    pub oversized: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Escaped,
    /// Skipping the tail of an oversized frame until the next FEND.
    Discard,
}

/// Streaming KISS decoder.
///
/// Feed it bytes in whatever chunks the transport produces; it yields a
/// [`KissFrame`] each time a closing FEND ends a non-empty frame. Each
/// transport needs its own decoder since the escape state is per stream.
#[derive(Debug)]
pub struct KissDecoder {
    state: State,
    buf: BytesMut,
    max_frame_size: usize,
    stats: DecoderStats,
}

impl Default for KissDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KissDecoder {
    /// Create a decoder with the default frame size limit.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Create a decoder with an explicit frame size limit.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            state: State::Normal,
            buf: BytesMut::with_capacity(max_frame_size.min(DEFAULT_READ_CHUNK_SIZE)),
            max_frame_size: max_frame_size.max(1),
            stats: DecoderStats::default(),
        }
    }

    /// Process one byte, returning a frame if this byte completed one.
    pub fn push(&mut self, byte: u8) -> Option<KissFrame> {
        match self.state {
            State::Normal => match byte {
                FESC => {
                    self.state = State::Escaped;
                    None
                }
                FEND => self.finish(),
                other => {
                    self.append(other);
                    None
                }
            },
            State::Escaped => {
                self.state = State::Normal;
                match byte {
                    TFESC => self.append(FESC),
                    TFEND => self.append(FEND),
                    other => {
                        tracing::debug!(
                            byte = other,
                            dropped = self.buf.len(),
                            "invalid KISS escape sequence, dropping frame"
                        );
                        self.stats.violations += 1;
                        self.buf.clear();
                    }
                }
                None
            }
            State::Discard => {
                if byte == FEND {
                    self.state = State::Normal;
                }
                None
            }
        }
    }

    /// Process a chunk of bytes, returning every frame it completed in order.
    pub fn feed(&mut self, data: &[u8]) -> Vec<KissFrame> {
        data.iter().filter_map(|&byte| self.push(byte)).collect()
    }

    /// Drop any partial frame and return to the idle state.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = State::Normal;
    }

    /// Bytes of the frame currently being accumulated.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// True when no frame is in progress.
    pub fn is_idle(&self) -> bool {
        self.buf.is_empty() && self.state == State::Normal
    }

    /// Counters since creation.
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Configured frame size limit.
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    fn append(&mut self, byte: u8) {
        if self.buf.len() >= self.max_frame_size {
            tracing::debug!(
                max = self.max_frame_size,
                "KISS frame exceeds size limit, discarding until next FEND"
            );
            self.stats.oversized += 1;
            self.buf.clear();
            self.state = State::Discard;
            return;
        }
        self.buf.put_u8(byte);
    }

    fn finish(&mut self) -> Option<KissFrame> {
        if self.buf.is_empty() {
            return None;
        }
        let raw = self.buf.split().freeze();
        let frame = KissFrame {
            type_byte: raw[0],
            body: raw.slice(1..),
        };
        self.stats.frames += 1;
        tracing::trace!(
            port = frame.port(),
            command = frame.command(),
            size = frame.body.len(),
            "KISS frame complete"
        );
        Some(frame)
    }
}
