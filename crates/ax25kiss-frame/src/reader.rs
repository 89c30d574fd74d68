use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use crate::codec::{DecoderStats, FramerConfig, KissDecoder, KissFrame};
use crate::error::{FrameError, Result};

/// Reads complete KISS frames from any `Read` stream.
///
/// Handles partial reads internally, callers always get complete frames.
/// Serial ports are usually opened with a read timeout, so `TimedOut` and
/// `Interrupted` are retried rather than reported.
pub struct KissReader<T> {
    inner: T,
    decoder: KissDecoder,
    pending: VecDeque<KissFrame>,
    scratch: Vec<u8>,
    config: FramerConfig,
    eof: bool,
}

impl<T: Read> KissReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FramerConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FramerConfig) -> Self {
        Self {
            inner,
            decoder: KissDecoder::with_max_frame_size(config.max_frame_size),
            pending: VecDeque::new(),
            scratch: vec![0u8; config.read_chunk_size.max(1)],
            config,
            eof: false,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Ok(None)` once the transport reports EOF. A frame still in
    /// progress at that point is discarded.
    pub fn read_frame(&mut self) -> Result<Option<KissFrame>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(Some(frame));
            }
            if self.eof {
                return Ok(None);
            }

            let read = match self.inner.read(&mut self.scratch) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::TimedOut => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                if !self.decoder.is_idle() {
                    tracing::debug!(
                        discarded = self.decoder.buffered_len(),
                        "transport closed mid-frame"
                    );
                }
                self.decoder.reset();
                self.eof = true;
                continue;
            }

            for &byte in &self.scratch[..read] {
                if let Some(frame) = self.decoder.push(byte) {
                    self.pending.push_back(frame);
                }
            }
        }
    }

    /// True once EOF has been seen and every buffered frame was returned.
    pub fn is_finished(&self) -> bool {
        self.eof && self.pending.is_empty()
    }

    /// Decoder counters.
    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }
}

impl<T: Read> Iterator for KissReader<T> {
    type Item = Result<KissFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::{encode_to_vec, FEND, FESC};

    fn wire_of(frames: &[(u8, &[u8])]) -> Vec<u8> {
        frames
            .iter()
            .flat_map(|(type_byte, body)| encode_to_vec(*type_byte, body))
            .collect()
    }

    #[test]
    fn read_single_frame() {
        let mut reader = KissReader::new(Cursor::new(wire_of(&[(0x00, b"hello")])));
        let frame = reader.read_frame().unwrap().unwrap();

        assert_eq!(frame.type_byte, 0x00);
        assert_eq!(frame.body.as_ref(), b"hello");
        assert!(reader.read_frame().unwrap().is_none());
        assert!(reader.is_finished());
    }

    #[test]
    fn read_multiple_frames_in_order() {
        let wire = wire_of(&[(0x00, b"one"), (0x10, b"two"), (0x00, b"three")]);
        let reader = KissReader::new(Cursor::new(wire));

        let frames: Vec<KissFrame> = reader.map(|frame| frame.unwrap()).collect();
        let bodies: Vec<&[u8]> = frames.iter().map(|f| f.body.as_ref()).collect();
        assert_eq!(bodies, [b"one".as_ref(), b"two".as_ref(), b"three".as_ref()]);
        assert_eq!(frames[1].port(), 1);
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire_of(&[(0x00, &[FEND, b's', FESC, b'w'])]),
            pos: 0,
        };
        let mut reader = KissReader::new(byte_reader);

        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.body.as_ref(), &[FEND, b's', FESC, b'w']);
    }

    #[test]
    fn eof_is_clean_termination() {
        let mut reader = KissReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(reader.read_frame().unwrap().is_none());
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn eof_mid_frame_discards_partial() {
        let mut wire = wire_of(&[(0x00, b"complete")]);
        wire.extend_from_slice(&[FEND, 0x00, b'p', b'a', FESC]);

        let mut reader = KissReader::new(Cursor::new(wire));
        assert_eq!(
            reader.read_frame().unwrap().unwrap().body.as_ref(),
            b"complete"
        );
        assert!(reader.read_frame().unwrap().is_none());
        assert_eq!(reader.stats().frames, 1);
    }

    #[test]
    fn small_read_chunks() {
        let cfg = FramerConfig {
            read_chunk_size: 3,
            ..FramerConfig::default()
        };
        let wire = wire_of(&[(0x00, b"chunked"), (0x00, b"again")]);
        let mut reader = KissReader::with_config(Cursor::new(wire), cfg);

        assert_eq!(reader.read_frame().unwrap().unwrap().body.as_ref(), b"chunked");
        assert_eq!(reader.read_frame().unwrap().unwrap().body.as_ref(), b"again");
    }

    #[test]
    fn interrupted_and_timed_out_reads_retry() {
        let reader = FlakyReader {
            errors: vec![ErrorKind::Interrupted, ErrorKind::TimedOut],
            bytes: wire_of(&[(0x00, b"ok")]),
            pos: 0,
        };
        let mut framed = KissReader::new(reader);
        let frame = framed.read_frame().unwrap().unwrap();
        assert_eq!(frame.body.as_ref(), b"ok");
    }

    #[test]
    fn other_io_errors_propagate() {
        let reader = FlakyReader {
            errors: vec![ErrorKind::BrokenPipe],
            bytes: Vec::new(),
            pos: 0,
        };
        let mut framed = KissReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = KissReader::new(Cursor::new(Vec::<u8>::new()));

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        assert_eq!(reader.config().max_frame_size, FramerConfig::default().max_frame_size);
        let _inner = reader.into_inner();
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct FlakyReader {
        errors: Vec<ErrorKind>,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.errors.is_empty() {
                return Err(std::io::Error::from(self.errors.remove(0)));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
