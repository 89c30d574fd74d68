//! `tokio_util::codec` adapter for the KISS framer.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{encode_frame, FramerConfig, KissDecoder, KissFrame};
use crate::error::{FrameError, Result};

/// KISS codec for `FramedRead` / `FramedWrite`.
#[derive(Debug)]
pub struct KissCodec {
    decoder: KissDecoder,
    max_frame_size: usize,
}

impl Default for KissCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl KissCodec {
    pub fn new() -> Self {
        Self::with_config(&FramerConfig::default())
    }

    pub fn with_config(config: &FramerConfig) -> Self {
        Self {
            decoder: KissDecoder::with_max_frame_size(config.max_frame_size),
            max_frame_size: config.max_frame_size,
        }
    }

    /// The underlying decoder, e.g. for its counters.
    pub fn decoder(&self) -> &KissDecoder {
        &self.decoder
    }
}

impl Decoder for KissCodec {
    type Item = KissFrame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<KissFrame>> {
        let mut consumed = 0usize;
        let mut completed = None;
        for &byte in src.iter() {
            consumed += 1;
            if let Some(frame) = self.decoder.push(byte) {
                completed = Some(frame);
                break;
            }
        }
        src.advance(consumed);
        Ok(completed)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<KissFrame>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                if !self.decoder.is_idle() {
                    tracing::debug!(
                        discarded = self.decoder.buffered_len(),
                        "stream ended mid-frame"
                    );
                }
                self.decoder.reset();
                Ok(None)
            }
        }
    }
}

impl Encoder<KissFrame> for KissCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: KissFrame, dst: &mut BytesMut) -> Result<()> {
        let size = frame.body.len() + 1;
        if size > self.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size,
                max: self.max_frame_size,
            });
        }
        encode_frame(frame.type_byte, &frame.body, dst);
        Ok(())
    }
}
