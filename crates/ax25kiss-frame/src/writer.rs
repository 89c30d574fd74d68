use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, FramerConfig, KissFrame};
use crate::command;
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes complete KISS frames to any `Write` stream.
pub struct KissWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FramerConfig,
}

impl<T: Write> KissWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FramerConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FramerConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &KissFrame) -> Result<()> {
        self.send(frame.type_byte, frame.body.as_ref())
    }

    /// Send a link-layer frame as a data frame on `port`.
    pub fn send_data(&mut self, port: u8, body: &[u8]) -> Result<()> {
        self.send(command::type_byte(port, command::DATA), body)
    }

    /// Encode and send a body with an explicit type byte.
    pub fn send(&mut self, type_byte: u8, body: &[u8]) -> Result<()> {
        // The decoder's limit counts the type byte too.
        if body.len() + 1 > self.config.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size: body.len() + 1,
                max: self.config.max_frame_size,
            });
        }

        self.buf.clear();
        encode_frame(type_byte, body, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::TransportClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        tracing::trace!(type_byte, wire_size = self.buf.len(), "KISS frame written");
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }
}
