//! Dedicated reader thread per transport.
//!
//! The thread owns a [`KissReader`] and pushes every completed frame into an
//! unbounded single-producer/single-consumer queue. Frames arrive in the
//! order their closing FEND was seen. The thread ends cleanly on EOF or when
//! the consumer drops the queue; only a transport I/O error is reported.

use std::io::Read;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryIter};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::codec::{DecoderStats, KissFrame};
use crate::error::{FrameError, Result};
use crate::reader::KissReader;

/// What a reader thread did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpSummary {
    /// Frames handed to the queue.
    pub delivered: u64,
    /// Decoder counters at shutdown.
    pub stats: DecoderStats,
}

/// Handle to a running reader thread and the consuming end of its queue.
pub struct FramePump {
    name: String,
    receiver: Receiver<KissFrame>,
    handle: JoinHandle<Result<PumpSummary>>,
}

impl FramePump {
    /// Start a reader thread named after the transport.
    pub fn spawn<T>(name: impl Into<String>, reader: KissReader<T>) -> Result<Self>
    where
        T: Read + Send + 'static,
    {
        let name = name.into();
        let (sender, receiver) = mpsc::channel();
        let thread_name = name.clone();
        let handle = thread::Builder::new()
            .name(format!("kiss-rx-{name}"))
            .spawn(move || pump(&thread_name, reader, sender))?;

        Ok(Self {
            name,
            receiver,
            handle,
        })
    }

    /// Transport name given at spawn time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block until the next frame, or `None` once the reader has stopped and
    /// the queue is drained.
    pub fn recv(&self) -> Option<KissFrame> {
        self.receiver.recv().ok()
    }

    /// Block for at most `timeout` waiting for the next frame.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> std::result::Result<KissFrame, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Frames already queued, without blocking.
    pub fn try_iter(&self) -> TryIter<'_, KissFrame> {
        self.receiver.try_iter()
    }

    /// True once the reader thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the reader thread and return its summary.
    ///
    /// Frames still queued are dropped; drain with [`FramePump::recv`] first.
    pub fn join(self) -> Result<PumpSummary> {
        drop(self.receiver);
        self.handle
            .join()
            .map_err(|_| FrameError::ReaderPanicked(self.name))?
    }
}

fn pump<T: Read>(
    name: &str,
    mut reader: KissReader<T>,
    sender: Sender<KissFrame>,
) -> Result<PumpSummary> {
    let span = tracing::debug_span!("kiss_rx", transport = name);
    let _enter = span.enter();

    let mut delivered = 0u64;
    loop {
        let frame = match reader.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::debug!(delivered, "transport closed, reader stopping");
                break;
            }
            Err(err) => {
                tracing::warn!(error = %err, delivered, "transport read failed, reader stopping");
                return Err(err);
            }
        };

        if sender.send(frame).is_err() {
            tracing::debug!(delivered, "frame consumer gone, reader stopping");
            break;
        }
        delivered += 1;
    }

    Ok(PumpSummary {
        delivered,
        stats: reader.stats(),
    })
}
