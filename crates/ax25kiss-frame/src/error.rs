/// Errors that can occur while moving KISS frames over a transport.
///
/// Malformed escape sequences are not errors: the decoder drops the damaged
/// frame and keeps scanning.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame body exceeds the configured maximum size.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport accepted zero bytes while a frame was being written.
    #[error("transport closed while writing a frame")]
    TransportClosed,

    /// The dedicated reader thread panicked.
    #[error("reader thread for {0} panicked")]
    ReaderPanicked(String),
}

pub type Result<T> = std::result::Result<T, FrameError>;
