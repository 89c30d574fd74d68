use std::fmt;
use std::io;

use ax25kiss_frame::FrameError;
use ax25kiss_header::HeaderError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::UnexpectedEof => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn serial_error(context: &str, err: serialport::Error) -> CliError {
    match err.kind() {
        serialport::ErrorKind::Io(kind) => io_error(context, io::Error::new(kind, err.description)),
        serialport::ErrorKind::InvalidInput => CliError::new(USAGE, format!("{context}: {err}")),
        serialport::ErrorKind::NoDevice | serialport::ErrorKind::Unknown => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::FrameTooLarge { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        FrameError::TransportClosed => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
        FrameError::ReaderPanicked(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn header_error(context: &str, err: HeaderError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}
