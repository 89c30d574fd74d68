/// Errors raised while turning station identifiers into addresses.
///
/// Decoding a received header never fails; unknown or truncated fields are
/// reported through the decoded value instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// The callsign part of the identifier is empty.
    #[error("callsign is empty")]
    EmptyCallsign,

    /// The callsign has more than six characters.
    #[error("callsign {0:?} is longer than 6 characters")]
    CallsignTooLong(String),

    /// The callsign contains something other than A-Z or 0-9.
    #[error("callsign {callsign:?} contains invalid character {ch:?}")]
    InvalidCallsignChar { callsign: String, ch: char },

    /// The SSID suffix is not a one or two digit number.
    #[error("invalid SSID {0:?}")]
    InvalidSsid(String),
}

pub type Result<T> = std::result::Result<T, HeaderError>;
