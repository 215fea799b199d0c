use thiserror::Error;

use crate::bus::SessionState;

/// Errors that can occur when talking to the mount.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors raised by the transport, other than timeouts.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A value could not be converted to or from its wire representation.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    /// Frame errors occur when parsing bytes received from the bus.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
    /// The command name is not part of the catalog.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// The request data does not match the length declared in the catalog.
    #[error("{command} expects {expected} request bytes, got {actual}")]
    RequestLength {
        /// Catalog name of the command
        command: &'static str,
        /// Declared request length, including the message id byte
        expected: usize,
        /// Length of the composed request, including the message id byte
        actual: usize,
    },
    /// An argument passed to a [`crate::HandController`] method was out of range.
    /// Nothing was written to the transport.
    #[error("{name} must be within {min}..={max}, got {value}")]
    ArgumentRange {
        /// Name of the argument
        name: &'static str,
        /// The rejected value
        value: f64,
        /// Smallest accepted value
        min: f64,
        /// Largest accepted value
        max: f64,
    },
    /// No complete response arrived before the read timeout expired.
    #[error("timed out after receiving {received} of {expected} bytes")]
    Timeout {
        /// Number of bytes the exchange was waiting for
        expected: usize,
        /// Number of bytes that arrived before the timeout
        received: usize,
    },
    /// A well formed reply arrived, but not the one that was asked for.
    #[error("unexpected response: expected {expected}, got {actual}")]
    UnexpectedResponse {
        /// Description of the expected reply
        expected: String,
        /// Description of the reply that arrived
        actual: String,
    },
    /// A previous exchange failed and the session has to be reset before it is used again.
    #[error("session is in state {0:?}, call reset() first")]
    NotIdle(SessionState),
}

impl Error {
    /// Returns true for errors raised while reading a reply. They leave the bus in an unknown
    /// state, and the session refuses the next command until [`crate::Session::reset`].
    pub fn needs_reset(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::Io(_) | Error::UnexpectedResponse { .. } => true,
            Error::Frame(e) => !matches!(e, FrameError::PayloadTooLong(_)),
            _ => false,
        }
    }
}

/// Errors raised by the numeric codec when a value is outside its documented domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The fraction of a rotation is not finite or outside the accepted range.
    #[error("fraction {0} is outside the accepted range")]
    Fraction(f64),
    /// Degrees must be below 360.
    #[error("degrees must be below 360, got {0}")]
    Degrees(u16),
    /// Minutes must be below 60.
    #[error("minutes must be below 60, got {0}")]
    Minutes(u8),
    /// Seconds must be finite and within 0..60.
    #[error("seconds must be within 0..60, got {0}")]
    Seconds(f64),
    /// The integer does not fit in a signed 16 bit value.
    #[error("{0} does not fit in 2 bytes")]
    Int2(i32),
}

/// Frame errors occur when encoding or parsing bytes exchanged with the bus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than the smallest possible frame were supplied.
    #[error("frame too short: need at least {expected} bytes, got {actual}")]
    TooShort {
        /// Minimum number of bytes
        expected: usize,
        /// Number of bytes supplied
        actual: usize,
    },
    /// The first byte is not the `0x3b` preamble.
    #[error("invalid preamble: {0:#04x}")]
    Preamble(u8),
    /// The length byte does not agree with the number of bytes supplied.
    #[error("length byte declares {declared} bytes, frame carries {actual}")]
    Length {
        /// Value of the length byte
        declared: u8,
        /// Number of bytes between the length byte and the checksum
        actual: usize,
    },
    /// The trailing checksum does not match the frame contents.
    #[error("checksum mismatch: computed {computed:#04x}, received {received:#04x}")]
    Checksum {
        /// Checksum computed over the received bytes
        computed: u8,
        /// Checksum byte found at the end of the frame
        received: u8,
    },
    /// A passthrough reply did not end with the `#` terminator.
    #[error("missing reply terminator, got {0:#04x}")]
    Terminator(u8),
    /// The device id is not a known [`crate::Target`].
    #[error("unknown device id: {0:#04x}")]
    UnknownDevice(u8),
    /// The payload does not fit in the length byte.
    #[error("payload of {0} bytes is too long")]
    PayloadTooLong(usize),
}
