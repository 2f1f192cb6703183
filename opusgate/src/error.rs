use thiserror::Error;

use crate::constants::constants;

/// A negative libopus status code, classified against the bridge's constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// One or more invalid or out of range arguments.
    BadArg,
    /// Not enough bytes allocated in the buffer.
    BufferTooSmall,
    /// An internal error was detected.
    InternalError,
    /// The compressed data passed is corrupted.
    InvalidPacket,
    /// Invalid or unsupported request number.
    Unimplemented,
    /// An encoder or decoder structure is invalid or already freed.
    InvalidState,
    /// Memory allocation has failed.
    AllocFail,
    /// A code this client does not know about.
    Unknown(i32),
}

impl Status {
    pub fn from_code(code: i32) -> Self {
        let c = constants();
        match code {
            x if x == c.bad_arg => Self::BadArg,
            x if x == c.buffer_too_small => Self::BufferTooSmall,
            x if x == c.internal_error => Self::InternalError,
            x if x == c.invalid_packet => Self::InvalidPacket,
            x if x == c.unimplemented => Self::Unimplemented,
            x if x == c.invalid_state => Self::InvalidState,
            x if x == c.alloc_fail => Self::AllocFail,
            x => Self::Unknown(x),
        }
    }

    /// Returns the raw libopus code.
    pub fn code(self) -> i32 {
        let c = constants();
        match self {
            Self::BadArg => c.bad_arg,
            Self::BufferTooSmall => c.buffer_too_small,
            Self::InternalError => c.internal_error,
            Self::InvalidPacket => c.invalid_packet,
            Self::Unimplemented => c.unimplemented,
            Self::InvalidState => c.invalid_state,
            Self::AllocFail => c.alloc_fail,
            Self::Unknown(code) => code,
        }
    }
}

/// Errors returned by the opus client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("opus: {message}")]
    Opus { status: Status, message: String },

    #[error("opus: number of channels must be 1 or 2: {0}")]
    InvalidChannels(i32),

    #[error("opus: no PCM data supplied")]
    EmptyPcm,

    #[error("opus: no packet data supplied")]
    EmptyPacket,

    #[error("opus: target buffer is empty")]
    EmptyBuffer,

    #[error("opus: buffer length {len} is not a multiple of {channels} channels")]
    ChannelMismatch { len: usize, channels: usize },

    #[error("opus: unknown bandwidth value {0}")]
    UnknownBandwidth(i32),

    #[error("opus: invalid encoder settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl Error {
    /// Builds an error from a negative libopus code.
    pub fn from_code(code: i32) -> Self {
        Self::Opus {
            status: Status::from_code(code),
            message: opusgate_bridge::ffi::error_string(code),
        }
    }

    /// Returns the libopus status, if this error came from libopus.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Opus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Passes non-negative codes through and turns negative ones into errors.
pub(crate) fn check(code: i32) -> Result<i32> {
    if code < constants().ok {
        return Err(Error::from_code(code));
    }
    Ok(code)
}
