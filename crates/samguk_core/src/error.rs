use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Io,
    Parse,
    FileNotFound,
    PlayerMismatch,
    PlayerIndexOutOfRange,
    SlotOutOfRange,
    RoundTrip,
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("player general {index} is named {record:?} but the header says {header:?}")]
    PlayerMismatch {
        index: u16,
        header: String,
        record: String,
    },
    #[error("player index {index} is out of range, expected 0..{count}")]
    PlayerIndexOutOfRange { index: u16, count: usize },
    #[error("{kind} slot {slot} is out of range, expected 0..{count}")]
    SlotOutOfRange {
        kind: &'static str,
        slot: usize,
        count: usize,
    },
    #[error("{kind} {slot} did not survive an encode round trip: expected {expected:?}, found {found:?}")]
    RecordRoundTripMismatch {
        kind: &'static str,
        slot: usize,
        expected: String,
        found: String,
    },
    #[error("{kind} blob must be {expected} bytes, got {actual}")]
    BlobSize {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("save file is truncated: need at least {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("text error: {0}")]
    Text(String),
    #[error("invalid value {value} for {field}: {reason}")]
    InvalidValue {
        field: String,
        value: i64,
        reason: String,
    },
    #[error("unknown field {0:?}")]
    UnknownField(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl SaveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::FileNotFound(_) => ErrorCode::FileNotFound,
            Self::PlayerMismatch { .. } => ErrorCode::PlayerMismatch,
            Self::PlayerIndexOutOfRange { .. } => ErrorCode::PlayerIndexOutOfRange,
            Self::SlotOutOfRange { .. } => ErrorCode::SlotOutOfRange,
            Self::RecordRoundTripMismatch { .. } => ErrorCode::RoundTrip,
            Self::BlobSize { .. } | Self::Truncated { .. } | Self::Text(_) => ErrorCode::Parse,
            Self::InvalidValue { .. } | Self::UnknownField(_) => ErrorCode::InvalidInput,
            Self::Io(_) => ErrorCode::Io,
        }
    }

    /// Maps a missing file onto [`SaveError::FileNotFound`], anything else onto `Io`.
    pub(crate) fn from_open(err: io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound(path.into())
        } else {
            Self::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, SaveError>;
