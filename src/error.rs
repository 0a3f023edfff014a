//! Error taxonomy for indexing and transcoding LCM logs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to decode LCM log: unexpected EOF at offset {offset}")]
    TruncatedLog { offset: u64 },

    #[error("failed to decode LCM log: malformed event at offset {offset}")]
    CorruptLog { offset: u64 },

    #[error("failed to parse event at offset {offset}")]
    DecodeFailure { offset: u64 },

    #[error("transcoding channel {topic} is not implemented")]
    UnsupportedChannel { topic: String },

    #[error("unrecognized indexed channel {channel_id}")]
    InternalInconsistency { channel_id: u16 },

    #[error("malformed {type_name} payload: {reason}")]
    MalformedPayload {
        type_name: &'static str,
        reason: String,
    },

    #[error("{0}")]
    UnsupportedInput(String),

    #[error("failed to read entire file: expected {expected} bytes, got {actual}")]
    ShortRead { expected: u64, actual: u64 },

    #[error("loader has not been initialized")]
    NotInitialized,

    #[error("invalid velodyne calibration {path}: {reason}")]
    Calibration { path: PathBuf, reason: String },

    #[error("protobuf encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("MCAP error: {0}")]
    Mcap(#[from] mcap::McapError),
}

impl LoaderError {
    pub(crate) fn malformed(type_name: &'static str, reason: impl Into<String>) -> Self {
        LoaderError::MalformedPayload {
            type_name,
            reason: reason.into(),
        }
    }

    /// Errors that point at a corrupted buffer or a broken invariant rather
    /// than at one bad message. Consumers should stop iterating on these.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LoaderError::DecodeFailure { .. } | LoaderError::InternalInconsistency { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LoaderError>;
