/*!
    Error types for the vidtensor crates.
*/

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::PixelFormat;

/**
    Step of opening a media file that failed.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpenStage {
    /// Opening the container and probing its streams.
    OpenContainer,
    /// Locating the best video stream.
    FindVideoStream,
    /// Creating and opening the video decoder.
    OpenDecoder,
}

impl fmt::Display for OpenStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OpenContainer => "open container",
            Self::FindVideoStream => "find video stream",
            Self::OpenDecoder => "open decoder",
        };
        f.write_str(s)
    }
}

/**
    Error type for the vidtensor crates.

    End of stream is not represented here: frame acquisition returns
    `Ok(None)` once the stream is exhausted.
*/
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to {stage} for {}: {message}", .path.display())]
    Open {
        path: PathBuf,
        stage: OpenStage,
        message: String,
    },

    #[error("failed to read packet: {message}")]
    Read { message: String },

    #[error("failed to decode video frame: {message}")]
    Decode { message: String },

    #[error("invalid filter (pixel format {pixel_format:?}, chain {chain:?}): {message}")]
    FilterConfig {
        pixel_format: String,
        chain: String,
        message: String,
    },

    #[error("filter graph failed: {message}")]
    FilterRuntime { message: String },

    #[error("failed to seek to {seconds}s: {message}")]
    Seek { seconds: f64, message: String },

    #[error("unsupported pixel format: {format}")]
    UnsupportedFormat { format: PixelFormat },

    #[error("filter already attached to this session")]
    AlreadyAttached,

    #[error("session was moved into a filtered session")]
    SessionMoved,

    #[error("session is closed")]
    SessionClosed,

    #[error("destination buffer has {actual} elements, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("invalid frame: {message}")]
    InvalidFrame { message: String },

    #[error("failed to initialize media libraries: {message}")]
    Init { message: String },
}

/**
    Fieldless mirror of [`Error`] for callers that branch on the kind only.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Open,
    Read,
    Decode,
    FilterConfig,
    FilterRuntime,
    Seek,
    UnsupportedFormat,
    AlreadyAttached,
    SessionMoved,
    SessionClosed,
    BufferSize,
    InvalidFrame,
    Init,
}

impl Error {
    pub fn open(path: impl AsRef<Path>, stage: OpenStage, message: impl Into<String>) -> Self {
        Self::Open {
            path: path.as_ref().to_path_buf(),
            stage,
            message: message.into(),
        }
    }

    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn filter_config(
        pixel_format: impl Into<String>,
        chain: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::FilterConfig {
            pixel_format: pixel_format.into(),
            chain: chain.into(),
            message: message.into(),
        }
    }

    pub fn filter_runtime(message: impl Into<String>) -> Self {
        Self::FilterRuntime {
            message: message.into(),
        }
    }

    pub fn seek(seconds: f64, message: impl Into<String>) -> Self {
        Self::Seek {
            seconds,
            message: message.into(),
        }
    }

    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: message.into(),
        }
    }

    /**
        Returns the kind of this error.
    */
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Open { .. } => ErrorKind::Open,
            Self::Read { .. } => ErrorKind::Read,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::FilterConfig { .. } => ErrorKind::FilterConfig,
            Self::FilterRuntime { .. } => ErrorKind::FilterRuntime,
            Self::Seek { .. } => ErrorKind::Seek,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::AlreadyAttached => ErrorKind::AlreadyAttached,
            Self::SessionMoved => ErrorKind::SessionMoved,
            Self::SessionClosed => ErrorKind::SessionClosed,
            Self::BufferSize { .. } => ErrorKind::BufferSize,
            Self::InvalidFrame { .. } => ErrorKind::InvalidFrame,
            Self::Init { .. } => ErrorKind::Init,
        }
    }

    /**
        Returns true if the error comes from using a session that no longer
        owns its media handles.
    */
    pub fn is_session_state(&self) -> bool {
        matches!(self, Self::SessionMoved | Self::SessionClosed)
    }
}

/**
    Result type alias for the vidtensor crates.
*/
pub type Result<T> = std::result::Result<T, Error>;
