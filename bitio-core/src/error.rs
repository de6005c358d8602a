//! Error types for bitio stream operations.
//!
//! End of stream is not an error at the raw transfer level: `read` simply
//! returns a zero or short count. Codec operations that need a fixed number
//! of bytes turn that into [`BitioError::UnexpectedEof`].
//!
//! Some variants are *fatal*: a compression engine failure or a contract
//! violation leaves the stream in a state that must not be used again.
//! [`BitioError::is_fatal`] tells the two classes apart.

use std::io;
use thiserror::Error;

/// The error type for bitio operations.
#[derive(Debug, Error)]
pub enum BitioError {
    /// I/O error from an underlying file or handle.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended before a value could be decoded.
    #[error("Unexpected end of stream: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },

    /// The backend stored fewer bytes than a codec operation required.
    #[error("Short write: backend accepted {accepted} of {expected} bytes")]
    ShortWrite {
        /// Number of bytes handed to the backend.
        expected: usize,
        /// Number of bytes the backend stored.
        accepted: usize,
    },

    /// Bit width outside the supported range.
    #[error("Invalid bit width: {0} (must be 0-32)")]
    InvalidBitWidth(u8),

    /// A string handed to the writer contains a NUL byte before its end.
    #[error("String contains an interior NUL byte at offset {offset}")]
    InteriorNul {
        /// Offset of the first NUL byte.
        offset: usize,
    },

    /// Functionality not compiled into this build.
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// What was requested.
        feature: String,
    },

    /// The compression engine failed. Fatal.
    #[error("Compression engine failure in {stage}: {message}")]
    Compression {
        /// Engine operation that failed.
        stage: &'static str,
        /// Engine diagnostic.
        message: String,
    },

    /// The stream was used in violation of its contract. Fatal.
    #[error("Illegal operation: {message}")]
    Misuse {
        /// Description of the violation.
        message: String,
    },
}

/// Result type alias for bitio operations.
pub type Result<T> = std::result::Result<T, BitioError>;

impl BitioError {
    /// Create an unexpected end-of-stream error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }

    /// Create a short write error.
    pub fn short_write(expected: usize, accepted: usize) -> Self {
        Self::ShortWrite { expected, accepted }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    /// Create a compression engine error.
    pub fn compression(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Compression {
            stage,
            message: message.into(),
        }
    }

    /// Create a misuse error.
    pub fn misuse(message: impl Into<String>) -> Self {
        Self::Misuse {
            message: message.into(),
        }
    }

    /// Whether the stream that produced this error must not be used again.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Compression { .. } | Self::Misuse { .. })
    }

    /// Convert into an [`io::Error`], keeping I/O errors intact.
    pub fn into_io(self) -> io::Error {
        match self {
            Self::Io(err) => err,
            Self::UnexpectedEof { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, self),
            Self::ShortWrite { .. } => io::Error::new(io::ErrorKind::WriteZero, self),
            Self::Unsupported { .. } => io::Error::new(io::ErrorKind::Unsupported, self),
            Self::InvalidBitWidth(_) | Self::InteriorNul { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, self)
            }
            Self::Compression { .. } => io::Error::new(io::ErrorKind::InvalidData, self),
            Self::Misuse { .. } => io::Error::other(self),
        }
    }
}

/// Build a misuse error and report it on the diagnostic channel.
pub(crate) fn fatal_misuse(message: impl Into<String>) -> BitioError {
    let err = BitioError::misuse(message);
    log::error!("{err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BitioError::unexpected_eof(4);
        assert!(err.to_string().contains("expected 4"));

        let err = BitioError::compression("inflate", "invalid block type");
        assert!(err.to_string().contains("inflate"));
        assert!(err.to_string().contains("invalid block type"));

        let err = BitioError::InvalidBitWidth(40);
        assert!(err.to_string().contains("40"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(BitioError::compression("deflate", "stream error").is_fatal());
        assert!(BitioError::misuse("data already given away").is_fatal());
        assert!(!BitioError::unexpected_eof(1).is_fatal());
        assert!(!BitioError::short_write(2, 1).is_fatal());
        assert!(!BitioError::unsupported("zlib").is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: BitioError = io_err.into();
        assert!(matches!(err, BitioError::Io(_)));
        assert_eq!(err.into_io().kind(), io::ErrorKind::NotFound);

        let err = BitioError::unexpected_eof(2).into_io();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
