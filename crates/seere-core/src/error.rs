//! Error types for compression operations.

use thiserror::Error;

/// Result type alias for compression operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Terminal stream failures.
///
/// A missing codec backend is not an [`Error`]: construction reports it as
/// an empty result so the dispatch layer can fall back to another method.
/// Contract violations (wrong method tag, processing a finished stream) are
/// programmer errors and panic instead of returning a variant here.
#[derive(Debug, Error)]
pub enum Error {
    /// The codec backend reported an unrecoverable stream fault.
    #[error("{codec} stream error: {message}")]
    Codec {
        codec: &'static str,
        message: String,
    },

    /// Decompression expanded past the configured bomb policy.
    #[error(
        "possible decompression bomb: {input_bytes} bytes in, {output_bytes} bytes out"
    )]
    Bomb { input_bytes: u64, output_bytes: u64 },
}

impl Error {
    /// Create a codec stream error.
    pub fn codec(codec: &'static str, message: impl Into<String>) -> Self {
        Error::Codec {
            codec,
            message: message.into(),
        }
    }

    /// Get error category for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Codec { .. } => "codec_error",
            Error::Bomb { .. } => "bomb_detected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_display() {
        let err = Error::codec("brotli", "corrupt stream");
        assert_eq!(err.to_string(), "brotli stream error: corrupt stream");
        assert_eq!(err.category(), "codec_error");
    }

    #[test]
    fn test_bomb_error_display() {
        let err = Error::Bomb {
            input_bytes: 100,
            output_bytes: 1_000_000,
        };
        assert!(err.to_string().contains("decompression bomb"));
        assert_eq!(err.category(), "bomb_detected");
    }
}
