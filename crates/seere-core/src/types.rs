//! Core type definitions for the compression subsystem.

/// Compression methods the subsystem can negotiate.
///
/// The dispatch layer resolves one of these tags to a codec adapter; each
/// adapter accepts only its own tag and treats any other as a programming
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Brotli (RFC 7932) - high ratio, slower compression.
    Brotli,
    /// Zstandard - balanced speed and ratio.
    Zstd,
    /// LZ4 - ultra-fast compression.
    Lz4,
    /// Deflate (RFC 1951) - widely compatible.
    Deflate,
}

impl Method {
    /// Get method name as string.
    pub fn name(self) -> &'static str {
        match self {
            Method::Brotli => "brotli",
            Method::Zstd => "zstd",
            Method::Lz4 => "lz4",
            Method::Deflate => "deflate",
        }
    }
}

/// Whether a stream adapter compresses or decompresses.
///
/// Fixed at construction for the life of the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Raw bytes in, compressed bytes out.
    Encode,
    /// Compressed bytes in, raw bytes out.
    Decode,
}

/// Compression effort presets.
///
/// Each codec maps these onto its native tuning range; see the adapter
/// crates for the concrete tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// Maximum ratio, slowest.
    Best,

    /// One step below maximum.
    High,

    /// Midpoint of the codec's range (default).
    #[default]
    Medium,

    /// Near the fast end of the range.
    Low,
}
