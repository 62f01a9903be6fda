//! # Seere Brotli
//!
//! Incremental Brotli (RFC 7932) stream adapter for the Seere compression
//! subsystem.
//!
//! Brotli achieves high compression ratios, especially for text and web
//! content, at the cost of slower compression speed.
//!
//! ## Features
//!
//! - **Push/pull streaming**: input and destination buffers stay
//!   caller-owned; the adapter only advances them
//! - **Bomb defense**: decode streams abort as soon as an injected
//!   [`BombPolicy`](seere_core::BombPolicy) flags hostile expansion
//! - **Memory accounting**: every instance reports its size to the
//!   subsystem's [`MemoryTracker`](seere_core::MemoryTracker)
//!
//! ## Example
//!
//! ```ignore
//! use seere_brotli::BrotliStream;
//! use seere_core::{Direction, Level, Method, MemoryTracker};
//!
//! let tracker = MemoryTracker::new();
//! let mut stream =
//!     BrotliStream::new(Direction::Encode, Method::Brotli, Level::Best, tracker)
//!         .expect("brotli backend compiled in");
//! let done = stream.process(data, &mut out, true)?;
//! ```
//!
//! ## Implementation
//!
//! This crate drives the `brotli` crate's low-level encoder and decoder
//! state machines directly, so processing stops exactly at the caller's
//! buffer boundaries instead of buffering internally.

use seere_core::Level;

mod stream;

pub use stream::BrotliStream;

/// Window size (log2) for Brotli compression (22 = 4MB window).
const LG_WINDOW_SIZE: u32 = 22;

/// Minimum Brotli quality.
const QUALITY_MIN: u32 = 0;

/// Maximum Brotli quality.
const QUALITY_MAX: u32 = 11;

/// Whether both halves of the Brotli backend are usable in this build.
///
/// The pure-Rust backend vendors its encoder and decoder, so the flag is
/// constant here; construction still routes through [`is_supported`] so the
/// "unsupported" path stays uniform for builds that swap the backend out.
const SUPPORTED: bool = true;

/// Check whether the Brotli codec is usable in this build.
///
/// Pure and idempotent; callable at any time. When this returns `false`,
/// [`BrotliStream::new`] yields `None` and the dispatch layer must fall
/// back to another method.
pub fn is_supported() -> bool {
    SUPPORTED
}

/// Version of the Brotli library linked at runtime, as `"MAJOR.MINOR.PATCH"`.
///
/// The pure-Rust backend exposes no runtime version query, so this is
/// absent. Absence is normal, not an error.
pub fn runtime_version() -> Option<&'static str> {
    None
}

/// Version of the Brotli interface this crate was compiled against.
///
/// The backend does not expose one; absence is normal, not an error.
pub fn header_version() -> Option<&'static str> {
    None
}

/// Map an abstract compression level to Brotli quality (0-11).
///
/// Total over [`Level`]: `Best` takes the maximum, `High` one below it,
/// `Medium` the integer midpoint of the range, `Low` one above the
/// minimum.
pub fn quality_for_level(level: Level) -> u32 {
    match level {
        Level::Best => QUALITY_MAX,
        Level::High => QUALITY_MAX - 1,
        Level::Medium => (QUALITY_MIN + QUALITY_MAX) / 2,
        Level::Low => QUALITY_MIN + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_in_documented_range() {
        for level in [Level::Best, Level::High, Level::Medium, Level::Low] {
            let quality = quality_for_level(level);
            assert!((QUALITY_MIN..=QUALITY_MAX).contains(&quality));
        }
    }

    #[test]
    fn test_quality_strictly_ordered() {
        assert!(quality_for_level(Level::Best) > quality_for_level(Level::High));
        assert!(quality_for_level(Level::High) > quality_for_level(Level::Medium));
        assert!(quality_for_level(Level::Medium) > quality_for_level(Level::Low));
    }

    #[test]
    fn test_quality_table() {
        assert_eq!(quality_for_level(Level::Best), 11);
        assert_eq!(quality_for_level(Level::High), 10);
        assert_eq!(quality_for_level(Level::Medium), 5);
        assert_eq!(quality_for_level(Level::Low), 1);
    }

    #[test]
    fn test_probe_idempotent() {
        let first = is_supported();
        for _ in 0..3 {
            assert_eq!(is_supported(), first);
        }
        assert_eq!(runtime_version(), runtime_version());
        assert_eq!(header_version(), header_version());
    }
}
