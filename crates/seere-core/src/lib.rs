//! # Seere Core
//!
//! Core traits, types, and memory accounting for the Seere compression
//! subsystem.
//!
//! Seere is named after the 70th demon of the Ars Goetia, who crosses the
//! earth in the blink of an eye - as a transport layer should, once its
//! payloads have been compressed.
//!
//! ## Design Philosophy
//!
//! - **Incremental-first**: codecs are driven chunk by chunk through
//!   caller-supplied buffers; the adapter never owns payload memory
//! - **Uniform contract**: every codec in the family presents the same
//!   processing surface, whether or not its backend is compiled in
//! - **Accountable**: every live codec instance reports its size to a
//!   shared, lock-free [`MemoryTracker`]
//!
//! ## Core Items
//!
//! - [`CompressionStream`] - the incremental adapter seam each codec implements
//! - [`BombPolicy`] - externally supplied decompression-bomb predicate
//! - [`MemoryTracker`] - shared counter of bytes held by live codec instances
//! - [`Method`], [`Direction`], [`Level`] - negotiation vocabulary
//! - [`ProcessStatus`], [`Processed`], [`StreamState`] - processing vocabulary

pub mod error;
pub mod memory;
pub mod stream;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use memory::MemoryTracker;
pub use stream::{ProcessStatus, Processed, StreamState};
pub use traits::{BombPolicy, CompressionStream};
pub use types::{Direction, Level, Method};
