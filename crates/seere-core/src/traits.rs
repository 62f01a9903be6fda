//! Traits at the codec-adapter seam.
//!
//! The dispatch layer negotiates a [`Method`], constructs the matching
//! adapter, and then drives it exclusively through [`CompressionStream`],
//! so every codec in the family is interchangeable behind one incremental
//! contract.

use crate::error::Result;
use crate::stream::Processed;
use crate::types::{Direction, Method};

/// An incremental compress-or-decompress session over one codec instance.
///
/// An adapter owns exactly one codec instance, fixed to one [`Direction`]
/// at construction, and is driven to completion by repeated [`process`]
/// calls. Instances are single-owner: no internal synchronization is
/// provided, and concurrent calls on one instance are not allowed.
///
/// [`process`]: CompressionStream::process
pub trait CompressionStream {
    /// The codec this stream belongs to.
    fn method(&self) -> Method;

    /// Whether this stream encodes or decodes.
    fn direction(&self) -> Direction;

    /// Feed the codec a slice of input and a slice of destination space.
    ///
    /// Both slices are caller-owned; the returned [`Processed`] reports how
    /// far each was advanced. `finish` marks the final call: the codec
    /// flushes and finalizes, and once the finish has been acknowledged
    /// with [`ProcessStatus::Ok`] the stream is complete.
    ///
    /// A [`ProcessStatus::BufferFull`] result means the codec held back
    /// pending output; drain the destination and call again. An `Err` is
    /// terminal: the instance must be dropped, and further `process` calls
    /// are a contract violation.
    ///
    /// [`ProcessStatus::Ok`]: crate::stream::ProcessStatus::Ok
    /// [`ProcessStatus::BufferFull`]: crate::stream::ProcessStatus::BufferFull
    fn process(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> Result<Processed>;

    /// Bytes attributed to this instance in the subsystem's
    /// [`MemoryTracker`](crate::MemoryTracker); constant for the
    /// instance's life.
    fn tracked_size(&self) -> usize;
}

/// Externally supplied policy deciding when decompression expansion is
/// hostile.
///
/// Decode-direction adapters evaluate the policy after every `process`
/// call, over the cumulative byte totals for the whole stream. A `true`
/// verdict aborts the stream immediately, whatever the codec itself
/// reported.
pub trait BombPolicy: Send + Sync {
    /// True if `output_bytes` expanded from `input_bytes` looks like a
    /// decompression bomb.
    fn is_bomb(&self, input_bytes: u64, output_bytes: u64) -> bool;
}
