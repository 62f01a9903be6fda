//! Incremental Brotli compress/decompress sessions.

use std::fmt;
use std::mem;
use std::sync::Arc;

use brotli::enc::backward_references::BrotliEncoderMode;
use brotli::enc::encode::{
    BrotliEncoderCompressStream, BrotliEncoderCreateInstance, BrotliEncoderHasMoreOutput,
    BrotliEncoderIsFinished, BrotliEncoderOperation, BrotliEncoderParameter,
    BrotliEncoderSetParameter, BrotliEncoderStateStruct,
};
use brotli::enc::StandardAlloc;
use brotli::{BrotliDecompressStream, BrotliResult, BrotliState};
use tracing::{debug, warn};

use seere_core::{
    BombPolicy, CompressionStream, Direction, Error, Level, MemoryTracker, Method, ProcessStatus,
    Processed, Result, StreamState,
};

use crate::{is_supported, quality_for_level, LG_WINDOW_SIZE};

const CODEC_NAME: &str = "brotli";

/// Encoder or decoder state, selected once at construction and never
/// reinterpreted.
enum Codec {
    Encoder(Box<BrotliEncoderStateStruct<StandardAlloc>>),
    Decoder(Box<BrotliState<StandardAlloc, StandardAlloc, StandardAlloc>>),
}

impl Codec {
    fn state_size(&self) -> usize {
        match self {
            Codec::Encoder(state) => mem::size_of_val(&**state),
            Codec::Decoder(state) => mem::size_of_val(&**state),
        }
    }
}

/// Incremental Brotli compress-or-decompress session.
///
/// One instance owns one codec state, fixed to one [`Direction`], and is
/// driven through repeated [`process`](BrotliStream::process) calls over
/// caller-owned buffers. Instances are `Send` but not internally
/// synchronized: one owner at a time.
///
/// On construction the instance reports its declared size to the supplied
/// [`MemoryTracker`]; dropping the instance subtracts the same amount on
/// every exit path, including bomb aborts.
pub struct BrotliStream {
    codec: Codec,
    level: Level,
    state: StreamState,
    tracker: MemoryTracker,
    tracked: usize,
    policy: Option<Arc<dyn BombPolicy>>,
    /// Compressed bytes consumed so far; maintained on the decode path only.
    input_total: u64,
    /// Raw bytes produced so far; maintained on the decode path only.
    output_total: u64,
}

impl BrotliStream {
    /// Create a stream without a bomb policy.
    ///
    /// `method` must be [`Method::Brotli`]; any other tag is a programming
    /// error in the dispatch layer and panics. Returns `None` when the
    /// Brotli backend is not compiled into this build - callers fall back
    /// to another method, exactly as for a codec that was never linked.
    pub fn new(
        direction: Direction,
        method: Method,
        level: Level,
        tracker: MemoryTracker,
    ) -> Option<Self> {
        Self::build(direction, method, level, tracker, None)
    }

    /// Create a stream that aborts decompression when `policy` flags the
    /// cumulative input/output totals as hostile expansion.
    ///
    /// Decode streams should always carry a policy; encode streams never
    /// consult it.
    pub fn with_policy(
        direction: Direction,
        method: Method,
        level: Level,
        tracker: MemoryTracker,
        policy: Arc<dyn BombPolicy>,
    ) -> Option<Self> {
        Self::build(direction, method, level, tracker, Some(policy))
    }

    fn build(
        direction: Direction,
        method: Method,
        level: Level,
        tracker: MemoryTracker,
        policy: Option<Arc<dyn BombPolicy>>,
    ) -> Option<Self> {
        assert!(
            method == Method::Brotli,
            "brotli stream constructed for wrong codec method {:?}",
            method
        );

        if !is_supported() {
            return None;
        }

        let codec = match direction {
            Direction::Encode => {
                let mut state = Box::new(BrotliEncoderCreateInstance(StandardAlloc::default()));
                BrotliEncoderSetParameter(
                    &mut state,
                    BrotliEncoderParameter::BROTLI_PARAM_MODE,
                    BrotliEncoderMode::BROTLI_MODE_GENERIC as u32,
                );
                BrotliEncoderSetParameter(
                    &mut state,
                    BrotliEncoderParameter::BROTLI_PARAM_QUALITY,
                    quality_for_level(level),
                );
                BrotliEncoderSetParameter(
                    &mut state,
                    BrotliEncoderParameter::BROTLI_PARAM_LGWIN,
                    LG_WINDOW_SIZE,
                );
                Codec::Encoder(state)
            }
            Direction::Decode => Codec::Decoder(Box::new(BrotliState::new(
                StandardAlloc::default(),
                StandardAlloc::default(),
                StandardAlloc::default(),
            ))),
        };

        // Declared size only: the codec's heap working buffers are not
        // re-measured and stay outside the accounting.
        let tracked = mem::size_of::<Self>() + codec.state_size();
        tracker.add(tracked);
        debug!(?direction, bytes = tracked, "brotli stream created");

        Some(Self {
            codec,
            level,
            state: StreamState::Initial,
            tracker,
            tracked,
            policy,
            input_total: 0,
            output_total: 0,
        })
    }

    /// Whether this stream encodes or decodes.
    pub fn direction(&self) -> Direction {
        match self.codec {
            Codec::Encoder(_) => Direction::Encode,
            Codec::Decoder(_) => Direction::Decode,
        }
    }

    /// The configured compression level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// True once a `finish` has been acknowledged with
    /// [`ProcessStatus::Ok`] (encode) or the final block has been decoded.
    pub fn is_finished(&self) -> bool {
        self.state == StreamState::Finished
    }

    /// Bytes this instance reported to the memory tracker at construction.
    ///
    /// Covers the adapter and the codec state struct only; the codec's
    /// internal heap working buffers are a known, deliberate undercount.
    pub fn tracked_size(&self) -> usize {
        self.tracked
    }

    /// Feed the codec a slice of input and a slice of destination space.
    ///
    /// See [`CompressionStream::process`] for the full contract. Calling
    /// this after an `Err`, or after a finish was acknowledged with
    /// [`ProcessStatus::Ok`], is a contract violation and panics.
    pub fn process(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> Result<Processed> {
        assert!(
            self.state.can_process(),
            "process called on a {:?} brotli stream",
            self.state
        );
        self.state = StreamState::Active;

        let result = match self.direction() {
            Direction::Encode => self.encode(input, output, finish),
            Direction::Decode => self.decode(input, output, finish),
        };
        if result.is_err() {
            self.state = StreamState::Failed;
        }
        result
    }

    fn encode(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> Result<Processed> {
        let encoder = match &mut self.codec {
            Codec::Encoder(state) => state,
            Codec::Decoder(_) => unreachable!("encode driven on a decoder stream"),
        };

        let op = if finish {
            BrotliEncoderOperation::BROTLI_OPERATION_FINISH
        } else {
            BrotliEncoderOperation::BROTLI_OPERATION_FLUSH
        };

        let mut available_in = input.len();
        let mut input_offset = 0usize;
        let mut available_out = output.len();
        let mut output_offset = 0usize;
        let mut stalled = false;

        loop {
            let before_in = available_in;
            let before_out = available_out;

            let ret = BrotliEncoderCompressStream(
                encoder,
                op,
                &mut available_in,
                input,
                &mut input_offset,
                &mut available_out,
                output,
                &mut output_offset,
                &mut None,
                &mut |_, _, _, _| (),
            );
            if ret == 0 {
                return Err(Error::codec(CODEC_NAME, "encoder rejected stream"));
            }

            let done = Processed {
                consumed: input_offset,
                produced: output_offset,
                status: ProcessStatus::Ok,
            };
            let pending = BrotliEncoderHasMoreOutput(encoder) != 0;

            if finish {
                if BrotliEncoderIsFinished(encoder) != 0 {
                    self.state = StreamState::Finished;
                    return Ok(done);
                }
                if available_out == 0 {
                    return Ok(Processed {
                        status: ProcessStatus::BufferFull,
                        ..done
                    });
                }
            } else {
                if available_in == 0 && !pending {
                    return Ok(done);
                }
                if available_out == 0 {
                    return Ok(Processed {
                        status: ProcessStatus::BufferFull,
                        ..done
                    });
                }
            }

            // Destination space remains but the cursors stopped moving:
            // give the codec one more call before treating it as wedged.
            if available_in == before_in && available_out == before_out {
                if stalled {
                    return Err(Error::codec(CODEC_NAME, "encoder stalled mid-stream"));
                }
                stalled = true;
            } else {
                stalled = false;
            }
        }
    }

    fn decode(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> Result<Processed> {
        let decoder = match &mut self.codec {
            Codec::Decoder(state) => state,
            Codec::Encoder(_) => unreachable!("decode driven on an encoder stream"),
        };

        let mut available_in = input.len();
        let mut input_offset = 0usize;
        let mut available_out = output.len();
        let mut output_offset = 0usize;
        let mut written = 0usize;

        let ret = BrotliDecompressStream(
            &mut available_in,
            &mut input_offset,
            input,
            &mut available_out,
            &mut output_offset,
            output,
            &mut written,
            decoder,
        );

        self.input_total += input_offset as u64;
        self.output_total += output_offset as u64;

        // Bomb verdicts override whatever the codec itself reported.
        if let Some(policy) = &self.policy {
            if policy.is_bomb(self.input_total, self.output_total) {
                warn!(
                    input_bytes = self.input_total,
                    output_bytes = self.output_total,
                    "aborting decompression, possible bomb"
                );
                return Err(Error::Bomb {
                    input_bytes: self.input_total,
                    output_bytes: self.output_total,
                });
            }
        }

        let done = Processed {
            consumed: input_offset,
            produced: output_offset,
            status: ProcessStatus::Ok,
        };
        match ret {
            BrotliResult::ResultFailure => {
                Err(Error::codec(CODEC_NAME, "decoder reported corrupt stream"))
            }
            BrotliResult::ResultSuccess => {
                self.state = StreamState::Finished;
                Ok(done)
            }
            BrotliResult::NeedsMoreInput => {
                if finish && available_in == 0 {
                    Err(Error::codec(CODEC_NAME, "stream truncated before final block"))
                } else {
                    Ok(done)
                }
            }
            BrotliResult::NeedsMoreOutput => Ok(Processed {
                status: ProcessStatus::BufferFull,
                ..done
            }),
        }
    }
}

impl CompressionStream for BrotliStream {
    fn method(&self) -> Method {
        Method::Brotli
    }

    fn direction(&self) -> Direction {
        BrotliStream::direction(self)
    }

    fn process(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> Result<Processed> {
        BrotliStream::process(self, input, output, finish)
    }

    fn tracked_size(&self) -> usize {
        BrotliStream::tracked_size(self)
    }
}

impl Drop for BrotliStream {
    fn drop(&mut self) {
        self.tracker.subtract(self.tracked);
        debug!(bytes = self.tracked, "brotli stream destroyed");
    }
}

impl fmt::Debug for BrotliStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrotliStream")
            .field("direction", &self.direction())
            .field("level", &self.level)
            .field("state", &self.state)
            .field("tracked", &self.tracked)
            .field("input_total", &self.input_total)
            .field("output_total", &self.output_total)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> MemoryTracker {
        MemoryTracker::new()
    }

    #[test]
    fn test_construction_tracks_size() {
        let tracker = tracker();
        let stream =
            BrotliStream::new(Direction::Encode, Method::Brotli, Level::Medium, tracker.clone())
                .unwrap();

        assert!(stream.tracked_size() > 0);
        assert_eq!(tracker.current(), stream.tracked_size());
    }

    #[test]
    fn test_drop_releases_size() {
        let tracker = tracker();
        let stream =
            BrotliStream::new(Direction::Decode, Method::Brotli, Level::Medium, tracker.clone())
                .unwrap();
        drop(stream);
        assert_eq!(tracker.current(), 0);
    }

    #[test]
    fn test_direction_fixed_at_construction() {
        let encode =
            BrotliStream::new(Direction::Encode, Method::Brotli, Level::Low, tracker()).unwrap();
        let decode =
            BrotliStream::new(Direction::Decode, Method::Brotli, Level::Low, tracker()).unwrap();

        assert_eq!(encode.direction(), Direction::Encode);
        assert_eq!(decode.direction(), Direction::Decode);
        assert_eq!(encode.level(), Level::Low);
    }

    #[test]
    #[should_panic(expected = "wrong codec method")]
    fn test_mismatched_method_panics() {
        let _ = BrotliStream::new(Direction::Encode, Method::Zstd, Level::Medium, tracker());
    }

    #[test]
    fn test_fresh_stream_state() {
        let stream =
            BrotliStream::new(Direction::Encode, Method::Brotli, Level::Medium, tracker()).unwrap();
        assert_eq!(stream.state(), StreamState::Initial);
        assert!(!stream.is_finished());
    }
}
