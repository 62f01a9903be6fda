//! Incremental processing vocabulary shared by all codec adapters.

/// Non-error outcome of one `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Forward progress was made and nothing is pending that the
    /// destination could not hold.
    Ok,

    /// The codec has more pending output than the destination had room
    /// for. Drain the destination and call again; this is the subsystem's
    /// only flow-control signal.
    BufferFull,
}

/// Cursor movement and outcome of one `process` call.
///
/// `consumed` and `produced` report exactly how far the input and output
/// slices were advanced, so a caller can resume from partial progress
/// without losing bytes.
#[derive(Debug, Clone, Copy)]
pub struct Processed {
    /// Bytes consumed from the input slice.
    pub consumed: usize,
    /// Bytes written to the output slice.
    pub produced: usize,
    /// Outcome of the call.
    pub status: ProcessStatus,
}

/// Lifecycle state of a stream adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// Constructed, no data processed yet.
    #[default]
    Initial,
    /// Processing in progress.
    Active,
    /// Stream completed successfully; no further processing is permitted.
    Finished,
    /// Stream hit a terminal error; no further processing is permitted.
    Failed,
}

impl StreamState {
    /// Check if the stream is in a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamState::Finished | StreamState::Failed)
    }

    /// Check if the stream can accept another `process` call.
    pub fn can_process(self) -> bool {
        !self.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!StreamState::Initial.is_terminal());
        assert!(!StreamState::Active.is_terminal());
        assert!(StreamState::Finished.is_terminal());
        assert!(StreamState::Failed.is_terminal());
    }

    #[test]
    fn test_can_process() {
        assert!(StreamState::Initial.can_process());
        assert!(StreamState::Active.can_process());
        assert!(!StreamState::Finished.can_process());
        assert!(!StreamState::Failed.can_process());
    }
}
