use thiserror::Error;

/// Errors raised while chunking text for summarisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// Windows must advance, so the chunk size has to exceed the overlap.
    #[error("chunk size {chunk_size} must exceed the overlap of {overlap} characters")]
    ChunkSizeTooSmall {
        /// Requested window size in characters.
        chunk_size: usize,
        /// Characters shared by consecutive windows.
        overlap: usize,
    },
}
