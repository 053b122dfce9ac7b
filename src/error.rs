//! Error types for import statistics

use thiserror::Error;

/// Errors from snapshot read accessors
#[derive(Error, Debug)]
pub enum StatsError {
    /// Requested sorted position is outside the published snapshot
    #[error("edge type index {index} out of range (snapshot has {len} entries)")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type for import-stats operations
pub type Result<T> = std::result::Result<T, StatsError>;
