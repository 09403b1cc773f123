//! Error types for trajectory segments

use crate::core::time::Instant;
use thiserror::Error;

/// Result type alias for segment operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for segment operations
///
/// Every failure is synchronous and leaves the segment unchanged; none of
/// these conditions is retryable from inside the crate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Append with a time not strictly greater than the last stored time
    #[error("out-of-order append at {time}, last stored time is {last}")]
    OutOfOrder {
        /// Time of the rejected sample
        time: Instant,
        /// Last time currently stored in the segment
        last: Instant,
    },

    /// Evaluation outside the stored extent
    #[error("evaluation at {time} outside stored extent [{t_min}, {t_max}]")]
    OutOfRange {
        /// Time of the rejected evaluation
        time: Instant,
        /// First stored time
        t_min: Instant,
        /// Last stored time
        t_max: Instant,
    },

    /// Operation requiring at least one sample on an empty segment
    #[error("operation requires a non-empty segment")]
    EmptySegment,

    /// Downsampling re-configuration with conflicting parameters
    #[error("downsampling already configured with different parameters")]
    AlreadyConfigured,

    /// Rejected downsampling parameters
    #[error("invalid downsampling parameters: {reason}")]
    InvalidParameters {
        /// Which constraint the parameters violate
        reason: &'static str,
    },
}
