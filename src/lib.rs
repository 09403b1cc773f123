//! Trajectory-Segment: discrete trajectory segments with restartable
//! downsampling
//!
//! A segment is an ordered, time-indexed record of an object's position and
//! velocity samples. It supports exact lookup, cubic Hermite interpolation
//! between samples, truncation from either end, and online lossy compaction
//! ("downsampling") that keeps memory bounded while guaranteeing a
//! caller-specified position reconstruction tolerance.
//!
//! # Core Concepts
//!
//! - **Samples**: immutable (time, position, velocity) observations
//! - **Timeline**: the ordered store, strictly increasing unique times
//! - **Dense window**: the most recent samples not yet considered for
//!   compaction
//! - **Restartability**: truncating a segment and resuming appends
//!   reproduces the compacted output of an uninterrupted run
//!
//! # Example
//!
//! ```
//! use trajectory_segment::prelude::*;
//! use nalgebra::Vector3;
//!
//! # fn example() -> trajectory_segment::error::Result<()> {
//! let mut segment = Segment::new();
//! segment.set_downsampling(DownsamplingParameters::new(50, 1e-3)?)?;
//!
//! // The integrator appends one sample per accepted step.
//! for step in 0..100 {
//!     let t = Instant::from_millis(10 * step);
//!     let s = t.as_secs_f64();
//!     segment.append(
//!         t,
//!         Motion::new(Vector3::new(s, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
//!     )?;
//! }
//!
//! // Consumers evaluate anywhere inside the stored extent.
//! let position = segment.evaluate_position(Instant::from_millis(425))?;
//! assert!((position.x - 0.425).abs() < 1e-3);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod core;
pub mod downsampling;
pub mod error;
pub mod interpolation;
pub mod segment;
pub mod trajectory;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{Duration, Instant, Motion, Sample, Timeline};
    pub use crate::downsampling::DownsamplingParameters;
    pub use crate::error::{Error, Result};
    pub use crate::segment::Segment;
    pub use crate::trajectory::Trajectory;
}

pub use crate::core::{Duration, Instant, Motion, Sample, Timeline};
pub use crate::downsampling::DownsamplingParameters;
pub use crate::error::{Error, Result};
pub use crate::segment::Segment;
pub use crate::trajectory::Trajectory;
