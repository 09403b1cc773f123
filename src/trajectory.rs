//! Read-only evaluation interface consumed by higher-level algorithms

use crate::core::motion::Motion;
use crate::core::time::Instant;
use crate::error::Result;
use crate::segment::Segment;
use nalgebra::Vector3;

/// A continuous view over a stored trajectory
///
/// This is the seam the query-side consumers (apsis and node finders,
/// equipotential tracers) program against: an extent plus evaluation at an
/// arbitrary time inside it. Evaluation near the boundaries may fail with
/// [`crate::Error::OutOfRange`]; callers are expected to tolerate that.
pub trait Trajectory {
    /// First time at which the trajectory is defined, if any
    fn t_min(&self) -> Option<Instant>;

    /// Last time at which the trajectory is defined, if any
    fn t_max(&self) -> Option<Instant>;

    /// Position at `time`, in metres
    fn evaluate_position(&self, time: Instant) -> Result<Vector3<f64>>;

    /// Velocity at `time`, in metres per second
    fn evaluate_velocity(&self, time: Instant) -> Result<Vector3<f64>> {
        Ok(self.evaluate_motion(time)?.velocity)
    }

    /// Position and velocity at `time`
    fn evaluate_motion(&self, time: Instant) -> Result<Motion>;

    /// Check whether `time` lies within the defined extent
    fn covers(&self, time: Instant) -> bool {
        matches!(
            (self.t_min(), self.t_max()),
            (Some(t_min), Some(t_max)) if t_min <= time && time <= t_max
        )
    }
}

impl Trajectory for Segment {
    fn t_min(&self) -> Option<Instant> {
        Segment::t_min(self)
    }

    fn t_max(&self) -> Option<Instant> {
        Segment::t_max(self)
    }

    fn evaluate_position(&self, time: Instant) -> Result<Vector3<f64>> {
        Segment::evaluate_position(self, time)
    }

    fn evaluate_velocity(&self, time: Instant) -> Result<Vector3<f64>> {
        Segment::evaluate_velocity(self, time)
    }

    fn evaluate_motion(&self, time: Instant) -> Result<Motion> {
        Segment::evaluate_motion(self, time)
    }
}
