//! Motion state and samples

use crate::core::time::Instant;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Position and velocity of an object at one instant
///
/// Positions are in metres, velocities in metres per second, both in the
/// frame of the producing integrator. A `Motion` is immutable once stored:
/// the timeline never hands out mutable references to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Position in metres
    pub position: Vector3<f64>,
    /// Velocity in metres per second
    pub velocity: Vector3<f64>,
}

impl Motion {
    /// Create a motion state from position and velocity
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }

    /// The state of an unmoving object at the origin
    pub fn unmoving_origin() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
        }
    }
}

/// One stored (time, position, velocity) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Time of the observation
    pub time: Instant,
    /// Motion state at that time
    pub motion: Motion,
}

impl Sample {
    /// Create a sample
    pub fn new(time: Instant, motion: Motion) -> Self {
        Self { time, motion }
    }
}
