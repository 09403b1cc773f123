//! Cubic Hermite interpolation between two bounding samples

use crate::core::motion::Sample;
use crate::core::time::Instant;
use nalgebra::Vector3;

/// Cubic fit through two samples matching position and velocity at both
///
/// This is the minimal-degree polynomial that uses all the derivative
/// information the samples carry; it is exact for uniform motion and exact
/// to leading order for uniform circular motion. The basis evaluates to the
/// stored endpoint values exactly at the knots (`s = 0` and `s = 1`).
#[derive(Debug, Clone, Copy)]
pub struct Hermite3 {
    t0: Instant,
    t1: Instant,
    p0: Vector3<f64>,
    v0: Vector3<f64>,
    p1: Vector3<f64>,
    v1: Vector3<f64>,
}

impl Hermite3 {
    /// Build the fit from two bounding samples with `s0.time < s1.time`
    pub fn new(s0: &Sample, s1: &Sample) -> Self {
        debug_assert!(s0.time < s1.time);
        Self {
            t0: s0.time,
            t1: s1.time,
            p0: s0.motion.position,
            v0: s0.motion.velocity,
            p1: s1.motion.position,
            v1: s1.motion.velocity,
        }
    }

    /// Normalized abscissa and interval length in seconds
    fn normalize(&self, t: Instant) -> (f64, f64) {
        let h = (self.t1 - self.t0).as_secs_f64();
        let s = (t - self.t0).as_secs_f64() / h;
        (s, h)
    }

    /// Interpolated position at `t`, for `t` in `[t0, t1]`
    pub fn position_at(&self, t: Instant) -> Vector3<f64> {
        let (s, h) = self.normalize(t);
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * self.p0 + (h10 * h) * self.v0 + h01 * self.p1 + (h11 * h) * self.v1
    }

    /// Interpolated velocity at `t`, for `t` in `[t0, t1]`
    pub fn velocity_at(&self, t: Instant) -> Vector3<f64> {
        let (s, h) = self.normalize(t);
        let s2 = s * s;
        let d00 = (6.0 * s2 - 6.0 * s) / h;
        let d10 = 3.0 * s2 - 4.0 * s + 1.0;
        let d01 = (6.0 * s - 6.0 * s2) / h;
        let d11 = 3.0 * s2 - 2.0 * s;
        d00 * self.p0 + d10 * self.v0 + d01 * self.p1 + d11 * self.v1
    }
}
