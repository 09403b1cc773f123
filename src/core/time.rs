//! Time value types: instants and durations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A point in simulation time with nanosecond precision
///
/// The representation is a signed nanosecond count from an arbitrary epoch.
/// Integer nanoseconds make ordering exact: two instants are either equal or
/// strictly ordered, so "almost duplicate" times below floating precision
/// cannot arise, and comparisons are bit-for-bit reproducible across
/// platforms.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Instant {
    /// Nanoseconds since the epoch
    nanos: i64,
}

impl Instant {
    /// Create an instant from nanoseconds since the epoch
    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    /// Create an instant from microseconds since the epoch
    pub const fn from_micros(micros: i64) -> Self {
        Self {
            nanos: micros * 1_000,
        }
    }

    /// Create an instant from milliseconds since the epoch
    pub const fn from_millis(millis: i64) -> Self {
        Self {
            nanos: millis * 1_000_000,
        }
    }

    /// Create an instant from seconds since the epoch
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs * 1_000_000_000,
        }
    }

    /// Create an instant from fractional seconds, rounding to the nearest
    /// nanosecond
    pub fn from_secs_f64(secs: f64) -> Self {
        Self {
            nanos: (secs * 1e9).round() as i64,
        }
    }

    /// Get nanoseconds since the epoch
    pub const fn as_nanos(&self) -> i64 {
        self.nanos
    }

    /// Get fractional seconds since the epoch
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 * 1e-9
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.9} s", self.as_secs_f64())
    }
}

/// A signed span of time with nanosecond precision
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Duration {
    /// Nanosecond count, negative for backward spans
    nanos: i64,
}

impl Duration {
    /// The zero duration
    pub const ZERO: Self = Self { nanos: 0 };

    /// Create a duration from nanoseconds
    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    /// Create a duration from milliseconds
    pub const fn from_millis(millis: i64) -> Self {
        Self {
            nanos: millis * 1_000_000,
        }
    }

    /// Create a duration from seconds
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs * 1_000_000_000,
        }
    }

    /// Create a duration from fractional seconds, rounding to the nearest
    /// nanosecond
    pub fn from_secs_f64(secs: f64) -> Self {
        Self {
            nanos: (secs * 1e9).round() as i64,
        }
    }

    /// Get the nanosecond count
    pub const fn as_nanos(&self) -> i64 {
        self.nanos
    }

    /// Get the span as fractional seconds
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 * 1e-9
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.9} s", self.as_secs_f64())
    }
}

impl Sub for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Duration {
        Duration {
            nanos: self.nanos - rhs.nanos,
        }
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant {
            nanos: self.nanos + rhs.nanos,
        }
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        self.nanos += rhs.nanos;
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, rhs: Duration) -> Instant {
        Instant {
            nanos: self.nanos - rhs.nanos,
        }
    }
}

impl SubAssign<Duration> for Instant {
    fn sub_assign(&mut self, rhs: Duration) {
        self.nanos -= rhs.nanos;
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration {
            nanos: self.nanos + rhs.nanos,
        }
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration {
            nanos: self.nanos - rhs.nanos,
        }
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration { nanos: -self.nanos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_creation() {
        let t = Instant::from_secs(3);
        assert_eq!(t.as_nanos(), 3_000_000_000);
        assert_eq!(Instant::from_millis(3_000), t);
        assert_eq!(Instant::from_micros(3_000_000), t);
        assert_eq!(Instant::from_secs_f64(3.0), t);
    }

    #[test]
    fn test_instant_ordering() {
        let t1 = Instant::from_nanos(1);
        let t2 = Instant::from_nanos(2);
        assert!(t1 < t2);
        assert_eq!(t1, Instant::from_nanos(1));
    }

    #[test]
    fn test_arithmetic() {
        let t0 = Instant::from_secs(2);
        let t1 = Instant::from_secs(5);
        assert_eq!(t1 - t0, Duration::from_secs(3));
        assert_eq!(t0 + Duration::from_secs(3), t1);
        assert_eq!(t1 - Duration::from_secs(3), t0);
        assert_eq!(-(t1 - t0), t0 - t1);
    }

    #[test]
    fn test_secs_f64_round_trip() {
        let t = Instant::from_secs_f64(1.25);
        assert_eq!(t.as_nanos(), 1_250_000_000);
        assert_eq!(t.as_secs_f64(), 1.25);
    }
}
