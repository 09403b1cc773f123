//! Segment: one contiguous, compactable trajectory time series

use crate::core::motion::{Motion, Sample};
use crate::core::time::Instant;
use crate::core::timeline::Timeline;
use crate::downsampling::{Downsampling, DownsamplingParameters};
use crate::error::{Error, Result};
use crate::interpolation::Hermite3;
use nalgebra::Vector3;
use std::fmt;
use tracing::trace;

/// Observer invoked synchronously after each successful append
///
/// Used by the producing integrator for checkpoint bookkeeping; see
/// [`Segment::set_on_append`].
pub type AppendObserver = Box<dyn FnMut(&Sample)>;

/// A single-writer trajectory segment
///
/// Owns its [`Timeline`] and, when configured, a downsampling engine that
/// keeps the retained sample count sublinear in the number of appends while
/// bounding position reconstruction error. All operations are synchronous
/// and either complete atomically or fail leaving the segment unchanged.
#[derive(Default)]
pub struct Segment {
    timeline: Timeline,
    downsampling: Option<Downsampling>,
    on_append: Option<AppendObserver>,
}

/// How a query time maps onto the stored samples
enum Evaluation {
    /// The time is a stored knot; its values are returned exactly
    Exact(Motion),
    /// The time falls strictly between two adjacent samples
    Fitted(Hermite3),
}

impl Segment {
    /// Create an empty segment
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a segment from a stored timeline
    ///
    /// This is the restart path used by the external persistence layer: the
    /// timeline alone is enough, since downsampling state is derivable from
    /// the retained samples plus the parameters. Call
    /// [`Segment::set_downsampling`] afterwards to re-attach the engine.
    pub fn from_timeline(timeline: Timeline) -> Self {
        Self {
            timeline,
            downsampling: None,
            on_append: None,
        }
    }

    /// Borrow the underlying timeline, e.g. for persistence
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Append one sample at the end of the segment
    ///
    /// This is the integrator's per-step callback. Fails with
    /// [`Error::OutOfOrder`] unless `time` is strictly greater than the last
    /// stored time. When downsampling is configured, a full dense window is
    /// compacted synchronously inside this call; the appended sample itself
    /// always survives. The append observer, if any, runs last.
    pub fn append(&mut self, time: Instant, motion: Motion) -> Result<()> {
        self.timeline.append(time, motion)?;
        trace!(time = %time, "appended sample");
        if let Some(downsampling) = &mut self.downsampling {
            downsampling.on_append(time, &mut self.timeline);
        }
        if let Some(observer) = &mut self.on_append {
            observer(&Sample::new(time, motion));
        }
        Ok(())
    }

    /// Remove every sample with time >= `time`, retaining `[-inf, time)`
    ///
    /// The dense window is rebuilt from the retained timeline, so appending
    /// resumed samples afterwards reproduces an uninterrupted run (see the
    /// restart tests). Returns the number of removed samples.
    pub fn forget_after(&mut self, time: Instant) -> usize {
        let removed = self.timeline.forget_after(time);
        if let Some(downsampling) = &mut self.downsampling {
            downsampling.forget_after(time, &self.timeline);
        }
        removed
    }

    /// Remove every sample with time < `time`, retaining `[time, +inf)`
    ///
    /// Returns the number of removed samples.
    pub fn forget_before(&mut self, time: Instant) -> usize {
        let removed = self.timeline.forget_before(time);
        if let Some(downsampling) = &mut self.downsampling {
            downsampling.forget_before(time);
        }
        removed
    }

    /// Get the sample at exactly `time`, if present
    pub fn find(&self, time: Instant) -> Option<Sample> {
        self.timeline.find(time)
    }

    /// Get the first sample with time >= `time`
    pub fn lower_bound(&self, time: Instant) -> Option<Sample> {
        self.timeline.lower_bound(time)
    }

    /// Get the first sample with time > `time`
    pub fn upper_bound(&self, time: Instant) -> Option<Sample> {
        self.timeline.upper_bound(time)
    }

    /// Get the first (earliest) sample
    pub fn first(&self) -> Option<Sample> {
        self.timeline.first()
    }

    /// Get the last (latest) sample
    pub fn last(&self) -> Option<Sample> {
        self.timeline.last()
    }

    /// Iterate over the retained samples in time order
    ///
    /// The iterator is double-ended for reverse traversal.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Sample> + '_ {
        self.timeline.iter()
    }

    /// Iterate over the retained times in order
    pub fn times(&self) -> impl DoubleEndedIterator<Item = Instant> + '_ {
        self.timeline.times()
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    /// Check if the segment holds no samples
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// First stored time, if any
    pub fn t_min(&self) -> Option<Instant> {
        self.timeline.first().map(|s| s.time)
    }

    /// Last stored time, if any
    pub fn t_max(&self) -> Option<Instant> {
        self.timeline.last().map(|s| s.time)
    }

    /// Interpolated position at `time`, in metres
    pub fn evaluate_position(&self, time: Instant) -> Result<Vector3<f64>> {
        Ok(match self.locate(time)? {
            Evaluation::Exact(motion) => motion.position,
            Evaluation::Fitted(fit) => fit.position_at(time),
        })
    }

    /// Interpolated velocity at `time`, in metres per second
    pub fn evaluate_velocity(&self, time: Instant) -> Result<Vector3<f64>> {
        Ok(match self.locate(time)? {
            Evaluation::Exact(motion) => motion.velocity,
            Evaluation::Fitted(fit) => fit.velocity_at(time),
        })
    }

    /// Interpolated position and velocity at `time`
    pub fn evaluate_motion(&self, time: Instant) -> Result<Motion> {
        Ok(match self.locate(time)? {
            Evaluation::Exact(motion) => motion,
            Evaluation::Fitted(fit) => {
                Motion::new(fit.position_at(time), fit.velocity_at(time))
            }
        })
    }

    /// Classify `time` against the stored samples
    ///
    /// A stored knot evaluates to its stored values exactly; a time strictly
    /// between knots gets the Hermite fit of its two bracketing samples.
    fn locate(&self, time: Instant) -> Result<Evaluation> {
        let (Some(first), Some(last)) = (self.timeline.first(), self.timeline.last()) else {
            return Err(Error::EmptySegment);
        };
        let out_of_range = Error::OutOfRange {
            time,
            t_min: first.time,
            t_max: last.time,
        };
        if time < first.time || time > last.time {
            return Err(out_of_range);
        }
        if let Some(sample) = self.timeline.find(time) {
            return Ok(Evaluation::Exact(sample.motion));
        }
        let (Some(below), Some(above)) = (
            self.timeline.last_before(time),
            self.timeline.lower_bound(time),
        ) else {
            return Err(out_of_range);
        };
        Ok(Evaluation::Fitted(Hermite3::new(&below, &above)))
    }

    /// Configure downsampling for this segment
    ///
    /// Idempotent for equal parameters; fails with
    /// [`Error::AlreadyConfigured`] if a different configuration is already
    /// in place, because history compacted under it would not satisfy the
    /// new one. Configuring a non-empty segment does not retroactively
    /// recompact: the dense window starts from the current last sample.
    pub fn set_downsampling(&mut self, parameters: DownsamplingParameters) -> Result<()> {
        match &self.downsampling {
            Some(downsampling) if downsampling.parameters() == parameters => Ok(()),
            Some(_) => Err(Error::AlreadyConfigured),
            None => {
                self.downsampling = Some(Downsampling::new(parameters, &self.timeline));
                Ok(())
            }
        }
    }

    /// Disable downsampling, keeping every retained sample
    pub fn clear_downsampling(&mut self) {
        self.downsampling = None;
    }

    /// Current downsampling configuration, if any
    pub fn downsampling_parameters(&self) -> Option<DownsamplingParameters> {
        self.downsampling.as_ref().map(|d| d.parameters())
    }

    /// Register an observer invoked synchronously after each append
    ///
    /// Replaces any previously registered observer.
    pub fn set_on_append(&mut self, observer: impl FnMut(&Sample) + 'static) {
        self.on_append = Some(Box::new(observer));
    }

    /// Remove the append observer, if any
    pub fn clear_on_append(&mut self) {
        self.on_append = None;
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("timeline", &self.timeline)
            .field("downsampling", &self.downsampling)
            .field("has_on_append", &self.on_append.is_some())
            .finish()
    }
}
