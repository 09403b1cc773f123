//! Online lossy compaction of a segment's timeline

use crate::core::time::Instant;
use crate::core::timeline::Timeline;
use crate::error::{Error, Result};
use crate::interpolation::Hermite3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration of a segment's downsampling engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownsamplingParameters {
    /// Number of intervals in a full dense window
    max_dense_intervals: usize,
    /// Maximum position reconstruction error, in metres
    tolerance: f64,
}

impl DownsamplingParameters {
    /// Create downsampling parameters
    ///
    /// Fails with [`Error::InvalidParameters`] if `max_dense_intervals <= 1`
    /// (a window of one interval has no interior to discard) or if
    /// `tolerance` is not a positive length.
    pub fn new(max_dense_intervals: usize, tolerance: f64) -> Result<Self> {
        if max_dense_intervals <= 1 {
            return Err(Error::InvalidParameters {
                reason: "max_dense_intervals must exceed 1",
            });
        }
        if !(tolerance > 0.0) {
            return Err(Error::InvalidParameters {
                reason: "tolerance must be a positive length",
            });
        }
        Ok(Self {
            max_dense_intervals,
            tolerance,
        })
    }

    /// Number of intervals in a full dense window
    pub fn max_dense_intervals(&self) -> usize {
        self.max_dense_intervals
    }

    /// Maximum position reconstruction error, in metres
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// The downsampling engine attached to a segment
///
/// Tracks the dense window: the contiguous suffix of the timeline not yet
/// considered for compaction. Only the *times* of the window are tracked;
/// the motions are re-read from the timeline when a window is evaluated, so
/// truncating the timeline can never leave the window referencing removed
/// samples. The whole state is derivable from the retained timeline plus
/// the parameters, which is what makes truncate-and-resume reproducible.
#[derive(Debug, Clone)]
pub(crate) struct Downsampling {
    parameters: DownsamplingParameters,
    /// Times of the not-yet-compacted suffix, oldest first
    dense: Vec<Instant>,
}

impl Downsampling {
    /// Attach an engine to a timeline
    ///
    /// Pre-existing samples are not retroactively recompacted: the window
    /// seeds with the current last sample, which becomes the boundary the
    /// first window grows from.
    pub fn new(parameters: DownsamplingParameters, timeline: &Timeline) -> Self {
        let dense = timeline.last().map(|s| s.time).into_iter().collect();
        Self { parameters, dense }
    }

    pub fn parameters(&self) -> DownsamplingParameters {
        self.parameters
    }

    /// Record a freshly appended sample and compact if the window is full
    ///
    /// Must be called after the sample at `time` has been inserted as the
    /// new last element of `timeline`. Compaction runs synchronously here,
    /// never deferred, so segment contents are well-defined between calls.
    pub fn on_append(&mut self, time: Instant, timeline: &mut Timeline) {
        self.dense.push(time);
        if self.dense.len() > self.parameters.max_dense_intervals {
            self.compact(timeline);
        }
    }

    /// Try to collapse the full dense window to its two endpoints
    ///
    /// All-or-nothing: either every interior sample is reconstructed within
    /// tolerance by the endpoint fit and all interiors are erased, or the
    /// window is kept in full. Either way the window resets to its trailing
    /// endpoint, so compaction boundaries depend only on the appends since
    /// the previous boundary, never on earlier history.
    fn compact(&mut self, timeline: &mut Timeline) {
        let (Some(&first), Some(&last)) = (self.dense.first(), self.dense.last()) else {
            return;
        };
        let window: Vec<_> = timeline.range_inclusive(first, last).collect();
        self.dense.clear();
        self.dense.push(last);
        let [head, interior @ .., tail] = window.as_slice() else {
            return;
        };

        let fit = Hermite3::new(head, tail);
        let tolerance = self.parameters.tolerance;
        let within_tolerance = interior
            .iter()
            .all(|s| (fit.position_at(s.time) - s.motion.position).norm() <= tolerance);

        if within_tolerance {
            for s in interior {
                timeline.remove(s.time);
            }
        }
        debug!(
            from = %first,
            to = %last,
            interior = interior.len(),
            compacted = within_tolerance,
            "dense window evaluated"
        );
    }

    /// Rebuild the window after the timeline forgot every sample >= `time`
    ///
    /// Window entries at or after the cut are dropped. If that empties the
    /// window while samples remain, the retained last sample reseeds it:
    /// every sample that survived past compactions is a window endpoint, so
    /// it is a valid boundary to grow a fresh window from.
    pub fn forget_after(&mut self, time: Instant, timeline: &Timeline) {
        self.dense.retain(|&t| t < time);
        if self.dense.is_empty() {
            if let Some(last) = timeline.last() {
                self.dense.push(last.time);
            }
        }
    }

    /// Rebuild the window after the timeline forgot every sample < `time`
    ///
    /// The window is a suffix of the timeline, so this only bites when the
    /// cut reaches into the most recent samples.
    pub fn forget_before(&mut self, time: Instant) {
        self.dense.retain(|&t| t >= time);
    }

    /// Times of the dense window, oldest first
    #[cfg(test)]
    pub fn dense_times(&self) -> &[Instant] {
        &self.dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::motion::Motion;
    use nalgebra::Vector3;

    fn linear_motion(secs: f64) -> Motion {
        let v = Vector3::new(1.0, 2.0, 0.0);
        Motion::new(v * secs, v)
    }

    /// Position jumps around faster than any cubic through the endpoints.
    fn jagged_motion(secs: f64) -> Motion {
        let x = if (secs as i64) % 2 == 0 { 100.0 } else { -100.0 };
        Motion::new(Vector3::new(x, 0.0, 0.0), Vector3::zeros())
    }

    fn run(
        motion: impl Fn(f64) -> Motion,
        n: usize,
        parameters: DownsamplingParameters,
    ) -> (Timeline, Downsampling) {
        let mut timeline = Timeline::new();
        let mut engine = Downsampling::new(parameters, &timeline);
        for i in 0..n {
            let t = Instant::from_secs(i as i64);
            timeline.append(t, motion(i as f64)).unwrap();
            engine.on_append(t, &mut timeline);
        }
        (timeline, engine)
    }

    #[test]
    fn test_compactable_window_keeps_endpoints_only() {
        let parameters = DownsamplingParameters::new(4, 1e-6).unwrap();
        let (timeline, engine) = run(linear_motion, 5, parameters);

        let times: Vec<_> = timeline.times().map(|t| t.as_nanos() / 1_000_000_000).collect();
        assert_eq!(times, vec![0, 4]);
        assert_eq!(engine.dense_times(), &[Instant::from_secs(4)]);
    }

    #[test]
    fn test_uncompactable_window_retains_all_samples() {
        let parameters = DownsamplingParameters::new(4, 1e-6).unwrap();
        let (timeline, engine) = run(jagged_motion, 5, parameters);

        // No data loss: the window failed, so every sample survives.
        assert_eq!(timeline.len(), 5);
        // The window still restarts at its trailing endpoint.
        assert_eq!(engine.dense_times(), &[Instant::from_secs(4)]);
    }

    #[test]
    fn test_window_never_exceeds_bound() {
        let parameters = DownsamplingParameters::new(3, 1e-6).unwrap();
        let mut timeline = Timeline::new();
        let mut engine = Downsampling::new(parameters, &timeline);
        for i in 0..20 {
            let t = Instant::from_secs(i);
            timeline.append(t, linear_motion(i as f64)).unwrap();
            engine.on_append(t, &mut timeline);
            assert!(engine.dense_times().len() <= parameters.max_dense_intervals());
        }
    }

    #[test]
    fn test_forget_after_truncates_window() {
        let parameters = DownsamplingParameters::new(10, 1e-6).unwrap();
        let (mut timeline, mut engine) = run(linear_motion, 8, parameters);
        assert_eq!(engine.dense_times().len(), 8);

        timeline.forget_after(Instant::from_secs(5));
        engine.forget_after(Instant::from_secs(5), &timeline);
        assert_eq!(
            engine.dense_times(),
            &[
                Instant::from_secs(0),
                Instant::from_secs(1),
                Instant::from_secs(2),
                Instant::from_secs(3),
                Instant::from_secs(4),
            ]
        );
    }

    #[test]
    fn test_forget_after_reseeds_from_retained_tail() {
        let parameters = DownsamplingParameters::new(4, 1e-6).unwrap();
        // Two full compacted windows: retained times 0, 4, 8.
        let (mut timeline, mut engine) = run(linear_motion, 9, parameters);
        assert_eq!(timeline.len(), 3);

        // Cut inside the first compacted span: the window reseeds with the
        // retained last sample, a past window endpoint.
        timeline.forget_after(Instant::from_secs(3));
        engine.forget_after(Instant::from_secs(3), &timeline);
        assert_eq!(engine.dense_times(), &[Instant::from_secs(0)]);
    }

    #[test]
    fn test_attach_to_populated_timeline_seeds_from_last() {
        let mut timeline = Timeline::new();
        for i in 0..3 {
            timeline
                .append(Instant::from_secs(i), linear_motion(i as f64))
                .unwrap();
        }
        let engine = Downsampling::new(DownsamplingParameters::new(4, 1e-6).unwrap(), &timeline);
        assert_eq!(engine.dense_times(), &[Instant::from_secs(2)]);
    }

    #[test]
    fn test_rejects_degenerate_window() {
        assert!(matches!(
            DownsamplingParameters::new(1, 1e-6),
            Err(Error::InvalidParameters { .. })
        ));
        assert!(matches!(
            DownsamplingParameters::new(0, 1e-6),
            Err(Error::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_tolerance() {
        assert!(matches!(
            DownsamplingParameters::new(10, 0.0),
            Err(Error::InvalidParameters { .. })
        ));
        assert!(matches!(
            DownsamplingParameters::new(10, -1.0),
            Err(Error::InvalidParameters { .. })
        ));
        assert!(matches!(
            DownsamplingParameters::new(10, f64::NAN),
            Err(Error::InvalidParameters { .. })
        ));
    }
}
