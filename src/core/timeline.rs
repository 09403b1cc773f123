//! Timeline: the ordered sample store of one segment

use crate::core::motion::{Motion, Sample};
use crate::core::time::Instant;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Ordered container of samples keyed by strictly increasing time
///
/// Insertion order equals time order: `append` only accepts times strictly
/// greater than the current last key, so adjacent samples always satisfy
/// `time[i] < time[i + 1]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    /// Samples ordered by time (BTreeMap for ordered lookup and iteration)
    samples: BTreeMap<Instant, Motion>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self {
            samples: BTreeMap::new(),
        }
    }

    /// Append a sample at the end of the timeline
    ///
    /// Fails with [`Error::OutOfOrder`] unless `time` is strictly greater
    /// than the last stored time. A time equal to the last stored time is an
    /// ordering violation, not a silent overwrite.
    pub fn append(&mut self, time: Instant, motion: Motion) -> Result<()> {
        if let Some((&last, _)) = self.samples.last_key_value() {
            if time <= last {
                return Err(Error::OutOfOrder { time, last });
            }
        }
        self.samples.insert(time, motion);
        Ok(())
    }

    /// Get the sample at exactly `time`, if present
    pub fn find(&self, time: Instant) -> Option<Sample> {
        self.samples
            .get(&time)
            .map(|&motion| Sample::new(time, motion))
    }

    /// Get the first sample with time >= `time`
    pub fn lower_bound(&self, time: Instant) -> Option<Sample> {
        self.samples
            .range(time..)
            .next()
            .map(|(&t, &m)| Sample::new(t, m))
    }

    /// Get the first sample with time > `time`
    pub fn upper_bound(&self, time: Instant) -> Option<Sample> {
        use std::ops::Bound;
        self.samples
            .range((Bound::Excluded(time), Bound::Unbounded))
            .next()
            .map(|(&t, &m)| Sample::new(t, m))
    }

    /// Get the last sample with time < `time`
    pub(crate) fn last_before(&self, time: Instant) -> Option<Sample> {
        self.samples
            .range(..time)
            .next_back()
            .map(|(&t, &m)| Sample::new(t, m))
    }

    /// Get the first (earliest) sample
    pub fn first(&self) -> Option<Sample> {
        self.samples
            .first_key_value()
            .map(|(&t, &m)| Sample::new(t, m))
    }

    /// Get the last (latest) sample
    pub fn last(&self) -> Option<Sample> {
        self.samples
            .last_key_value()
            .map(|(&t, &m)| Sample::new(t, m))
    }

    /// Iterate over all samples in time order
    ///
    /// The iterator is double-ended; reverse traversal inspects the tail.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Sample> + '_ {
        self.samples.iter().map(|(&t, &m)| Sample::new(t, m))
    }

    /// Iterate over the stored times in order
    pub fn times(&self) -> impl DoubleEndedIterator<Item = Instant> + '_ {
        self.samples.keys().copied()
    }

    /// Iterate over the samples with time in `[from, to]`, in time order
    pub(crate) fn range_inclusive(
        &self,
        from: Instant,
        to: Instant,
    ) -> impl DoubleEndedIterator<Item = Sample> + '_ {
        self.samples
            .range(from..=to)
            .map(|(&t, &m)| Sample::new(t, m))
    }

    /// Remove every sample with time >= `time`, retaining `[-inf, time)`
    ///
    /// Returns the number of removed samples.
    pub fn forget_after(&mut self, time: Instant) -> usize {
        let removed = self.samples.split_off(&time);
        if !removed.is_empty() {
            debug!(
                at = %time,
                removed = removed.len(),
                retained = self.samples.len(),
                "forgot tail of timeline"
            );
        }
        removed.len()
    }

    /// Remove every sample with time < `time`, retaining `[time, +inf)`
    ///
    /// Returns the number of removed samples. Note the asymmetry with
    /// [`Timeline::forget_after`]: a sample at exactly `time` is retained
    /// here but removed there.
    pub fn forget_before(&mut self, time: Instant) -> usize {
        let retained = self.samples.split_off(&time);
        let removed = std::mem::replace(&mut self.samples, retained);
        if !removed.is_empty() {
            debug!(
                at = %time,
                removed = removed.len(),
                retained = self.samples.len(),
                "forgot head of timeline"
            );
        }
        removed.len()
    }

    /// Remove the sample stored at exactly `time`, if any
    pub(crate) fn remove(&mut self, time: Instant) -> bool {
        self.samples.remove(&time).is_some()
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the timeline holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline_at_secs(secs: &[i64]) -> Timeline {
        let mut timeline = Timeline::new();
        for &s in secs {
            timeline
                .append(Instant::from_secs(s), Motion::unmoving_origin())
                .unwrap();
        }
        timeline
    }

    #[test]
    fn test_append_in_order() {
        let timeline = timeline_at_secs(&[2, 3, 5, 7, 11]);
        assert_eq!(timeline.len(), 5);
        assert_eq!(timeline.first().unwrap().time, Instant::from_secs(2));
        assert_eq!(timeline.last().unwrap().time, Instant::from_secs(11));
    }

    #[test]
    fn test_append_out_of_order() {
        let mut timeline = timeline_at_secs(&[2, 3]);
        let err = timeline
            .append(Instant::from_secs(1), Motion::unmoving_origin())
            .unwrap_err();
        assert_eq!(
            err,
            Error::OutOfOrder {
                time: Instant::from_secs(1),
                last: Instant::from_secs(3),
            }
        );
        // A duplicate time is equally out of order.
        assert!(timeline
            .append(Instant::from_secs(3), Motion::unmoving_origin())
            .is_err());
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn test_find_and_bounds() {
        let timeline = timeline_at_secs(&[2, 3, 5, 7, 11]);
        assert!(timeline.find(Instant::from_secs(5)).is_some());
        assert!(timeline.find(Instant::from_secs(4)).is_none());

        assert_eq!(
            timeline.lower_bound(Instant::from_secs(5)).unwrap().time,
            Instant::from_secs(5)
        );
        assert_eq!(
            timeline.upper_bound(Instant::from_secs(5)).unwrap().time,
            Instant::from_secs(7)
        );
        assert_eq!(
            timeline.lower_bound(Instant::from_secs(6)).unwrap().time,
            Instant::from_secs(7)
        );
        assert!(timeline.lower_bound(Instant::from_secs(12)).is_none());
        assert!(timeline.upper_bound(Instant::from_secs(11)).is_none());
        assert_eq!(
            timeline.last_before(Instant::from_secs(5)).unwrap().time,
            Instant::from_secs(3)
        );
        assert!(timeline.last_before(Instant::from_secs(2)).is_none());
    }

    #[test]
    fn test_traversal() {
        let timeline = timeline_at_secs(&[2, 3, 5]);
        let forward: Vec<_> = timeline.times().collect();
        assert_eq!(
            forward,
            vec![
                Instant::from_secs(2),
                Instant::from_secs(3),
                Instant::from_secs(5)
            ]
        );
        let backward: Vec<_> = timeline.times().rev().collect();
        assert_eq!(
            backward,
            vec![
                Instant::from_secs(5),
                Instant::from_secs(3),
                Instant::from_secs(2)
            ]
        );
    }

    #[test]
    fn test_forget_after_boundary() {
        // forget_after removes the sample at the cut time itself.
        let mut timeline = timeline_at_secs(&[2, 3, 5, 7, 11]);
        assert_eq!(timeline.forget_after(Instant::from_secs(5)), 3);
        assert_eq!(timeline.last().unwrap().time, Instant::from_secs(3));

        let mut timeline = timeline_at_secs(&[2, 3, 5, 7, 11]);
        assert_eq!(timeline.forget_after(Instant::from_secs(6)), 2);
        assert_eq!(timeline.last().unwrap().time, Instant::from_secs(5));
    }

    #[test]
    fn test_forget_before_boundary() {
        // forget_before retains the sample at the cut time itself.
        let mut timeline = timeline_at_secs(&[2, 3, 5, 7, 11]);
        assert_eq!(timeline.forget_before(Instant::from_secs(7)), 3);
        assert_eq!(timeline.first().unwrap().time, Instant::from_secs(7));

        let mut timeline = timeline_at_secs(&[2, 3, 5, 7, 11]);
        assert_eq!(timeline.forget_before(Instant::from_secs(6)), 3);
        assert_eq!(timeline.first().unwrap().time, Instant::from_secs(7));

        let mut timeline = timeline_at_secs(&[2, 3, 5, 7, 11]);
        assert_eq!(timeline.forget_before(Instant::from_secs(1)), 0);
        assert_eq!(timeline.first().unwrap().time, Instant::from_secs(2));
    }

    #[test]
    fn test_forget_everything() {
        let mut timeline = timeline_at_secs(&[2, 3]);
        timeline.forget_after(Instant::from_secs(0));
        assert!(timeline.is_empty());

        let mut timeline = timeline_at_secs(&[2, 3]);
        timeline.forget_before(Instant::from_secs(10));
        assert!(timeline.is_empty());
    }
}
