//! Common time axis construction and per-point cross-series aggregation.
//!
//! The axis is the sorted union of every distinct sample time in a group
//! (exact equality, no tolerance merging). At each axis point every series
//! contributes the value of its nearest sample; ties go to the earlier
//! sample. Values are never interpolated. With
//! [`AlignOptions::observed_range_only`] a series only contributes inside its
//! own first..=last sample time, so nothing is carried past its ends.

use serde::{Deserialize, Serialize};

use crate::model::{MetricKind, Sample, TimeSeries};
use crate::resolve::LogicalGroup;

/// Alignment tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignOptions {
    /// Drop a series from a point when its nearest sample is farther away
    /// than this (in simulated seconds). `None` keeps every series.
    #[serde(default)]
    pub max_distance: Option<f64>,
    /// Skip a series at points before its first or after its last sample.
    #[serde(default)]
    pub observed_range_only: bool,
}

/// Cross-series statistics at one axis point
///
/// A point without contributors carries NaN in every statistic and
/// `contributors == 0`; check [`PointAggregate::has_data`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointAggregate {
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub contributors: usize,
}

impl PointAggregate {
    pub const NO_DATA: Self = Self {
        mean: f64::NAN,
        std_dev: f64::NAN,
        min: f64::NAN,
        max: f64::NAN,
        contributors: 0,
    };

    pub fn from_values(values: &[f64]) -> Self {
        let (Some(mean), Some(std_dev)) = (super::mean(values), super::population_std_dev(values))
        else {
            return Self::NO_DATA;
        };
        Self {
            mean,
            std_dev,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            contributors: values.len(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.contributors > 0
    }
}

/// A logical group placed on its common time axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeriesSet {
    pub kind: MetricKind,
    /// Number of series that took part in the alignment
    pub series_count: usize,
    pub time_axis: Vec<f64>,
    /// One aggregate per `time_axis` entry
    pub points: Vec<PointAggregate>,
}

impl AlignedSeriesSet {
    pub fn from_group(group: &LogicalGroup, options: &AlignOptions) -> Self {
        let series: Vec<&TimeSeries> = group.series().collect();
        Self::from_series(group.kind(), &series, options)
    }

    pub fn from_series(kind: MetricKind, series: &[&TimeSeries], options: &AlignOptions) -> Self {
        let time_axis = time_axis(series.iter().copied());
        let sorted: Vec<Vec<Sample>> = series
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| sorted_by_time(&s.samples))
            .collect();

        let mut values = Vec::with_capacity(sorted.len());
        let points = time_axis
            .iter()
            .map(|&t| {
                values.clear();
                for samples in &sorted {
                    if options.observed_range_only && !within_observed_range(samples, t) {
                        continue;
                    }
                    let Some((sample, distance)) = nearest_sample(samples, t) else {
                        continue;
                    };
                    if options.max_distance.is_some_and(|max| distance > max) {
                        continue;
                    }
                    values.push(sample.value);
                }
                PointAggregate::from_values(&values)
            })
            .collect();

        Self {
            kind,
            series_count: series.len(),
            time_axis,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.time_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_axis.is_empty()
    }

    /// `(time, aggregate)` pairs in axis order
    pub fn iter(&self) -> impl Iterator<Item = (f64, &PointAggregate)> {
        self.time_axis.iter().copied().zip(self.points.iter())
    }

    /// Axis points that have at least one contributor
    pub fn with_data(&self) -> impl Iterator<Item = (f64, &PointAggregate)> {
        self.iter().filter(|(_, p)| p.has_data())
    }
}

/// Sorted union of all distinct sample times
pub fn time_axis<'a>(series: impl IntoIterator<Item = &'a TimeSeries>) -> Vec<f64> {
    let mut axis: Vec<f64> = series.into_iter().flat_map(|s| s.times()).collect();
    axis.sort_by(f64::total_cmp);
    axis.dedup();
    axis
}

/// Copy of `samples` stably sorted by time, so equal times keep file order
pub fn sorted_by_time(samples: &[Sample]) -> Vec<Sample> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
    sorted
}

fn within_observed_range(sorted: &[Sample], t: f64) -> bool {
    match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => first.time <= t && t <= last.time,
        _ => false,
    }
}

/// Sample nearest to `t` in a time-sorted slice, with its distance to `t`.
///
/// An exact time match returns that sample. Equidistant neighbours resolve
/// to the earlier one, and among equal times to the first in file order.
pub fn nearest_sample(sorted: &[Sample], t: f64) -> Option<(&Sample, f64)> {
    let idx = sorted.partition_point(|s| s.time < t);
    let after = sorted.get(idx);
    let before = idx.checked_sub(1).map(|i| {
        let time = sorted[i].time;
        &sorted[sorted.partition_point(|s| s.time < time)]
    });

    match (before, after) {
        (Some(b), Some(a)) if a.time - t < t - b.time => Some((a, a.time - t)),
        (Some(b), _) => Some((b, t - b.time)),
        (None, Some(a)) => Some((a, a.time - t)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(f64, f64)]) -> TimeSeries {
        TimeSeries {
            entity_path: "Net.uav[0].bat".to_string(),
            metric_name: "fitness".to_string(),
            samples: points
                .iter()
                .map(|&(time, value)| Sample { time, value })
                .collect(),
        }
    }

    #[test]
    fn test_time_axis_is_sorted_union() {
        let a = series(&[(10.0, 1.0), (0.0, 1.0), (5.0, 1.0)]);
        let b = series(&[(0.0, 1.0), (3.0, 1.0), (10.0, 1.0), (3.0, 2.0)]);
        assert_eq!(time_axis([&a, &b]), vec![0.0, 3.0, 5.0, 10.0]);
        assert!(time_axis(Vec::<&TimeSeries>::new()).is_empty());
    }

    #[test]
    fn test_nearest_sample_exact_and_ties() {
        let sorted = sorted_by_time(&[
            Sample { time: 0.0, value: 1.0 },
            Sample { time: 4.0, value: 2.0 },
            Sample { time: 8.0, value: 3.0 },
        ]);

        let (exact, distance) = nearest_sample(&sorted, 4.0).unwrap();
        assert_eq!(exact.value, 2.0);
        assert_eq!(distance, 0.0);

        // equidistant between 0 and 4 resolves to the earlier sample
        assert_eq!(nearest_sample(&sorted, 2.0).unwrap().0.value, 1.0);
        assert_eq!(nearest_sample(&sorted, 2.5).unwrap().0.value, 2.0);
        assert_eq!(nearest_sample(&sorted, -3.0).unwrap().0.value, 1.0);
        assert_eq!(nearest_sample(&sorted, 100.0).unwrap(), (&sorted[2], 92.0));
        assert!(nearest_sample(&[], 1.0).is_none());
    }

    #[test]
    fn test_equidistant_tie_prefers_earlier_time_not_file_order() {
        // the later-in-file sample is earlier in time and wins the tie
        let sorted = sorted_by_time(&[
            Sample { time: 4.0, value: 1.0 },
            Sample { time: 0.0, value: 2.0 },
        ]);
        assert_eq!(nearest_sample(&sorted, 2.0).unwrap(), (&sorted[0], 2.0));
        assert_eq!(sorted[0].value, 2.0);
    }

    #[test]
    fn test_nearest_sample_duplicate_times_prefer_file_order() {
        let sorted = sorted_by_time(&[
            Sample { time: 2.0, value: 7.0 },
            Sample { time: 2.0, value: 9.0 },
            Sample { time: 6.0, value: 1.0 },
        ]);
        assert_eq!(nearest_sample(&sorted, 2.0).unwrap().0.value, 7.0);
        assert_eq!(nearest_sample(&sorted, 3.0).unwrap().0.value, 7.0);
        assert_eq!(nearest_sample(&sorted, 4.0).unwrap().0.value, 7.0);
    }

    #[test]
    fn test_point_aggregate() {
        let point = PointAggregate::from_values(&[1.0, 3.0]);
        assert_eq!(point.mean, 2.0);
        assert_eq!(point.std_dev, 1.0);
        assert_eq!(point.min, 1.0);
        assert_eq!(point.max, 3.0);
        assert_eq!(point.contributors, 2);

        let empty = PointAggregate::from_values(&[]);
        assert!(!empty.has_data());
        assert!(empty.mean.is_nan() && empty.std_dev.is_nan());
        assert!(empty.min.is_nan() && empty.max.is_nan());
    }

    #[test]
    fn test_disjoint_series_alignment() {
        let a = series(&[(0.0, 100.0), (5.0, 50.0), (10.0, 10.0)]);
        let b = series(&[(0.0, 80.0), (3.0, 60.0), (10.0, 20.0)]);
        let set =
            AlignedSeriesSet::from_series(MetricKind::Fitness, &[&a, &b], &AlignOptions::default());

        assert_eq!(set.time_axis, vec![0.0, 3.0, 5.0, 10.0]);
        assert_eq!(set.points.len(), 4);
        assert!(set.points.iter().all(|p| p.contributors == 2));

        // t=3: a -> 5.0 (50), b exact (60)
        assert_eq!(set.points[1].mean, 55.0);
        // t=5: a exact (50), b -> 3.0 (60)
        assert_eq!(set.points[2].min, 50.0);
        assert_eq!(set.points[2].max, 60.0);
        assert_eq!(set.points[3].mean, 15.0);
    }

    #[test]
    fn test_empty_series_are_excluded() {
        let a = series(&[(1.0, 4.0)]);
        let empty = series(&[]);
        let set = AlignedSeriesSet::from_series(
            MetricKind::Loudness,
            &[&a, &empty],
            &AlignOptions::default(),
        );

        assert_eq!(set.series_count, 2);
        assert_eq!(set.points, vec![PointAggregate::from_values(&[4.0])]);
    }

    #[test]
    fn test_max_distance_cutoff() {
        let dense = series(&[(0.0, 1.0), (1.0, 1.0), (2.0, 1.0), (9.0, 1.0)]);
        let sparse = series(&[(0.0, 5.0)]);
        let options = AlignOptions {
            max_distance: Some(1.5),
            ..Default::default()
        };
        let set = AlignedSeriesSet::from_series(MetricKind::Fitness, &[&dense, &sparse], &options);

        let contributors: Vec<_> = set.points.iter().map(|p| p.contributors).collect();
        assert_eq!(contributors, vec![2, 2, 1, 1]);

        let unbounded = AlignedSeriesSet::from_series(
            MetricKind::Fitness,
            &[&dense, &sparse],
            &AlignOptions::default(),
        );
        assert!(unbounded.points.iter().all(|p| p.contributors == 2));
    }

    #[test]
    fn test_observed_range_only_stops_at_series_ends() {
        let early = series(&[(0.0, 100.0), (10.0, 90.0)]);
        let late = series(&[(20.0, 5.0), (30.0, 1.0)]);

        let nearest = AlignedSeriesSet::from_series(
            MetricKind::Fitness,
            &[&early, &late],
            &AlignOptions::default(),
        );
        assert_eq!(nearest.time_axis, vec![0.0, 10.0, 20.0, 30.0]);
        assert!(nearest.points.iter().all(|p| p.contributors == 2));
        assert_eq!(nearest.points[0].mean, 52.5);
        assert_eq!(nearest.points[3].mean, 45.5);

        let options = AlignOptions {
            observed_range_only: true,
            ..Default::default()
        };
        let clamped =
            AlignedSeriesSet::from_series(MetricKind::Fitness, &[&early, &late], &options);
        let contributors: Vec<_> = clamped.points.iter().map(|p| p.contributors).collect();
        assert_eq!(contributors, vec![1, 1, 1, 1]);
        let means: Vec<_> = clamped.points.iter().map(|p| p.mean).collect();
        assert_eq!(means, vec![100.0, 90.0, 5.0, 1.0]);
    }

    #[test]
    fn test_no_series_yields_empty_set() {
        let set =
            AlignedSeriesSet::from_series(MetricKind::PulseRate, &[], &AlignOptions::default());
        assert!(set.is_empty());
        assert_eq!(set.with_data().count(), 0);
    }
}
