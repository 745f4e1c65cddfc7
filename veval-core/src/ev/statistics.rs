// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::BTreeMap;

use crate::config::{EvalConfig, Statistic};
use crate::ev::{ObjectResult, SequenceMetricResult, SequenceResult, SequenceScores, StatisticValues};

/// Defined values of a score row, dropping unwritten and `NaN` cells
pub fn defined(values: &[Option<f64>]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|&v| v.filter(|x| !x.is_nan()))
        .collect()
}

/// Arithmetic mean ignoring `NaN`, undefined for an empty input
///
/// # Examples
///
/// ```
/// use veval_core::ev::statistics::mean;
///
/// assert_eq!(mean(&[1.0, f64::NAN, 0.0]), Some(0.5));
/// assert_eq!(mean(&[f64::NAN]), None);
/// ```
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(sum, count), x| (sum + x, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// 1 if the mean clears `threshold` (inclusive), 0 otherwise
pub fn recall(mean: Option<f64>, threshold: f64) -> Option<f64> {
    mean.map(|m| if m >= threshold { 1.0 } else { 0.0 })
}

/// Drop in quality from the first temporal bin to the remaining bins
///
/// The timeline of `n` frames is split into `min(bins, n)` contiguous bins
/// where bin `i` covers `[i * n / k, (i + 1) * n / k)`. Each bin is averaged
/// over its defined (non-`NaN`) values. The result is the mean of the first
/// bin minus the mean of the remaining defined bin means. Undefined with
/// fewer than two bins, or when the first bin or every later bin has no
/// defined value.
///
/// # Examples
///
/// ```
/// use veval_core::ev::statistics::decay;
///
/// let scores = [1.0, 1.0, 0.8, 0.8, 0.6, 0.6, 0.4, 0.4];
/// assert!((decay(&scores, 4).unwrap() - 0.4).abs() < 1e-12);
///
/// assert_eq!(decay(&[0.75; 9], 4), Some(0.0));
/// assert_eq!(decay(&[0.75], 4), None);
/// assert_eq!(decay(&[f64::NAN, f64::NAN, 1.0, 0.0], 2), None);
/// ```
pub fn decay(values: &[f64], bins: usize) -> Option<f64> {
    let n = values.len();
    let k = bins.min(n);
    if k < 2 {
        return None;
    }

    let bin_means: Vec<Option<f64>> = (0..k)
        .map(|i| mean(&values[i * n / k..(i + 1) * n / k]))
        .collect();

    let first = bin_means[0]?;
    let rest: Vec<f64> = bin_means[1..].iter().flatten().copied().collect();

    Some(first - mean(&rest)?)
}

/// Requested statistics of a single object's per-frame scores
pub fn object_statistics(values: &[Option<f64>], config: &EvalConfig) -> StatisticValues {
    let timeline: Vec<f64> = values.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    let object_mean = mean(&defined(values));

    config
        .statistics
        .iter()
        .map(|&statistic| {
            let value = match statistic {
                Statistic::Mean => object_mean,
                Statistic::Recall => recall(object_mean, config.recall_threshold),
                Statistic::Decay => decay(&timeline, config.decay_bins),
            };
            (statistic, value)
        })
        .collect()
}

/// Average each statistic over a group of objects, each weighing equally
///
/// Objects with an undefined value for a statistic are skipped for that
/// statistic. The mean of object recalls is the fraction of objects
/// meeting the threshold.
pub fn reduce<'a, I>(objects: I, config: &EvalConfig) -> StatisticValues
where
    I: IntoIterator<Item = &'a StatisticValues>,
{
    let mut values: BTreeMap<Statistic, Vec<f64>> = config
        .statistics
        .iter()
        .map(|&statistic| (statistic, Vec::new()))
        .collect();

    for object in objects {
        for (statistic, collected) in values.iter_mut() {
            if let Some(Some(value)) = object.get(statistic) {
                collected.push(*value);
            }
        }
    }

    values
        .into_iter()
        .map(|(statistic, collected)| (statistic, mean(&collected)))
        .collect()
}

/// Reduce the score matrices of one sequence into per-object and
/// per-sequence statistics
pub fn summarize(scores: &SequenceScores, config: &EvalConfig) -> SequenceResult {
    let metrics = scores
        .iter()
        .map(|(&metric, matrix)| {
            let objects: Vec<ObjectResult> = matrix
                .rows()
                .map(|(id, row)| ObjectResult {
                    id,
                    statistics: object_statistics(row, config),
                    frames: row.iter().map(|v| v.filter(|x| !x.is_nan())).collect(),
                })
                .collect();

            let statistics = reduce(objects.iter().map(|object| &object.statistics), config);

            (metric, SequenceMetricResult { statistics, objects })
        })
        .collect();

    SequenceResult { metrics }
}
