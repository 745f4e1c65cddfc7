// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::{BTreeMap, HashMap};

use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::{DatasetVariant, EvalConfig, Metric};
use crate::error::VevalError;
use crate::ev::statistics::{reduce, summarize};
use crate::ev::{EvaluationResult, Segmentation, Sequence, StatisticValues, evaluate_sequence};
use crate::ut;

/// Annotated sequences of one dataset variant, in evaluation order
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    variant: DatasetVariant,
    sequences: Vec<Sequence>,
}

impl Dataset {
    pub fn new(variant: DatasetVariant, sequences: Vec<Sequence>) -> Self {
        Dataset { variant, sequences }
    }

    pub fn variant(&self) -> DatasetVariant {
        self.variant
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn names(&self) -> Vec<&str> {
        self.sequences.iter().map(|sequence| sequence.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Total number of annotated frames
    pub fn n_frames(&self) -> usize {
        self.sequences.iter().map(|sequence| sequence.n_frames()).sum()
    }
}

/// Evaluate predicted segmentations against every sequence of a dataset
///
/// Segmentations are matched to sequences by name. Sequences are scored in
/// parallel and reduced in dataset order, so the result does not depend on
/// the number of threads.
///
/// # Arguments
///
/// * `dataset` - Annotated sequences
/// * `segmentations` - One predicted segmentation per sequence
/// * `config` - Requested metrics, statistics and thresholds
///
/// # Examples
///
/// ```
/// use veval_core::config::{DatasetVariant, EvalConfig, Metric, Statistic};
/// use veval_core::ev::{Dataset, Segmentation, Sequence, evaluate};
/// use veval_core::im::VevalMask;
///
/// let frame = VevalMask::new(2, 2, vec![0, 1, 1, 1]).unwrap();
///
/// let dataset = Dataset::new(
///     DatasetVariant::default(),
///     vec![Sequence::new("goat", vec![frame.clone(); 2])],
/// );
/// let segmentations = vec![Segmentation::new("goat", vec![frame; 2])];
///
/// let result = evaluate(&dataset, &segmentations, &EvalConfig::default()).unwrap();
/// assert_eq!(result.get(Metric::J, Statistic::Mean), Some(1.0));
/// ```
pub fn evaluate(
    dataset: &Dataset,
    segmentations: &[Segmentation],
    config: &EvalConfig,
) -> Result<EvaluationResult, VevalError> {
    config.validate()?;

    let lookup: HashMap<&str, &Segmentation> = segmentations
        .iter()
        .map(|segmentation| (segmentation.name(), segmentation))
        .collect();

    let pairs: Vec<(&Sequence, &Segmentation)> = dataset
        .sequences()
        .iter()
        .map(|sequence| {
            lookup
                .get(sequence.name())
                .map(|&segmentation| (sequence, segmentation))
                .ok_or_else(|| VevalError::MissingSequence(sequence.name().to_string()))
        })
        .collect::<Result<_, _>>()?;

    ut::track::progress_log(
        &format!(
            "Evaluating {} sequences on metrics: {}.",
            ut::track::thousands_format(pairs.len()),
            config
                .metrics
                .iter()
                .map(|metric| metric.name())
                .collect::<Vec<&str>>()
                .join(", ")
        ),
        config.verbose,
    );

    let pb = ut::track::progress_bar(pairs.len(), "Evaluating", config.verbose);

    let mut scored: Vec<(usize, Result<_, VevalError>)> = (0..pairs.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .map(|idx| {
            let (sequence, segmentation) = pairs[idx];
            (idx, evaluate_sequence(sequence, segmentation, config))
        })
        .collect();

    scored.sort_unstable_by_key(|(idx, _)| *idx);

    if config.verbose {
        println!();
    }

    let mut sequences = BTreeMap::new();
    let mut objects: BTreeMap<Metric, Vec<StatisticValues>> = config
        .metrics
        .iter()
        .map(|&metric| (metric, Vec::new()))
        .collect();

    for (_, scores) in scored {
        let scores = scores?;
        let summary = summarize(&scores, config);

        for (metric, metric_result) in summary.metrics.iter() {
            if let Some(pool) = objects.get_mut(metric) {
                pool.extend(metric_result.objects.iter().map(|o| o.statistics.clone()));
            }
        }

        if config.detail {
            sequences.insert(scores.name().to_string(), summary);
        }
    }

    let dataset_statistics = objects
        .iter()
        .map(|(&metric, pool)| (metric, reduce(pool.iter(), config)))
        .collect();

    ut::track::progress_log(
        &format!(
            "Complete. Evaluated {} objects across {} sequences.",
            ut::track::thousands_format(objects.values().map(|pool| pool.len()).max().unwrap_or(0)),
            ut::track::thousands_format(dataset.len())
        ),
        config.verbose,
    );

    Ok(EvaluationResult {
        dataset: dataset_statistics,
        sequences,
    })
}
