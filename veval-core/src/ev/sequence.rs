// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::{EvalConfig, Metric};
use crate::constant;
use crate::error::VevalError;
use crate::ev::ScoreMatrix;
use crate::im::{BinaryMask, MaskPair, VevalMask};
use crate::ms::temporal_stability;

/// Annotated frames of one video sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    name: String,
    objects: Vec<u32>,
    frames: Vec<VevalMask>,
}

impl Sequence {
    /// Create a sequence whose objects are every label seen in any frame
    ///
    /// # Examples
    ///
    /// ```
    /// use veval_core::ev::Sequence;
    /// use veval_core::im::VevalMask;
    ///
    /// let frames = vec![
    ///     VevalMask::new(2, 1, vec![0, 1]).unwrap(),
    ///     VevalMask::new(2, 1, vec![3, 1]).unwrap(),
    /// ];
    ///
    /// let sequence = Sequence::new("blackswan", frames);
    /// assert_eq!(sequence.objects(), &[1, 3]);
    /// ```
    pub fn new(name: &str, frames: Vec<VevalMask>) -> Self {
        let objects: BTreeSet<u32> = frames.iter().flat_map(|frame| frame.labels()).collect();

        Sequence {
            name: name.to_string(),
            objects: objects.into_iter().collect(),
            frames,
        }
    }

    /// Create a sequence with an explicit set of object identifiers
    pub fn with_objects(name: &str, frames: Vec<VevalMask>, objects: Vec<u32>) -> Self {
        Sequence {
            name: name.to_string(),
            objects,
            frames,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn objects(&self) -> &[u32] {
        &self.objects
    }

    pub fn frames(&self) -> &[VevalMask] {
        &self.frames
    }

    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Merge every annotated object into a single foreground object
    pub fn collapse(&mut self) {
        self.frames.iter_mut().for_each(|frame| frame.collapse());
        self.objects = single_object(&self.objects);
    }
}

/// Predicted frames of one video sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    name: String,
    frames: Vec<VevalMask>,
}

impl Segmentation {
    pub fn new(name: &str, frames: Vec<VevalMask>) -> Self {
        Segmentation {
            name: name.to_string(),
            frames,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[VevalMask] {
        &self.frames
    }

    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Merge every predicted object into a single foreground object
    pub fn collapse(&mut self) {
        self.frames.iter_mut().for_each(|frame| frame.collapse());
    }
}

/// Score matrices of every requested metric for one sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceScores {
    name: String,
    objects: Vec<u32>,
    matrices: BTreeMap<Metric, ScoreMatrix>,
}

impl SequenceScores {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn objects(&self) -> &[u32] {
        &self.objects
    }

    pub fn get(&self, metric: Metric) -> Option<&ScoreMatrix> {
        self.matrices.get(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Metric, &ScoreMatrix)> {
        self.matrices.iter()
    }
}

/// Score every object of a sequence on every frame for the requested metrics
///
/// Region similarity and boundary accuracy are scored per frame. Temporal
/// stability is scored per pair of consecutive predicted frames, giving one
/// fewer column than there are frames.
///
/// # Arguments
///
/// * `sequence` - Ground-truth frames and object identifiers
/// * `segmentation` - Predicted frames aligned with the ground truth
/// * `config` - Metrics and thresholds
///
/// # Examples
///
/// ```
/// use veval_core::config::{EvalConfig, Metric};
/// use veval_core::ev::{Segmentation, Sequence, evaluate_sequence};
/// use veval_core::im::VevalMask;
///
/// let truth = VevalMask::new(3, 1, vec![1, 1, 0]).unwrap();
/// let prediction = VevalMask::new(3, 1, vec![1, 0, 0]).unwrap();
///
/// let sequence = Sequence::new("cows", vec![truth]);
/// let segmentation = Segmentation::new("cows", vec![prediction]);
///
/// let config = EvalConfig::with_metrics(&[Metric::J]);
/// let scores = evaluate_sequence(&sequence, &segmentation, &config).unwrap();
///
/// assert_eq!(scores.get(Metric::J).unwrap().get(1, 0), Some(0.5));
/// ```
pub fn evaluate_sequence(
    sequence: &Sequence,
    segmentation: &Segmentation,
    config: &EvalConfig,
) -> Result<SequenceScores, VevalError> {
    let name = sequence.name();
    let n_frames = sequence.n_frames();

    if segmentation.n_frames() != n_frames {
        return Err(VevalError::FrameCountMismatch {
            sequence: name.to_string(),
            expected: n_frames,
            found: segmentation.n_frames(),
        });
    }

    for (frame, (truth, prediction)) in sequence
        .frames()
        .iter()
        .zip(segmentation.frames().iter())
        .enumerate()
    {
        if truth.shape() != prediction.shape() {
            return Err(VevalError::ResolutionMismatch {
                sequence: name.to_string(),
                frame,
                expected: truth.shape(),
                found: prediction.shape(),
            });
        }
    }

    let (truth, prediction, objects): (Cow<[VevalMask]>, Cow<[VevalMask]>, Vec<u32>) =
        if config.single_object {
            (
                Cow::Owned(collapsed(sequence.frames())),
                Cow::Owned(collapsed(segmentation.frames())),
                single_object(sequence.objects()),
            )
        } else {
            (
                Cow::Borrowed(sequence.frames()),
                Cow::Borrowed(segmentation.frames()),
                sequence.objects().to_vec(),
            )
        };

    let mut matrices: BTreeMap<Metric, ScoreMatrix> = config
        .metrics
        .iter()
        .map(|&metric| {
            let n_columns = match metric {
                Metric::T => n_frames.saturating_sub(1),
                Metric::J | Metric::F => n_frames,
            };
            (metric, ScoreMatrix::new(name, metric, &objects, n_columns))
        })
        .collect();

    let per_frame = matrices.contains_key(&Metric::J) || matrices.contains_key(&Metric::F);

    for &object in objects.iter() {
        let predicted: Vec<BinaryMask> = prediction.iter().map(|mask| mask.binary(object)).collect();

        if per_frame {
            for (frame, (truth_mask, predicted_mask)) in truth.iter().zip(predicted.iter()).enumerate() {
                let pair = MaskPair::new(truth_mask.binary(object), predicted_mask.clone())?;

                if let Some(matrix) = matrices.get_mut(&Metric::J) {
                    matrix.insert(object, frame, pair.jaccard())?;
                }

                if let Some(matrix) = matrices.get_mut(&Metric::F) {
                    matrix.insert(object, frame, pair.boundary(config.boundary_threshold).f)?;
                }
            }
        }

        if let Some(matrix) = matrices.get_mut(&Metric::T) {
            for (frame, window) in predicted.windows(2).enumerate() {
                let score = temporal_stability(&window[0], &window[1], config.contour_points);
                matrix.insert(object, frame, score)?;
            }
        }
    }

    for matrix in matrices.values() {
        matrix.validate()?;
    }

    Ok(SequenceScores {
        name: name.to_string(),
        objects,
        matrices,
    })
}

fn collapsed(frames: &[VevalMask]) -> Vec<VevalMask> {
    frames
        .iter()
        .map(|frame| {
            let mut frame = frame.clone();
            frame.collapse();
            frame
        })
        .collect()
}

fn single_object(objects: &[u32]) -> Vec<u32> {
    if objects.is_empty() {
        Vec::new()
    } else {
        vec![constant::SINGLE_OBJECT_LABEL]
    }
}

#[cfg(test)]
mod test {

    use super::*;

    const EPSILON: f64 = 1e-12;

    fn square_frame(present: bool, label: u32) -> VevalMask {
        let mut buffer = vec![0u32; 20 * 20];
        if present {
            for y in 5..15 {
                for x in 5..15 {
                    buffer[y * 20 + x] = label;
                }
            }
        }
        VevalMask::new(20, 20, buffer).unwrap()
    }

    #[test]
    fn test_sequence_scores() {
        let sequence = Sequence::new("square", vec![square_frame(true, 1); 3]);
        let segmentation = Segmentation::new(
            "square",
            vec![square_frame(true, 1), square_frame(true, 1), square_frame(false, 1)],
        );

        let config = EvalConfig::with_metrics(&Metric::ALL);
        let scores = evaluate_sequence(&sequence, &segmentation, &config).unwrap();

        let j = scores.get(Metric::J).unwrap().row(1).unwrap();
        assert_eq!(j, &[Some(1.0), Some(1.0), Some(0.0)]);

        let f = scores.get(Metric::F).unwrap().row(1).unwrap();
        assert_eq!(f, &[Some(1.0), Some(1.0), Some(0.0)]);

        let t = scores.get(Metric::T).unwrap();
        assert_eq!(t.n_frames(), 2);
        assert_eq!(t.get(1, 0), Some(0.0));
        assert!(t.get(1, 1).unwrap().is_nan());
    }

    #[test]
    fn test_sequence_missing_object_scores_zero() {
        let sequence = Sequence::new("pair", vec![square_frame(true, 2); 2]);
        let segmentation = Segmentation::new("pair", vec![square_frame(false, 2); 2]);

        let scores = evaluate_sequence(&sequence, &segmentation, &EvalConfig::default()).unwrap();

        for metric in [Metric::J, Metric::F] {
            let row = scores.get(metric).unwrap().row(2).unwrap();
            assert_eq!(row, &[Some(0.0), Some(0.0)]);
        }
    }

    #[test]
    fn test_sequence_frame_count_mismatch() {
        let sequence = Sequence::new("short", vec![square_frame(true, 1); 3]);
        let segmentation = Segmentation::new("short", vec![square_frame(true, 1); 2]);

        let err = evaluate_sequence(&sequence, &segmentation, &EvalConfig::default()).unwrap_err();
        assert_eq!(
            err,
            VevalError::FrameCountMismatch {
                sequence: "short".to_string(),
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn test_sequence_resolution_mismatch() {
        let sequence = Sequence::new("size", vec![square_frame(true, 1); 2]);
        let segmentation = Segmentation::new(
            "size",
            vec![square_frame(true, 1), VevalMask::empty(10, 20)],
        );

        let err = evaluate_sequence(&sequence, &segmentation, &EvalConfig::default()).unwrap_err();
        assert_eq!(
            err,
            VevalError::ResolutionMismatch {
                sequence: "size".to_string(),
                frame: 1,
                expected: (20, 20),
                found: (10, 20),
            }
        );
    }

    #[test]
    fn test_sequence_single_object() {
        // Two instances in the truth are predicted as one merged label
        let mut truth = vec![0u32; 20 * 20];
        let mut prediction = vec![0u32; 20 * 20];
        for y in 0..10 {
            for x in 0..10 {
                truth[y * 20 + x] = if x < 5 { 1 } else { 2 };
                prediction[y * 20 + x] = 7;
            }
        }

        let sequence = Sequence::new("merge", vec![VevalMask::new(20, 20, truth).unwrap()]);
        let segmentation =
            Segmentation::new("merge", vec![VevalMask::new(20, 20, prediction).unwrap()]);

        let mut config = EvalConfig::with_metrics(&[Metric::J]);
        let scores = evaluate_sequence(&sequence, &segmentation, &config).unwrap();
        assert_eq!(scores.objects(), &[1, 2]);
        assert_eq!(scores.get(Metric::J).unwrap().get(1, 0), Some(0.0));

        config.single_object = true;
        let scores = evaluate_sequence(&sequence, &segmentation, &config).unwrap();
        assert_eq!(scores.objects(), &[1]);

        let j = scores.get(Metric::J).unwrap().get(1, 0).unwrap();
        assert!((j - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_sequence_ignores_unknown_predicted_labels() {
        let sequence = Sequence::with_objects("extra", vec![square_frame(true, 1)], vec![1]);
        let mut prediction = square_frame(true, 1).into_raw();
        prediction[0] = 9;
        let segmentation =
            Segmentation::new("extra", vec![VevalMask::new(20, 20, prediction).unwrap()]);

        let scores = evaluate_sequence(&sequence, &segmentation, &EvalConfig::default()).unwrap();
        assert_eq!(scores.objects(), &[1]);
        assert_eq!(scores.get(Metric::J).unwrap().get(1, 0), Some(1.0));
    }
}
