// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use serde::{Deserialize, Serialize};

use crate::cv::{boundary_map, boundary_radius, match_boundaries};
use crate::im::BinaryMask;

/// Boundary precision, recall and their harmonic mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryScore {
    pub precision: f64,
    pub recall: f64,
    pub f: f64,
}

impl BoundaryScore {
    fn new(precision: f64, recall: f64) -> Self {
        let f = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        BoundaryScore {
            precision,
            recall,
            f,
        }
    }
}

/// Boundary accuracy between a ground-truth and a predicted mask
///
/// Boundary pixels of the prediction are matched one-to-one to boundary
/// pixels of the ground truth lying within the tolerance radius derived from
/// `threshold` (see [`boundary_radius`]). Precision is the matched fraction
/// of predicted boundary pixels and recall the matched fraction of
/// ground-truth boundary pixels.
///
/// # Arguments
///
/// * `ground_truth` - Annotated object mask
/// * `prediction` - Predicted object mask of the same resolution
/// * `threshold` - Fraction of the image diagonal (< 1) or a radius in pixels
///
/// # Examples
///
/// ```
/// use veval_core::im::BinaryMask;
/// use veval_core::ms::f_measure;
///
/// let truth = BinaryMask::rectangle(50, 50, 10, 10, 20, 20);
/// let shifted = BinaryMask::rectangle(50, 50, 11, 10, 20, 20);
///
/// assert_eq!(f_measure(&truth, &shifted, 0.0).f, 0.5);
/// assert_eq!(f_measure(&truth, &shifted, 1.0).f, 1.0);
/// ```
pub fn f_measure(ground_truth: &BinaryMask, prediction: &BinaryMask, threshold: f64) -> BoundaryScore {
    let (width, height) = ground_truth.shape();

    let truth_boundary = boundary_map(ground_truth);
    let prediction_boundary = boundary_map(prediction);

    let radius = boundary_radius(threshold, width, height);
    let result = match_boundaries(&truth_boundary, &prediction_boundary, width, height, radius);

    match (result.n_truth, result.n_prediction) {
        (0, 0) => BoundaryScore::new(1.0, 1.0),
        (_, 0) => BoundaryScore::new(1.0, 0.0),
        (0, _) => BoundaryScore::new(0.0, 1.0),
        (n_truth, n_prediction) => BoundaryScore::new(
            result.matched as f64 / n_prediction as f64,
            result.matched as f64 / n_truth as f64,
        ),
    }
}

#[cfg(test)]
mod test {

    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_f_measure_identical() {
        let mask = BinaryMask::rectangle(30, 30, 5, 5, 12, 9);
        let score = f_measure(&mask, &mask, 0.0);

        assert_eq!(score.precision, 1.0);
        assert_eq!(score.recall, 1.0);
        assert_eq!(score.f, 1.0);
    }

    #[test]
    fn test_f_measure_absent() {
        let empty = BinaryMask::rectangle(30, 30, 0, 0, 0, 0);
        let object = BinaryMask::rectangle(30, 30, 5, 5, 4, 4);

        assert_eq!(f_measure(&empty, &empty, 0.008), BoundaryScore::new(1.0, 1.0));

        let missed = f_measure(&object, &empty, 0.008);
        assert_eq!((missed.precision, missed.recall, missed.f), (1.0, 0.0, 0.0));

        let spurious = f_measure(&empty, &object, 0.008);
        assert_eq!((spurious.precision, spurious.recall, spurious.f), (0.0, 1.0, 0.0));
    }

    #[test]
    fn test_f_measure_precision_recall_swap() {
        // A 4x4 prediction in the corner of a 10x10 ground truth shares 7 of
        // its 12 boundary pixels with the 36 boundary pixels of the truth
        let truth = BinaryMask::rectangle(20, 20, 0, 0, 10, 10);
        let prediction = BinaryMask::rectangle(20, 20, 0, 0, 4, 4);

        let forward = f_measure(&truth, &prediction, 0.0);
        let backward = f_measure(&prediction, &truth, 0.0);

        assert!((forward.precision - 7.0 / 12.0).abs() < EPSILON);
        assert!((forward.recall - 7.0 / 36.0).abs() < EPSILON);

        assert!((backward.precision - forward.recall).abs() < EPSILON);
        assert!((backward.recall - forward.precision).abs() < EPSILON);
        assert!(forward.precision != backward.precision);
    }

    #[test]
    fn test_f_measure_tolerance() {
        let truth = BinaryMask::rectangle(40, 40, 10, 10, 10, 10);
        let prediction = BinaryMask::rectangle(40, 40, 12, 10, 10, 10);

        // Every boundary pixel finds a partner once the radius covers the shift
        assert!((f_measure(&truth, &prediction, 0.0).f - 16.0 / 36.0).abs() < EPSILON);
        assert!((f_measure(&truth, &prediction, 1.0).f - 20.0 / 36.0).abs() < EPSILON);
        assert_eq!(f_measure(&truth, &prediction, 2.0).f, 1.0);
        assert_eq!(f_measure(&truth, &prediction, 3.0).f, 1.0);
    }

    #[test]
    fn test_f_measure_huge_threshold() {
        let truth = BinaryMask::rectangle(40, 40, 2, 2, 6, 6);
        let prediction = BinaryMask::rectangle(40, 40, 30, 30, 6, 6);

        // The tolerance saturates at the frame diagonal
        let score = f_measure(&truth, &prediction, 50000.0);
        assert_eq!(score, f_measure(&truth, &prediction, 57.0));
        assert_eq!(score.f, 1.0);
    }
}
