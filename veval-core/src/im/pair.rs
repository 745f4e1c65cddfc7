// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::error::VevalError;
use crate::im::{BinaryMask, VevalMask};
use crate::ms::{BoundaryScore, f_measure, jaccard};

/// Ground-truth and predicted masks of one object in one frame
///
/// # Examples
///
/// ```
/// use veval_core::im::{BinaryMask, MaskPair};
///
/// let truth = BinaryMask::rectangle(20, 20, 5, 5, 10, 10);
/// let pair = MaskPair::new(truth.clone(), truth).unwrap();
///
/// assert_eq!(pair.jaccard(), 1.0);
/// assert_eq!(pair.boundary(0.008).f, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct MaskPair {
    ground_truth: BinaryMask,
    prediction: BinaryMask,
}

impl MaskPair {
    pub fn new(ground_truth: BinaryMask, prediction: BinaryMask) -> Result<MaskPair, VevalError> {
        if ground_truth.shape() != prediction.shape() {
            return Err(VevalError::ShapeError {
                expected: ground_truth.shape(),
                found: prediction.shape(),
            });
        }

        Ok(MaskPair {
            ground_truth,
            prediction,
        })
    }

    /// Select one object from a pair of labeled masks
    pub fn from_labels(
        ground_truth: &VevalMask,
        prediction: &VevalMask,
        label: u32,
    ) -> Result<MaskPair, VevalError> {
        Self::new(ground_truth.binary(label), prediction.binary(label))
    }

    pub fn ground_truth(&self) -> &BinaryMask {
        &self.ground_truth
    }

    pub fn prediction(&self) -> &BinaryMask {
        &self.prediction
    }

    /// Region similarity of the pair
    pub fn jaccard(&self) -> f64 {
        jaccard(&self.ground_truth, &self.prediction)
    }

    /// Boundary precision, recall and F-measure of the pair
    pub fn boundary(&self, threshold: f64) -> BoundaryScore {
        f_measure(&self.ground_truth, &self.prediction, threshold)
    }
}
