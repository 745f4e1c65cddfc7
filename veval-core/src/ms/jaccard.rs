// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::im::BinaryMask;

/// Region similarity between a ground-truth and a predicted mask
///
/// Intersection over union of the foreground pixels. An object absent from
/// both masks scores 1.
///
/// # Arguments
///
/// * `ground_truth` - Annotated object mask
/// * `prediction` - Predicted object mask of the same resolution
///
/// # Examples
///
/// ```
/// use veval_core::im::BinaryMask;
/// use veval_core::ms::jaccard;
///
/// let truth = BinaryMask::rectangle(10, 10, 0, 0, 4, 4);
/// let prediction = BinaryMask::rectangle(10, 10, 0, 0, 4, 2);
///
/// assert_eq!(jaccard(&truth, &prediction), 0.5);
/// ```
pub fn jaccard(ground_truth: &BinaryMask, prediction: &BinaryMask) -> f64 {
    let (intersection, union) = ground_truth
        .as_raw()
        .iter()
        .zip(prediction.as_raw().iter())
        .fold((0u64, 0u64), |(i, u), (&t, &p)| {
            (i + (t && p) as u64, u + (t || p) as u64)
        });

    if union == 0 {
        return 1.0;
    }

    intersection as f64 / union as f64
}
