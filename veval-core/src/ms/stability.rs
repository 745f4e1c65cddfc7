// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::cv::points::{count_distinct, resample_closed};
use crate::cv::{ShapeContext, chi_square, dynamic_time_warping, largest_contour};
use crate::im::BinaryMask;

/// Shape deformation of a predicted object between two consecutive frames
///
/// The largest outer contour of each mask is resampled to `contour_points`
/// equidistant points and described with log-polar shape context
/// histograms. The two descriptor sequences are aligned with dynamic time
/// warping over their chi-square costs and the aligned cost is divided by
/// the number of points. Lower values indicate a more stable shape.
///
/// Returns `NaN` when the object is absent from either frame or when either
/// contour has fewer than three distinct points.
///
/// # Arguments
///
/// * `previous` - Predicted object mask at frame `t`
/// * `next` - Predicted object mask at frame `t + 1`
/// * `contour_points` - Number of points each contour is resampled to
///
/// # Examples
///
/// ```
/// use veval_core::im::BinaryMask;
/// use veval_core::ms::temporal_stability;
///
/// let mask = BinaryMask::rectangle(32, 32, 8, 8, 12, 12);
/// let empty = BinaryMask::rectangle(32, 32, 0, 0, 0, 0);
///
/// assert_eq!(temporal_stability(&mask, &mask, 64), 0.0);
/// assert!(temporal_stability(&mask, &empty, 64).is_nan());
/// ```
pub fn temporal_stability(previous: &BinaryMask, next: &BinaryMask, contour_points: usize) -> f64 {
    let (Some(a), Some(b)) = (shape_points(previous), shape_points(next)) else {
        return f64::NAN;
    };

    let a = resample_closed(&a, contour_points);
    let b = resample_closed(&b, contour_points);

    let shape_context = ShapeContext::default();
    let descriptors_a = shape_context.descriptors(&a);
    let descriptors_b = shape_context.descriptors(&b);

    let cost: Vec<f64> = descriptors_a
        .iter()
        .flat_map(|da| descriptors_b.iter().map(move |db| chi_square(da, db)))
        .collect();

    dynamic_time_warping(&cost, a.len(), b.len()) / contour_points as f64
}

/// Largest outer contour of an object, if it is well defined
fn shape_points(mask: &BinaryMask) -> Option<Vec<[f64; 2]>> {
    if mask.is_empty() {
        return None;
    }

    largest_contour(mask).filter(|contour| count_distinct(contour) >= 3)
}

#[cfg(test)]
mod test {

    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_stability_identical() {
        let mut buffer = BinaryMask::rectangle(40, 40, 5, 5, 20, 12).as_raw().clone();
        for y in 17..30 {
            for x in 5..12 {
                buffer[y * 40 + x] = true;
            }
        }
        let mask = BinaryMask::new(40, 40, buffer).unwrap();

        assert_eq!(temporal_stability(&mask, &mask, 64), 0.0);
        assert_eq!(temporal_stability(&mask, &mask, 16), 0.0);
    }

    #[test]
    fn test_stability_deformation() {
        let square = BinaryMask::rectangle(64, 64, 10, 10, 20, 20);
        let bar = BinaryMask::rectangle(64, 64, 10, 10, 40, 4);

        let t = temporal_stability(&square, &bar, 64);
        assert!(t.is_finite());
        assert!(t > 0.0);

        let reverse = temporal_stability(&bar, &square, 64);
        assert!((t - reverse).abs() < EPSILON);
    }

    #[test]
    fn test_stability_absent() {
        let empty = BinaryMask::rectangle(20, 20, 0, 0, 0, 0);
        let mask = BinaryMask::rectangle(20, 20, 5, 5, 5, 5);

        assert!(temporal_stability(&empty, &mask, 64).is_nan());
        assert!(temporal_stability(&mask, &empty, 64).is_nan());
        assert!(temporal_stability(&empty, &empty, 64).is_nan());
    }

    #[test]
    fn test_stability_degenerate_contour() {
        let mask = BinaryMask::rectangle(20, 20, 5, 5, 5, 5);
        let pixel = BinaryMask::rectangle(20, 20, 2, 2, 1, 1);
        let pair = BinaryMask::rectangle(20, 20, 2, 2, 2, 1);

        assert!(temporal_stability(&mask, &pixel, 64).is_nan());
        assert!(temporal_stability(&pair, &mask, 64).is_nan());
    }
}
