// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::f64::consts::PI;

use crate::cv::points::distance;

/// Log-polar histogram settings for shape context descriptors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeContext {
    pub radial_bins: usize,
    pub angular_bins: usize,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Default for ShapeContext {
    fn default() -> Self {
        use crate::constant::*;

        ShapeContext {
            radial_bins: SHAPE_CONTEXT_RADIAL_BINS,
            angular_bins: SHAPE_CONTEXT_ANGULAR_BINS,
            inner_radius: SHAPE_CONTEXT_INNER_RADIUS,
            outer_radius: SHAPE_CONTEXT_OUTER_RADIUS,
        }
    }
}

impl ShapeContext {
    /// Length of each descriptor
    pub fn n_bins(&self) -> usize {
        self.radial_bins * self.angular_bins
    }

    /// Compute one normalized log-polar histogram per point
    ///
    /// Distances are scaled by the mean pairwise distance so descriptors
    /// are invariant to the size of the shape. Points falling outside the
    /// `[inner_radius, outer_radius)` annulus are not counted.
    ///
    /// # Examples
    ///
    /// ```
    /// use veval_core::cv::ShapeContext;
    ///
    /// let square = [[0., 0.], [0., 1.], [1., 1.], [1., 0.]];
    /// let descriptors = ShapeContext::default().descriptors(&square);
    ///
    /// assert_eq!(descriptors.len(), 4);
    /// for d in descriptors.iter() {
    ///     assert!((d.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    /// }
    /// ```
    pub fn descriptors(&self, points: &[[f64; 2]]) -> Vec<Vec<f64>> {
        let n = points.len();
        let n_bins = self.n_bins();

        let mut descriptors = vec![vec![0.0; n_bins]; n];
        if n < 2 || n_bins == 0 {
            return descriptors;
        }

        let mut distances = vec![0.0; n * n];
        let mut total = 0.0;
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    distances[i * n + j] = distance(points[i], points[j]);
                    total += distances[i * n + j];
                }
            }
        }

        let mean_distance = total / (n * (n - 1)) as f64;
        if mean_distance == 0.0 {
            return descriptors;
        }

        let edges: Vec<f64> = (0..=self.radial_bins)
            .map(|k| {
                let fraction = k as f64 / self.radial_bins as f64;
                self.inner_radius * (self.outer_radius / self.inner_radius).powf(fraction)
            })
            .collect();

        let angular_width = 2.0 * PI / self.angular_bins as f64;

        for (i, descriptor) in descriptors.iter_mut().enumerate() {
            for j in 0..n {
                if i == j {
                    continue;
                }

                let r = distances[i * n + j] / mean_distance;
                if r < edges[0] || r >= edges[self.radial_bins] {
                    continue;
                }

                let radial = edges[1..]
                    .iter()
                    .position(|&edge| r < edge)
                    .unwrap_or(self.radial_bins - 1);

                let theta = (points[j][1] - points[i][1])
                    .atan2(points[j][0] - points[i][0])
                    .rem_euclid(2.0 * PI);
                let angular = ((theta / angular_width) as usize).min(self.angular_bins - 1);

                descriptor[radial * self.angular_bins + angular] += 1.0;
            }

            let count: f64 = descriptor.iter().sum();
            if count > 0.0 {
                descriptor.iter_mut().for_each(|v| *v /= count);
            }
        }

        descriptors
    }
}

/// Chi-square distance between two normalized histograms
///
/// # Examples
///
/// ```
/// use veval_core::cv::chi_square;
///
/// assert_eq!(chi_square(&[0.5, 0.5], &[0.5, 0.5]), 0.0);
/// assert_eq!(chi_square(&[1.0, 0.0], &[0.0, 1.0]), 1.0);
/// ```
pub fn chi_square(a: &[f64], b: &[f64]) -> f64 {
    0.5 * a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| *x + *y > 0.0)
        .map(|(x, y)| (x - y).powi(2) / (x + y))
        .sum::<f64>()
}

/// Accumulated cost of the cheapest monotone alignment (dynamic time warping)
///
/// # Arguments
///
/// * `cost` - Row-major `rows` x `cols` matrix of pairwise costs
/// * `rows` - Number of elements in the first sequence
/// * `cols` - Number of elements in the second sequence
///
/// # Examples
///
/// ```
/// use veval_core::cv::dynamic_time_warping;
///
/// let cost = [0.0, 1.0, 1.0, 0.0];
/// assert_eq!(dynamic_time_warping(&cost, 2, 2), 0.0);
///
/// let cost = [1.0, 5.0, 5.0, 1.0];
/// assert_eq!(dynamic_time_warping(&cost, 2, 2), 2.0);
/// ```
pub fn dynamic_time_warping(cost: &[f64], rows: usize, cols: usize) -> f64 {
    if rows == 0 || cols == 0 {
        return 0.0;
    }

    let mut accumulated = vec![f64::INFINITY; rows * cols];

    for i in 0..rows {
        for j in 0..cols {
            let best_previous = if i == 0 && j == 0 {
                0.0
            } else {
                let up = if i > 0 { accumulated[(i - 1) * cols + j] } else { f64::INFINITY };
                let left = if j > 0 { accumulated[i * cols + j - 1] } else { f64::INFINITY };
                let diagonal = if i > 0 && j > 0 {
                    accumulated[(i - 1) * cols + j - 1]
                } else {
                    f64::INFINITY
                };
                diagonal.min(up).min(left)
            };

            accumulated[i * cols + j] = cost[i * cols + j] + best_previous;
        }
    }

    accumulated[rows * cols - 1]
}

#[cfg(test)]
mod test {

    use super::*;

    fn circle(n: usize, radius: f64, cx: f64, cy: f64) -> Vec<[f64; 2]> {
        (0..n)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / n as f64;
                [cx + radius * t.cos(), cy + radius * t.sin()]
            })
            .collect()
    }

    #[test]
    fn test_descriptors_scale_invariant() {
        let sc = ShapeContext::default();
        let a = sc.descriptors(&circle(32, 5.0, 0.0, 0.0));
        let b = sc.descriptors(&circle(32, 20.0, 0.0, 0.0));

        for (da, db) in a.iter().zip(b.iter()) {
            assert!(chi_square(da, db) < 1e-12);
        }
    }

    #[test]
    fn test_descriptors_translation_invariant() {
        let sc = ShapeContext::default();
        let shape = [[0., 0.], [0., 4.], [1., 6.], [5., 5.], [6., 1.], [3., -1.]];
        let moved: Vec<[f64; 2]> = shape.iter().map(|p| [p[0] + 17.0, p[1] - 3.0]).collect();

        assert_eq!(sc.descriptors(&shape), sc.descriptors(&moved));
    }

    #[test]
    fn test_descriptors_degenerate() {
        let sc = ShapeContext::default();

        let same = sc.descriptors(&[[1., 1.], [1., 1.], [1., 1.]]);
        assert!(same.iter().all(|d| d.iter().all(|&v| v == 0.0)));

        let single = sc.descriptors(&[[1., 1.]]);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].len(), sc.n_bins());
    }

    #[test]
    fn test_chi_square_bounds() {
        let a = [0.25, 0.25, 0.5, 0.0];
        let b = [0.0, 0.5, 0.25, 0.25];

        let d = chi_square(&a, &b);
        assert!(d > 0.0 && d <= 1.0);
        assert!((d - chi_square(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn test_dynamic_time_warping_shift() {
        // The second sequence repeats the first element, warping absorbs it
        let x: [f64; 3] = [0.0, 1.0, 2.0];
        let y: [f64; 4] = [0.0, 0.0, 1.0, 2.0];

        let cost: Vec<f64> = x
            .iter()
            .flat_map(|a| y.iter().map(move |b| (*a - *b).abs()))
            .collect();

        assert_eq!(dynamic_time_warping(&cost, 3, 4), 0.0);
    }
}
