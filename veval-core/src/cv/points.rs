// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

/// Number of distinct (x, y) points
///
/// # Examples
///
/// ```
/// use veval_core::cv::points::count_distinct;
///
/// let points = [[0., 1.], [1., 1.], [1., 1.], [1., 0.], [0., 1.]];
/// assert_eq!(count_distinct(&points), 3);
/// ```
pub fn count_distinct(points: &[[f64; 2]]) -> usize {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    sorted.dedup();
    sorted.len()
}

/// Perimeter of a closed polygon
///
/// # Examples
///
/// ```
/// use veval_core::cv::points::closed_perimeter;
///
/// let square = [[0., 0.], [0., 1.], [1., 1.], [1., 0.]];
/// assert_eq!(closed_perimeter(&square), 4.0);
/// ```
pub fn closed_perimeter(points: &[[f64; 2]]) -> f64 {
    let n = points.len();

    (0..n)
        .map(|i| distance(points[i], points[(i + 1) % n]))
        .sum()
}

/// Resample a closed polygon to `n_points` points spaced equally along its perimeter
///
/// The first resampled point coincides with the first input point and the
/// closing segment back to it is part of the path.
///
/// # Examples
///
/// ```
/// use veval_core::cv::points::resample_closed;
///
/// let square = [[0., 0.], [0., 2.], [2., 2.], [2., 0.]];
/// let resampled = resample_closed(&square, 8);
///
/// assert_eq!(resampled[0], [0., 0.]);
/// assert_eq!(resampled[1], [0., 1.]);
/// assert_eq!(resampled[4], [2., 2.]);
/// assert_eq!(resampled[7], [1., 0.]);
/// ```
pub fn resample_closed(points: &[[f64; 2]], n_points: usize) -> Vec<[f64; 2]> {
    if points.is_empty() || n_points == 0 {
        return Vec::new();
    }

    let total_length = closed_perimeter(points);
    if total_length == 0.0 {
        return vec![points[0]; n_points];
    }

    let n = points.len();
    let step = total_length / n_points as f64;

    let mut resampled = Vec::with_capacity(n_points);
    let mut segment = 0;
    let mut segment_start = 0.0;

    for k in 0..n_points {
        let target = k as f64 * step;

        let mut segment_length = distance(points[segment], points[(segment + 1) % n]);
        while segment + 1 < n && target > segment_start + segment_length {
            segment_start += segment_length;
            segment += 1;
            segment_length = distance(points[segment], points[(segment + 1) % n]);
        }

        let p1 = points[segment];
        let p2 = points[(segment + 1) % n];

        let t = if segment_length == 0.0 {
            0.0
        } else {
            ((target - segment_start) / segment_length).clamp(0.0, 1.0)
        };

        resampled.push([p1[0] + t * (p2[0] - p1[0]), p1[1] + t * (p2[1] - p1[1])]);
    }

    resampled
}

#[inline]
pub fn distance(p1: [f64; 2], p2: [f64; 2]) -> f64 {
    ((p2[0] - p1[0]).powi(2) + (p2[1] - p1[1]).powi(2)).sqrt()
}
