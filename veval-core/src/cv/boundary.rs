// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::VecDeque;

use crate::im::BinaryMask;

/// Boundary pixels of a binary mask
///
/// A foreground pixel lies on the boundary if at least one of its
/// 4-connected neighbours is background or falls outside the frame.
///
/// # Examples
///
/// ```
/// use veval_core::cv::boundary_map;
/// use veval_core::im::BinaryMask;
///
/// let mask = BinaryMask::rectangle(5, 5, 1, 1, 3, 3);
/// let boundary = boundary_map(&mask);
///
/// assert_eq!(boundary.iter().filter(|&&b| b).count(), 8);
/// assert!(!boundary[2 * 5 + 2]); // Interior pixel
/// ```
pub fn boundary_map(mask: &BinaryMask) -> Vec<bool> {
    let width = mask.width();
    let height = mask.height();

    let mut boundary = vec![false; (width as usize) * (height as usize)];

    for y in 0..height {
        for x in 0..width {
            if !mask.get(x, y) {
                continue;
            }

            let on_edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;

            boundary[(y as usize) * (width as usize) + x as usize] = on_edge
                || !mask.get(x - 1, y)
                || !mask.get(x + 1, y)
                || !mask.get(x, y - 1)
                || !mask.get(x, y + 1);
        }
    }

    boundary
}

/// Matching tolerance in pixels for a frame of the given size
///
/// Thresholds below 1 are a fraction of the image diagonal and are rounded
/// up. Thresholds of 1 or more are an absolute radius in pixels. The radius
/// never exceeds the rounded-up diagonal, which already reaches every pixel.
///
/// # Examples
///
/// ```
/// use veval_core::cv::boundary_radius;
///
/// assert_eq!(boundary_radius(0.008, 854, 480), 8);
/// assert_eq!(boundary_radius(3.0, 854, 480), 3);
/// assert_eq!(boundary_radius(0.0, 854, 480), 0);
/// assert_eq!(boundary_radius(50000.0, 854, 480), 980);
/// ```
pub fn boundary_radius(threshold: f64, width: u32, height: u32) -> u32 {
    let diagonal = ((width as f64).powi(2) + (height as f64).powi(2)).sqrt();

    let radius = if threshold >= 1.0 {
        threshold.round()
    } else {
        (threshold * diagonal).ceil()
    };

    radius.min(diagonal.ceil()) as u32
}

/// Pixel offsets `(dx, dy)` within Euclidean distance `radius` of the origin
///
/// Offsets are ordered by distance and then by raster order (row, column).
///
/// # Examples
///
/// ```
/// use veval_core::cv::disk_offsets;
///
/// assert_eq!(disk_offsets(1), vec![(0, 0), (0, -1), (-1, 0), (1, 0), (0, 1)]);
/// ```
pub fn disk_offsets(radius: u32) -> Vec<(i64, i64)> {
    let r = radius as i64;
    let r2 = r * r;

    let mut offsets: Vec<(i64, i64)> = (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(|(dx, dy)| dx * dx + dy * dy <= r2)
        .collect();

    offsets.sort_by_key(|&(dx, dy)| (dx * dx + dy * dy, dy, dx));
    offsets
}

/// Result of a one-to-one assignment between two boundary maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryMatch {
    pub matched: usize,
    pub n_truth: usize,
    pub n_prediction: usize,
}

/// Maximum one-to-one matching of predicted to ground-truth boundary pixels
///
/// A predicted and a ground-truth boundary pixel may be paired when they lie
/// within Euclidean distance `radius` of each other. The number of pairs is
/// maximized with Hopcroft-Karp, so the count is the same for every valid
/// assignment and does not depend on visiting order.
///
/// # Arguments
///
/// * `truth` - Row-major ground-truth boundary map
/// * `prediction` - Row-major predicted boundary map
/// * `width` - Width of both maps
/// * `height` - Height of both maps
/// * `radius` - Maximum matching distance in pixels
///
/// # Examples
///
/// ```
/// use veval_core::cv::match_boundaries;
///
/// // Pairing the middle predicted pixel with the left truth pixel first
/// // would leave the right predicted pixel without a partner
/// let truth = [true, true, false];
/// let prediction = [false, true, true];
///
/// assert_eq!(match_boundaries(&truth, &prediction, 3, 1, 1).matched, 2);
/// ```
pub fn match_boundaries(
    truth: &[bool],
    prediction: &[bool],
    width: u32,
    height: u32,
    radius: u32,
) -> BoundaryMatch {
    let truth_pixels = foreground_indices(truth);
    let prediction_pixels = foreground_indices(prediction);

    let adjacency = candidates(&truth_pixels, &prediction_pixels, width, height, radius);

    BoundaryMatch {
        matched: maximum_matching(&adjacency, truth_pixels.len()),
        n_truth: truth_pixels.len(),
        n_prediction: prediction_pixels.len(),
    }
}

fn foreground_indices(map: &[bool]) -> Vec<usize> {
    map.iter()
        .enumerate()
        .filter_map(|(idx, &b)| b.then_some(idx))
        .collect()
}

/// Ground-truth nodes within `radius` of each predicted pixel
///
/// Neighbours are found by walking the disk around each predicted pixel, or
/// by scanning the ground-truth pixels when there are fewer of them than
/// pixels in the square window enclosing the disk.
fn candidates(
    truth_pixels: &[usize],
    prediction_pixels: &[usize],
    width: u32,
    height: u32,
    radius: u32,
) -> Vec<Vec<u32>> {
    let w = width as i64;
    let h = height as i64;
    let r2 = (radius as i64).pow(2);

    let position = |idx: usize| ((idx as i64) % w, (idx as i64) / w);

    let window = (2 * radius as usize + 1).pow(2);

    if window > truth_pixels.len() {
        return prediction_pixels
            .iter()
            .map(|&p| {
                let (x, y) = position(p);
                truth_pixels
                    .iter()
                    .enumerate()
                    .filter(|&(_, &t)| {
                        let (tx, ty) = position(t);
                        (tx - x).pow(2) + (ty - y).pow(2) <= r2
                    })
                    .map(|(node, _)| node as u32)
                    .collect()
            })
            .collect();
    }

    let offsets = disk_offsets(radius);

    let mut node = vec![u32::MAX; (w * h) as usize];
    for (i, &t) in truth_pixels.iter().enumerate() {
        node[t] = i as u32;
    }

    prediction_pixels
        .iter()
        .map(|&p| {
            let (x, y) = position(p);
            offsets
                .iter()
                .filter_map(|&(dx, dy)| {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        return None;
                    }
                    let n = node[(ny * w + nx) as usize];
                    (n != u32::MAX).then_some(n)
                })
                .collect()
        })
        .collect()
}

const FREE: u32 = u32::MAX;
const UNREACHED: u32 = u32::MAX;

/// Size of a maximum matching in a bipartite graph (Hopcroft-Karp)
///
/// `adjacency[u]` lists the right nodes connected to left node `u`.
fn maximum_matching(adjacency: &[Vec<u32>], n_right: usize) -> usize {
    let n_left = adjacency.len();

    let mut match_left = vec![FREE; n_left];
    let mut match_right = vec![FREE; n_right];
    let mut layer = vec![UNREACHED; n_left];
    let mut next_edge = vec![0usize; n_left];
    let mut matched = 0;

    loop {
        let mut queue = VecDeque::new();
        for u in 0..n_left {
            if match_left[u] == FREE {
                layer[u] = 0;
                queue.push_back(u);
            } else {
                layer[u] = UNREACHED;
            }
        }

        let mut reachable = false;
        while let Some(u) = queue.pop_front() {
            for &v in adjacency[u].iter() {
                let w = match_right[v as usize];
                if w == FREE {
                    reachable = true;
                } else if layer[w as usize] == UNREACHED {
                    layer[w as usize] = layer[u] + 1;
                    queue.push_back(w as usize);
                }
            }
        }

        if !reachable {
            break;
        }

        next_edge.iter_mut().for_each(|e| *e = 0);

        for root in 0..n_left {
            if match_left[root] == FREE
                && augment(
                    root,
                    adjacency,
                    &mut layer,
                    &mut next_edge,
                    &mut match_left,
                    &mut match_right,
                )
            {
                matched += 1;
            }
        }
    }

    matched
}

/// Search the layered graph from `root` for an augmenting path and flip it
fn augment(
    root: usize,
    adjacency: &[Vec<u32>],
    layer: &mut [u32],
    next_edge: &mut [usize],
    match_left: &mut [u32],
    match_right: &mut [u32],
) -> bool {
    let mut stack = vec![root];

    while let Some(&u) = stack.last() {
        if next_edge[u] == adjacency[u].len() {
            layer[u] = UNREACHED;
            stack.pop();
            continue;
        }

        let v = adjacency[u][next_edge[u]];
        next_edge[u] += 1;

        let w = match_right[v as usize];
        if w == FREE {
            // Each node on the stack takes the edge it last advanced over
            for &x in stack.iter() {
                let vx = adjacency[x][next_edge[x] - 1];
                match_left[x] = vx;
                match_right[vx as usize] = x as u32;
            }
            return true;
        }

        if layer[u] != UNREACHED && layer[w as usize] == layer[u] + 1 {
            stack.push(w as usize);
        }
    }

    false
}
