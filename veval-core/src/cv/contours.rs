// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::VecDeque;

use crate::im::BinaryMask;

/// Find the outer contours of a binary mask using 8-connectivity
///
/// Each contour is the ordered sequence of border pixels of one connected
/// foreground region, starting from its first pixel in raster order.
///
/// # References
///
/// Adapted/modified from: https://github.com/image-rs/imageproc
///
/// # Examples
///
/// ```
/// use veval_core::cv::find_contours;
/// use veval_core::im::BinaryMask;
///
/// let mask = BinaryMask::new(3, 3, vec![true, true, false, true, true, false, false, false, false]).unwrap();
/// let contours = find_contours(&mask);
///
/// assert_eq!(contours, [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]])
/// ```
pub fn find_contours(mask: &BinaryMask) -> Vec<Vec<[f64; 2]>> {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let padded_width = width + 2;
    let padded_height = height + 2;

    let at = |x: usize, y: usize| x + padded_width * y;

    let mut image_values = vec![0i32; padded_height * padded_width];

    for y in 0..height {
        for x in 0..width {
            if mask.get(x as u32, y as u32) {
                image_values[at(x + 1, y + 1)] = 1;
            }
        }
    }

    let mut diffs = VecDeque::from(vec![
        [-1, 0],  // West
        [-1, -1], // Northwest
        [0, -1],  // North
        [1, -1],  // Northeast
        [1, 0],   // East
        [1, 1],   // Southeast
        [0, 1],   // South
        [-1, 1],  // Southwest
    ]);

    let is_foreground = |values: &[i32], nx: i32, ny: i32| {
        nx >= 0
            && nx < padded_width as i32
            && ny >= 0
            && ny < padded_height as i32
            && values[at(nx as usize, ny as usize)] != 0
    };

    let mut contours: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut curr_border_num = 1;

    for y in 1..=height {
        for x in 1..=width {
            if image_values[at(x, y)] == 0 {
                continue;
            }

            let curr = (x as i32, y as i32);

            // Hole borders are traced only to label their pixels, which keeps
            // the pixels right of a hole from starting a new outer border
            let (is_outer, adjacent_point) =
                if image_values[at(x, y)] == 1 && image_values[at(x - 1, y)] == 0 {
                    (true, (x as i32 - 1, y as i32))
                } else if image_values[at(x, y)] > 0 && image_values[at(x + 1, y)] == 0 {
                    (false, (x as i32 + 1, y as i32))
                } else {
                    continue;
                };

            curr_border_num += 1;

            let mut contour_points: Vec<[f64; 2]> = Vec::new();
            rotate_to_value(
                &mut diffs,
                [adjacent_point.0 - curr.0, adjacent_point.1 - curr.1],
            );

            let pos1_option = diffs.iter().find_map(|&diff| {
                let (nx, ny) = (curr.0 + diff[0], curr.1 + diff[1]);
                is_foreground(&image_values[..], nx, ny).then_some((nx, ny))
            });

            if let Some(pos1) = pos1_option {
                let mut pos2 = pos1;
                let mut pos3 = curr;

                loop {
                    contour_points.push([pos3.0 as f64 - 1.0, pos3.1 as f64 - 1.0]);
                    rotate_to_value(&mut diffs, [pos2.0 - pos3.0, pos2.1 - pos3.1]);

                    let Some(pos4) = diffs.iter().rev().find_map(|&diff| {
                        let (nx, ny) = (pos3.0 + diff[0], pos3.1 + diff[1]);
                        is_foreground(&image_values[..], nx, ny).then_some((nx, ny))
                    }) else {
                        break;
                    };

                    let mut is_right_edge = false;
                    for &diff in diffs.iter().rev() {
                        if diff == [pos4.0 - pos3.0, pos4.1 - pos3.1] {
                            break;
                        }
                        if diff == [1, 0] {
                            is_right_edge = true;
                            break;
                        }
                    }

                    if pos3.0 as usize + 1 == padded_width || is_right_edge {
                        image_values[at(pos3.0 as usize, pos3.1 as usize)] = -curr_border_num;
                    } else if image_values[at(pos3.0 as usize, pos3.1 as usize)] == 1 {
                        image_values[at(pos3.0 as usize, pos3.1 as usize)] = curr_border_num;
                    }

                    if pos4 == curr && pos3 == pos1 {
                        break;
                    }

                    pos2 = pos3;
                    pos3 = pos4;
                }
            } else {
                contour_points.push([x as f64 - 1.0, y as f64 - 1.0]);
                image_values[at(x, y)] = -curr_border_num;
            }

            if is_outer {
                contours.push(contour_points);
            }
        }
    }

    contours
}

/// The longest outer contour of a binary mask, if it has any foreground
///
/// # Examples
///
/// ```
/// use veval_core::cv::largest_contour;
/// use veval_core::im::BinaryMask;
///
/// let mask = BinaryMask::rectangle(10, 10, 0, 0, 2, 2);
/// assert_eq!(largest_contour(&mask).unwrap().len(), 4);
///
/// let empty = BinaryMask::rectangle(10, 10, 0, 0, 0, 0);
/// assert!(largest_contour(&empty).is_none());
/// ```
pub fn largest_contour(mask: &BinaryMask) -> Option<Vec<[f64; 2]>> {
    find_contours(mask)
        .into_iter()
        .rev()
        .max_by_key(|contour| contour.len())
}

fn rotate_to_value(values: &mut VecDeque<[i32; 2]>, value: [i32; 2]) {
    if let Some(pos) = values.iter().position(|&v| v == value) {
        values.rotate_left(pos);
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn from_indices(width: u32, height: u32, indices: &[usize]) -> BinaryMask {
        let mut buffer = vec![false; (width * height) as usize];
        for &i in indices {
            buffer[i] = true;
        }
        BinaryMask::new(width, height, buffer).unwrap()
    }

    #[test]
    fn test_four_regions_small() {
        let mask = from_indices(3, 3, &[0, 2, 6, 8]);
        let contours = find_contours(&mask);

        assert_eq!(contours.len(), 4);
        assert_eq!(contours[0], vec![[0., 0.]]);
        assert_eq!(contours[1], vec![[2., 0.]]);
        assert_eq!(contours[2], vec![[0., 2.]]);
        assert_eq!(contours[3], vec![[2., 2.]]);
    }

    #[test]
    fn test_three_regions() {
        let mask = from_indices(3, 3, &[0, 2, 6, 7, 8]);
        let contours = find_contours(&mask);

        assert_eq!(contours.len(), 3);
        assert_eq!(contours[2], vec![[0., 2.], [1., 2.], [2., 2.], [1., 2.]]);
    }

    #[test]
    fn test_two_squares() {
        let mut indices = Vec::new();
        for j in 0..10 {
            for i in 0..10 {
                if (i < 4 && j < 4) || (i >= 6 && j >= 6) {
                    indices.push(j * 10 + i);
                }
            }
        }

        let contours = find_contours(&from_indices(10, 10, &indices));
        assert_eq!(contours.len(), 2);

        assert_eq!(
            contours[0],
            vec![
                [0., 0.],
                [0., 1.],
                [0., 2.],
                [0., 3.],
                [1., 3.],
                [2., 3.],
                [3., 3.],
                [3., 2.],
                [3., 1.],
                [3., 0.],
                [2., 0.],
                [1., 0.],
            ]
        );

        assert_eq!(contours[1][0], [6., 6.]);
        assert_eq!(contours[1].len(), 12);
    }

    #[test]
    fn test_ring_keeps_outer_border() {
        // A 5x5 square with a 1 pixel hole only reports its outer border
        let mut mask = BinaryMask::rectangle(7, 7, 1, 1, 5, 5).as_raw().clone();
        mask[3 * 7 + 3] = false;
        let mask = BinaryMask::new(7, 7, mask).unwrap();

        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 16);
    }

    #[test]
    fn test_ring_with_wide_hole() {
        // The 3x2 hole leaves pixels right of it that are not on the outer
        // border and must not start contours of their own
        let mut mask = BinaryMask::rectangle(9, 8, 1, 1, 7, 6).as_raw().clone();
        for y in 3..5 {
            for x in 3..6 {
                mask[y * 9 + x] = false;
            }
        }
        let mask = BinaryMask::new(9, 8, mask).unwrap();

        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 22);
        assert_eq!(contours[0][0], [1., 1.]);
    }

    #[test]
    fn test_region_inside_hole() {
        // A pixel enclosed by a ring is an outer border of its own
        let mut mask = BinaryMask::rectangle(7, 7, 0, 0, 7, 7).as_raw().clone();
        for y in 2..5 {
            for x in 2..5 {
                mask[y * 7 + x] = x == 3 && y == 3;
            }
        }
        let mask = BinaryMask::new(7, 7, mask).unwrap();

        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].len(), 24);
        assert_eq!(contours[1], vec![[3., 3.]]);
    }

    #[test]
    fn test_largest_contour() {
        let mut indices = vec![0];
        for j in 4..8 {
            for i in 4..8 {
                indices.push(j * 10 + i);
            }
        }

        let contour = largest_contour(&from_indices(10, 10, &indices)).unwrap();
        assert_eq!(contour.len(), 12);
        assert_eq!(contour[0], [4., 4.]);
    }
}
