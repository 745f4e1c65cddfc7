// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::error::VevalError;

/// A row-major foreground/background grid for a single object
///
/// # Examples
///
/// ```
/// use veval_core::im::BinaryMask;
///
/// let mask = BinaryMask::new(2, 2, vec![true, false, true, true]).unwrap();
/// assert_eq!(mask.area(), 3);
/// assert!(mask.get(0, 1));
/// assert!(!mask.get(1, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    w: u32,
    h: u32,
    buffer: Vec<bool>,
}

impl BinaryMask {
    pub fn new(width: u32, height: u32, buffer: Vec<bool>) -> Result<BinaryMask, VevalError> {
        if (width as usize) * (height as usize) == buffer.len() {
            Ok(BinaryMask {
                w: width,
                h: height,
                buffer,
            })
        } else {
            Err(VevalError::BufferSizeError)
        }
    }

    /// Foreground wherever `pixels` equals `label`
    pub fn from_labels(width: u32, height: u32, pixels: &[u32], label: u32) -> BinaryMask {
        BinaryMask {
            w: width,
            h: height,
            buffer: pixels.iter().map(|&p| p == label).collect(),
        }
    }

    /// A mask with an axis-aligned filled rectangle spanning `[x, x + w) x [y, y + h)`
    ///
    /// Parts of the rectangle falling outside the frame are clipped.
    pub fn rectangle(width: u32, height: u32, x: u32, y: u32, w: u32, h: u32) -> BinaryMask {
        let mut buffer = vec![false; (width as usize) * (height as usize)];

        for row in y..(y + h).min(height) {
            for col in x..(x + w).min(width) {
                buffer[(row * width + col) as usize] = true;
            }
        }

        BinaryMask {
            w: width,
            h: height,
            buffer,
        }
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    /// Resolution as (width, height)
    pub fn shape(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    pub fn as_raw(&self) -> &Vec<bool> {
        &self.buffer
    }

    /// Foreground state at column `x`, row `y`
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.buffer[(y as usize) * (self.w as usize) + x as usize]
    }

    /// Number of foreground pixels
    pub fn area(&self) -> u64 {
        self.buffer.iter().filter(|&&p| p).count() as u64
    }

    /// True if the mask has no foreground pixels
    pub fn is_empty(&self) -> bool {
        !self.buffer.iter().any(|&p| p)
    }
}
