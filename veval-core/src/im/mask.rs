// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::BTreeSet;
use std::path::Path;

use image::{DynamicImage, open as open_dynamic};
use npyz::{DType, NpyFile, TypeChar};

use crate::constant;
use crate::error::VevalError;
use crate::im::BinaryMask;

/// A row-major container storing integer object labels
///
/// Label `0` is background; every other value identifies one object
/// instance. The length of the container must be equal to the product
/// of `w` * `h`.
///
/// # Examples
///
/// ```
/// use veval_core::im::VevalMask;
///
/// let mask = VevalMask::new(3, 2, vec![0, 1, 1, 0, 2, 2]).unwrap();
/// assert_eq!(mask.labels(), vec![1, 2]);
///
/// let mask = VevalMask::new(3, 3, vec![0, 1, 1, 0, 2, 2]);
/// assert!(mask.is_err()); // Buffer size does not match dimensions
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VevalMask {
    w: u32,
    h: u32,
    pub buffer: Vec<u32>,
}

impl VevalMask {
    /// Initializes a mask from a row-major label buffer
    pub fn new(width: u32, height: u32, buffer: Vec<u32>) -> Result<VevalMask, VevalError> {
        if (width as usize) * (height as usize) == buffer.len() {
            Ok(VevalMask {
                w: width,
                h: height,
                buffer,
            })
        } else {
            Err(VevalError::BufferSizeError)
        }
    }

    /// An all-background mask of the given size
    pub fn empty(width: u32, height: u32) -> VevalMask {
        VevalMask {
            w: width,
            h: height,
            buffer: vec![0; (width as usize) * (height as usize)],
        }
    }
}

// >>> PROPERTY METHODS

impl VevalMask {
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

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_raw(&self) -> &Vec<u32> {
        &self.buffer
    }

    pub fn into_raw(self) -> Vec<u32> {
        self.buffer
    }

    pub fn iter(&self) -> impl Iterator<Item = &u32> {
        self.buffer.iter()
    }

    /// Sorted unique non-background labels
    pub fn labels(&self) -> Vec<u32> {
        self.buffer
            .iter()
            .filter(|&&x| x != 0)
            .cloned()
            .collect::<BTreeSet<u32>>()
            .into_iter()
            .collect()
    }
}

// <<< PROPERTY METHODS

// >>> TRANSFORM METHODS

impl VevalMask {
    /// Merge every foreground label into a single object
    ///
    /// # Examples
    ///
    /// ```
    /// use veval_core::im::VevalMask;
    ///
    /// let mut mask = VevalMask::new(2, 2, vec![0, 3, 7, 255]).unwrap();
    /// mask.collapse();
    ///
    /// assert_eq!(mask.as_raw(), &[0, 1, 1, 1]);
    /// ```
    pub fn collapse(&mut self) {
        for pixel in self.buffer.iter_mut() {
            if *pixel != 0 {
                *pixel = constant::SINGLE_OBJECT_LABEL;
            }
        }
    }

    /// Binary mask of the pixels carrying `label`
    pub fn binary(&self, label: u32) -> BinaryMask {
        BinaryMask::from_labels(self.w, self.h, &self.buffer, label)
    }
}

// <<< TRANSFORM METHODS

// >>> I/O METHODS

impl VevalMask {
    /// Open a new mask from a provided path
    ///
    /// Grayscale images are read as labels directly. Color images are
    /// decoded through the indexed color palette used by the benchmark
    /// annotations. Numpy arrays must be unsigned integer (H, W) arrays.
    ///
    /// ```no_run
    /// use veval_core::im::VevalMask;
    /// let mask = VevalMask::open("00000.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<VevalMask, VevalError> {
        let display = path.as_ref().display().to_string();

        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if ext == "npy" {
                let bytes =
                    std::fs::read(&path).map_err(|_| VevalError::MaskReadError(display.clone()))?;
                let npy = NpyFile::new(&bytes[..])
                    .map_err(|_| VevalError::MaskReadError(display.clone()))?;
                return Self::new_from_numpy(npy);
            }

            if constant::MASK_DYNAMIC_FORMATS.iter().any(|e| e == &ext) {
                let image = open_dynamic(&path).map_err(|_| VevalError::MaskReadError(display))?;
                return Self::new_from_dynamic(image);
            }
        }

        Err(VevalError::ExtensionError(display))
    }

    /// Initialize a new mask from a DynamicImage
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{DynamicImage, GrayImage, Luma};
    /// use veval_core::im::VevalMask;
    ///
    /// let gray = GrayImage::from_pixel(4, 3, Luma([2u8]));
    /// let mask = VevalMask::new_from_dynamic(DynamicImage::ImageLuma8(gray)).unwrap();
    ///
    /// assert_eq!(mask.shape(), (4, 3));
    /// assert_eq!(mask.labels(), vec![2]);
    /// ```
    pub fn new_from_dynamic(mask: DynamicImage) -> Result<VevalMask, VevalError> {
        let width = mask.width();
        let height = mask.height();

        match mask {
            DynamicImage::ImageLuma8(buffer) => VevalMask::new(
                width,
                height,
                buffer.into_raw().into_iter().map(|p| p as u32).collect(),
            ),
            DynamicImage::ImageLumaA8(buffer) => VevalMask::new(
                width,
                height,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|p| p[0] as u32)
                    .collect(),
            ),
            DynamicImage::ImageLuma16(buffer) => VevalMask::new(
                width,
                height,
                buffer.into_raw().into_iter().map(|p| p as u32).collect(),
            ),
            DynamicImage::ImageLumaA16(buffer) => VevalMask::new(
                width,
                height,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|p| p[0] as u32)
                    .collect(),
            ),
            DynamicImage::ImageRgb8(buffer) => {
                let labels = decode_palette(buffer.into_raw().chunks_exact(3))?;
                VevalMask::new(width, height, labels)
            }
            DynamicImage::ImageRgba8(buffer) => {
                let labels = decode_palette(buffer.into_raw().chunks_exact(4))?;
                VevalMask::new(width, height, labels)
            }
            _ => Err(VevalError::MaskFormatError),
        }
    }

    /// Initialize a new mask from a numpy array buffer
    pub fn new_from_numpy(npy: NpyFile<&[u8]>) -> Result<VevalMask, VevalError> {
        let shape = npy.shape().to_vec();

        let (h, w) = match shape.as_slice() {
            [h, w] => (*h as u32, *w as u32),
            [h, w, 1] => (*h as u32, *w as u32),
            [_, _, _] => return Err(VevalError::MaskFormatError),
            _ => {
                return Err(VevalError::MaskError(
                    "Numpy array masks must have an (H, W) shape.",
                ));
            }
        };

        let read_error = |_: std::io::Error| VevalError::MaskError("Numpy array data could not be decoded.");

        match npy.dtype() {
            DType::Plain(x) => match (x.type_char(), x.size_field()) {
                (TypeChar::Uint, 1) => VevalMask::new(
                    w,
                    h,
                    npy.into_vec::<u8>()
                        .map_err(read_error)?
                        .into_iter()
                        .map(|p| p as u32)
                        .collect(),
                ),
                (TypeChar::Uint, 2) => VevalMask::new(
                    w,
                    h,
                    npy.into_vec::<u16>()
                        .map_err(read_error)?
                        .into_iter()
                        .map(|p| p as u32)
                        .collect(),
                ),
                (TypeChar::Uint, 4) => {
                    VevalMask::new(w, h, npy.into_vec::<u32>().map_err(read_error)?)
                }
                _ => Err(VevalError::MaskFormatError),
            },
            _ => Err(VevalError::MaskError(
                "Only plain numpy mask arrays are currently supported.",
            )),
        }
    }
}

// <<< I/O METHODS

/// Color of a label in the indexed annotation palette
///
/// The palette spreads the bits of the label over the three channels,
/// starting from the most significant bit of each channel.
///
/// # Examples
///
/// ```
/// use veval_core::im::palette_color;
///
/// assert_eq!(palette_color(0), [0, 0, 0]);
/// assert_eq!(palette_color(1), [128, 0, 0]);
/// assert_eq!(palette_color(2), [0, 128, 0]);
/// assert_eq!(palette_color(3), [128, 128, 0]);
/// ```
pub fn palette_color(label: u8) -> [u8; 3] {
    let mut c = label;
    let mut rgb = [0u8; 3];

    for j in 0..8 {
        rgb[0] |= (c & 1) << (7 - j);
        rgb[1] |= ((c >> 1) & 1) << (7 - j);
        rgb[2] |= ((c >> 2) & 1) << (7 - j);
        c >>= 3;
    }

    rgb
}

fn decode_palette<'a, I>(pixels: I) -> Result<Vec<u32>, VevalError>
where
    I: Iterator<Item = &'a [u8]>,
{
    let lookup: std::collections::HashMap<[u8; 3], u32> =
        (0..=255u8).map(|i| (palette_color(i), i as u32)).collect();

    pixels
        .map(|p| {
            lookup
                .get(&[p[0], p[1], p[2]])
                .copied()
                .ok_or(VevalError::MaskError(
                    "Color mask contains a color outside the annotation palette.",
                ))
        })
        .collect()
}
