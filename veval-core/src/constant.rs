// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// All currently supported mask formats
pub const SUPPORTED_MASK_FORMATS: [&str; 10] = [
    "bmp", "pbm", "pgm", "png", "qoi", "tga", "tif", "tiff", "webp", "npy",
];

// The currently supported mask formats decoded through the image crate
pub const MASK_DYNAMIC_FORMATS: [&str; 9] = [
    "bmp", "pbm", "pgm", "png", "qoi", "tga", "tif", "tiff", "webp",
];

// Supported structured result formats
pub const SUPPORTED_RESULT_FORMATS: [&str; 3] = ["json", "yaml", "yml"];

// Supported tabular result formats
pub const SUPPORTED_TABLE_FORMATS: [&str; 5] = ["csv", "tsv", "txt", "parquet", "pq"];

// Boundary tolerance as a fraction of the image diagonal. Values >= 1 are
// interpreted as an absolute radius in pixels.
pub const DEFAULT_BOUNDARY_THRESHOLD: f64 = 0.008;

// Objects with a mean score at or above this value count towards recall
pub const DEFAULT_RECALL_THRESHOLD: f64 = 0.5;

// Number of temporal bins used for decay
pub const DEFAULT_DECAY_BINS: usize = 4;

// Number of points each contour is resampled to for temporal stability
pub const DEFAULT_CONTOUR_POINTS: usize = 64;

// Hard default settings for the log-polar shape context histograms
pub const SHAPE_CONTEXT_RADIAL_BINS: usize = 5;
pub const SHAPE_CONTEXT_ANGULAR_BINS: usize = 12;
pub const SHAPE_CONTEXT_INNER_RADIUS: f64 = 0.125;
pub const SHAPE_CONTEXT_OUTER_RADIUS: f64 = 2.0;

// Default annotation resolution folder of the benchmark layout
pub const DEFAULT_RESOLUTION: &str = "480p";

// Label assigned to the merged foreground in single-object mode
pub const SINGLE_OBJECT_LABEL: u32 = 1;

// Column names of the per-object results table
pub const OBJECT_TABLE_COLUMNS: [&str; 6] =
    ["sequence", "object", "metric", "mean", "recall", "decay"];
