// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum VevalError {
    BufferSizeError,
    ShapeError {
        expected: (u32, u32),
        found: (u32, u32),
    },
    ResolutionMismatch {
        sequence: String,
        frame: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },
    FrameCountMismatch {
        sequence: String,
        expected: usize,
        found: usize,
    },
    MissingSequence(String),
    MissingScore {
        sequence: String,
        metric: String,
        object: u32,
        frame: usize,
    },
    DuplicateScore {
        sequence: String,
        metric: String,
        object: u32,
        frame: usize,
    },
    MetricError(String),
    StatisticError(String),
    YearError(String),
    PhaseError(String),
    ConfigError(String),
    MaskError(&'static str),
    MaskReadError(String),
    MaskFormatError,
    ExtensionError(String),
    NoFileError(String),
    DirError(String),
    SerializeError(String),
    TableError(String),
}

impl fmt::Display for VevalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VevalError::BufferSizeError => {
                write!(
                    f,
                    "[veval::BufferSizeError] The buffer does not match provided size."
                )
            }
            VevalError::ShapeError { expected, found } => {
                write!(
                    f,
                    "[veval::ShapeError] Masks must share a resolution. Expected {}x{} but found {}x{}.",
                    expected.0, expected.1, found.0, found.1
                )
            }
            VevalError::ResolutionMismatch {
                sequence,
                frame,
                expected,
                found,
            } => {
                write!(
                    f,
                    "[veval::ResolutionMismatch] Sequence '{}' frame {}: ground truth is {}x{} but prediction is {}x{}.",
                    sequence, frame, expected.0, expected.1, found.0, found.1
                )
            }
            VevalError::FrameCountMismatch {
                sequence,
                expected,
                found,
            } => {
                write!(
                    f,
                    "[veval::FrameCountMismatch] Sequence '{}' has {} annotated frames but {} predicted frames.",
                    sequence, expected, found
                )
            }
            VevalError::MissingSequence(sequence) => {
                write!(
                    f,
                    "[veval::MissingSequence] No segmentation was provided for sequence '{}'.",
                    sequence
                )
            }
            VevalError::MissingScore {
                sequence,
                metric,
                object,
                frame,
            } => {
                write!(
                    f,
                    "[veval::MissingScore] Sequence '{}' has no {} score for object {} at frame {}.",
                    sequence, metric, object, frame
                )
            }
            VevalError::DuplicateScore {
                sequence,
                metric,
                object,
                frame,
            } => {
                write!(
                    f,
                    "[veval::DuplicateScore] Sequence '{}' already has a {} score for object {} at frame {}.",
                    sequence, metric, object, frame
                )
            }
            VevalError::MetricError(metric) => {
                write!(
                    f,
                    "[veval::MetricError] Unsupported metric '{}'. Must be one of: J, F, T.",
                    metric
                )
            }
            VevalError::StatisticError(statistic) => {
                write!(
                    f,
                    "[veval::StatisticError] Unsupported statistic '{}'. Must be one of: mean, recall, decay.",
                    statistic
                )
            }
            VevalError::YearError(year) => {
                write!(
                    f,
                    "[veval::YearError] Unsupported dataset year '{}'. Must be one of: 2016, 2017.",
                    year
                )
            }
            VevalError::PhaseError(phase) => {
                write!(
                    f,
                    "[veval::PhaseError] Unsupported dataset phase '{}'. Must be one of: train, val, trainval, test-dev.",
                    phase
                )
            }
            VevalError::ConfigError(message) => {
                write!(f, "[veval::ConfigError] Invalid configuration. {}", message)
            }
            VevalError::MaskError(message) => {
                write!(f, "[veval::MaskError] Failed to create mask. {}", message)
            }
            VevalError::MaskReadError(path) => {
                write!(f, "[veval::MaskReadError] Failed to read mask: {}.", path)
            }
            VevalError::MaskFormatError => {
                write!(
                    f,
                    "[veval::MaskFormatError] Only 1-channel u8, u16 and u32 masks are currently supported."
                )
            }
            VevalError::ExtensionError(path) => {
                write!(
                    f,
                    "[veval::ExtensionError] Could not detect a valid extension for: {}.",
                    path
                )
            }
            VevalError::NoFileError(message) => {
                write!(
                    f,
                    "[veval::NoFileError] File could not be found. {}.",
                    message
                )
            }
            VevalError::DirError(message) => {
                write!(
                    f,
                    "[veval::DirError] Directory could not be read. {}.",
                    message
                )
            }
            VevalError::SerializeError(message) => {
                write!(
                    f,
                    "[veval::SerializeError] Failed to (de)serialize results. {}",
                    message
                )
            }
            VevalError::TableError(message) => {
                write!(f, "[veval::TableError] Failed to write table. {}", message)
            }
        }
    }
}

impl std::error::Error for VevalError {}
