// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::config::Metric;
use crate::error::VevalError;

/// Per-object, per-frame scores of one metric over one sequence
///
/// Every cell can be written exactly once. Undefined scores (e.g. temporal
/// stability of an object missing from a frame) are stored as `NaN` and
/// still count as written.
///
/// # Examples
///
/// ```
/// use veval_core::config::Metric;
/// use veval_core::ev::ScoreMatrix;
///
/// let mut matrix = ScoreMatrix::new("bear", Metric::J, &[1, 2], 2);
/// matrix.insert(1, 0, 0.9).unwrap();
/// matrix.insert(1, 1, 0.8).unwrap();
/// matrix.insert(2, 0, 0.5).unwrap();
///
/// assert!(matrix.validate().is_err());
///
/// matrix.insert(2, 1, 0.4).unwrap();
/// assert!(matrix.validate().is_ok());
/// assert_eq!(matrix.get(1, 1), Some(0.8));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    sequence: String,
    metric: Metric,
    objects: Vec<u32>,
    n_frames: usize,
    cells: Vec<Option<f64>>,
}

impl ScoreMatrix {
    /// An empty matrix with one row per object and `n_frames` columns
    pub fn new(sequence: &str, metric: Metric, objects: &[u32], n_frames: usize) -> Self {
        ScoreMatrix {
            sequence: sequence.to_string(),
            metric,
            objects: objects.to_vec(),
            n_frames,
            cells: vec![None; objects.len() * n_frames],
        }
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn objects(&self) -> &[u32] {
        &self.objects
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    fn index(&self, object: u32, frame: usize) -> Option<usize> {
        if frame >= self.n_frames {
            return None;
        }

        self.objects
            .iter()
            .position(|&id| id == object)
            .map(|row| row * self.n_frames + frame)
    }

    /// Record the score of `object` at `frame`
    pub fn insert(&mut self, object: u32, frame: usize, score: f64) -> Result<(), VevalError> {
        let Some(idx) = self.index(object, frame) else {
            return Err(VevalError::ConfigError(format!(
                "Sequence '{}' has no {} cell for object {} at frame {}.",
                self.sequence, self.metric, object, frame
            )));
        };

        if self.cells[idx].is_some() {
            return Err(VevalError::DuplicateScore {
                sequence: self.sequence.clone(),
                metric: self.metric.to_string(),
                object,
                frame,
            });
        }

        self.cells[idx] = Some(score);
        Ok(())
    }

    pub fn get(&self, object: u32, frame: usize) -> Option<f64> {
        self.index(object, frame).and_then(|idx| self.cells[idx])
    }

    /// Scores of one object ordered by frame
    pub fn row(&self, object: u32) -> Option<&[Option<f64>]> {
        let row = self.objects.iter().position(|&id| id == object)?;
        Some(&self.cells[row * self.n_frames..(row + 1) * self.n_frames])
    }

    /// Iterate over `(object, scores)` rows in object order
    pub fn rows(&self) -> impl Iterator<Item = (u32, &[Option<f64>])> {
        self.objects
            .iter()
            .enumerate()
            .map(|(row, &id)| (id, &self.cells[row * self.n_frames..(row + 1) * self.n_frames]))
    }

    /// Fail on the first cell that was never written
    pub fn validate(&self) -> Result<(), VevalError> {
        match self.cells.iter().position(|cell| cell.is_none()) {
            Some(idx) => Err(VevalError::MissingScore {
                sequence: self.sequence.clone(),
                metric: self.metric.to_string(),
                object: self.objects[idx / self.n_frames],
                frame: idx % self.n_frames,
            }),
            None => Ok(()),
        }
    }
}
