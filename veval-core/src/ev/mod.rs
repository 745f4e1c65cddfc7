mod dataset;
mod matrix;
mod result;
mod sequence;
pub mod statistics;

pub use dataset::{Dataset, evaluate};

pub use matrix::ScoreMatrix;

pub use result::{
    EvaluationResult, ObjectResult, SequenceMetricResult, SequenceResult, StatisticValues,
};

pub use sequence::{Segmentation, Sequence, SequenceScores, evaluate_sequence};
