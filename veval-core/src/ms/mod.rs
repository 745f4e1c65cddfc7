mod fmeasure;
mod jaccard;
mod stability;

pub use fmeasure::BoundaryScore;
pub use fmeasure::f_measure;

pub use jaccard::jaccard;

pub use stability::temporal_stability;
