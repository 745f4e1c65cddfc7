// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constant;
use crate::error::VevalError;

/// Evaluation measures
///
/// # Examples
///
/// ```
/// use veval_core::config::Metric;
///
/// assert_eq!("j".parse::<Metric>().unwrap(), Metric::J);
/// assert!("Q".parse::<Metric>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Region similarity (Jaccard index)
    J,
    /// Boundary accuracy (F-measure over contour pixels)
    F,
    /// Temporal stability (contour deformation between frames)
    T,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::J, Metric::F, Metric::T];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::J => "J",
            Metric::F => "F",
            Metric::T => "T",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = VevalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "J" => Ok(Metric::J),
            "F" => Ok(Metric::F),
            "T" => Ok(Metric::T),
            _ => Err(VevalError::MetricError(s.to_string())),
        }
    }
}

/// Summary statistics computed over per-frame scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Mean,
    Recall,
    Decay,
}

impl Statistic {
    pub const ALL: [Statistic; 3] = [Statistic::Mean, Statistic::Recall, Statistic::Decay];

    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Recall => "recall",
            Statistic::Decay => "decay",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Statistic {
    type Err = VevalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(Statistic::Mean),
            "recall" => Ok(Statistic::Recall),
            "decay" => Ok(Statistic::Decay),
            _ => Err(VevalError::StatisticError(s.to_string())),
        }
    }
}

/// Benchmark release year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Year {
    #[serde(rename = "2016")]
    Y2016,
    #[serde(rename = "2017")]
    Y2017,
}

impl Year {
    pub fn name(&self) -> &'static str {
        match self {
            Year::Y2016 => "2016",
            Year::Y2017 => "2017",
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Year {
    type Err = VevalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2016" => Ok(Year::Y2016),
            "2017" => Ok(Year::Y2017),
            _ => Err(VevalError::YearError(s.to_string())),
        }
    }
}

/// Benchmark data split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Train,
    Val,
    #[serde(rename = "trainval")]
    TrainVal,
    TestDev,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Train => "train",
            Phase::Val => "val",
            Phase::TrainVal => "trainval",
            Phase::TestDev => "test-dev",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Phase {
    type Err = VevalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "train" => Ok(Phase::Train),
            "val" => Ok(Phase::Val),
            "trainval" => Ok(Phase::TrainVal),
            "test-dev" | "testdev" => Ok(Phase::TestDev),
            _ => Err(VevalError::PhaseError(s.to_string())),
        }
    }
}

/// A validated (year, phase) combination of the benchmark
///
/// # Examples
///
/// ```
/// use veval_core::config::{DatasetVariant, Phase, Year};
///
/// assert!(DatasetVariant::new(Year::Y2017, Phase::TestDev).is_ok());
/// assert!(DatasetVariant::new(Year::Y2016, Phase::TestDev).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetVariant {
    year: Year,
    phase: Phase,
}

impl DatasetVariant {
    pub fn new(year: Year, phase: Phase) -> Result<Self, VevalError> {
        if year == Year::Y2016 && phase == Phase::TestDev {
            return Err(VevalError::ConfigError(
                "The 2016 release has no test-dev phase.".to_string(),
            ));
        }

        Ok(DatasetVariant { year, phase })
    }

    /// Parse and validate user-supplied year and phase identifiers
    pub fn parse(year: &str, phase: &str) -> Result<Self, VevalError> {
        Self::new(year.parse()?, phase.parse()?)
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Single-object annotations are implied by the 2016 release
    pub fn is_single_object(&self) -> bool {
        self.year == Year::Y2016
    }
}

impl Default for DatasetVariant {
    fn default() -> Self {
        DatasetVariant {
            year: Year::Y2017,
            phase: Phase::Val,
        }
    }
}

/// Settings passed explicitly into an evaluation run
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub metrics: Vec<Metric>,
    pub statistics: Vec<Statistic>,
    pub boundary_threshold: f64,
    pub recall_threshold: f64,
    pub decay_bins: usize,
    pub contour_points: usize,
    pub single_object: bool,
    pub detail: bool,
    pub verbose: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            metrics: vec![Metric::J, Metric::F],
            statistics: Statistic::ALL.to_vec(),
            boundary_threshold: constant::DEFAULT_BOUNDARY_THRESHOLD,
            recall_threshold: constant::DEFAULT_RECALL_THRESHOLD,
            decay_bins: constant::DEFAULT_DECAY_BINS,
            contour_points: constant::DEFAULT_CONTOUR_POINTS,
            single_object: false,
            detail: true,
            verbose: false,
        }
    }
}

impl EvalConfig {
    /// Default configuration restricted to a set of metrics
    pub fn with_metrics(metrics: &[Metric]) -> Self {
        EvalConfig {
            metrics: metrics.to_vec(),
            ..Default::default()
        }
    }

    /// Check that every setting lies in its supported range
    ///
    /// # Examples
    ///
    /// ```
    /// use veval_core::config::EvalConfig;
    ///
    /// let mut config = EvalConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.decay_bins = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), VevalError> {
        if self.metrics.is_empty() {
            return Err(VevalError::ConfigError(
                "At least one metric must be requested.".to_string(),
            ));
        }

        if has_duplicates(&self.metrics) {
            return Err(VevalError::ConfigError(
                "Metrics must not be requested more than once.".to_string(),
            ));
        }

        if self.statistics.is_empty() {
            return Err(VevalError::ConfigError(
                "At least one statistic must be requested.".to_string(),
            ));
        }

        if has_duplicates(&self.statistics) {
            return Err(VevalError::ConfigError(
                "Statistics must not be requested more than once.".to_string(),
            ));
        }

        if !self.boundary_threshold.is_finite() || self.boundary_threshold < 0.0 {
            return Err(VevalError::ConfigError(format!(
                "Boundary threshold must be a non-negative number, got {}.",
                self.boundary_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.recall_threshold) {
            return Err(VevalError::ConfigError(format!(
                "Recall threshold must lie in [0, 1], got {}.",
                self.recall_threshold
            )));
        }

        if self.decay_bins < 1 {
            return Err(VevalError::ConfigError(
                "Decay bins must be a positive integer.".to_string(),
            ));
        }

        if self.contour_points < 3 {
            return Err(VevalError::ConfigError(
                "Contours must be resampled to at least 3 points.".to_string(),
            ));
        }

        Ok(())
    }
}

fn has_duplicates<T: PartialEq>(values: &[T]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, v)| values[..i].contains(v))
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_parse_metric() {
        assert_eq!("J".parse::<Metric>().unwrap(), Metric::J);
        assert_eq!("f".parse::<Metric>().unwrap(), Metric::F);
        assert_eq!(" T ".parse::<Metric>().unwrap(), Metric::T);
        assert_eq!(
            "X".parse::<Metric>(),
            Err(VevalError::MetricError("X".to_string()))
        );
    }

    #[test]
    fn test_parse_statistic() {
        assert_eq!("Mean".parse::<Statistic>().unwrap(), Statistic::Mean);
        assert_eq!("recall".parse::<Statistic>().unwrap(), Statistic::Recall);
        assert_eq!("DECAY".parse::<Statistic>().unwrap(), Statistic::Decay);
        assert!("median".parse::<Statistic>().is_err());
    }

    #[test]
    fn test_parse_variant() {
        let variant = DatasetVariant::parse("2017", "test_dev").unwrap();
        assert_eq!(variant.year(), Year::Y2017);
        assert_eq!(variant.phase(), Phase::TestDev);
        assert!(!variant.is_single_object());

        let variant = DatasetVariant::parse("2016", "trainval").unwrap();
        assert!(variant.is_single_object());

        assert!(matches!(
            DatasetVariant::parse("2018", "val"),
            Err(VevalError::YearError(_))
        ));
        assert!(matches!(
            DatasetVariant::parse("2017", "holdout"),
            Err(VevalError::PhaseError(_))
        ));
        assert!(matches!(
            DatasetVariant::parse("2016", "test-dev"),
            Err(VevalError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validate_config() {
        assert!(EvalConfig::default().validate().is_ok());
        assert!(EvalConfig::with_metrics(&Metric::ALL).validate().is_ok());

        let config = EvalConfig::with_metrics(&[]);
        assert!(config.validate().is_err());

        let config = EvalConfig::with_metrics(&[Metric::J, Metric::J]);
        assert!(config.validate().is_err());

        let config = EvalConfig {
            recall_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EvalConfig {
            boundary_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EvalConfig {
            contour_points: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
