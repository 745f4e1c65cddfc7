// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{Metric, Statistic};
use crate::constant;
use crate::error::VevalError;
use crate::io;

/// Statistic name to value, `None` where nothing was defined
pub type StatisticValues = BTreeMap<Statistic, Option<f64>>;

/// Statistics and per-frame scores of one object for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectResult {
    pub id: u32,
    pub statistics: StatisticValues,
    pub frames: Vec<Option<f64>>,
}

/// Statistics of one metric over one sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceMetricResult {
    pub statistics: StatisticValues,
    pub objects: Vec<ObjectResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceResult {
    pub metrics: BTreeMap<Metric, SequenceMetricResult>,
}

/// Outcome of an evaluation run
///
/// `dataset` holds the statistics over every object of every sequence.
/// `sequences` holds the per-sequence and per-object breakdown and is empty
/// when detail was not requested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub dataset: BTreeMap<Metric, StatisticValues>,
    pub sequences: BTreeMap<String, SequenceResult>,
}

impl EvaluationResult {
    /// Dataset-level value of a statistic
    pub fn get(&self, metric: Metric, statistic: Statistic) -> Option<f64> {
        self.dataset
            .get(&metric)
            .and_then(|statistics| statistics.get(&statistic))
            .copied()
            .flatten()
    }

    pub fn metrics(&self) -> Vec<Metric> {
        self.dataset.keys().copied().collect()
    }

    /// Generic key-value tree of primitive values
    pub fn to_value(&self) -> Result<serde_json::Value, VevalError> {
        serde_json::to_value(self).map_err(|err| VevalError::SerializeError(err.to_string()))
    }

    /// Save to a .json, .yaml or .yml file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), VevalError> {
        io::write_result(self, path)
    }

    /// Open a result saved with [`EvaluationResult::save`]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<EvaluationResult, VevalError> {
        io::read_result(path)
    }

    /// One row per sequence, object and metric
    ///
    /// # Examples
    ///
    /// ```
    /// use veval_core::ev::EvaluationResult;
    ///
    /// let table = EvaluationResult::default().object_table().unwrap();
    /// assert_eq!(table.width(), 6);
    /// assert_eq!(table.height(), 0);
    /// ```
    pub fn object_table(&self) -> Result<DataFrame, VevalError> {
        let mut sequence: Vec<String> = Vec::new();
        let mut object: Vec<u32> = Vec::new();
        let mut metric: Vec<String> = Vec::new();
        let mut values: BTreeMap<Statistic, Vec<Option<f64>>> = Statistic::ALL
            .iter()
            .map(|&statistic| (statistic, Vec::new()))
            .collect();

        for (name, result) in self.sequences.iter() {
            for (m, metric_result) in result.metrics.iter() {
                for object_result in metric_result.objects.iter() {
                    sequence.push(name.clone());
                    object.push(object_result.id);
                    metric.push(m.to_string());

                    for (statistic, column) in values.iter_mut() {
                        column.push(object_result.statistics.get(statistic).copied().flatten());
                    }
                }
            }
        }

        let [c_sequence, c_object, c_metric, ..] = constant::OBJECT_TABLE_COLUMNS;

        let mut columns = vec![
            Column::new(c_sequence.into(), sequence),
            Column::new(c_object.into(), object),
            Column::new(c_metric.into(), metric),
        ];

        for (statistic, column) in values {
            columns.push(Column::new(statistic.name().into(), column));
        }

        DataFrame::new(columns).map_err(|err| VevalError::TableError(err.to_string()))
    }

    /// Write the per-object table to .csv, .tsv, .txt, .parquet or .pq
    pub fn write_table<P: AsRef<Path>>(&self, path: P) -> Result<(), VevalError> {
        let mut df = self.object_table()?;
        io::write_table(&mut df, path)
    }
}
