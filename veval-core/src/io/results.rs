// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::VevalError;

enum ResultFormat {
    Json,
    Yaml,
}

fn result_format<P: AsRef<Path>>(path: P) -> Result<ResultFormat, VevalError> {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("json") => Ok(ResultFormat::Json),
        Some("yaml") | Some("yml") => Ok(ResultFormat::Yaml),
        _ => Err(VevalError::ExtensionError(format!(
            "{} (must be one of: json, yaml, yml)",
            path.as_ref().display()
        ))),
    }
}

/// Serialize a value to a .json, .yaml or .yml file
///
/// # Examples
///
/// ```no_run
/// use veval_core::ev::EvaluationResult;
/// use veval_core::io::write_result;
///
/// write_result(&EvaluationResult::default(), "results.yaml").unwrap();
/// ```
pub fn write_result<T, P>(value: &T, path: P) -> Result<(), VevalError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let format = result_format(&path)?;

    let file = File::create(&path).map_err(|err| {
        VevalError::SerializeError(format!(
            "Failed to create {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;

    let mut writer = BufWriter::new(file);

    match format {
        ResultFormat::Json => serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|err| VevalError::SerializeError(err.to_string()))?,
        ResultFormat::Yaml => serde_yaml::to_writer(&mut writer, value)
            .map_err(|err| VevalError::SerializeError(err.to_string()))?,
    }

    writer
        .flush()
        .map_err(|err| VevalError::SerializeError(err.to_string()))
}

/// Deserialize a value from a .json, .yaml or .yml file
pub fn read_result<T, P>(path: P) -> Result<T, VevalError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let format = result_format(&path)?;

    let file = File::open(&path)
        .map_err(|_| VevalError::NoFileError(path.as_ref().display().to_string()))?;

    let reader = BufReader::new(file);

    match format {
        ResultFormat::Json => serde_json::from_reader(reader)
            .map_err(|err| VevalError::SerializeError(err.to_string())),
        ResultFormat::Yaml => serde_yaml::from_reader(reader)
            .map_err(|err| VevalError::SerializeError(err.to_string())),
    }
}
