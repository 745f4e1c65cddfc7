// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::VevalError;

fn create_file<P: AsRef<Path>>(path: P) -> Result<File, VevalError> {
    File::create(&path).map_err(|err| {
        VevalError::TableError(format!(
            "Failed to create {}: {}",
            path.as_ref().display(),
            err
        ))
    })
}

/// Write a table to a delimited text file
///
/// # Arguments
///
/// * `df` - A DataFrame
/// * `path` - Path of the output file
/// * `separator` - Field separator (e.g. `b','` or `b'\t'`)
/// * `header` - Whether the output file should start with a header line
///
/// # Examples
///
/// ```no_run
/// use polars::prelude::*;
/// use veval_core::io::write_table_delimited;
///
/// let column = vec![Column::new("mean".into(), [0.8, 0.6, 0.7])];
/// let mut df: DataFrame = DataFrame::new(column).unwrap();
///
/// write_table_delimited(&mut df, "output.csv", b',', true).unwrap()
/// ```
pub fn write_table_delimited<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    separator: u8,
    header: bool,
) -> Result<(), VevalError> {
    let mut output = create_file(&path)?;

    CsvWriter::new(&mut output)
        .include_header(header)
        .with_separator(separator)
        .finish(df)
        .map_err(|err| VevalError::TableError(err.to_string()))
}

/// Write a table to a parquet file
///
/// # Examples
///
/// ```no_run
/// use polars::prelude::*;
/// use veval_core::io::write_table_pq;
///
/// let column = vec![Column::new("mean".into(), [0.8, 0.6, 0.7])];
/// let mut df: DataFrame = DataFrame::new(column).unwrap();
///
/// write_table_pq(&mut df, "output.pq").unwrap()
/// ```
pub fn write_table_pq<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), VevalError> {
    let mut output = create_file(&path)?;

    ParquetWriter::new(&mut output)
        .finish(df)
        .map(|_| ())
        .map_err(|err| VevalError::TableError(err.to_string()))
}

/// Write a DataFrame to disk with the format given by the file extension
///
/// Supported extensions are csv, tsv, txt (tab separated), parquet and pq.
pub fn write_table<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), VevalError> {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("csv") => write_table_delimited(df, path, b',', true),
        Some("tsv") | Some("txt") => write_table_delimited(df, path, b'\t', true),
        Some("parquet") | Some("pq") => write_table_pq(df, path),
        _ => Err(VevalError::ExtensionError(format!(
            "{} (must be one of: csv, tsv, txt, parquet, pq)",
            path.as_ref().display()
        ))),
    }
}
