// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use crate::error::VevalError;

/// Collect file paths from a directory sorted by file name
///
/// # Arguments
///
/// * `directory` - Path to directory containing files
/// * `valid_ext` - Lowercase extensions to keep
/// * `substring` - Only include files containing this substring
///
/// # Examples
///
/// ```no_run
/// use veval_core::constant::SUPPORTED_MASK_FORMATS;
/// use veval_core::ut::path::collect_file_paths;
///
/// let files = collect_file_paths("Annotations/480p/bear", SUPPORTED_MASK_FORMATS.as_slice(), None);
/// ```
pub fn collect_file_paths<P>(
    directory: P,
    valid_ext: &[&str],
    substring: Option<&str>,
) -> Result<Vec<PathBuf>, VevalError>
where
    P: AsRef<Path>,
{
    let message = directory.as_ref().display().to_string();

    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)
        .map_err(|_| VevalError::DirError(message))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| valid_ext.contains(&ext.to_lowercase().as_str()))
        })
        .collect();

    if let Some(substring) = substring {
        files.retain(|f| {
            f.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(substring))
        });
    }

    files.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Check that an output file has a supported extension and an existing parent
///
/// # Examples
///
/// ```
/// use veval_core::ut::path::check_output_path;
///
/// assert!(check_output_path("results.json", &["json", "yaml"]).is_ok());
/// assert!(check_output_path("results.csv", &["json", "yaml"]).is_err());
/// assert!(check_output_path("missing/results.json", &["json"]).is_err());
/// ```
pub fn check_output_path<P: AsRef<Path>>(path: P, valid_ext: &[&str]) -> Result<PathBuf, VevalError> {
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    if !extension.is_some_and(|ext| valid_ext.contains(&ext.as_str())) {
        return Err(VevalError::ExtensionError(format!(
            "{} (must be one of: {})",
            path.display(),
            valid_ext.join(", ")
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(VevalError::DirError(format!(
                "Parent directory of {} does not exist",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}
