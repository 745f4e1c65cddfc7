// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::DatasetVariant;
use crate::constant;
use crate::error::VevalError;
use crate::ev::{Dataset, Segmentation, Sequence};
use crate::im::VevalMask;
use crate::ut;

/// Path of the file listing the sequences of a dataset variant
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use veval_core::config::DatasetVariant;
/// use veval_core::io::image_set_path;
///
/// let path = image_set_path("DAVIS", DatasetVariant::default());
/// assert_eq!(path, Path::new("DAVIS/ImageSets/2017/val.txt"));
/// ```
pub fn image_set_path<P: AsRef<Path>>(root: P, variant: DatasetVariant) -> PathBuf {
    root.as_ref()
        .join("ImageSets")
        .join(variant.year().name())
        .join(format!("{}.txt", variant.phase().name()))
}

/// Sequence names listed in an image set file
///
/// One name per line. Blank lines and lines starting with `#` are skipped.
/// Lines holding paths (e.g. `/JPEGImages/480p/bear/00000.jpg ...`) are
/// reduced to the sequence directory name and deduplicated in order.
pub fn read_sequence_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>, VevalError> {
    let content = std::fs::read_to_string(&path)
        .map_err(|_| VevalError::NoFileError(path.as_ref().display().to_string()))?;

    let mut names: Vec<String> = Vec::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let entry = line.split_whitespace().next().unwrap_or(line);
        let name = if entry.contains('/') {
            Path::new(entry)
                .parent()
                .and_then(|parent| parent.file_name())
                .and_then(|name| name.to_str())
                .unwrap_or(entry)
        } else {
            entry
        };

        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

/// Masks of every frame in a directory, ordered by file name
pub fn load_frames<P: AsRef<Path>>(directory: P) -> Result<Vec<VevalMask>, VevalError> {
    let files = ut::path::collect_file_paths(
        &directory,
        constant::SUPPORTED_MASK_FORMATS.as_slice(),
        None,
    )?;

    if files.is_empty() {
        return Err(VevalError::NoFileError(format!(
            "No mask frames were detected in {}",
            directory.as_ref().display()
        )));
    }

    files.iter().map(VevalMask::open).collect()
}

/// Load the annotated sequences of a dataset variant
///
/// Annotations are read from `<root>/Annotations/480p/<sequence>/`. Object
/// identifiers are the union of labels over all frames of a sequence. The
/// 2016 release is always evaluated as single-object.
///
/// # Arguments
///
/// * `root` - Dataset root directory
/// * `variant` - Year and phase of the dataset
/// * `single_object` - Merge all objects into one foreground object
/// * `verbose` - Print progress
pub fn load_dataset<P: AsRef<Path>>(
    root: P,
    variant: DatasetVariant,
    single_object: bool,
    verbose: bool,
) -> Result<Dataset, VevalError> {
    let root = root.as_ref();
    let names = read_sequence_names(image_set_path(root, variant))?;

    ut::track::progress_log(
        &format!(
            "Loading {} sequences of year: {} phase: {}.",
            ut::track::thousands_format(names.len()),
            variant.year(),
            variant.phase()
        ),
        verbose,
    );

    let annotations = root.join("Annotations").join(constant::DEFAULT_RESOLUTION);
    let collapse = single_object || variant.is_single_object();

    let pb = ut::track::progress_bar(names.len(), "Loading annotations", verbose);

    let mut loaded: Vec<(usize, Result<Sequence, VevalError>)> = (0..names.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .map(|idx| {
            let name = &names[idx];
            let sequence = load_frames(annotations.join(name)).map(|frames| {
                let mut sequence = Sequence::new(name, frames);
                if collapse {
                    sequence.collapse();
                }
                sequence
            });
            (idx, sequence)
        })
        .collect();

    loaded.sort_unstable_by_key(|(idx, _)| *idx);

    let sequences = loaded
        .into_iter()
        .map(|(_, sequence)| sequence)
        .collect::<Result<Vec<Sequence>, VevalError>>()?;

    if verbose {
        println!();
    }

    Ok(Dataset::new(variant, sequences))
}

/// Load the predicted frames of one sequence from `<directory>/<name>/`
pub fn load_segmentation<P: AsRef<Path>>(
    directory: P,
    name: &str,
    single_object: bool,
) -> Result<Segmentation, VevalError> {
    let sequence_directory = directory.as_ref().join(name);
    if !sequence_directory.is_dir() {
        return Err(VevalError::MissingSequence(name.to_string()));
    }

    let mut segmentation = Segmentation::new(name, load_frames(sequence_directory)?);
    if single_object {
        segmentation.collapse();
    }

    Ok(segmentation)
}

/// Load the predicted frames of every sequence of a dataset
pub fn load_segmentations<P: AsRef<Path> + Sync>(
    directory: P,
    dataset: &Dataset,
    single_object: bool,
    verbose: bool,
) -> Result<Vec<Segmentation>, VevalError> {
    let collapse = single_object || dataset.variant().is_single_object();
    let names = dataset.names();

    ut::track::progress_log(
        &format!(
            "Loading segmentations from: {}.",
            directory.as_ref().display()
        ),
        verbose,
    );

    let pb = ut::track::progress_bar(names.len(), "Loading segmentations", verbose);

    let mut loaded: Vec<(usize, Result<Segmentation, VevalError>)> = (0..names.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .map(|idx| (idx, load_segmentation(&directory, names[idx], collapse)))
        .collect();

    loaded.sort_unstable_by_key(|(idx, _)| *idx);

    let segmentations = loaded
        .into_iter()
        .map(|(_, segmentation)| segmentation)
        .collect::<Result<Vec<Segmentation>, VevalError>>()?;

    if verbose {
        println!();
    }

    Ok(segmentations)
}

#[cfg(test)]
mod test {

    use image::{GrayImage, Luma};

    use super::*;
    use crate::config::{Phase, Year};

    fn write_frame(path: &Path, labels: &[(u32, u32, u8)]) {
        let mut image = GrayImage::new(8, 6);
        for &(x, y, label) in labels {
            image.put_pixel(x, y, Luma([label]));
        }
        image.save(path).unwrap();
    }

    fn write_dataset(root: &Path) {
        let image_sets = root.join("ImageSets").join("2017");
        std::fs::create_dir_all(&image_sets).unwrap();
        std::fs::write(image_sets.join("val.txt"), "# sequences\nbear\n\ncows\n").unwrap();

        for name in ["bear", "cows"] {
            let directory = root.join("Annotations").join("480p").join(name);
            std::fs::create_dir_all(&directory).unwrap();
            write_frame(&directory.join("00001.png"), &[(1, 1, 1), (5, 4, 2)]);
            write_frame(&directory.join("00000.png"), &[(1, 1, 1)]);
        }
    }

    #[test]
    fn test_read_sequence_names() {
        let path = "TEST_READ_SEQUENCE_NAMES.txt";
        std::fs::write(
            path,
            "# comment\nbear\n  blackswan  \n\n/JPEGImages/480p/cows/00000.jpg /Annotations/480p/cows/00000.png\n/JPEGImages/480p/cows/00001.jpg /Annotations/480p/cows/00001.png\n",
        )
        .unwrap();

        let names = read_sequence_names(path).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(names, vec!["bear", "blackswan", "cows"]);
    }

    #[test]
    fn test_load_dataset() {
        let root = Path::new("TEST_LOAD_DATASET");
        write_dataset(root);

        let dataset = load_dataset(root, DatasetVariant::default(), false, false).unwrap();
        let collapsed = load_dataset(root, DatasetVariant::default(), true, false).unwrap();

        let missing = load_dataset(
            root,
            DatasetVariant::new(Year::Y2017, Phase::Train).unwrap(),
            false,
            false,
        );

        std::fs::remove_dir_all(root).unwrap();

        assert_eq!(dataset.names(), vec!["bear", "cows"]);
        assert_eq!(dataset.n_frames(), 4);

        let bear = &dataset.sequences()[0];
        assert_eq!(bear.objects(), &[1, 2]);
        assert_eq!(bear.frames()[0].labels(), vec![1]);

        assert_eq!(collapsed.sequences()[0].objects(), &[1]);
        assert_eq!(collapsed.sequences()[0].frames()[1].labels(), vec![1]);

        assert!(matches!(missing, Err(VevalError::NoFileError(_))));
    }

    #[test]
    fn test_load_segmentations() {
        let root = Path::new("TEST_LOAD_SEGMENTATIONS");
        write_dataset(root);

        let dataset = load_dataset(root, DatasetVariant::default(), false, false).unwrap();
        let annotations = root.join("Annotations").join("480p");

        let segmentations = load_segmentations(&annotations, &dataset, false, false).unwrap();
        let missing = load_segmentation(&annotations, "dog", false);

        std::fs::remove_dir_all(root).unwrap();

        assert_eq!(segmentations.len(), 2);
        assert_eq!(segmentations[1].name(), "cows");
        assert_eq!(segmentations[1].frames(), dataset.sequences()[1].frames());
        assert_eq!(missing, Err(VevalError::MissingSequence("dog".to_string())));
    }
}
