// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use assert_cmd::Command;
use image::{GrayImage, Luma};
use predicates::prelude::*;
use tempfile::TempDir;

use veval_core::config::{Metric, Statistic};
use veval_core::ev::EvaluationResult;

fn write_square(path: &Path, width: u32, present: bool) {
    let mut image = GrayImage::new(width, 20);
    if present {
        for y in 5..15 {
            for x in 5..15 {
                image.put_pixel(x, y, Luma([1]));
            }
        }
    }
    image.save(path).unwrap();
}

/// One sequence of three frames; the prediction loses the object in the last frame
fn write_benchmark(root: &Path) {
    let image_sets = root.join("davis").join("ImageSets").join("2017");
    std::fs::create_dir_all(&image_sets).unwrap();
    std::fs::write(image_sets.join("val.txt"), "square\n").unwrap();

    let annotations = root.join("davis").join("Annotations").join("480p").join("square");
    let predictions = root.join("method").join("square");
    std::fs::create_dir_all(&annotations).unwrap();
    std::fs::create_dir_all(&predictions).unwrap();

    for frame in 0..3 {
        let name = format!("{:05}.png", frame);
        write_square(&annotations.join(&name), 20, true);
        write_square(&predictions.join(&name), 20, frame < 2);
    }
}

fn veval() -> Command {
    Command::cargo_bin("veval").unwrap()
}

#[test]
fn test_evaluate_end_to_end() {
    let tmp = TempDir::new().unwrap();
    write_benchmark(tmp.path());

    let output = tmp.path().join("results.yaml");
    let table = tmp.path().join("objects.csv");

    veval()
        .arg("evaluate")
        .arg("-i")
        .arg(tmp.path().join("method"))
        .arg("-d")
        .arg(tmp.path().join("davis"))
        .arg("-o")
        .arg(&output)
        .arg("--table")
        .arg(&table)
        .assert()
        .success()
        .stdout(predicate::str::contains("J_mean"))
        .stdout(predicate::str::contains("F_decay"))
        .stdout(predicate::str::contains("| method "))
        .stdout(predicate::str::contains("+========+"))
        .stdout(predicate::str::contains("0.667"));

    let result = EvaluationResult::open(&output).unwrap();
    let mean = result.get(Metric::J, Statistic::Mean).unwrap();
    assert!((mean - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(result.get(Metric::J, Statistic::Recall), Some(1.0));

    let frames = &result.sequences["square"].metrics[&Metric::J].objects[0].frames;
    assert_eq!(frames, &vec![Some(1.0), Some(1.0), Some(0.0)]);

    let content = std::fs::read_to_string(&table).unwrap();
    assert!(content.starts_with("sequence,object,metric,mean,recall,decay"));
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_evaluate_temporal_stability() {
    let tmp = TempDir::new().unwrap();
    write_benchmark(tmp.path());

    veval()
        .arg("evaluate")
        .arg("-i")
        .arg(tmp.path().join("method"))
        .arg("-d")
        .arg(tmp.path().join("davis"))
        .args(["-m", "T"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T_mean"))
        .stdout(predicate::str::contains("J_mean").not());
}

#[test]
fn test_evaluate_invalid_metric() {
    let tmp = TempDir::new().unwrap();
    write_benchmark(tmp.path());

    veval()
        .arg("evaluate")
        .arg("-i")
        .arg(tmp.path().join("method"))
        .arg("-d")
        .arg(tmp.path().join("davis"))
        .args(["-m", "J", "Q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[veval::evaluate] ERROR:"))
        .stderr(predicate::str::contains("[veval::MetricError]"));
}

#[test]
fn test_evaluate_invalid_phase() {
    let tmp = TempDir::new().unwrap();
    write_benchmark(tmp.path());

    veval()
        .arg("evaluate")
        .arg("-i")
        .arg(tmp.path().join("method"))
        .arg("-d")
        .arg(tmp.path().join("davis"))
        .args(["-y", "2016", "-p", "test-dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[veval::ConfigError]"));
}

#[test]
fn test_evaluate_missing_sequence() {
    let tmp = TempDir::new().unwrap();
    write_benchmark(tmp.path());
    std::fs::remove_dir_all(tmp.path().join("method").join("square")).unwrap();

    veval()
        .arg("evaluate")
        .arg("-i")
        .arg(tmp.path().join("method"))
        .arg("-d")
        .arg(tmp.path().join("davis"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("[veval::evaluate] ERROR:"))
        .stderr(predicate::str::contains("[veval::MissingSequence]"))
        .stderr(predicate::str::contains("square"));
}

#[test]
fn test_evaluate_resolution_mismatch() {
    let tmp = TempDir::new().unwrap();
    write_benchmark(tmp.path());
    write_square(&tmp.path().join("method").join("square").join("00001.png"), 24, true);

    veval()
        .arg("evaluate")
        .arg("-i")
        .arg(tmp.path().join("method"))
        .arg("-d")
        .arg(tmp.path().join("davis"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("[veval::ResolutionMismatch]"))
        .stderr(predicate::str::contains("frame 1"));
}

#[test]
fn test_evaluate_invalid_output_extension() {
    let tmp = TempDir::new().unwrap();
    write_benchmark(tmp.path());

    veval()
        .arg("evaluate")
        .arg("-i")
        .arg(tmp.path().join("method"))
        .arg("-d")
        .arg(tmp.path().join("davis"))
        .arg("-o")
        .arg(tmp.path().join("results.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("[veval::ExtensionError]"));
}

#[test]
fn test_evaluate_requires_input() {
    veval().arg("evaluate").assert().failure();
}

#[test]
fn test_compare() {
    let tmp = TempDir::new().unwrap();
    let truth = tmp.path().join("truth.png");
    let prediction = tmp.path().join("prediction.png");
    let empty = tmp.path().join("empty.png");

    write_square(&truth, 20, true);
    write_square(&prediction, 20, true);
    write_square(&empty, 20, false);

    veval()
        .arg("compare")
        .arg("-g")
        .arg(&truth)
        .arg("-s")
        .arg(&prediction)
        .assert()
        .success()
        .stdout(predicate::str::contains("object\tJ\tF_precision\tF_recall\tF"))
        .stdout(predicate::str::contains("1\t1.0000\t1.0000\t1.0000\t1.0000"));

    veval()
        .arg("compare")
        .arg("-g")
        .arg(&truth)
        .arg("-s")
        .arg(&empty)
        .assert()
        .success()
        .stdout(predicate::str::contains("1\t0.0000\t1.0000\t0.0000\t0.0000"));
}

#[test]
fn test_compare_resolution_mismatch() {
    let tmp = TempDir::new().unwrap();
    let truth = tmp.path().join("truth.png");
    let prediction = tmp.path().join("prediction.png");

    write_square(&truth, 20, true);
    write_square(&prediction, 24, true);

    veval()
        .arg("compare")
        .arg("-g")
        .arg(&truth)
        .arg("-s")
        .arg(&prediction)
        .assert()
        .failure()
        .stderr(predicate::str::contains("[veval::compare] ERROR:"))
        .stderr(predicate::str::contains("[veval::ShapeError]"));
}
