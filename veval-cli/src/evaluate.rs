// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use clap::Args;
use prettytable::{Cell, Row, Table};

use veval_core::config::{DatasetVariant, EvalConfig, Metric, Statistic};
use veval_core::constant;
use veval_core::ev::{self, EvaluationResult};
use veval_core::io;
use veval_core::ut;

#[derive(Debug, Args)]
#[command(about = "Evaluate predicted segmentations against annotated benchmark sequences.")]
pub struct EvaluateArgs {
    #[arg(
        short = 'i',
        long,
        help = "Directory of predicted segmentations with one sub-directory per sequence.",
        required = true
    )]
    pub input: Option<String>,

    #[arg(
        short = 'd',
        long,
        help = "Dataset root directory containing Annotations/ and ImageSets/.",
        required = true
    )]
    pub davis: Option<String>,

    #[arg(short = 'o', long, help = "Output results file (.json, .yaml, .yml).")]
    pub output: Option<String>,

    #[arg(long, help = "Output per-object table (.csv, .tsv, .txt, .parquet, .pq).")]
    pub table: Option<String>,

    #[arg(
        short = 'm',
        long,
        num_args = 1..,
        help = "Metrics to evaluate. One or more of J (region), F (boundary), T (temporal stability).",
        default_values = ["J", "F"]
    )]
    pub metrics: Vec<String>,

    #[arg(short = 'y', long, help = "Dataset year (2016, 2017).", default_value = "2017")]
    pub year: String,

    #[arg(
        short = 'p',
        long,
        help = "Dataset phase (train, val, trainval, test-dev).",
        default_value = "val"
    )]
    pub phase: String,

    #[arg(long, help = "Merge all objects of a frame into a single object.")]
    pub single_object: bool,

    #[arg(
        long,
        help = "Boundary tolerance as a fraction of the image diagonal, or a radius in pixels if >= 1.",
        default_value_t = constant::DEFAULT_BOUNDARY_THRESHOLD
    )]
    pub boundary_threshold: f64,

    #[arg(
        long,
        help = "Objects with a mean score at or above this value count towards recall.",
        default_value_t = constant::DEFAULT_RECALL_THRESHOLD
    )]
    pub recall_threshold: f64,

    #[arg(
        long,
        help = "Number of temporal bins used to compute decay.",
        default_value_t = constant::DEFAULT_DECAY_BINS
    )]
    pub decay_bins: usize,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

fn exit_with(message: &str) -> ! {
    eprintln!("[veval::evaluate] ERROR: {}", message);
    std::process::exit(1);
}

pub fn evaluate(args: &EvaluateArgs) {
    if let Some(threads) = args.threads {
        if threads < 1 {
            exit_with("Threads must be set to a positive integer if provided.");
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap_or_else(|err| exit_with(&err.to_string()));
    }

    let metrics = args
        .metrics
        .iter()
        .map(|metric| metric.parse::<Metric>())
        .collect::<Result<Vec<Metric>, _>>()
        .unwrap_or_else(|err| exit_with(&err.to_string()));

    let variant = DatasetVariant::parse(&args.year, &args.phase)
        .unwrap_or_else(|err| exit_with(&err.to_string()));

    let config = EvalConfig {
        boundary_threshold: args.boundary_threshold,
        recall_threshold: args.recall_threshold,
        decay_bins: args.decay_bins,
        single_object: args.single_object,
        verbose: args.verbose,
        ..EvalConfig::with_metrics(&metrics)
    };

    if let Err(err) = config.validate() {
        exit_with(&err.to_string());
    }

    for (path, formats) in [
        (&args.output, constant::SUPPORTED_RESULT_FORMATS.as_slice()),
        (&args.table, constant::SUPPORTED_TABLE_FORMATS.as_slice()),
    ] {
        if let Some(path) = path {
            if let Err(err) = ut::path::check_output_path(path, formats) {
                exit_with(&err.to_string());
            }
        }
    }

    let (Some(input), Some(davis)) = (args.input.as_deref(), args.davis.as_deref()) else {
        exit_with("Both an input and a dataset directory must be provided.");
    };

    let dataset = io::load_dataset(davis, variant, args.single_object, args.verbose)
        .unwrap_or_else(|err| exit_with(&err.to_string()));

    if dataset.is_empty() {
        exit_with("No sequences were listed for the requested year and phase.");
    }

    let segmentations = io::load_segmentations(input, &dataset, args.single_object, args.verbose)
        .unwrap_or_else(|err| exit_with(&err.to_string()));

    let result = ev::evaluate(&dataset, &segmentations, &config)
        .unwrap_or_else(|err| exit_with(&err.to_string()));

    let method = Path::new(input)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| input.to_string());

    summary_table(&method, &result, &metrics, &config.statistics).printstd();

    if let Some(output) = &args.output {
        ut::track::progress_log(&format!("Saving results in: {}", output), args.verbose);
        if let Err(err) = result.save(output) {
            exit_with(&err.to_string());
        }
    }

    if let Some(table) = &args.table {
        ut::track::progress_log(&format!("Saving object table in: {}", table), args.verbose);
        if let Err(err) = result.write_table(table) {
            exit_with(&err.to_string());
        }
    }
}

/// Table of dataset-level statistics with three decimals
///
/// Undefined statistics are shown as `-`.
pub fn summary_table(
    method: &str,
    result: &EvaluationResult,
    metrics: &[Metric],
    statistics: &[Statistic],
) -> Table {
    let mut header = vec![Cell::new("Method").style_spec("b")];
    let mut values = vec![Cell::new(method)];

    for &metric in metrics {
        for &statistic in statistics {
            header.push(Cell::new(&format!("{}_{}", metric, statistic)).style_spec("b"));
            values.push(Cell::new(
                &result
                    .get(metric, statistic)
                    .map(|value| format!("{:.3}", value))
                    .unwrap_or_else(|| "-".to_string()),
            ));
        }
    }

    let mut table = Table::new();
    table.set_titles(Row::new(header));
    table.add_row(Row::new(values));
    table
}
