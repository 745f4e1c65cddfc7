// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::Args;

use veval_core::constant;
use veval_core::error::VevalError;
use veval_core::im::{MaskPair, VevalMask};

#[derive(Debug, Args)]
#[command(about = "Compare a single predicted mask against its ground truth.")]
pub struct CompareArgs {
    #[arg(short = 'g', long, help = "Ground-truth mask.", required = true)]
    pub ground_truth: Option<String>,

    #[arg(short = 's', long, help = "Predicted mask.", required = true)]
    pub segmentation: Option<String>,

    #[arg(long, help = "Merge all objects into a single object.")]
    pub single_object: bool,

    #[arg(
        long,
        help = "Boundary tolerance as a fraction of the image diagonal, or a radius in pixels if >= 1.",
        default_value_t = constant::DEFAULT_BOUNDARY_THRESHOLD
    )]
    pub boundary_threshold: f64,
}

pub fn compare(args: &CompareArgs) {
    let (Some(ground_truth), Some(segmentation)) =
        (args.ground_truth.as_deref(), args.segmentation.as_deref())
    else {
        eprintln!("[veval::compare] ERROR: Both a ground-truth and a predicted mask must be provided.");
        std::process::exit(1);
    };

    if !args.boundary_threshold.is_finite() || args.boundary_threshold < 0.0 {
        eprintln!("[veval::compare] ERROR: Boundary threshold must be a non-negative number.");
        std::process::exit(1);
    }

    let rows = compare_masks(
        ground_truth,
        segmentation,
        args.single_object,
        args.boundary_threshold,
    )
    .unwrap_or_else(|err| {
        eprintln!("[veval::compare] ERROR: {}", err);
        std::process::exit(1);
    });

    println!("object\tJ\tF_precision\tF_recall\tF");
    for row in rows {
        println!("{}", row);
    }
}

/// Tab separated scores of every ground-truth object in a single frame
pub fn compare_masks(
    ground_truth: &str,
    segmentation: &str,
    single_object: bool,
    boundary_threshold: f64,
) -> Result<Vec<String>, VevalError> {
    let mut truth = VevalMask::open(ground_truth)?;
    let mut prediction = VevalMask::open(segmentation)?;

    if single_object {
        truth.collapse();
        prediction.collapse();
    }

    truth
        .labels()
        .into_iter()
        .map(|label| {
            let pair = MaskPair::from_labels(&truth, &prediction, label)?;
            let boundary = pair.boundary(boundary_threshold);

            Ok(format!(
                "{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
                label,
                pair.jaccard(),
                boundary.precision,
                boundary.recall,
                boundary.f
            ))
        })
        .collect()
}
