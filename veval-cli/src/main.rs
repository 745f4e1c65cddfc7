// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Parser, Subcommand};
use veval_cli::{compare, evaluate};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Evaluate(evaluate::EvaluateArgs),
    Compare(compare::CompareArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Evaluate(evaluate_args)) => evaluate::evaluate(evaluate_args),
        Some(Commands::Compare(compare_args)) => compare::compare(compare_args),
        None => {}
    }
}
