// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

#![allow(dead_code)]

use clap::{Parser, Subcommand};

use veval_cli::{compare, evaluate};

#[derive(Parser)]
#[command(name = "veval", version, about, long_about = None)]
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
    clap_markdown::print_help_markdown::<Cli>();
}
