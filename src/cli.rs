use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tma-statistics", version, about = "TMA p53 scoring-method analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the analysis battery and print the summary
    Report(ReportArgs),
    /// Load and validate the spot table without analyzing it
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(long, help = "Spot table (CSV)")]
    pub input: PathBuf,

    #[arg(long, help = "Output directory for report artifacts")]
    pub out: PathBuf,

    #[arg(long, default_value_t = false, help = "Write report.json")]
    pub json: bool,

    #[arg(long, default_value_t = false, help = "Write descriptives.tsv")]
    pub tsv: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Spot table (CSV)")]
    pub input: PathBuf,
}
