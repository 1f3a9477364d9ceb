use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tma_statistics::cli::{Cli, Commands};
use tma_statistics::dataset::Dataset;
use tma_statistics::report::{self, json, summary, tsv};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report(args) => {
            let dataset = Dataset::load(&args.input)?;
            let analysis = report::run_analysis(&dataset)?;

            std::fs::create_dir_all(&args.out)
                .with_context(|| format!("failed to create {}", args.out.display()))?;
            if args.json {
                let path = args.out.join("report.json");
                json::write_json(&path, &analysis)?;
                tracing::info!(path = %path.display(), "report written");
            }
            if args.tsv {
                let path = args.out.join("descriptives.tsv");
                tsv::write_tsv(&path, &analysis)?;
                tracing::info!(path = %path.display(), "descriptives written");
            }

            print!("{}", summary::format_summary(&analysis));
        }
        Commands::Validate(args) => {
            let dataset = Dataset::load(&args.input)?;
            println!("tma-statistics validate ok");
            println!("spots: {}", dataset.n_rows());
            println!("cases: {}", dataset.n_cases());
            println!("columns: {}", Dataset::n_columns());
            println!("spots without grade: {}", dataset.missing_grade_rows());
        }
    }

    Ok(())
}
