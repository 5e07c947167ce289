//! ccsv CLI - calculate formula grids

use anyhow::{bail, Context, Result};
use ccsv::{calculate_with_stats, CalculationOptions, DEFAULT_MAX_DEPTH, DEFAULT_SEPARATOR};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ccsv")]
#[command(
    author,
    version,
    about = "Calculate the formulas of a delimited text grid"
)]
struct Cli {
    /// Input grid file (usually *.ccsv)
    input: PathBuf,

    /// Output file (default: the input path with a .csv extension)
    output: Option<PathBuf>,

    /// Field separator
    #[arg(default_value_t = DEFAULT_SEPARATOR)]
    separator: char,

    /// Write the result to stdout instead of a file (OUTPUT is ignored)
    #[arg(long)]
    stdout: bool,

    /// Recompute every referenced formula instead of caching results
    #[arg(long)]
    no_cache: bool,

    /// Maximum depth of nested cell references
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match calculate_file(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(io::stderr)
        .init();
}

fn calculate_file(cli: &Cli) -> Result<()> {
    let input = &cli.input;
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read '{}'", input.display()))?;

    let options = CalculationOptions {
        separator: cli.separator,
        memoize: !cli.no_cache,
        max_depth: cli.max_depth,
    };
    let (output, stats) = calculate_with_stats(&text, &options)
        .with_context(|| format!("failed to calculate '{}'", input.display()))?;

    tracing::info!(
        input = %input.display(),
        rows = stats.rows,
        formulas = stats.formula_count,
        cells_evaluated = stats.cells_evaluated,
        cache_hits = stats.cache_hits,
        "calculated grid"
    );

    if cli.stdout {
        io::stdout()
            .write_all(output.as_bytes())
            .context("failed to write to stdout")?;
        return Ok(());
    }

    let output_path = output_path(input, cli.output.as_deref())?;
    std::fs::write(&output_path, output)
        .with_context(|| format!("failed to write '{}'", output_path.display()))?;
    println!("saved to {}", output_path.display());

    Ok(())
}

/// Pick the output file, refusing to overwrite the input
fn output_path(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("csv"),
    };
    if path == input {
        bail!(
            "output '{}' would overwrite the input; pass an output path",
            path.display()
        );
    }
    Ok(path)
}
