//! loanprep: Loan Data Preparation CLI Tool
//!
//! Cleans a raw loan-application extract, selects application-time features,
//! and writes out-of-time training and test partitions.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use loanprep::cli::{run_inspect, Cli, Commands};
use loanprep::pipeline::{
    estimated_size_mb, load_dataset, write_artifacts, ArtifactPaths, PrepConfig, PrepPipeline,
};
use loanprep::report::PrepSummary;
use loanprep::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_banner, print_completion,
    print_config, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base = cli.base_config()?;

    match &cli.command {
        Some(Commands::Inspect {
            train,
            test,
            numeric_columns,
        }) => run_inspect(
            train.as_ref().unwrap_or(&base.train_output),
            test.as_ref().unwrap_or(&base.test_output),
            numeric_columns
                .as_ref()
                .unwrap_or(&base.numeric_columns_output),
        ),
        Some(Commands::Build(args)) => run_build(args.apply_to(base)),
        None => run_build(cli.build.apply_to(base)),
    }
}

/// Install the fmt subscriber. RUST_LOG wins over the verbosity flag.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_build(config: PrepConfig) -> Result<()> {
    // Validate before printing anything so configuration errors fail fast
    let pipeline = PrepPipeline::from_config(config)?;
    let config = pipeline.config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(config);

    // Step 1: Load dataset
    print_step_header(1, "Load Data");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading input file...");
    let df = match load_dataset(
        &config.input,
        config.infer_schema_length,
        &pipeline.text_columns(),
    ) {
        Ok(df) => df,
        Err(e) => {
            finish_with_failure(&spinner, "Failed to load dataset");
            return Err(e);
        }
    };
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols) = df.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", estimated_size_mb(&df));

    let mut summary = PrepSummary::new(rows, cols);
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Clean, select, and split
    print_step_header(2, "Prepare Features");
    let step_start = Instant::now();
    print_info(&format!("Running stages: {}", pipeline.stage_names().join(" → ")));
    let mut output = pipeline.run(df)?;
    summary.add_output(&output);
    print_success(&format!(
        "{} training rows, {} test rows, {} numeric features",
        output.train.height(),
        output.oos.height(),
        output.numeric_columns.len()
    ));
    print_step_time(step_start.elapsed());

    // Step 3: Write artifacts
    print_step_header(3, "Save Results");
    let step_start = Instant::now();
    let spinner = create_spinner("Writing artifacts...");
    let paths = ArtifactPaths {
        train: config.train_output.clone(),
        test: config.test_output.clone(),
        numeric_columns: config.numeric_columns_output.clone(),
    };
    if let Err(e) = write_artifacts(
        &mut output.train,
        &mut output.oos,
        &output.numeric_columns,
        &paths,
    ) {
        finish_with_failure(&spinner, "Failed to write artifacts");
        return Err(e);
    }
    finish_with_success(&spinner, "Artifacts written");
    let write_elapsed = step_start.elapsed();
    summary.set_write_time(write_elapsed);
    print_step_time(write_elapsed);

    summary.display();
    print_completion();

    Ok(())
}
