//! `crashviz` - CLI for the aviation accident chart battery
//!
//! Prints the progress report and summary on stdout; diagnostics go to
//! stderr through `tracing`.

#![deny(unsafe_code)]

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crashviz::cli::Cli;
use crashviz::{battery, init_logging, load_and_prepare, Config, StaticChartRenderer};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    battery::write_banner(&mut out)?;

    let dataset = load_and_prepare(&config.input)?;
    info!(
        rows = dataset.load.rows,
        malformed = dataset.load.malformed_rows,
        kept = dataset.prepare.kept,
        "dataset prepared"
    );

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "creating output directory {}",
            config.output_dir.display()
        )
    })?;

    let renderer = StaticChartRenderer::new(&config.render);
    let report = battery::run(&dataset, &config, &renderer, &mut out)?;

    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report.summary)?)?;
    }
    out.flush()?;
    Ok(())
}
