//! Command-line interface for the `crashviz` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::logging::Verbosity;

/// crashviz - Aviation accident analysis and chart battery
///
/// Loads the historical aviation accident dataset, derives per-crash
/// severity measures and writes ten PNG charts plus a summary.
#[derive(Debug, Parser)]
#[command(name = "crashviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Accident dataset (Latin-1 CSV)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Directory receiving the chart images
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Raster resolution of the charts
    #[arg(long, value_name = "N")]
    pub dpi: Option<u32>,

    /// Path to custom configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Debug,
            }
        }
    }

    /// Apply explicit flags on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dpi) = self.dpi {
            config.render.dpi = dpi;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "crashviz");
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["crashviz"]).unwrap();
        assert!(cli.input.is_none());
        assert!(!cli.json);
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "crashviz",
            "crashes.csv",
            "-o",
            "out",
            "--dpi",
            "150",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("crashes.csv")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.dpi, Some(150));
        assert!(cli.json);
        assert_eq!(cli.verbosity(), Verbosity::Debug);
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        let cli = Cli::try_parse_from(["crashviz", "-q", "-v"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_overrides_only_touch_given_flags() {
        let cli = Cli::try_parse_from(["crashviz", "--dpi", "72"]).unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.render.dpi, 72);
        assert_eq!(config.input, Config::default().input);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }
}
