//! Configuration management for crashviz.
//!
//! Built-in defaults reproduce the fixed chart battery. A TOML file given
//! with `--config` is merged over them, and explicit command-line flags are
//! applied last by the binary.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name of the dataset when no input path is given.
pub const DEFAULT_INPUT: &str = "Airplane_Crashes_and_Fatalities_Since_1908.csv";

const MIN_DPI: u32 = 36;
const MAX_DPI: u32 = 600;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the accident dataset.
    pub input: PathBuf,
    /// Directory receiving the `viz_*.png` files.
    pub output_dir: PathBuf,
    /// Raster settings.
    pub render: RenderConfig,
    /// Knobs of the aggregation queries.
    pub analysis: AnalysisConfig,
}

/// Raster output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Dots per inch; figure sizes are given in inches.
    pub dpi: u32,
    /// Font family handed to plotters.
    pub font_family: String,
}

/// Parameters of the aggregation queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Operators shown in the horizontal bar chart.
    pub top_operators: usize,
    /// Aircraft types shown in the donut chart.
    pub top_aircraft_types: usize,
    /// Most recent five-year periods kept in the heatmap.
    pub heatmap_periods: usize,
    /// First year included in the per-decade box plot.
    pub box_plot_min_year: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            render: RenderConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            font_family: "sans-serif".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_operators: 20,
            top_aircraft_types: 10,
            heatmap_periods: 20,
            box_plot_min_year: 1920,
        }
    }
}

impl Config {
    /// Load configuration, merging an optional TOML file over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is absent, fails to parse or holds
    /// invalid values.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(Error::ConfigValidation {
                    message: format!("config file {} does not exist", path.display()),
                });
            }
            figment = figment.merge(Toml::file(path));
        }

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DPI..=MAX_DPI).contains(&self.render.dpi) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "render.dpi must be between {MIN_DPI} and {MAX_DPI}, got {}",
                    self.render.dpi
                ),
            });
        }

        let counts = [
            ("analysis.top_operators", self.analysis.top_operators),
            ("analysis.top_aircraft_types", self.analysis.top_aircraft_types),
            ("analysis.heatmap_periods", self.analysis.heatmap_periods),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be greater than 0"),
                });
            }
        }

        Ok(())
    }

    /// Full path of a chart file inside the output directory.
    #[must_use]
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
