//! Dashboard configuration.
//!
//! Resolution order, later wins: built-in defaults, the optional JSON config
//! file, command line flags.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;
use crate::data::density::PlotTheme;

/// Table picked up from the working directory when no path is configured.
pub const DEFAULT_DATA_FILE: &str = "penguins.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid slider range: min {min} must be below max {max}, both finite")]
    InvalidRange { min: f64, max: f64 },
}

/// Which dashboard to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Slider and summary table.
    #[default]
    Basic,
    /// Adds the density plot and a reset button.
    Rich,
}

impl Variant {
    pub fn default_threshold(self) -> f64 {
        match self {
            Variant::Basic => 3000.0,
            Variant::Rich => 6000.0,
        }
    }

    pub fn has_plot(self) -> bool {
        self == Variant::Rich
    }

    pub fn has_reset(self) -> bool {
        self == Variant::Rich
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl SliderConfig {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            min: 2000.0,
            max: 8000.0,
            default: variant.default_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub variant: Variant,
    pub slider: SliderConfig,
    pub theme: PlotTheme,
    /// Table to load at startup, if any.
    pub data_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Basic,
            slider: SliderConfig::for_variant(Variant::Basic),
            theme: PlotTheme::Light,
            data_path: None,
        }
    }
}

/// On-disk shape; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    variant: Option<Variant>,
    data: Option<PathBuf>,
    theme: Option<PlotTheme>,
    #[serde(default)]
    slider: SliderFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SliderFile {
    min: Option<f64>,
    max: Option<f64>,
    default: Option<f64>,
}

impl DashboardConfig {
    /// Build the effective configuration from the command line and, when
    /// given, its config file.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => read_file(path)?,
            None => ConfigFile::default(),
        };
        Self::merge(file, cli)
    }

    /// Parse a config file's contents on their own, without CLI overrides.
    #[cfg(test)]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file = parse_file(Path::new("<inline>"), text)?;
        Self::merge(file, &Cli::default())
    }

    fn merge(file: ConfigFile, cli: &Cli) -> Result<Self, ConfigError> {
        let variant = cli.variant.or(file.variant).unwrap_or_default();
        let base = SliderConfig::for_variant(variant);

        let min = file.slider.min.unwrap_or(base.min);
        let max = file.slider.max.unwrap_or(base.max);
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ConfigError::InvalidRange { min, max });
        }

        let requested = cli
            .threshold
            .or(file.slider.default)
            .unwrap_or(base.default);
        let default = if !requested.is_nan() {
            requested.clamp(min, max)
        } else {
            base.default.clamp(min, max)
        };
        if default != requested {
            log::warn!("initial threshold {requested} adjusted to {default} for range [{min}, {max}]");
        }

        Ok(Self {
            variant,
            slider: SliderConfig { min, max, default },
            theme: file.theme.unwrap_or_default(),
            data_path: cli.data.clone().or(file.data),
        })
    }
}

fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_file(path, &text)
}

fn parse_file(path: &Path, text: &str) -> Result<ConfigFile, ConfigError> {
    serde_json::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
