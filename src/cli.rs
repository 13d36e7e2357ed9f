//! Command line arguments using clap

use std::path::PathBuf;

use clap::Parser;

use crate::config::Variant;

/// Palmer penguins body-mass dashboard
#[derive(Parser, Debug, Default)]
#[command(name = "penguin-dash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Penguin table to open at startup (.csv, .json or .parquet)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Dashboard layout
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    /// Initial body mass threshold in grams
    #[arg(long)]
    pub threshold: Option<f64>,
}
