//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::image::background::RulePreset;

/// Turn a solid-background logo into a transparent PNG.
///
/// With no arguments, reads `assets/logo_black.png`, drops the near-black
/// background and writes `assets/logo.png`.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Input image (default depends on rule)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Output PNG path (default: assets/logo.png)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Classification rule
    #[arg(short, long, value_enum)]
    pub rule: Option<RulePreset>,

    /// Config file path (default: nobg.toml)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Classify only, print pixel counts and write nothing
    #[arg(short, long)]
    pub dry: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
