//! Command-line parsing for the `neckgen` template generator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline: `app` turns these structs into a raw request and render options.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::InstrumentFamily;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "neckgen",
    version,
    about = "Print-scale neck, fingerboard and radius templates (SVG)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate parameters and write side/top/cross-section SVG templates.
    Generate(GenerateArgs),
    /// Print derived measurements (taper, arc height, fret positions).
    Derive(DeriveArgs),
    /// Print the parameter definitions as JSON (for UI generation).
    Params,
    /// Print a default parameter set as a preset document.
    Defaults(DefaultsArgs),
}

/// Where the parameters come from. Later sources override earlier ones:
/// family defaults, then the file, then `--set`.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Request or preset JSON file.
    #[arg(short = 'p', long)]
    pub params: Option<PathBuf>,

    /// Start from this family's defaults instead of an empty request.
    #[arg(short = 'f', long, value_enum)]
    pub family: Option<InstrumentFamily>,

    /// Override one parameter (repeatable), e.g. `--set fingerboard_radius=42`.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory for the SVG files (falls back to $NECKGEN_OUTPUT_DIR, then ".").
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Stroke width for cut lines, in mm.
    #[arg(long, default_value_t = 0.25)]
    pub stroke_width: f64,

    /// Font family for labels.
    #[arg(long, default_value = "sans-serif")]
    pub font_family: String,

    /// Leave all text out of the SVGs.
    #[arg(long)]
    pub no_labels: bool,

    /// Print the JSON response to stdout instead of writing files.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the JSON response instead of the dimensions table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct DefaultsArgs {
    /// Instrument family to take defaults from.
    #[arg(short = 'f', long, value_enum, default_value_t = InstrumentFamily::Violin)]
    pub family: InstrumentFamily,

    /// Write the preset to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_collects_repeated_overrides() {
        let cli = Cli::try_parse_from([
            "neckgen",
            "generate",
            "--family",
            "guitar",
            "--set",
            "num_frets=22",
            "-s",
            "neck_length=480",
            "--no-labels",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.input.family, Some(InstrumentFamily::Guitar));
        assert_eq!(args.input.overrides, vec!["num_frets=22", "neck_length=480"]);
        assert!(args.no_labels);
        assert_eq!(args.stroke_width, 0.25);
    }

    #[test]
    fn defaults_family_is_optional() {
        let cli = Cli::try_parse_from(["neckgen", "defaults"]).unwrap();
        let Command::Defaults(args) = cli.command else {
            panic!("expected defaults");
        };
        assert_eq!(args.family, InstrumentFamily::Violin);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
