//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs the log subscriber
//! - parses CLI arguments
//! - assembles the raw request (family defaults, file, `--set` overrides)
//! - runs the template pipeline
//! - prints reports or writes the SVG files

use std::env;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, DefaultsArgs, DeriveArgs, GenerateArgs, InputArgs};
use crate::domain::RawParams;
use crate::error::{AppError, EXIT_INPUT};
use crate::params::ParameterRegistry;
use crate::render::RenderOptions;

pub mod pipeline;

/// Fallback output directory when `--out` is not given.
pub const OUTPUT_DIR_ENV: &str = "NECKGEN_OUTPUT_DIR";

/// Entry point for the `neckgen` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let registry = ParameterRegistry::new();

    match cli.command {
        Command::Generate(args) => handle_generate(&registry, args),
        Command::Derive(args) => handle_derive(&registry, args),
        Command::Params => handle_params(&registry),
        Command::Defaults(args) => handle_defaults(&registry, args),
    }
}

/// Log to stderr so stdout stays clean for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; that's fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_generate(registry: &ParameterRegistry, args: GenerateArgs) -> Result<(), AppError> {
    let raw = request_from_args(registry, &args.input)?;
    let opts = render_options_from_args(&args);

    if args.json {
        let response = pipeline::generate_with(registry, &raw, &opts);
        print_json(&response)?;
        return if response.success {
            Ok(())
        } else {
            Err(AppError::new(EXIT_INPUT, "Template generation failed."))
        };
    }

    let params = pipeline::validated(registry, &raw).map_err(validation_error)?;
    let run = pipeline::run_templates(&params, &opts)?;

    let dir = output_dir(args.out.as_ref());
    let written = crate::io::export::write_views(&dir, &run.views)?;
    for path in &written {
        info!(path = %path.display(), "wrote template");
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_derive(registry: &ParameterRegistry, args: DeriveArgs) -> Result<(), AppError> {
    let raw = request_from_args(registry, &args.input)?;

    if args.json {
        let response = pipeline::derive(registry, &raw);
        print_json(&response)?;
        return if response.success {
            Ok(())
        } else {
            Err(AppError::new(EXIT_INPUT, "Derived value calculation failed."))
        };
    }

    let params = pipeline::validated(registry, &raw).map_err(validation_error)?;
    let derived = crate::derived::compute(&params)?;
    print!(
        "{}",
        crate::report::format_dimensions_table(registry, &params, &derived)
    );
    Ok(())
}

fn handle_params(registry: &ParameterRegistry) -> Result<(), AppError> {
    let json = registry
        .to_json()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to export parameters: {e}")))?;
    println!("{json}");
    Ok(())
}

fn handle_defaults(registry: &ParameterRegistry, args: DefaultsArgs) -> Result<(), AppError> {
    let params = registry.defaults_for(args.family);
    let preset = serde_json::json!({
        "name": params.instrument_name,
        "parameters": params.to_raw(),
    });

    match &args.out {
        Some(path) => crate::io::export::write_json(path, &preset),
        None => print_json(&preset),
    }
}

/// Family defaults (if any), then the request file, then `--set` overrides.
pub fn request_from_args(
    registry: &ParameterRegistry,
    args: &InputArgs,
) -> Result<RawParams, AppError> {
    let mut raw = match args.family {
        Some(family) => registry.defaults_for(family).to_raw(),
        None => RawParams::new(),
    };
    if let Some(path) = &args.params {
        raw.extend(crate::io::request::read_request(path)?);
    }
    crate::io::request::apply_overrides(&mut raw, &args.overrides)?;
    Ok(raw)
}

pub fn render_options_from_args(args: &GenerateArgs) -> RenderOptions {
    RenderOptions {
        stroke_width: args.stroke_width,
        font_family: args.font_family.clone(),
        show_labels: !args.no_labels,
    }
}

/// `--out`, else `$NECKGEN_OUTPUT_DIR`, else the current directory.
fn output_dir(flag: Option<&PathBuf>) -> PathBuf {
    flag.cloned()
        .or_else(|| env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn validation_error(errors: Vec<String>) -> AppError {
    let mut message = String::from("Invalid parameters:");
    for e in &errors {
        message.push_str("\n  - ");
        message.push_str(e);
    }
    AppError::new(EXIT_INPUT, message)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InstrumentFamily;

    fn input(family: Option<InstrumentFamily>, overrides: &[&str]) -> InputArgs {
        InputArgs {
            params: None,
            family,
            overrides: overrides.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn overrides_win_over_family_defaults() {
        let registry = ParameterRegistry::new();
        let raw = request_from_args(
            &registry,
            &input(Some(InstrumentFamily::Guitar), &["num_frets=22"]),
        )
        .unwrap();
        assert_eq!(raw["num_frets"], 22);
        assert_eq!(raw["instrument_family"], "GUITAR");
        assert!(pipeline::validated(&registry, &raw).is_ok());
    }

    #[test]
    fn empty_request_fails_validation() {
        let registry = ParameterRegistry::new();
        let raw = request_from_args(&registry, &input(None, &[])).unwrap();
        let errors = pipeline::validated(&registry, &raw).unwrap_err();
        let err = validation_error(errors);
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(err.to_string().contains("Missing required parameter"));
    }

    #[test]
    fn explicit_out_dir_wins() {
        let dir = PathBuf::from("/tmp/templates");
        assert_eq!(output_dir(Some(&dir)), dir);
    }
}
