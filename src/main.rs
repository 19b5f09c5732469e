//! hullforge: generate, sweep and inspect parametric hulls.
//!
//! # Logging
//!
//! Set `RUST_LOG` to control log output, or use `-v` / `-vv`:
//! - `RUST_LOG=hullforge=info` - one summary line per stage
//! - `RUST_LOG=hullforge=debug` - station, feature and measurement detail
//!
//! # Example
//!
//! ```bash
//! hullforge generate --preset gcsc_default -o hull.stl --report report.json
//! hullforge sweep --preset sleek
//! hullforge params
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hullforge::hull::params::{PARAMETERS, Preset};
use hullforge::hull::pipeline::{Perturbation, default_perturbations, sweep};
use hullforge::hull::validate::SignatureBand;
use hullforge::hull::{FixedInterfaceSpec, generate};
use hullforge::io;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Parametric hull generator with a fixed mechanical interface.
#[derive(Parser)]
#[command(name = "hullforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase output verbosity (-v for info, -vv for debug)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a hull, validate it and optionally export it
    Generate {
        /// Built-in preset name
        #[arg(long, default_value = "gcsc_default", conflicts_with = "preset_file")]
        preset: String,

        /// JSON preset file
        #[arg(long)]
        preset_file: Option<PathBuf>,

        /// Parameter override, NAME=VALUE (repeatable)
        #[arg(long = "set", value_parser = parse_override)]
        overrides: Vec<(String, f64)>,

        /// STL output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write ASCII instead of binary STL
        #[arg(long)]
        ascii: bool,

        /// Validation report output path (JSON)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Regenerate under parameter perturbations and summarize the outcomes
    Sweep {
        /// Built-in preset name
        #[arg(long, default_value = "gcsc_default", conflicts_with = "preset_file")]
        preset: String,

        /// JSON preset file
        #[arg(long)]
        preset_file: Option<PathBuf>,

        /// Relative signature band
        #[arg(long, default_value = "0.03")]
        relative: f64,

        /// Absolute extent band in mm
        #[arg(long, default_value = "0.5")]
        absolute: f64,

        /// Summary output path (JSON)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List every parameter with its default, range and unit
    Params {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_override(s: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = s.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let value = value.trim().parse::<f64>().map_err(|e| format!("`{value}`: {e}"))?;
    Ok((name.trim().to_string(), value))
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "hullforge=info",
            _ => "hullforge=debug",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn load_preset(name: &str, file: Option<&PathBuf>) -> Result<Preset> {
    match file {
        Some(path) => {
            io::read_preset(path).with_context(|| format!("reading preset {}", path.display()))
        },
        None => match Preset::builtin(name) {
            Some(preset) => Ok(preset),
            None => bail!(
                "unknown preset `{name}`; built-in presets: {}",
                Preset::BUILTIN.join(", ")
            ),
        },
    }
}

fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Generate { preset, preset_file, overrides, output, ascii, report } => {
            let preset = load_preset(preset, preset_file.as_ref())?;
            let base = preset.parameter_set()?;
            let overrides: Vec<(&str, f64)> =
                overrides.iter().map(|(k, v)| (k.as_str(), *v)).collect();
            let set = Perturbation::new("cli", &overrides).apply(&base)?;
            let hull = generate(&set, &FixedInterfaceSpec::CANONICAL)?;

            for check in &hull.report.checks {
                let mark = if check.passed { "ok  " } else { "FAIL" };
                println!("{mark} {:<32} {:>12.4}  {}", check.name, check.measured, check.bound);
            }
            if let Some(path) = output {
                io::write_stl(path, &hull.solid, &preset.name, *ascii)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            if let Some(path) = report {
                io::write_json(path, &hull.report)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            println!(
                "{}: {} triangles, volume {:.1} mm3, {}",
                preset.name,
                hull.report.signature.triangle_count,
                hull.report.signature.volume,
                if hull.is_acceptable() { "acceptable" } else { "NOT acceptable" }
            );
            Ok(hull.is_acceptable())
        },
        Commands::Sweep { preset, preset_file, relative, absolute, report } => {
            let preset = load_preset(preset, preset_file.as_ref())?;
            let base = preset.parameter_set()?;
            let band = SignatureBand { relative: *relative, absolute: *absolute };
            let summary =
                sweep(&base, &FixedInterfaceSpec::CANONICAL, &default_perturbations(), band)?;
            for outcome in &summary.outcomes {
                println!(
                    "{:<16} {:?} violations={} within_band={:?}",
                    outcome.scenario,
                    outcome.status,
                    outcome.violations.len(),
                    outcome.within_band
                );
            }
            if let Some(path) = report {
                io::write_json(path, &summary)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            println!("{}/{} scenarios accepted", summary.accepted(), summary.outcomes.len());
            Ok(true)
        },
        Commands::Params { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(PARAMETERS)?);
            } else {
                for p in PARAMETERS {
                    let default =
                        p.default.map_or_else(|| "required".to_string(), |d| d.to_string());
                    println!(
                        "{:<28} {:>10} [{}, {}] {:?}  {}",
                        p.name, default, p.min, p.max, p.unit, p.doc
                    );
                }
            }
            Ok(true)
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {cause}");
            }
            ExitCode::FAILURE
        },
    }
}
