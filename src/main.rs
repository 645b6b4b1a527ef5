//! `pnp-gcode`: render a placement job as machine G-code.
//!
//! Commands are written to stdout (or `--output`); diagnostics go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use pnp_gcode::{Calibration, Job, MachineBuilder, PnpConfig, run_dispense, run_pick_and_place};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pnp-gcode")]
#[command(about = "Generate pick-and-place or paste dispensing G-code", long_about = None)]
#[command(version)]
struct Cli {
    /// Board and tape configuration (TOML).
    #[arg(short, long)]
    config: PathBuf,

    /// Parts to place (TOML).
    #[arg(short, long)]
    job: PathBuf,

    /// Machine calibration overrides (TOML).
    #[arg(long)]
    calibration: Option<PathBuf>,

    /// Dispense solder paste instead of placing parts.
    #[arg(short, long)]
    dispense: bool,

    /// Write commands to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comment written at the top of the output.
    #[arg(long)]
    banner: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = PnpConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let job = Job::load(&cli.job).with_context(|| format!("loading {}", cli.job.display()))?;
    let calibration = match &cli.calibration {
        Some(path) => {
            Calibration::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Calibration::default(),
    };

    let banner = cli
        .banner
        .clone()
        .unwrap_or_else(|| cli.job.display().to_string());
    let mut session = MachineBuilder::new()
        .config(config)
        .calibration(calibration)
        .banner(banner)
        .build()?;

    if cli.dispense {
        run_dispense(&mut session, &job.parts);
    } else {
        run_pick_and_place(&mut session, &job.parts);
    }
    let program = session.finish();

    match &cli.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            program.write_to(BufWriter::new(file))?;
        }
        None => program.write_to(io::stdout().lock())?,
    }
    Ok(())
}
