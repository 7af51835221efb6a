use anyhow::{Context, Result};
use cgprobe_cli::{logging::init_logging, Report};
use cgprobe_core::config::OutputFormat;
use cgprobe_core::{ProbeConfig, VERSION};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// cgprobe - cgroup topology detection
///
/// Reports whether the host uses cgroup v1 (legacy or hybrid) or cgroup v2,
/// and where each v1 controller is mounted
#[derive(Parser, Debug)]
#[command(name = "cgprobe")]
#[command(version = VERSION)]
#[command(about = "Detect the cgroup topology of a Linux host", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/cgprobe/config.toml")]
    config: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect the cgroup topology (default)
    Detect {
        /// Mount table to read instead of the configured one
        #[arg(long)]
        mountinfo: Option<PathBuf>,

        /// Hierarchy table to read instead of the configured one
        #[arg(long)]
        cgroups: Option<PathBuf>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Output path for config file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, loaded) = load_config(&cli.config)?;
    config.validate().context("Configuration validation failed")?;

    let _guard = init_logging(&config.logging)?;

    info!("cgprobe v{} starting", VERSION);
    if loaded {
        debug!("Configuration loaded from {:?}", cli.config);
    } else {
        warn!("Configuration file not found: {:?}, using defaults", cli.config);
    }

    match cli.command {
        Some(Commands::Detect {
            mountinfo,
            cgroups,
            json,
        }) => run_detect(config, mountinfo, cgroups, json),
        Some(Commands::GenerateConfig { output }) => generate_config(&output),
        None => run_detect(config, None, None, false),
    }
}

/// Run one detection and print the verdict
fn run_detect(
    mut config: ProbeConfig,
    mountinfo: Option<PathBuf>,
    cgroups: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if let Some(path) = mountinfo {
        config.sources.mountinfo = path;
    }
    if let Some(path) = cgroups {
        config.sources.cgroups = path;
    }
    if json {
        config.output.format = OutputFormat::Json;
    }

    info!(
        "Reading {:?} and {:?}",
        config.sources.mountinfo, config.sources.cgroups
    );

    let result = config.detect().context("Cgroup detection failed")?;
    let report = Report::from_result(result.as_ref());

    match config.output.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => print!("{}", report.to_text()),
    }

    Ok(())
}

/// Generate default configuration file
fn generate_config(output: &Path) -> Result<()> {
    info!("Generating default configuration file: {:?}", output);

    ProbeConfig::default()
        .save_to_file(output)
        .with_context(|| format!("Failed to save configuration file {:?}", output))?;

    info!("Configuration file generated successfully");
    Ok(())
}

/// Load configuration from file or use defaults
fn load_config(path: &Path) -> Result<(ProbeConfig, bool)> {
    if path.exists() {
        let config = ProbeConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {:?}", path))?;
        Ok((config, true))
    } else {
        Ok((ProbeConfig::default(), false))
    }
}
