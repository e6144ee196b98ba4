use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use iprkit::config::Config;
use iprkit::databases::DatabaseLoader;
use iprkit::input::{apply_default_units, UnitKeys};

/// iprkit - database plugins and input helpers for property calculations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every database and report which ones failed
    Databases {
        /// Database root directory (overrides the config file)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Fill in default unit labels for a YAML parameter file
    Units {
        /// YAML mapping of input parameters; starts empty when omitted
        file: Option<PathBuf>,

        #[arg(long)]
        length_key: Option<String>,

        #[arg(long)]
        energy_key: Option<String>,

        #[arg(long)]
        pressure_key: Option<String>,

        #[arg(long)]
        force_key: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so command output stays clean on stdout
    let log_level = if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    let config = if let Some(config_path) = &args.config {
        Config::load_from_file(config_path)?
    } else {
        Config::load_default()?
    };

    match args.command {
        Command::Databases { dir } => run_databases(config, dir),
        Command::Units {
            file,
            length_key,
            energy_key,
            pressure_key,
            force_key,
        } => {
            let mut keys = config.units;
            if let Some(key) = length_key {
                keys = keys.with_length_key(key);
            }
            if let Some(key) = energy_key {
                keys = keys.with_energy_key(key);
            }
            if let Some(key) = pressure_key {
                keys = keys.with_pressure_key(key);
            }
            if let Some(key) = force_key {
                keys = keys.with_force_key(key);
            }
            run_units(file, &keys)
        }
    }
}

fn run_databases(mut config: Config, dir: Option<PathBuf>) -> Result<()> {
    if dir.is_some() {
        config.databases.dir = dir;
    }

    let loader = DatabaseLoader::from_config(&config.databases)?;
    debug!("Scanning {}", loader.root().display());
    let catalog = loader.load();

    println!("Loaded databases ({}):", catalog.len());
    for (name, database) in catalog.iter() {
        let meta = database.metadata();
        println!("  {name} [{}] {}", meta.style, meta.description);
    }

    if catalog.has_failures() {
        println!("Failed databases ({}):", catalog.failed().len());
        for failed in catalog.failed() {
            println!("  {}: {}", failed.name, failed.error);
        }
    }

    Ok(())
}

fn run_units(file: Option<PathBuf>, keys: &UnitKeys) -> Result<()> {
    let mut params: BTreeMap<String, serde_yaml::Value> = match &file {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
        }
        None => BTreeMap::new(),
    };

    apply_default_units(&mut params, keys);

    let output = serde_yaml::to_string(&params).context("Failed to serialize parameters")?;
    print!("{output}");

    Ok(())
}
