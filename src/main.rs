use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;

use pharmcalc::catalog::{self, Category};
use pharmcalc::config::Config;
use pharmcalc::distribution::{self, MeasurementMode, ParticleSizeInput, ProfilePoint, SieveRow};
use pharmcalc::presentation;
use pharmcalc::units::{self, Unit};

#[derive(Parser)]
#[command(name = "pharmcalc")]
#[command(about = "Pharmaceutical calculations: particle size, dissolution, unit conversion")]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Sieve,
    Laser,
}

#[derive(Subcommand)]
enum Command {
    /// D10/D50/D90, span and surface area from sieve or laser diffraction rows
    ParticleSize {
        /// CSV with `size,percent` rows
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "sieve")]
        mode: Mode,

        /// True density in g/cm³ for specific surface area
        #[arg(short, long)]
        density: Option<f64>,

        /// Write a JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the cumulative undersize curve as CSV here
        #[arg(long)]
        curve: Option<PathBuf>,
    },

    /// T50/T90 and dissolution efficiency, optionally f1/f2 against a reference
    Dissolution {
        /// CSV with `time,percent` rows
        #[arg(short, long)]
        input: PathBuf,

        /// Reference profile for f1/f2 comparison
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Write a JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a value between mass, volume or concentration units
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        from: String,
        to: String,

        /// Molar mass in g/mol, needed between molar and mass concentrations
        #[arg(long)]
        molar_mass: Option<f64>,
    },

    /// List the available calculator tools
    Catalog {
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = match &cli.config {
        Some(path) => {
            let config = Config::from_file(path)
                .with_context(|| format!("loading configuration from {:?}", path))?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::default(),
    };

    match cli.command {
        Command::ParticleSize { input, mode, density, output, curve } => {
            let rows: Vec<SieveRow> = pharmcalc::io::read_rows(&input)
                .with_context(|| format!("reading size rows from {:?}", input))?;
            let mode = match mode {
                Mode::Sieve => MeasurementMode::Sieve,
                Mode::Laser => MeasurementMode::LaserDiffraction,
            };
            let request = ParticleSizeInput { mode, rows, density };
            let report = distribution::particle::analyze(&request, &config.distribution)?;

            print!("{}", presentation::formatted(&report, &config.format));
            if let Some(path) = output {
                pharmcalc::io::save_report("particle-size", &report, &path)?;
            }
            if let Some(path) = curve {
                pharmcalc::io::save_curve(&report.cumulative_undersize, "SIZE_UM", &path)?;
            }
        }
        Command::Dissolution { input, reference, output } => {
            let points: Vec<ProfilePoint> = pharmcalc::io::read_rows(&input)
                .with_context(|| format!("reading profile from {:?}", input))?;
            let report = distribution::dissolution::analyze(&points, &config.distribution)?;
            print!("{}", presentation::formatted(&report, &config.format));

            let similarity = match reference {
                Some(path) => {
                    let reference: Vec<ProfilePoint> = pharmcalc::io::read_rows(&path)
                        .with_context(|| format!("reading reference profile from {:?}", path))?;
                    let similarity = distribution::dissolution::similarity(&reference, &points)?;
                    print!("{}", presentation::formatted(&similarity, &config.format));
                    Some(similarity)
                }
                None => None,
            };

            if let Some(path) = output {
                let combined = serde_json::json!({ "profile": report, "similarity": similarity });
                pharmcalc::io::save_report("dissolution", &combined, &path)?;
            }
        }
        Command::Convert { value, from, to, molar_mass } => {
            let from: Unit = from.parse()?;
            let to: Unit = to.parse()?;
            let converted = units::convert(value, from, to, molar_mass)?;
            println!(
                "{} {} = {} {}",
                presentation::format_value(value, &config.format),
                from,
                presentation::format_value(converted, &config.format),
                to
            );
        }
        Command::Catalog { category } => {
            let categories = match category {
                Some(name) => vec![name.parse::<Category>()?],
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                println!("{}", category);
                for tool in catalog::by_category(category) {
                    println!("  {:<28} {}", tool.name, tool.route);
                }
            }
        }
    }

    Ok(())
}
