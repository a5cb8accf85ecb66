use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use ecobalance::{
    catalogue::{Catalogue, CatalogueLoader, Reserve},
    config::AppConfig,
    dashboard::{Dashboard, RunRequest},
    report::ReportWriter,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Tiger reserve eco-balance simulator")]
struct Cli {
    /// Path to the YAML config (defaults are used when it is missing)
    #[arg(long, default_value = "config/ecobalance.yaml")]
    config: PathBuf,

    /// Override the catalogue file from the config
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the reserves in the catalogue
    List,
    /// Show insights, spatial summary and recommendations for a reserve
    Dashboard {
        /// Reserve name (first catalogue entry when omitted)
        #[arg(long)]
        reserve: Option<String>,
    },
    /// Run the population simulation for a reserve
    Simulate {
        /// Reserve name (first catalogue entry when omitted)
        #[arg(long)]
        reserve: Option<String>,

        /// Master seed for the noise streams
        #[arg(long)]
        seed: Option<u64>,

        /// Number of simulated months
        #[arg(long)]
        horizon: Option<usize>,

        /// Disable the stochastic perturbation
        #[arg(long)]
        no_noise: bool,

        /// Directory for the JSON report (overrides `report_dir` from the config)
        #[arg(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the report instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Serve the dashboard JSON API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(&cli.config)?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(path) = cli.catalogue {
        config.catalogue_path = path;
    }
    let catalogue = CatalogueLoader::new(".").load(&config.catalogue_path)?;
    info!(
        "loaded {} reserves from {}",
        catalogue.len(),
        config.catalogue_path.display()
    );

    match cli.command {
        Command::List => {
            for reserve in catalogue.reserves() {
                println!(
                    "{:>3}  {:<28} {:<26} {:>9.2} km²  density {}",
                    reserve.id, reserve.name, reserve.region, reserve.total_area, reserve.tiger_density
                );
            }
        }
        Command::Dashboard { reserve } => {
            let reserve = select(&catalogue, reserve.as_deref())?;
            let dashboard = Dashboard::for_reserve(reserve);
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        }
        Command::Simulate {
            reserve,
            seed,
            horizon,
            no_noise,
            output,
            stdout,
        } => {
            let reserve = select(&catalogue, reserve.as_deref())?;
            let horizon = horizon.unwrap_or(config.horizon);
            config.check_horizon(horizon)?;
            let request = RunRequest {
                seed: seed.or(config.seed),
                horizon,
                noise: config.noise && !no_noise,
            };
            let report = request.execute(reserve, &config.coefficients)?;
            if stdout {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let path = ReportWriter::new(config.report_dir_or(output)).write(&report)?;
                println!("Report for '{}' written to {}", reserve.name, path.display());
            }
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
            runtime.block_on(web::run(WebServerConfig { config, catalogue }))?;
        }
    }
    Ok(())
}

fn select<'a>(
    catalogue: &'a Catalogue,
    name: Option<&str>,
) -> Result<&'a Reserve> {
    match name {
        Some(name) => Ok(catalogue.find(name)?),
        None => catalogue
            .default_reserve()
            .context("catalogue has no reserves"),
    }
}
