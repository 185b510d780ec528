//! `vegsoil` command-line entry point.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use vegsoil_client::{RecordingClient, RestClient};
use vegsoil_runner::script::{dry_run_project, resolve_auth, resolve_project, Plan};
use vegsoil_runner::{load_config, run, Result, RunConfig};

#[derive(Parser)]
#[command(name = "vegsoil")]
#[command(author, version, about = "Export CONUS NDVI and SMAP composites from Earth Engine", long_about = None)]
struct Cli {
    /// YAML configuration file (defaults reproduce the standard exports)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register map layers and submit both export tasks
    Run {
        /// Cloud project (overrides the config file)
        #[arg(long)]
        project: Option<String>,
        /// OAuth2 access token (defaults to $EE_ACCESS_TOKEN)
        #[arg(long)]
        token: Option<String>,
        /// Record requests locally instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print every request body as JSON without contacting the service
    Plan,
    /// Print the default configuration as YAML
    DefaultConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };

    match cli.command {
        Commands::Run {
            project,
            token,
            dry_run,
        } => {
            let summary = if dry_run {
                let client = RecordingClient::new(dry_run_project(project, &config));
                run(&config, &client)?
            } else {
                let project = resolve_project(project, &config)?;
                let auth = resolve_auth(token, &project)?;
                let client = RestClient::with_base_url(project, config.api_base_url.as_str(), auth)?;
                run(&config, &client)?
            };

            for layer in &summary.layers {
                println!("layer  {}  {}", layer.label, layer.tile_url);
            }
            for task in &summary.tasks {
                println!("task   {}  {:?}  {}", task.description, task.state, task.name);
            }
        }
        Commands::Plan => {
            let plan = Plan::from_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&plan.to_json()?)?);
        }
        Commands::DefaultConfig => {
            print!("{}", serde_yaml::to_string(&RunConfig::default())?);
        }
    }

    Ok(())
}
