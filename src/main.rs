use anyhow::Result;
use clap::Parser;
use visaid::app::{run_once_command, run_walk_command};
use visaid::cli::{Cli, Commands};
use visaid::config::Config;
use visaid::diagnostics::check_dependencies;
use visaid::pipeline::CameraSelector;

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match cli.command.take() {
        Some(Commands::Once) => {
            let config = load_config(&cli)?;
            run_once_command(config, cli.quiet).await?;
        }
        Some(Commands::Walk { interval }) => {
            let config = load_config(&cli)?;
            run_walk_command(config, interval, cli.quiet).await?;
        }
        // Walk mode is the default
        None => {
            let config = load_config(&cli)?;
            run_walk_command(config, None, cli.quiet).await?;
        }
        Some(Commands::Check) => {
            if !check_dependencies() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("visaid={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    let mut config = config.with_env_overrides();

    if let Some(camera) = &cli.camera {
        config.camera.selector = match camera.as_str() {
            "back" => CameraSelector::Back,
            "front" => CameraSelector::Front,
            other => anyhow::bail!("unknown camera '{}' (expected back or front)", other),
        };
    }

    Ok(config)
}
