// src/main.rs

mod cli;

use anyhow::{Context, Result};
use buckaroo::config::{self, Config};
use buckaroo::executor::WorkerPools;
use buckaroo::pipeline::{self, Outcome};
use buckaroo::routine::Command;
use buckaroo::telemetry::{PendingUplink, Uplink};
use buckaroo::terminal::TerminalBuffer;
use clap::Parser;
use clap::error::ErrorKind;
use cli::{Cli, Commands};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DOCS_URL: &str = "https://github.com/LoopPerfect/buckaroo/wiki";

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

fn main() -> ExitCode {
    // Logs go to stderr so they never tear the repainted region on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            println!("Uh oh!");
            println!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let Some(command) = cli.command else {
        println!("Buck, Buck, Buckaroo! \u{1F920}");
        println!("{DOCS_URL}");
        return ExitCode::SUCCESS;
    };

    match run(cli.config, command) {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::Failed(_)) => ExitCode::from(1),
        Err(e) => {
            println!("Uh oh!");
            println!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<PathBuf>, command: Commands) -> Result<Outcome> {
    let home = config::home_dir()?;
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&config::default_config_path()?)?,
    };

    let registry = Arc::new(config.registry(&home)?);
    let working_dir =
        std::env::current_dir().context("Failed to determine the working directory")?;
    let settings = config.render_settings(&working_dir);

    let pools = WorkerPools::new(config.io_threads).context("Failed to start worker pools")?;
    let executors = pools.executors();
    let raw_command = raw_command(std::env::args());
    info!("Running: {}", raw_command);

    let outcome = pools.block_on(async {
        let uplink = match &config.telemetry_url {
            Some(url) => match Uplink::new(url.clone()) {
                Ok(uplink) => uplink.send(&raw_command),
                Err(e) => {
                    warn!("Telemetry disabled: {}", e);
                    PendingUplink::disabled()
                }
            },
            None => PendingUplink::disabled(),
        };

        let routine = Command::from(command).routine(registry);
        let mut terminal = TerminalBuffer::stdout();
        let outcome = pipeline::run(routine, &mut terminal, &settings, &executors).await;

        uplink.settle(config.telemetry_wait()).await;
        outcome
    });

    pools.shutdown(SHUTDOWN_TIMEOUT);
    Ok(outcome)
}

/// The command line as the user typed it, without the program name
fn raw_command(args: impl IntoIterator<Item = String>) -> String {
    args.into_iter().skip(1).collect::<Vec<_>>().join(" ")
}
