use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use client_core::{HttpSortingService, OrchestrationState, SortWorkbench, SortingService};
use shared::domain::SortAlgorithm;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod shell;
mod ui;

use config::{load_settings, normalize_service_url, Settings};

#[derive(Parser, Debug)]
#[command(name = "sort-cli", version, about = "Run vectors through a remote sorting service")]
struct Cli {
    /// Base URL of the sorting service.
    #[arg(long, global = true)]
    service_url: Option<String>,
    /// Config file; defaults to ./sorter.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, short, global = true)]
    algorithm: Option<SortAlgorithm>,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a file and print the vector the service parsed from it.
    LoadFile {
        path: PathBuf,
        #[arg(long)]
        sort: bool,
    },
    /// Ask the service for a random vector.
    Generate {
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
        #[arg(long)]
        sort: bool,
    },
    /// Sort a comma separated list of integers.
    Sort {
        #[arg(long)]
        vector: String,
    },
    /// List the available algorithms.
    Algorithms,
    /// Interactive session.
    Shell,
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = &cli.service_url {
        settings.service_url = url.clone();
    }
    if let Some(algorithm) = cli.algorithm {
        settings.default_algorithm = algorithm;
    }
    settings.service_url = normalize_service_url(&settings.service_url)?;
    Ok(settings)
}

fn build_service(settings: &Settings) -> Result<Arc<dyn SortingService>> {
    let service = match settings.request_timeout() {
        Some(timeout) => HttpSortingService::with_timeout(&settings.service_url, timeout)
            .context("failed to build http client")?,
        None => HttpSortingService::new(&settings.service_url),
    };
    Ok(Arc::new(service))
}

async fn sort_and_print(workbench: &SortWorkbench) -> Result<()> {
    workbench.sort().await.context("sort failed")?;
    println!("{}", ui::render_state(&workbench.snapshot().await));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = resolve_settings(&cli)?;
    info!(
        service_url = %settings.service_url,
        algorithm = %settings.default_algorithm,
        "sorting service configured"
    );

    let workbench = SortWorkbench::with_state(
        build_service(&settings)?,
        OrchestrationState {
            algorithm: settings.default_algorithm,
            random_count: settings.random_count,
            ..OrchestrationState::default()
        },
    );

    match cli.command {
        Command::LoadFile { path, sort } => {
            workbench.select_file(Some(path)).await;
            workbench
                .load_from_file()
                .await
                .context("loading vector file failed")?;
            println!("{}", ui::render_state(&workbench.snapshot().await));
            if sort {
                sort_and_print(&workbench).await?;
            }
        }
        Command::Generate { count, sort } => {
            if let Some(count) = count {
                workbench.set_random_count(count).await;
            }
            workbench
                .generate_random()
                .await
                .context("random vector generation failed")?;
            println!("{}", ui::render_state(&workbench.snapshot().await));
            if sort {
                sort_and_print(&workbench).await?;
            }
        }
        Command::Sort { vector } => {
            workbench.set_vector_text(vector).await;
            sort_and_print(&workbench).await?;
        }
        Command::Algorithms => {
            println!("{}", ui::render_algorithms(settings.default_algorithm));
        }
        Command::Shell => shell::run(workbench).await?,
    }

    Ok(())
}
