use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchdeck::charts;
use matchdeck::client::{MatchService, MatcherClient};
use matchdeck::config::Config;
use matchdeck::dashboard::shape_fit_distribution;

#[derive(Parser)]
#[command(
    name = "matchdeck",
    version,
    about = "Terminal client for a resume-matching service"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start directly on the dashboard view
    Dashboard,
    /// Fetch the summary and write the dashboard charts as PNG files
    Export {
        /// Output directory (defaults to the configured export directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Some(Command::Export { out }) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "matchdeck=info".into()),
                )
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();

            run_export(config, out).await
        }
        command => {
            // The TUI owns stdout, so logs go to a rolling file instead.
            std::fs::create_dir_all(&config.files.log_dir)?;
            let file_appender =
                tracing_appender::rolling::daily(&config.files.log_dir, "matchdeck.log");
            let (writer, _guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "matchdeck=info".into()),
                )
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();

            info!("Configuration loaded: {:?}", config.api);
            let start_on_dashboard = matches!(command, Some(Command::Dashboard));
            matchdeck::tui::run(config, start_on_dashboard).await
        }
    }
}

async fn run_export(config: Config, out: Option<PathBuf>) -> Result<()> {
    let client = MatcherClient::new(config.api.base_url.clone());
    let summary = client.fetch_dashboard().await?;
    let slices = shape_fit_distribution(&summary);
    let out_dir = out.unwrap_or(config.files.export_dir);

    let (fit_path, skills_path) = charts::export_charts(&out_dir, &slices, &summary.top_skills)?;
    info!("charts exported to {}", out_dir.display());
    println!("{}", fit_path.display());
    println!("{}", skills_path.display());
    Ok(())
}
