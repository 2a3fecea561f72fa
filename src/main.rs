//! AQI Dashboard entry point.

use anyhow::Context;
use aqi_dashboard::config::DashboardConfig;
use aqi_dashboard::data::AggregationPipeline;
use aqi_dashboard::gui::GuiPresenter;
use aqi_dashboard::report::{Dashboard, HtmlPresenter, Presenter, TextPresenter};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Jakarta air quality dashboard
#[derive(Parser, Debug)]
#[command(name = "aqi-dashboard")]
#[command(author, version, about = "Air quality dashboard for Central and South Jakarta")]
#[command(propagate_version = true)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Central Jakarta station CSV
    #[arg(long, global = true)]
    central: Option<PathBuf>,

    /// South Jakarta station CSV
    #[arg(long, global = true)]
    south: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive dashboard (default)
    Gui,

    /// Write the static HTML report
    Export {
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Open the report when done
        #[arg(long)]
        open: bool,
    },

    /// Print yearly statistics to stdout
    Summary,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn resolve_config(&self) -> anyhow::Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(central) = &self.central {
            config.central_csv = central.clone();
        }
        if let Some(south) = &self.south {
            config.south_csv = south.clone();
        }
        if let Some(Commands::Export { out, open }) = &self.command {
            if let Some(out) = out {
                config.output_dir = out.clone();
            }
            config.open_report |= *open;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let output = AggregationPipeline::run(&config.central_csv, &config.south_csv)
        .context("failed to build dashboard data")?;
    let dashboard = Dashboard::new(output);

    let mut presenter: Box<dyn Presenter> = match cli.command.unwrap_or(Commands::Gui) {
        Commands::Gui => Box::new(GuiPresenter::new(config)),
        Commands::Export { .. } => {
            info!(dir = %config.output_dir.display(), "exporting report");
            Box::new(HtmlPresenter::from_config(&config))
        }
        Commands::Summary => Box::new(TextPresenter::new(io::stdout().lock())),
    };
    presenter.present(&dashboard)?;

    Ok(())
}
