mod app;
mod layout;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use charnet::{
    CommitPolicy, Dataset, DisplayConfig, GraphPayload, Network, ThresholdMode, ViewState,
    compute_visible,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSON array of character names.
    #[arg(long, default_value = "static/character_names.json")]
    names: PathBuf,

    /// JSON n x n matrix of [sentiment, count] pairs.
    #[arg(long, default_value = "static/interactions.json")]
    interactions: PathBuf,

    /// Optional TOML file with display settings.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the interactive network viewer.
    View {
        /// Apply threshold edits immediately or only on "Apply".
        #[arg(long, value_enum)]
        commit: Option<CommitPolicy>,
    },
    /// Print the filtered network as JSON.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Minimum count (absolute) or minimum share fraction (share).
    #[arg(long)]
    threshold: Option<f64>,

    #[arg(long, value_enum)]
    mode: Option<ThresholdMode>,

    /// Include sentiment colors and sentiment tooltip lines.
    #[arg(long)]
    sentiment: bool,

    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = DisplayConfig::load(cli.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", cli.config))?;

    match cli.command {
        Some(Command::Export(args)) => export(&cli.names, &cli.interactions, &config, &args),
        Some(Command::View { commit }) => {
            if let Some(commit) = commit {
                config.commit = commit;
            }
            view(cli.names, cli.interactions, config)
        }
        None => view(cli.names, cli.interactions, config),
    }
}

fn export(
    names: &Path,
    interactions: &Path,
    config: &DisplayConfig,
    args: &ExportArgs,
) -> Result<()> {
    let dataset = Dataset::load(names, interactions).context("failed to load character data")?;
    let network = Network::build(&dataset);

    let mode = args.mode.unwrap_or(config.initial_mode);
    let threshold = args
        .threshold
        .unwrap_or_else(|| config.preset(mode).initial);
    let view = ViewState::new(threshold, mode, args.sentiment || config.show_sentiment)?;

    let visible = compute_visible(&network, &view);
    let payload = GraphPayload::build(&network, &visible, &view, &config.colors);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &payload)?;
    } else {
        serde_json::to_writer(&mut out, &payload)?;
    }
    writeln!(out)?;
    Ok(())
}

fn view(names: PathBuf, interactions: PathBuf, config: DisplayConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "charnet",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::CharnetApp::new(
                cc,
                app::Sources {
                    names,
                    interactions,
                },
                config,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
