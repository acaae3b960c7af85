mod scenario;
mod settings_watch;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::EnvFilter;
use tweaks_core::{ConfigMirror, FileSettingsStore};
use tweaks_types::{ListingKind, SETTINGS_LISTINGS};

#[derive(Parser)]
#[command(version, about = "Tweaks session simulator")]
struct Cli {
    /// Settings file. Defaults to the platform config directory.
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one round against a scripted host
    Run(RunArgs),
    /// Print the settings editor listings
    Listings,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, value_enum, default_value_t = Scenario::Static)]
    pub scenario: Scenario,

    #[arg(short, long, default_value_t = 3)]
    pub entities: u64,

    /// Starting timer of each entity in seconds
    #[arg(short, long, default_value_t = 120.0)]
    pub timer: f32,

    /// Frame length in milliseconds
    #[arg(long, default_value_t = 50)]
    pub frame_ms: u64,

    /// Upper bound on gameplay frames
    #[arg(long, default_value_t = 10_000)]
    pub frames: usize,

    /// How long to stay in Setup watching for settings edits
    #[arg(long, default_value_t = 0)]
    pub setup_watch_ms: u64,

    /// Pace gameplay frames in real time
    #[arg(long)]
    pub realtime: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Every entity present from the start
    Static,
    /// Adaptive room presenting one entity at a time
    Adaptive,
    /// Adaptive room sharing one timer across entities
    AdaptiveGlobal,
    /// Static entities in a room with an emergency broadcast
    Portal,
}

/// Initialize logging, writing to TWEAKS_LOG_PATH if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("TWEAKS_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    init_logging();
    let cli = Cli::parse();

    let path = match cli.settings {
        Some(path) => path,
        None => FileSettingsStore::default_path().map_err(|e| e.to_string())?,
    };

    match cli.command {
        Commands::Run(args) => scenario::run(&path, &args).await,
        Commands::Listings => {
            print_listings(&path);
            Ok(())
        }
    }
}

fn print_listings(path: &Path) {
    let mirror = ConfigMirror::new(Box::new(FileSettingsStore::new(path)));
    let settings = mirror.settings();

    for listing in SETTINGS_LISTINGS {
        let Some(key) = listing.key else {
            println!("\n[{}]", listing.text);
            continue;
        };
        let kind = match listing.kind {
            ListingKind::Section => "",
            ListingKind::Toggle => "toggle",
            ListingKind::Number => "number",
            ListingKind::Text => "text",
            ListingKind::Dropdown(_) => "choice",
        };
        let pinned = if settings.is_pinned(key) { "*" } else { " " };
        println!("{pinned} {key:<36} {kind:<7} {}", listing.text);
        if let ListingKind::Dropdown(options) = listing.kind {
            println!("  {:<36} {:<7} {}", "", "", options.join(" | "));
        }
    }
}
