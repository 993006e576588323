use anyhow::{Context, Result};
use clap::Parser;
use mauskaese::{
    App, BoxedTracker, CliRenderer, Config, JsonFileStore, ProgressStore, ProgressTracker,
    Renderer, SilentSpeaker, Speaker, SystemClock, TimeSource,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Parser, Debug)]
#[command(version, about = "Maus & Käse and friends: German practice in the terminal")]
struct Cli {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML file overriding the terminal defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the progress record is kept
    #[arg(short, long, default_value = "mauskaese-progress.json")]
    progress: PathBuf,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write logs here; the game owns the terminal, so nothing is logged without it
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path, level: log::LevelFilter) -> Result<()> {
    use tracing_subscriber::filter::LevelFilter;

    let file = File::create(path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;
    let max_level = match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(max_level)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path, cli.verbose.log_level_filter())?;
    }

    let config = match &cli.config {
        Some(path) => Config::terminal()
            .overlay_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => Config::terminal(),
    };
    log::debug!("config: {:?}", config);

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    log::debug!("seed: {:?}", cli.seed);

    let store: Box<dyn ProgressStore> = Box::new(JsonFileStore::new(&cli.progress));
    let speaker: Box<dyn Speaker> = Box::new(SilentSpeaker);
    let mut tracker: BoxedTracker = ProgressTracker::new(store, speaker);
    tracker.start_visit(chrono::Local::now());
    log::info!(
        "progress from {} (streak {} days)",
        cli.progress.display(),
        tracker.progress().streak_days
    );

    let mut renderer = CliRenderer::new(config.frame_ms);
    renderer.init().context("failed to set up the terminal")?;

    let clock = SystemClock::new();
    let mut app = App::new(config, tracker, rng, renderer.viewport());

    while !app.should_quit() {
        let input = renderer.poll_input()?;
        let now = clock.now();
        app.frame(now, &input, renderer.viewport());
        renderer.render(&app, now)?;
    }

    renderer.cleanup()?;
    log::info!("bye");
    Ok(())
}
