mod app;
mod ui;

use anyhow::{bail, Context, Result};
use app::App;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use shared::{checkpoint, BEST_GENOME_FILE};
use sim::SimConfig;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CHECKPOINT_DIR: &str = "checkpoints";

#[derive(Debug, PartialEq)]
enum Command {
    Play,
    Replay(PathBuf),
    Help,
}

/// `args` excludes the program name
fn parse_command(args: &[String], checkpoint_path: Option<String>) -> Result<Command> {
    let default_path = || {
        checkpoint_path
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHECKPOINT_DIR).join(BEST_GENOME_FILE))
    };

    match args.first().map(String::as_str) {
        None | Some("play") => Ok(Command::Play),
        Some("replay") => Ok(Command::Replay(
            args.get(1).map(PathBuf::from).unwrap_or_else(default_path),
        )),
        Some("--help") | Some("-h") => Ok(Command::Help),
        Some(other) => bail!("Unknown command: {other}. Run 'client --help' for usage."),
    }
}

fn print_help() {
    println!("Flapping Bird\n");
    println!("Usage: client [command]\n");
    println!("Commands:");
    println!("  play            Play the arcade game (default)");
    println!("  replay [path]   Watch a trained bird fly (default: checkpoints/best_genome.json)");
    println!("  --help          Show this help message");
}

fn main() -> Result<()> {
    // Initialize tracing; stderr keeps logs off the game screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_command(&args, env::var("CHECKPOINT_PATH").ok())?;

    let rng = match env::var("SEED") {
        Ok(seed) => StdRng::seed_from_u64(
            seed.trim()
                .parse()
                .with_context(|| format!("SEED={seed:?} is not a number"))?,
        ),
        Err(_) => StdRng::from_entropy(),
    };
    let config = SimConfig::default();
    config.validate().context("Invalid simulation configuration")?;

    let app = match command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Play => App::play(config, rng),
        Command::Replay(path) => {
            let loaded = checkpoint::load(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let Some(saved) = loaded else {
                println!("No saved model found. Please train first.");
                return Ok(());
            };
            tracing::info!(
                generation = saved.generation,
                fitness = saved.fitness,
                "Replaying {}",
                path.display()
            );
            App::replay(config, saved, rng)
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = app::run(&mut terminal, app);

    // Restore the terminal even if the game loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
