mod config;
mod population;
mod trainer;

use anyhow::{Context, Result};
use config::TrainerConfig;
use sim::SimConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trainer=info,sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TrainerConfig::from_env().context("Invalid trainer configuration")?;
    let sim_config = SimConfig::default();
    sim_config
        .validate()
        .context("Invalid simulation configuration")?;

    tracing::info!("Starting Flapping Bird trainer");
    tracing::info!("Checkpoints go to {}", config.checkpoint_dir.display());

    let summary = trainer::Trainer::new(config, sim_config).run()?;

    for stats in &summary.history {
        println!(
            "Generation {:>3}: best {:>9.2}  avg {:>9.2}  score {:>4}  ticks {}",
            stats.generation, stats.best_fitness, stats.avg_fitness, stats.score, stats.ticks
        );
    }

    if let Some(best) = &summary.best {
        println!(
            "Best fitness {:.2} (generation {}, score {})",
            best.fitness, best.generation, best.score
        );
    }
    for path in summary.checkpoints.iter().chain(&summary.best_path) {
        println!("Saved {}", path.display());
    }

    Ok(())
}
