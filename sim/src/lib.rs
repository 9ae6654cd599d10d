pub mod bird;
pub mod collision;
pub mod config;
pub mod controller;
pub mod difficulty;
pub mod fitness;
pub mod pipe;
pub mod world;

pub use bird::{Bird, Boundary, Ground};
pub use collision::{collides, Rect};
pub use config::{ConfigError, SimConfig};
pub use controller::{Controller, HumanInput, NetworkController, Observation, FLAP_THRESHOLD};
pub use difficulty::{ArcadeCurve, DifficultyCurve, DifficultyParams, EvolutionCurve};
pub use fitness::FitnessEvaluator;
pub use pipe::Pipe;
pub use world::{Mode, TickEvent, World};

use rand::Rng;
use shared::Brain;

/// The best bird at the moment an episode reached the checkpoint score
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointRequest {
    /// Index into the brains handed to `run_generation`
    pub bird: usize,
    pub score: u32,
    pub fitness: f64,
}

/// Result of one evolution episode
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Final fitness, one entry per brain in the same order
    pub fitness: Vec<f64>,
    pub score: u32,
    pub ticks: u64,
    pub checkpoint: Option<CheckpointRequest>,
}

/// Run a complete evolution episode: one bird per brain, until every bird is
/// dead or `max_ticks` have elapsed
pub fn run_generation<R: Rng>(
    config: SimConfig,
    brains: &[Brain],
    generation: u32,
    max_ticks: u64,
    rng: R,
) -> Result<GenerationOutcome, ConfigError> {
    config.validate()?;

    let mut controllers: Vec<NetworkController> =
        brains.iter().cloned().map(NetworkController::new).collect();
    let mut world = World::evolution(config, brains.len(), generation, rng);
    let mut checkpoint = None;

    while world.is_running() && world.tick_count < max_ticks {
        for event in world.tick(&mut controllers) {
            if let TickEvent::CheckpointReached {
                score,
                bird,
                fitness,
            } = event
            {
                checkpoint = Some(CheckpointRequest {
                    bird,
                    score,
                    fitness,
                });
            }
        }
    }

    tracing::debug!(
        generation,
        score = world.score,
        ticks = world.tick_count,
        alive = world.alive(),
        "episode finished"
    );

    Ok(GenerationOutcome {
        fitness: world.birds.iter().map(|b| b.fitness).collect(),
        score: world.score,
        ticks: world.tick_count,
        checkpoint,
    })
}
