use serde::{Deserialize, Serialize};

/// Where a world is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Ticks advance the world
    Playing,

    /// Arcade mode: the bird hit a pipe. Waits for an explicit reset.
    GameOver,

    /// Evolution mode: every bird is dead. Terminal for the episode.
    Extinct,
}

/// Read-only view of one bird for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirdView {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub size: f64,
    pub alive: bool,
    pub fitness: f64,
}

/// Read-only view of one pipe for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeView {
    pub x: f64,
    pub width: f64,

    /// Bottom edge of the top pipe
    pub gap_top: f64,

    /// Top edge of the bottom pipe
    pub gap_bottom: f64,
}

/// Snapshot of a world after a tick, handed to renderers.
/// Renderers never feed anything back into the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub screen_width: f64,
    pub screen_height: f64,
    pub birds: Vec<BirdView>,
    pub pipes: Vec<PipeView>,
    pub score: u32,
    pub level: u32,
    pub generation: u32,
    pub tick: u64,
    pub status: Status,
}

impl Frame {
    /// Number of birds still flying
    pub fn alive(&self) -> usize {
        self.birds.iter().filter(|b| b.alive).count()
    }
}

/// Statistics about one generation of training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u32,

    /// Best fitness in the generation
    pub best_fitness: f64,

    /// Average fitness over all birds
    pub avg_fitness: f64,

    /// Pipes passed before the last bird died
    pub score: u32,

    /// Ticks the episode lasted
    pub ticks: u64,
}

impl GenerationStats {
    pub fn new(generation: u32, fitness: &[f64], score: u32, ticks: u64) -> Self {
        let best_fitness = fitness.iter().copied().fold(0.0, f64::max);
        let avg_fitness = if fitness.is_empty() {
            0.0
        } else {
            fitness.iter().sum::<f64>() / fitness.len() as f64
        };

        Self {
            generation,
            best_fitness,
            avg_fitness,
            score,
            ticks,
        }
    }
}
