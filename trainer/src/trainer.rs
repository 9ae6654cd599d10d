use crate::config::TrainerConfig;
use crate::population::{Population, Selection};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{checkpoint, Checkpoint, GenerationStats, BEST_GENOME_FILE};
use sim::{CheckpointRequest, SimConfig};
use std::path::PathBuf;

/// What a finished training run produced
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub history: Vec<GenerationStats>,

    /// Milestone checkpoints written during training
    pub checkpoints: Vec<PathBuf>,

    /// The best controller seen in any generation
    pub best: Option<Checkpoint>,
    pub best_path: Option<PathBuf>,
}

pub struct Trainer {
    config: TrainerConfig,
    sim_config: SimConfig,
    population: Population,
    rng: StdRng,
    best: Option<Checkpoint>,
}

impl Trainer {
    pub fn new(config: TrainerConfig, sim_config: SimConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let selection = Selection {
            elitism: config.elitism,
            survival_threshold: config.survival_threshold,
            mutation_rate: config.mutation_rate,
        };
        let population = Population::new(config.population_size, selection, &mut rng);

        Self {
            config,
            sim_config,
            population,
            rng,
            best: None,
        }
    }

    /// Run one episode with the current population, save any milestone
    /// checkpoint, then breed the next generation
    pub fn step(&mut self) -> Result<(GenerationStats, Option<PathBuf>)> {
        let generation = self.population.generation;
        let brains = self.population.brains();
        let world_rng = StdRng::seed_from_u64(self.rng.gen());

        let outcome = sim::run_generation(
            self.sim_config.clone(),
            &brains,
            generation,
            self.config.max_ticks,
            world_rng,
        )
        .context("Failed to run generation")?;

        self.population.record(&outcome.fitness);
        let stats =
            GenerationStats::new(generation, &outcome.fitness, outcome.score, outcome.ticks);

        tracing::info!(
            generation,
            best_fitness = stats.best_fitness,
            avg_fitness = stats.avg_fitness,
            score = stats.score,
            ticks = stats.ticks,
            "generation complete"
        );

        let saved = match outcome.checkpoint {
            Some(request) => Some(self.save_milestone(generation, &request)?),
            None => None,
        };

        if let Some(best) = self.population.best() {
            let improved = self
                .best
                .as_ref()
                .is_none_or(|current| best.fitness > current.fitness);
            if improved {
                self.best = Some(Checkpoint::new(
                    best.id,
                    generation,
                    outcome.score,
                    best.fitness,
                    best.brain.clone(),
                ));
            }
        }

        self.population.evolve(&mut self.rng);
        Ok((stats, saved))
    }

    fn save_milestone(&self, generation: u32, request: &CheckpointRequest) -> Result<PathBuf> {
        let member = self
            .population
            .members
            .get(request.bird)
            .context("Checkpoint names a bird outside the population")?;

        let checkpoint = Checkpoint::new(
            member.id,
            generation,
            request.score,
            request.fitness,
            member.brain.clone(),
        );
        let path = checkpoint::save(
            &self.config.checkpoint_dir,
            &checkpoint.file_name(),
            &checkpoint,
        )
        .context("Failed to save milestone checkpoint")?;

        tracing::info!(path = %path.display(), score = request.score, "checkpoint saved");
        Ok(path)
    }

    /// Train for the configured number of generations and write the best
    /// controller to `best_genome.json`
    pub fn run(mut self) -> Result<TrainingSummary> {
        tracing::info!(
            population = self.config.population_size,
            generations = self.config.generations,
            mutation_rate = self.config.mutation_rate,
            "training started"
        );

        let mut history = Vec::with_capacity(self.config.generations as usize);
        let mut checkpoints = Vec::new();

        for _ in 0..self.config.generations {
            let (stats, saved) = self.step()?;
            history.push(stats);
            checkpoints.extend(saved);
        }

        let best_path = match &self.best {
            Some(best) => {
                let path = checkpoint::save(&self.config.checkpoint_dir, BEST_GENOME_FILE, best)
                    .context("Failed to save best genome")?;
                tracing::info!(
                    path = %path.display(),
                    fitness = best.fitness,
                    generation = best.generation,
                    "best genome saved"
                );
                Some(path)
            }
            None => {
                tracing::warn!("no genome to save");
                None
            }
        };

        Ok(TrainingSummary {
            history,
            checkpoints,
            best: self.best,
            best_path,
        })
    }
}
