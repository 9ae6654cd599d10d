use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{var} must be at least {min}")]
    TooSmall { var: &'static str, min: usize },

    #[error("MUTATION_RATE must be within [0, 1], got {0}")]
    MutationRate(f64),
}

/// Training run settings
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub population_size: usize,
    pub generations: u32,

    /// Per-weight mutation probability for bred offspring
    pub mutation_rate: f64,

    /// Members copied unchanged into the next generation
    pub elitism: usize,

    /// Fraction of the ranked population allowed to breed
    pub survival_threshold: f64,

    /// Episode length cap, so a perfect flock cannot run forever
    pub max_ticks: u64,
    pub seed: Option<u64>,
    pub checkpoint_dir: PathBuf,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            mutation_rate: 0.2,
            elitism: 2,
            survival_threshold: 0.2,
            max_ticks: 60 * 60 * 5, // five simulated minutes
            seed: None,
            checkpoint_dir: PathBuf::from("checkpoints"),
        }
    }
}

impl TrainerConfig {
    /// Defaults overridden by `POPULATION_SIZE`, `GENERATIONS`,
    /// `MUTATION_RATE`, `MAX_TICKS`, `SEED` and `CHECKPOINT_DIR`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("POPULATION_SIZE") {
            config.population_size = parse("POPULATION_SIZE", value, "count")?;
        }
        if let Some(value) = lookup("GENERATIONS") {
            config.generations = parse("GENERATIONS", value, "count")?;
        }
        if let Some(value) = lookup("MUTATION_RATE") {
            config.mutation_rate = parse("MUTATION_RATE", value, "probability")?;
        }
        if let Some(value) = lookup("MAX_TICKS") {
            config.max_ticks = parse("MAX_TICKS", value, "tick count")?;
        }
        if let Some(value) = lookup("SEED") {
            config.seed = Some(parse("SEED", value, "seed")?);
        }
        if let Some(value) = lookup("CHECKPOINT_DIR") {
            config.checkpoint_dir = PathBuf::from(value);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Elites plus at least one bred child
        let min = self.elitism + 1;
        if self.population_size < min {
            return Err(ConfigError::TooSmall {
                var: "POPULATION_SIZE",
                min,
            });
        }
        if self.generations == 0 {
            return Err(ConfigError::TooSmall {
                var: "GENERATIONS",
                min: 1,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRate(self.mutation_rate));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value,
        expected,
    })
}
