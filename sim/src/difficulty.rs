//! Difficulty curves: score determines a discrete level, the level determines
//! how fast pipes scroll, how narrow their gaps are and how often they spawn.

use std::time::Duration;

/// Pipe parameters for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyParams {
    /// Pixels per tick
    pub speed: f64,
    pub gap_size: u32,

    /// Time between timed spawns. `None` means pipes spawn on score events.
    pub spawn_interval: Option<Duration>,
}

/// Human play: harder every 10 points, saturating at fixed bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ArcadeCurve {
    pub points_per_level: u32,
    pub initial_speed: f64,
    pub speed_step: f64,
    pub max_speed: f64,
    pub initial_spawn: Duration,
    pub spawn_step: Duration,
    pub min_spawn: Duration,
    pub initial_gap: u32,
    pub gap_step: u32,
    pub min_gap: u32,
}

impl Default for ArcadeCurve {
    fn default() -> Self {
        Self {
            points_per_level: 10,
            initial_speed: 3.0,
            speed_step: 0.5,
            max_speed: 7.0,
            initial_spawn: Duration::from_millis(1500),
            spawn_step: Duration::from_millis(100),
            min_spawn: Duration::from_millis(800),
            initial_gap: 200,
            gap_step: 10,
            min_gap: 120,
        }
    }
}

impl ArcadeCurve {
    pub fn level_for(&self, score: u32) -> u32 {
        score / self.points_per_level.max(1)
    }

    pub fn params(&self, level: u32) -> DifficultyParams {
        let speed = (self.initial_speed + f64::from(level) * self.speed_step).min(self.max_speed);
        let spawn = self
            .initial_spawn
            .saturating_sub(self.spawn_step.saturating_mul(level))
            .max(self.min_spawn);
        let gap_size = self
            .initial_gap
            .saturating_sub(self.gap_step.saturating_mul(level))
            .max(self.min_gap);

        DifficultyParams {
            speed,
            gap_size,
            spawn_interval: Some(spawn),
        }
    }
}

/// Training: gentler steps every 15 points, capped at level 5
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionCurve {
    pub points_per_level: u32,
    pub max_level: u32,
    pub initial_speed: f64,
    pub speed_step: f64,
    pub initial_gap: u32,
    pub gap_step: u32,
    pub min_gap: u32,
}

impl Default for EvolutionCurve {
    fn default() -> Self {
        Self {
            points_per_level: 15,
            max_level: 5,
            initial_speed: 3.0,
            speed_step: 0.25,
            initial_gap: 200,
            gap_step: 5,
            min_gap: 150,
        }
    }
}

impl EvolutionCurve {
    pub fn level_for(&self, score: u32) -> u32 {
        (score / self.points_per_level.max(1)).min(self.max_level)
    }

    /// Fastest speed this curve can produce
    pub fn max_speed(&self) -> f64 {
        self.initial_speed + f64::from(self.max_level) * self.speed_step
    }

    pub fn params(&self, level: u32) -> DifficultyParams {
        let level = level.min(self.max_level);
        let speed = self.initial_speed + f64::from(level) * self.speed_step;
        let gap_size = self
            .initial_gap
            .saturating_sub(self.gap_step.saturating_mul(level))
            .max(self.min_gap);

        DifficultyParams {
            speed,
            gap_size,
            spawn_interval: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DifficultyCurve {
    Arcade(ArcadeCurve),
    Evolution(EvolutionCurve),
}

impl DifficultyCurve {
    pub fn arcade() -> Self {
        Self::Arcade(ArcadeCurve::default())
    }

    pub fn evolution() -> Self {
        Self::Evolution(EvolutionCurve::default())
    }

    /// Discrete level reached at `score`
    pub fn level_for(&self, score: u32) -> u32 {
        match self {
            Self::Arcade(curve) => curve.level_for(score),
            Self::Evolution(curve) => curve.level_for(score),
        }
    }

    pub fn params(&self, level: u32) -> DifficultyParams {
        match self {
            Self::Arcade(curve) => curve.params(level),
            Self::Evolution(curve) => curve.params(level),
        }
    }
}
