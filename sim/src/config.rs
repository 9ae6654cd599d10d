use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("gap margin {margin} leaves no room for a gap on a {height}px screen")]
    GapMarginTooLarge { margin: u32, height: f64 },

    #[error("bird of size {size} does not fit on a {height}px screen")]
    BirdTooLarge { size: f64, height: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("bird start y {y} is outside [0, {max}]")]
    StartOutOfBounds { y: f64, max: f64 },

    #[error("tick duration must be non-zero")]
    ZeroTick,
}

/// Physical constants of the game world. Shared by both game modes.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub screen_width: f64,
    pub screen_height: f64,

    /// Added to the bird's velocity every tick (positive = downward)
    pub gravity: f64,

    /// Velocity a flap sets, replacing the current one
    pub flap_velocity: f64,

    /// Side of the bird's square hitbox
    pub bird_size: f64,

    /// Fixed horizontal position of every bird (front of the hitbox)
    pub bird_x: f64,
    pub bird_start_y: f64,

    pub pipe_width: f64,

    /// Gap centers are drawn from [margin, screen_height - margin]
    pub gap_margin: u32,

    /// Simulated time per tick
    pub tick: Duration,

    /// Score at which evolution mode asks for a checkpoint
    pub checkpoint_score: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            screen_width: 400.0,
            screen_height: 600.0,
            gravity: 0.25,
            flap_velocity: -7.0,
            bird_size: 25.0,
            bird_x: 133.0, // a third of the way across
            bird_start_y: 300.0,
            pipe_width: 50.0,
            gap_margin: 200,
            tick: Duration::from_micros(16_667), // 60 ticks per second
            checkpoint_score: 100,
        }
    }
}

impl SimConfig {
    /// Lowest y the top of a bird can reach
    pub fn max_bird_y(&self) -> f64 {
        self.screen_height - self.bird_size
    }

    /// Inclusive range gap centers are drawn from
    pub fn gap_center_range(&self) -> (u32, u32) {
        let high = (self.screen_height as u32)
            .saturating_sub(self.gap_margin)
            .max(self.gap_margin);
        (self.gap_margin, high)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("bird_size", self.bird_size),
            ("pipe_width", self.pipe_width),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let finite = [
            ("gravity", self.gravity),
            ("flap_velocity", self.flap_velocity),
            ("bird_x", self.bird_x),
            ("bird_start_y", self.bird_start_y),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        if self.bird_size >= self.screen_height {
            return Err(ConfigError::BirdTooLarge {
                size: self.bird_size,
                height: self.screen_height,
            });
        }

        if self.bird_start_y < 0.0 || self.bird_start_y > self.max_bird_y() {
            return Err(ConfigError::StartOutOfBounds {
                y: self.bird_start_y,
                max: self.max_bird_y(),
            });
        }

        if f64::from(self.gap_margin) * 2.0 > self.screen_height {
            return Err(ConfigError::GapMarginTooLarge {
                margin: self.gap_margin,
                height: self.screen_height,
            });
        }

        if self.tick.is_zero() {
            return Err(ConfigError::ZeroTick);
        }

        Ok(())
    }
}
