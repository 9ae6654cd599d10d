use crate::{Bird, Pipe};

/// Reward shaping used to rank controllers in evolution mode
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessEvaluator {
    /// Added every tick a bird stays alive
    pub survival_reward: f64,

    /// Vertical misalignment, in pixels, beyond which the alignment reward is zero
    pub alignment_window: f64,

    /// Added to every living bird whenever the flock passes a pipe
    pub pass_bonus: f64,
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self {
            survival_reward: 0.1,
            alignment_window: 100.0,
            pass_bonus: 5.0,
        }
    }
}

impl FitnessEvaluator {
    /// 1.0 when the bird is level with the gap center, falling linearly to
    /// 0.0 at `alignment_window` pixels away
    pub fn alignment_reward(&self, bird_y: f64, gap_center: f64) -> f64 {
        let distance = (bird_y - gap_center).abs();
        (self.alignment_window - distance).max(0.0) / self.alignment_window
    }

    /// Per-tick reward for living birds, aimed at the next unpassed pipe
    pub fn evaluate(&self, birds: &mut [Bird], target: Option<&Pipe>) {
        for bird in birds.iter_mut().filter(|b| b.alive) {
            bird.fitness += self.survival_reward;
            if let Some(pipe) = target {
                bird.fitness += self.alignment_reward(bird.y, pipe.gap_center);
            }
        }
    }

    /// One-time bonus when a pipe is passed, regardless of alignment
    pub fn award_pass(&self, birds: &mut [Bird]) {
        for bird in birds.iter_mut().filter(|b| b.alive) {
            bird.fitness += self.pass_bonus;
        }
    }
}
