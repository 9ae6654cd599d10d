use crate::collision::Rect;
use crate::config::SimConfig;
use shared::BirdView;

/// What the ground does to a bird that reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ground {
    /// The bird rests on it (arcade mode)
    Safe,

    /// The bird dies on contact (evolution mode)
    Lethal,
}

/// Which screen bound stopped the bird during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Ceiling,
    Ground,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Front edge of the hitbox; never changes after spawn
    pub x: f64,

    /// Top edge of the hitbox
    pub y: f64,
    pub velocity: f64,
    pub size: f64,
    pub alive: bool,

    /// Cumulative reward, only accumulated in evolution mode
    pub fitness: f64,
}

impl Bird {
    /// Create a new bird at rest
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            size,
            alive: true,
            fitness: 0.0,
        }
    }

    /// Create a bird at the configured start position
    pub fn spawn(config: &SimConfig) -> Self {
        Self::new(config.bird_x, config.bird_start_y, config.bird_size)
    }

    /// Instant upward impulse, overriding whatever the velocity was
    pub fn flap(&mut self, flap_velocity: f64) {
        self.velocity = flap_velocity;
    }

    /// Apply gravity and move one tick, clamping to the screen.
    /// Returns the bound that stopped the bird, if any.
    pub fn advance(&mut self, gravity: f64, max_y: f64, ground: Ground) -> Option<Boundary> {
        self.velocity += gravity;
        self.y += self.velocity;

        if self.y < 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
            Some(Boundary::Ceiling)
        } else if self.y > max_y {
            self.y = max_y;
            self.velocity = 0.0;
            if ground == Ground::Lethal {
                self.alive = false;
            }
            Some(Boundary::Ground)
        } else {
            None
        }
    }

    /// Square hitbox trailing behind `x`
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x - self.size, self.y, self.size, self.size)
    }

    pub fn view(&self) -> BirdView {
        BirdView {
            x: self.x,
            y: self.y,
            velocity: self.velocity,
            size: self.size,
            alive: self.alive,
            fitness: self.fitness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GRAVITY: f64 = 0.25;
    const MAX_Y: f64 = 575.0;

    #[test]
    fn test_bird_creation() {
        let bird = Bird::spawn(&SimConfig::default());
        assert_eq!(bird.x, 133.0);
        assert_eq!(bird.y, 300.0);
        assert_eq!(bird.velocity, 0.0);
        assert!(bird.alive);
        assert_eq!(bird.fitness, 0.0);
    }

    #[test]
    fn test_flap_then_advance() {
        let mut bird = Bird::new(133.0, 300.0, 25.0);

        bird.flap(-7.0);
        let hit = bird.advance(GRAVITY, MAX_Y, Ground::Safe);

        assert_eq!(hit, None);
        assert_eq!(bird.velocity, -6.75);
        assert_eq!(bird.y, 293.25);
    }

    #[test]
    fn test_flap_overrides_velocity() {
        let mut bird = Bird::new(133.0, 300.0, 25.0);
        bird.velocity = 9.0;

        bird.flap(-7.0);

        assert_eq!(bird.velocity, -7.0);
    }

    #[test]
    fn test_gravity_pulls_bird_down() {
        let mut bird = Bird::new(133.0, 300.0, 25.0);
        bird.advance(GRAVITY, MAX_Y, Ground::Safe);
        assert_eq!(bird.velocity, 0.25);
        assert_eq!(bird.y, 300.25);
    }

    #[test]
    fn test_ceiling_clamp() {
        let mut bird = Bird::new(133.0, 2.0, 25.0);
        bird.flap(-7.0);

        let hit = bird.advance(GRAVITY, MAX_Y, Ground::Lethal);

        assert_eq!(hit, Some(Boundary::Ceiling));
        assert_eq!(bird.y, 0.0);
        assert_eq!(bird.velocity, 0.0);
        assert!(bird.alive); // Ceiling doesn't kill
    }

    #[test]
    fn test_safe_ground_stops_bird() {
        let mut bird = Bird::new(133.0, 574.0, 25.0);
        bird.velocity = 5.0;

        let hit = bird.advance(GRAVITY, MAX_Y, Ground::Safe);

        assert_eq!(hit, Some(Boundary::Ground));
        assert_eq!(bird.y, MAX_Y);
        assert_eq!(bird.velocity, 0.0);
        assert!(bird.alive);
    }

    #[test]
    fn test_lethal_ground_kills_bird() {
        let mut bird = Bird::new(133.0, 574.0, 25.0);
        bird.velocity = 5.0;

        let hit = bird.advance(GRAVITY, MAX_Y, Ground::Lethal);

        assert_eq!(hit, Some(Boundary::Ground));
        assert_eq!(bird.y, MAX_Y);
        assert!(!bird.alive);
    }

    #[test]
    fn test_hitbox_trails_position() {
        let bird = Bird::new(133.0, 0.0, 25.0);
        assert_eq!(bird.hitbox(), Rect::new(108.0, 0.0, 25.0, 25.0));
    }

    proptest! {
        #[test]
        fn prop_position_stays_on_screen(
            start in 0.0f64..=MAX_Y,
            flaps in proptest::collection::vec(any::<bool>(), 1..400),
        ) {
            let mut bird = Bird::new(133.0, start, 25.0);
            for flap in flaps {
                if flap {
                    bird.flap(-7.0);
                }
                bird.advance(GRAVITY, MAX_Y, Ground::Safe);
                prop_assert!(bird.y >= 0.0 && bird.y <= MAX_Y);
            }
        }
    }
}
