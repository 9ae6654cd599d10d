use crate::bird::{Boundary, Ground};
use crate::collision::collides;
use crate::controller::{Controller, HumanInput, Observation};
use crate::{Bird, DifficultyCurve, FitnessEvaluator, Pipe, SimConfig};
use rand::Rng;
use shared::{Frame, Status};
use std::time::Duration;

/// Which game is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One human bird, pipes on a timer, the ground is safe
    Arcade,

    /// A flock of controller-driven birds, pipes spawn on score, the ground kills
    Evolution,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    Flapped { bird: usize },
    PipeSpawned { gap_center: f64, gap_size: u32 },
    /// A bird hit a pipe
    Crashed { bird: usize },
    /// A bird hit the ground in evolution mode
    Grounded { bird: usize },
    Scored { score: u32 },
    LevelUp { level: u32 },
    /// The checkpoint milestone was reached; `bird` had the best fitness at that moment
    CheckpointReached { score: u32, bird: usize, fitness: f64 },
    GameOver,
    Extinct,
}

/// The simulation loop. Owns its birds and pipes; nothing is shared between worlds.
pub struct World<R: Rng> {
    pub config: SimConfig,
    pub mode: Mode,
    pub curve: DifficultyCurve,
    pub fitness: FitnessEvaluator,
    pub birds: Vec<Bird>,

    /// Ordered by spawn time, oldest (leftmost) first
    pub pipes: Vec<Pipe>,
    pub score: u32,
    pub level: u32,
    pub status: Status,
    pub generation: u32,
    pub tick_count: u64,
    since_spawn: Duration,
    checkpoint_sent: bool,
    rng: R,
}

impl<R: Rng> World<R> {
    /// Create a human-playable world with a single bird and no pipes yet
    pub fn arcade(config: SimConfig, rng: R) -> Self {
        Self::new(config, Mode::Arcade, DifficultyCurve::arcade(), 1, 0, rng)
    }

    /// Create a training world with one bird per controller and a first pipe
    pub fn evolution(config: SimConfig, population: usize, generation: u32, rng: R) -> Self {
        Self::new(
            config,
            Mode::Evolution,
            DifficultyCurve::evolution(),
            population,
            generation,
            rng,
        )
    }

    pub fn new(
        config: SimConfig,
        mode: Mode,
        curve: DifficultyCurve,
        population: usize,
        generation: u32,
        rng: R,
    ) -> Self {
        let mut world = Self {
            config,
            mode,
            curve,
            fitness: FitnessEvaluator::default(),
            birds: Vec::new(),
            pipes: Vec::new(),
            score: 0,
            level: 0,
            status: Status::Playing,
            generation,
            tick_count: 0,
            since_spawn: Duration::ZERO,
            checkpoint_sent: false,
            rng,
        };
        world.populate(population);
        world
    }

    /// Start the episode over with the same number of birds.
    /// Arcade mode calls this when the player asks for a restart.
    pub fn reset(&mut self) {
        let population = self.birds.len();
        self.populate(population);
        tracing::debug!(mode = ?self.mode, population, "world reset");
    }

    fn populate(&mut self, population: usize) {
        self.birds = (0..population).map(|_| Bird::spawn(&self.config)).collect();
        self.pipes.clear();
        self.score = 0;
        self.level = 0;
        self.status = Status::Playing;
        self.tick_count = 0;
        self.since_spawn = Duration::ZERO;
        self.checkpoint_sent = false;

        if self.mode == Mode::Evolution {
            self.spawn_pipe();
        }
    }

    /// Route a key or click: flap while playing, restart after a game over
    pub fn press(&mut self, input: &mut HumanInput) {
        match self.status {
            Status::GameOver => self.reset(),
            Status::Playing => input.queue_flap(),
            Status::Extinct => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Playing
    }

    pub fn alive(&self) -> usize {
        self.birds.iter().filter(|b| b.alive).count()
    }

    /// The first pipe that has not been passed yet
    pub fn next_pipe(&self) -> Option<&Pipe> {
        self.pipes.iter().find(|p| !p.scored)
    }

    /// What bird `index` would see right now
    pub fn observe(&self, index: usize) -> Option<Observation> {
        let bird = self.birds.get(index)?;
        self.next_pipe().map(|pipe| Observation::new(bird, pipe))
    }

    /// Index of the bird with the highest fitness, dead or alive
    pub fn best_bird(&self) -> Option<usize> {
        self.birds
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.fitness.total_cmp(&b.fitness))
            .map(|(idx, _)| idx)
    }

    fn ground(&self) -> Ground {
        match self.mode {
            Mode::Arcade => Ground::Safe,
            Mode::Evolution => Ground::Lethal,
        }
    }

    fn spawn_pipe(&mut self) -> TickEvent {
        let params = self.curve.params(self.level);
        let pipe = Pipe::spawn(&self.config, params, &mut self.rng);
        let event = TickEvent::PipeSpawned {
            gap_center: pipe.gap_center,
            gap_size: pipe.gap_size,
        };
        tracing::debug!(
            gap_center = pipe.gap_center,
            gap_size = pipe.gap_size,
            speed = pipe.speed,
            "pipe spawned"
        );
        self.pipes.push(pipe);
        event
    }

    /// Advance the world by one tick.
    ///
    /// `controllers[i]` drives `birds[i]`; a bird without a controller never flaps.
    /// Steps run in a fixed order: controls and bird physics, pipe movement,
    /// timed spawning, collisions, scoring, pipe removal, fitness.
    pub fn tick<C: Controller>(&mut self, controllers: &mut [C]) -> Vec<TickEvent> {
        let mut events = Vec::new();

        if self.status != Status::Playing {
            return events;
        }

        if self.mode == Mode::Evolution && self.alive() == 0 {
            self.status = Status::Extinct;
            events.push(TickEvent::Extinct);
            return events;
        }

        self.tick_count += 1;

        // Controls and physics
        let ground = self.ground();
        let max_y = self.config.max_bird_y();
        let target = self.pipes.iter().find(|p| !p.scored);
        for (idx, bird) in self.birds.iter_mut().enumerate() {
            if !bird.alive {
                continue;
            }

            let observation = target.map(|pipe| Observation::new(bird, pipe));
            let flap = controllers
                .get_mut(idx)
                .is_some_and(|c| c.decide(observation.as_ref()));
            if flap {
                bird.flap(self.config.flap_velocity);
                events.push(TickEvent::Flapped { bird: idx });
            }

            let hit = bird.advance(self.config.gravity, max_y, ground);
            if hit == Some(Boundary::Ground) && !bird.alive {
                tracing::debug!(bird = idx, "bird hit the ground");
                events.push(TickEvent::Grounded { bird: idx });
            }
        }

        for pipe in &mut self.pipes {
            pipe.advance();
        }

        // Timed spawning; curves without an interval spawn on score instead
        if let Some(interval) = self.curve.params(self.level).spawn_interval {
            self.since_spawn += self.config.tick;
            if self.since_spawn >= interval {
                self.since_spawn = Duration::ZERO;
                events.push(self.spawn_pipe());
            }
        }

        // Collisions
        let screen_height = self.config.screen_height;
        for pipe in &self.pipes {
            for (idx, bird) in self.birds.iter_mut().enumerate() {
                if bird.alive && collides(bird, pipe, screen_height) {
                    bird.alive = false;
                    tracing::debug!(bird = idx, "bird crashed into a pipe");
                    events.push(TickEvent::Crashed { bird: idx });
                }
            }
        }
        if self.mode == Mode::Arcade && self.alive() == 0 {
            self.status = Status::GameOver;
            tracing::info!(score = self.score, "game over");
            events.push(TickEvent::GameOver);
        }

        // Scoring against the leading living bird
        let lead_x = self
            .birds
            .iter()
            .filter(|b| b.alive)
            .map(|b| b.x)
            .reduce(f64::max);
        let mut passed = 0;
        if let Some(lead_x) = lead_x {
            for pipe in self.pipes.iter_mut() {
                if !pipe.scored && pipe.right_edge() < lead_x {
                    pipe.scored = true;
                    passed += 1;
                }
            }
        }
        for _ in 0..passed {
            self.score += 1;
            events.push(TickEvent::Scored { score: self.score });

            let level = self.curve.level_for(self.score);
            if level > self.level {
                self.level = level;
                let params = self.curve.params(level);
                tracing::info!(
                    level,
                    gap_size = params.gap_size,
                    speed = params.speed,
                    "difficulty increased"
                );
                events.push(TickEvent::LevelUp { level });
            }

            if self.mode == Mode::Evolution {
                self.fitness.award_pass(&mut self.birds);
                events.push(self.spawn_pipe());
            }
        }

        self.pipes.retain(|p| !p.is_offscreen());

        if self.mode == Mode::Evolution {
            let target = self.pipes.iter().find(|p| !p.scored);
            self.fitness.evaluate(&mut self.birds, target);

            if !self.checkpoint_sent && self.score >= self.config.checkpoint_score {
                if let Some(bird) = self.best_bird() {
                    let fitness = self.birds[bird].fitness;
                    tracing::info!(
                        score = self.score,
                        generation = self.generation,
                        bird,
                        fitness,
                        "checkpoint milestone reached"
                    );
                    events.push(TickEvent::CheckpointReached {
                        score: self.score,
                        bird,
                        fitness,
                    });
                    self.checkpoint_sent = true;
                }
            }
        }

        events
    }

    /// Read-only snapshot for renderers
    pub fn frame(&self) -> Frame {
        Frame {
            screen_width: self.config.screen_width,
            screen_height: self.config.screen_height,
            birds: self.birds.iter().map(Bird::view).collect(),
            pipes: self.pipes.iter().map(Pipe::view).collect(),
            score: self.score,
            level: self.level,
            generation: self.generation,
            tick: self.tick_count,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NetworkController;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::Brain;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn pipe(x: f64, gap_center: f64) -> Pipe {
        Pipe {
            x,
            gap_center,
            gap_size: 200,
            width: 50.0,
            speed: 3.0,
            scored: false,
        }
    }

    fn idle(n: usize) -> Vec<HumanInput> {
        (0..n).map(|_| HumanInput::new()).collect()
    }

    #[test]
    fn test_arcade_world_creation() {
        let world = World::arcade(SimConfig::default(), rng());
        assert_eq!(world.birds.len(), 1);
        assert!(world.pipes.is_empty());
        assert_eq!(world.score, 0);
        assert_eq!(world.status, Status::Playing);
    }

    #[test]
    fn test_evolution_world_creation() {
        let world = World::evolution(SimConfig::default(), 30, 4, rng());
        assert_eq!(world.birds.len(), 30);
        assert_eq!(world.pipes.len(), 1);
        assert_eq!(world.pipes[0].x, 400.0);
        assert_eq!(world.generation, 4);
    }

    #[test]
    fn test_observe_next_pipe() {
        let mut world = World::evolution(SimConfig::default(), 2, 1, rng());
        world.pipes[0].gap_center = 250.0;

        let observation = world.observe(1).unwrap();
        assert_eq!(observation.inputs(), [300.0, 50.0, 267.0]);

        world.pipes[0].scored = true;
        assert!(world.observe(1).is_none());
        assert!(world.observe(5).is_none());
    }

    #[test]
    fn test_flap_scenario() {
        let mut world = World::arcade(SimConfig::default(), rng());
        let mut input = HumanInput::new();
        world.press(&mut input);

        let events = world.tick(std::slice::from_mut(&mut input));

        assert!(events.contains(&TickEvent::Flapped { bird: 0 }));
        assert_eq!(world.birds[0].velocity, -6.75);
        assert_eq!(world.birds[0].y, 293.25);
    }

    #[test]
    fn test_arcade_spawns_on_timer() {
        let mut world = World::arcade(SimConfig::default(), rng());
        let mut inputs = idle(1);

        // 1500ms at 16.667ms per tick: the 90th tick crosses the interval
        for _ in 0..89 {
            world.tick(&mut inputs);
        }
        assert!(world.pipes.is_empty());

        let events = world.tick(&mut inputs);
        assert_eq!(world.pipes.len(), 1);
        assert!(matches!(
            events.as_slice(),
            [TickEvent::PipeSpawned { gap_size: 200, .. }]
        ));
    }

    #[test]
    fn test_arcade_higher_level_spawns_sooner() {
        let mut world = World::arcade(SimConfig::default(), rng());
        world.score = 30;
        world.level = 3;
        let mut inputs = idle(1);

        // 1200ms at level 3: the 72nd tick crosses the interval
        for _ in 0..71 {
            world.tick(&mut inputs);
        }
        assert!(world.pipes.is_empty());

        world.tick(&mut inputs);
        assert_eq!(world.pipes.len(), 1);
        assert_eq!(world.level, 3);
    }

    #[test]
    fn test_arcade_ground_is_safe() {
        let mut world = World::arcade(SimConfig::default(), rng());
        let mut inputs = idle(1);

        for _ in 0..60 {
            world.tick(&mut inputs);
        }

        assert_eq!(world.birds[0].y, 575.0);
        assert!(world.birds[0].alive);
        assert_eq!(world.status, Status::Playing);
    }

    #[test]
    fn test_arcade_collision_ends_game() {
        let mut world = World::arcade(SimConfig::default(), rng());
        // Gap far above the bird, pipe about to reach it
        world.pipes.push(pipe(135.0, 200.0));
        let mut inputs = idle(1);

        let events = world.tick(&mut inputs);

        assert!(events.contains(&TickEvent::Crashed { bird: 0 }));
        assert!(events.contains(&TickEvent::GameOver));
        assert_eq!(world.status, Status::GameOver);

        // A game-over world ignores ticks until it is reset
        let frozen = world.tick_count;
        assert!(world.tick(&mut inputs).is_empty());
        assert_eq!(world.tick_count, frozen);
    }

    #[test]
    fn test_press_after_game_over_resets() {
        let mut world = World::arcade(SimConfig::default(), rng());
        world.pipes.push(pipe(135.0, 200.0));
        world.score = 7;
        let mut input = HumanInput::new();
        world.tick(std::slice::from_mut(&mut input));
        assert_eq!(world.status, Status::GameOver);

        world.press(&mut input);

        assert_eq!(world.status, Status::Playing);
        assert_eq!(world.score, 0);
        assert!(world.pipes.is_empty());
        assert!(world.birds[0].alive);
        assert_eq!(world.birds[0].y, 300.0);
        assert!(!input.is_pending()); // The restart press is not a flap
    }

    #[test]
    fn test_score_once_per_pipe() {
        let mut world = World::arcade(SimConfig::default(), rng());
        // Right edge at 84 after one tick, already behind the bird at 133
        world.pipes.push(pipe(37.0, 300.0));
        let mut inputs = idle(1);

        let events = world.tick(&mut inputs);
        assert!(events.contains(&TickEvent::Scored { score: 1 }));
        assert!(world.pipes[0].scored);

        for _ in 0..5 {
            world.tick(&mut inputs);
        }
        assert_eq!(world.score, 1);
    }

    #[test]
    fn test_offscreen_pipes_removed() {
        let mut world = World::arcade(SimConfig::default(), rng());
        world.pipes.push(pipe(-48.0, 300.0));
        world.pipes.push(pipe(300.0, 300.0));
        let mut inputs = idle(1);

        world.tick(&mut inputs);

        assert_eq!(world.pipes.len(), 1);
        assert_eq!(world.pipes[0].x, 297.0);
    }

    #[test]
    fn test_arcade_level_up_changes_new_pipes_only() {
        let mut world = World::arcade(SimConfig::default(), rng());
        world.score = 9;
        world.pipes.push(pipe(37.0, 300.0));
        world.pipes.push(pipe(300.0, 300.0));
        let mut inputs = idle(1);

        let events = world.tick(&mut inputs);

        assert!(events.contains(&TickEvent::LevelUp { level: 1 }));
        assert_eq!(world.level, 1);
        // Existing pipes keep the speed they were created with
        assert_eq!(world.pipes[1].speed, 3.0);
        assert_eq!(world.curve.params(world.level).speed, 3.5);
    }

    #[test]
    fn test_evolution_ground_kills() {
        let mut world = World::evolution(SimConfig::default(), 2, 1, rng());
        let mut controllers = idle(2);

        let mut grounded = 0;
        for _ in 0..60 {
            grounded += world
                .tick(&mut controllers)
                .iter()
                .filter(|e| matches!(e, TickEvent::Grounded { .. }))
                .count();
        }

        assert_eq!(grounded, 2);
        assert_eq!(world.alive(), 0);
    }

    #[test]
    fn test_evolution_halts_when_extinct() {
        let mut world = World::evolution(SimConfig::default(), 3, 1, rng());
        for bird in &mut world.birds {
            bird.alive = false;
        }
        let mut controllers = idle(3);

        let events = world.tick(&mut controllers);

        assert_eq!(events, vec![TickEvent::Extinct]);
        assert_eq!(world.status, Status::Extinct);
        assert_eq!(world.tick_count, 0);
        assert!(world.tick(&mut controllers).is_empty());
    }

    #[test]
    fn test_evolution_pass_spawns_and_rewards() {
        let mut world = World::evolution(SimConfig::default(), 2, 1, rng());
        world.pipes[0].x = 37.0;
        world.pipes[0].gap_center = 300.0;
        world.birds[1].alive = false;
        let mut controllers = idle(2);

        let events = world.tick(&mut controllers);

        assert!(events.contains(&TickEvent::Scored { score: 1 }));
        assert_eq!(world.pipes.len(), 2);
        assert_eq!(world.pipes[1].x, 400.0);
        assert!(!world.pipes[1].scored);
        // Bonus plus survival plus alignment towards the new pipe
        assert!(world.birds[0].fitness > 5.0);
        assert_eq!(world.birds[1].fitness, 0.0);
    }

    #[test]
    fn test_evolution_level_up_every_fifteen() {
        let mut world = World::evolution(SimConfig::default(), 1, 1, rng());
        world.score = 14;
        world.pipes[0].x = 37.0;
        world.pipes[0].gap_center = 300.0;
        let mut controllers = idle(1);

        let events = world.tick(&mut controllers);

        assert!(events.contains(&TickEvent::LevelUp { level: 1 }));
        let spawned = world.pipes.last().unwrap();
        assert_eq!(spawned.gap_size, 195);
        assert_eq!(spawned.speed, 3.25);
    }

    #[test]
    fn test_evolution_fitness_accumulates() {
        let mut world = World::evolution(SimConfig::default(), 1, 1, rng());
        let gap_center = world.pipes[0].gap_center;
        let mut controllers = idle(1);

        world.tick(&mut controllers);

        let bird = &world.birds[0];
        let expected = 0.1 + world.fitness.alignment_reward(bird.y, gap_center);
        assert!((bird.fitness - expected).abs() < 1e-12);
    }

    #[test]
    fn test_checkpoint_requested_once() {
        let mut world = World::evolution(SimConfig::default(), 3, 7, rng());
        world.birds[2].fitness = 50.0;
        world.score = 99;
        let mut controllers = idle(3);

        let mut checkpoints = Vec::new();
        for _ in 0..3 {
            // Put an unscored pipe right behind the flock so every tick scores
            world.pipes.insert(0, pipe(37.0, world.birds[0].y));
            for event in world.tick(&mut controllers) {
                if let TickEvent::CheckpointReached { score, bird, .. } = event {
                    checkpoints.push((score, bird));
                }
            }
        }

        assert_eq!(world.score, 102);
        assert_eq!(checkpoints, vec![(100, 2)]);
    }

    #[test]
    fn test_checkpoint_rearmed_by_reset() {
        let mut world = World::evolution(SimConfig::default(), 1, 1, rng());
        world.score = 99;
        world.pipes.insert(0, pipe(37.0, 300.0));
        let mut controllers = idle(1);
        let events = world.tick(&mut controllers);
        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::CheckpointReached { score: 100, .. })));

        world.reset();
        world.score = 99;
        world.pipes.insert(0, pipe(37.0, 300.0));
        let events = world.tick(&mut controllers);
        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::CheckpointReached { .. })));
    }

    #[test]
    fn test_missing_controller_never_flaps() {
        let mut world = World::evolution(SimConfig::default(), 2, 1, rng());
        let mut controllers: Vec<NetworkController> = vec![NetworkController::new(Brain {
            output_bias: 2.0,
            ..Default::default()
        })];

        let events = world.tick(&mut controllers);

        assert!(events.contains(&TickEvent::Flapped { bird: 0 }));
        assert!(!events.contains(&TickEvent::Flapped { bird: 1 }));
        // The bird without a controller still falls
        assert_eq!(world.birds[1].y, 300.25);
    }

    #[test]
    fn test_seeded_worlds_are_deterministic() {
        let run = || {
            let mut world = World::evolution(SimConfig::default(), 5, 1, StdRng::seed_from_u64(77));
            let mut rng = StdRng::seed_from_u64(5);
            let mut controllers: Vec<NetworkController> = (0..5)
                .map(|_| NetworkController::new(Brain::random(&mut rng)))
                .collect();
            for _ in 0..2_000 {
                world.tick(&mut controllers);
            }
            world.frame()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_frame_snapshot() {
        let world = World::evolution(SimConfig::default(), 4, 9, rng());
        let frame = world.frame();

        assert_eq!(frame.birds.len(), 4);
        assert_eq!(frame.pipes.len(), 1);
        assert_eq!(frame.generation, 9);
        assert_eq!(frame.alive(), 4);
        assert_eq!(frame.status, Status::Playing);
    }
}
