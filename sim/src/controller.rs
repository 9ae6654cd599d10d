use crate::{Bird, Pipe};
use shared::Brain;

/// Output above this makes a network controller flap
pub const FLAP_THRESHOLD: f64 = 0.5;

/// What a controller sees of the world before each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub bird_y: f64,

    /// Vertical distance between the bird and the next gap center
    pub gap_offset: f64,

    /// Horizontal distance between the bird and the next pipe's left edge
    pub pipe_distance: f64,
}

impl Observation {
    pub fn new(bird: &Bird, pipe: &Pipe) -> Self {
        Self {
            bird_y: bird.y,
            gap_offset: (bird.y - pipe.gap_center).abs(),
            pipe_distance: (bird.x - pipe.x).abs(),
        }
    }

    /// Network input vector
    pub fn inputs(&self) -> [f64; 3] {
        [self.bird_y, self.gap_offset, self.pipe_distance]
    }
}

/// Decides, once per tick, whether a bird flaps.
///
/// The observation is `None` while no unpassed pipe is on screen.
pub trait Controller {
    fn decide(&mut self, observation: Option<&Observation>) -> bool;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn decide(&mut self, observation: Option<&Observation>) -> bool {
        (**self).decide(observation)
    }
}

impl<C: Controller + ?Sized> Controller for &mut C {
    fn decide(&mut self, observation: Option<&Observation>) -> bool {
        (**self).decide(observation)
    }
}

/// Adapter for keyboard/mouse play: a press queues one flap
#[derive(Debug, Default, Clone)]
pub struct HumanInput {
    pending_flap: bool,
}

impl HumanInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Several presses within one tick still produce a single flap
    pub fn queue_flap(&mut self) {
        self.pending_flap = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending_flap
    }
}

impl Controller for HumanInput {
    fn decide(&mut self, _observation: Option<&Observation>) -> bool {
        std::mem::take(&mut self.pending_flap)
    }
}

/// Adapter for an evolved brain
#[derive(Debug, Clone)]
pub struct NetworkController {
    pub brain: Brain,
}

impl NetworkController {
    pub fn new(brain: Brain) -> Self {
        Self { brain }
    }
}

impl Controller for NetworkController {
    fn decide(&mut self, observation: Option<&Observation>) -> bool {
        observation.is_some_and(|o| self.brain.activate(o.inputs()) > FLAP_THRESHOLD)
    }
}
