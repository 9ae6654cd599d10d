use crate::collision::Rect;
use crate::config::SimConfig;
use crate::difficulty::DifficultyParams;
use rand::Rng;
use shared::PipeView;

/// A wall with a single gap, scrolling right to left
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge
    pub x: f64,

    /// Vertical center of the gap, always a whole number of pixels
    pub gap_center: f64,

    /// Gap height, fixed for the pipe's lifetime
    pub gap_size: u32,
    pub width: f64,

    /// Pixels per tick, fixed for the pipe's lifetime
    pub speed: f64,

    /// The pipe has been passed and counted towards the score
    pub scored: bool,
}

impl Pipe {
    /// Spawn a pipe at the right edge of the screen.
    /// Speed and gap size come from the difficulty at this moment and never change.
    pub fn spawn<R: Rng>(config: &SimConfig, params: DifficultyParams, rng: &mut R) -> Self {
        let (low, high) = config.gap_center_range();
        Self {
            x: config.screen_width,
            gap_center: f64::from(rng.gen_range(low..=high)),
            gap_size: params.gap_size,
            width: config.pipe_width,
            speed: params.speed,
            scored: false,
        }
    }

    pub fn advance(&mut self) {
        self.x -= self.speed;
    }

    pub fn right_edge(&self) -> f64 {
        self.x + self.width
    }

    /// The pipe has scrolled fully past the left edge of the screen
    pub fn is_offscreen(&self) -> bool {
        self.right_edge() < 0.0
    }

    fn half_gap(&self) -> f64 {
        f64::from(self.gap_size / 2)
    }

    /// Bottom edge of the top pipe
    pub fn gap_top(&self) -> f64 {
        self.gap_center - self.half_gap()
    }

    /// Top edge of the bottom pipe
    pub fn gap_bottom(&self) -> f64 {
        self.gap_center + self.half_gap()
    }

    /// The two solid parts: above the gap and below it
    pub fn hitboxes(&self, screen_height: f64) -> [Rect; 2] {
        let top = Rect::new(self.x, 0.0, self.width, self.gap_top());
        let bottom = Rect::new(
            self.x,
            self.gap_bottom(),
            self.width,
            screen_height - self.gap_bottom(),
        );
        [top, bottom]
    }

    pub fn view(&self) -> PipeView {
        PipeView {
            x: self.x,
            width: self.width,
            gap_top: self.gap_top(),
            gap_bottom: self.gap_bottom(),
        }
    }
}
