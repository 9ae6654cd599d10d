use crate::ui;
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{backend::Backend, Terminal};
use rand::rngs::StdRng;
use shared::{Checkpoint, Frame};
use sim::{HumanInput, NetworkController, SimConfig, TickEvent, World};
use std::time::{Duration, Instant};

/// Who flies the bird
pub enum Pilot {
    Human(HumanInput),
    Network(NetworkController),
}

pub struct App {
    world: World<StdRng>,
    pilot: Pilot,
    quit: bool,
}

impl App {
    /// Arcade game for a human player
    pub fn play(config: SimConfig, rng: StdRng) -> Self {
        Self {
            world: World::arcade(config, rng),
            pilot: Pilot::Human(HumanInput::new()),
            quit: false,
        }
    }

    /// A single saved controller flying an evolution course
    pub fn replay(config: SimConfig, checkpoint: Checkpoint, rng: StdRng) -> Self {
        Self {
            world: World::evolution(config, 1, checkpoint.generation, rng),
            pilot: Pilot::Network(NetworkController::new(checkpoint.brain)),
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn tick_rate(&self) -> Duration {
        self.world.config.tick
    }

    pub fn frame(&self) -> Frame {
        self.world.frame()
    }

    pub fn is_replay(&self) -> bool {
        matches!(self.pilot, Pilot::Network(_))
    }

    /// Flap key or click
    pub fn press(&mut self) {
        match &mut self.pilot {
            Pilot::Human(input) => self.world.press(input),
            // The network flies on its own; a press only restarts a finished replay
            Pilot::Network(_) => {
                if !self.world.is_running() {
                    self.world.reset();
                }
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(_),
                ..
            }) => self.press(),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => self.press(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            _ => {}
        }
    }

    /// Advance the world by one tick
    pub fn step(&mut self) -> Vec<TickEvent> {
        let events = match &mut self.pilot {
            Pilot::Human(input) => self.world.tick(std::slice::from_mut(input)),
            Pilot::Network(network) => self.world.tick(std::slice::from_mut(network)),
        };

        for event in &events {
            match event {
                TickEvent::GameOver | TickEvent::Extinct => {
                    tracing::info!(score = self.world.score, "run ended")
                }
                TickEvent::Scored { score } => tracing::debug!(score, "pipe passed"),
                _ => {}
            }
        }

        events
    }
}

/// Main loop: draw, wait for input until the next tick is due, tick
pub fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let tick_rate = app.tick_rate();
    let mut last_tick = Instant::now();

    loop {
        let frame = app.frame();
        let replay = app.is_replay();
        terminal.draw(|f| ui::render(f, &frame, replay))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            app.handle_event(event::read()?);
        }

        if app.should_quit() {
            return Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            app.step();
            last_tick = Instant::now();
        }
    }
}
