//! Terminal rendering of world snapshots.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use shared::{BirdView, Status};

const CONTROLS: &[(&str, &str)] = &[("[Space/Up/Enter/Click]", "Flap"), ("[Q/Esc]", "Quit")];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Empty,
    Pipe,
    Bird(&'static str),
}

/// Draw one snapshot: play area on top, two-line status bar below
pub fn render(frame: &mut Frame, snapshot: &shared::Frame, replay: bool) {
    let title = if replay {
        " Flapping Bird - replay "
    } else {
        " Flapping Bird "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let area = frame.size();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(inner);

    render_play_area(frame, chunks[0], snapshot);
    render_status_bar(frame, chunks[1], snapshot, replay);
}

fn bird_glyph(bird: &BirdView) -> &'static str {
    if bird.velocity < -0.5 {
        "▲"
    } else if bird.velocity > 1.0 {
        "▼"
    } else {
        "►"
    }
}

/// Scale the world onto a `width` x `height` character grid
fn rasterize(snapshot: &shared::Frame, width: usize, height: usize) -> Vec<Vec<Cell>> {
    let mut grid = vec![vec![Cell::Empty; width]; height];
    if width == 0 || height == 0 || snapshot.screen_width <= 0.0 || snapshot.screen_height <= 0.0
    {
        return grid;
    }

    let x_scale = width as f64 / snapshot.screen_width;
    let y_scale = height as f64 / snapshot.screen_height;
    let column = |x: f64| (x * x_scale).floor().clamp(0.0, (width - 1) as f64) as usize;
    let row = |y: f64| (y * y_scale).floor().clamp(0.0, (height - 1) as f64) as usize;

    for pipe in &snapshot.pipes {
        let right = pipe.x + pipe.width;
        if right <= 0.0 || pipe.x >= snapshot.screen_width {
            continue;
        }

        let first = column(pipe.x.max(0.0));
        let end = ((right * x_scale).ceil() as usize).clamp(first + 1, width);
        for (r, line) in grid.iter_mut().enumerate() {
            // Center of this row in world units
            let y = (r as f64 + 0.5) / y_scale;
            if y < pipe.gap_top || y > pipe.gap_bottom {
                for cell in &mut line[first..end] {
                    *cell = Cell::Pipe;
                }
            }
        }
    }

    for bird in snapshot.birds.iter().filter(|b| b.alive) {
        let c = column(bird.x - bird.size / 2.0);
        let r = row(bird.y + bird.size / 2.0);
        grid[r][c] = Cell::Bird(bird_glyph(bird));
    }

    grid
}

fn render_play_area(frame: &mut Frame, area: Rect, snapshot: &shared::Frame) {
    let grid = rasterize(snapshot, area.width as usize, area.height as usize);

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|cell| match cell {
                    Cell::Empty => Span::raw(" "),
                    Cell::Pipe => Span::styled("█", Style::default().fg(Color::Green)),
                    Cell::Bird(glyph) => Span::styled(
                        glyph,
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn status_text(snapshot: &shared::Frame, replay: bool) -> (String, Color) {
    let progress = if replay {
        format!(
            "Score: {}  Level: {}  Generation: {}  Alive: {}/{}",
            snapshot.score,
            snapshot.level,
            snapshot.generation,
            snapshot.alive(),
            snapshot.birds.len()
        )
    } else {
        format!("Score: {}  Level: {}", snapshot.score, snapshot.level)
    };

    match snapshot.status {
        Status::Playing => (progress, Color::Green),
        Status::GameOver => (
            format!("Game over! {progress}  Press Space to restart"),
            Color::Red,
        ),
        Status::Extinct => (
            format!("Crashed. {progress}  Press Space to replay"),
            Color::Red,
        ),
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, snapshot: &shared::Frame, replay: bool) {
    if area.height < 1 {
        return;
    }

    let (text, color) = status_text(snapshot, replay);
    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(status, Rect { height: 1, ..area });

    if area.height >= 2 {
        let mut spans = Vec::new();
        for (i, (key, action)) in CONTROLS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::White)));
            spans.push(Span::styled(
                format!(" {action}"),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let controls = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(
            controls,
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );
    }
}
