use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph,
        canvas::{self, Canvas, Context},
    },
};

use super::scene::{scene, DrawCommand, Rgb};
use crate::game::{EndReason, Phase, Session};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, session: &Session, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(session, metrics);
        frame.render_widget(stats, chunks[0]);

        let board_area = square_area(chunks[1]);
        self.render_board(frame, board_area, session);

        if let Some(overlay) = self.render_overlay(session) {
            let popup = popup_area(board_area, 34, 9);
            frame.render_widget(Clear, popup);
            frame.render_widget(overlay, popup);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    /// Paint the full display list for the current board
    fn render_board(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let config = session.config();
        let extent = config.surface_size() as f64;
        let commands = scene(session.state(), session.heading(), config.cell_size);

        let background = commands
            .iter()
            .find_map(|command| match command {
                DrawCommand::FillBackground { color } => Some(to_color(*color)),
                _ => None,
            })
            .unwrap_or(Color::Reset);

        // Half blocks give two square-ish pixels per terminal cell
        let rows = area.height.saturating_sub(2).max(1) as f64 * 2.0;
        let step = (extent / rows).max(1.0);

        let board = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .marker(Marker::HalfBlock)
            .background_color(background)
            .x_bounds([0.0, extent])
            .y_bounds([0.0, extent])
            .paint(move |ctx| paint(ctx, &commands, extent, step));

        frame.render_widget(board, area);
    }

    fn render_stats(&self, session: &Session, metrics: &GameMetrics) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled(
                "Snake Game",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                session.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    /// Popup for every phase except running
    fn render_overlay(&self, session: &Session) -> Option<Paragraph<'static>> {
        let title = |text: &'static str, color: Color| {
            Line::from(Span::styled(
                text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        };
        let button = |label: &'static str| {
            Line::from(Span::styled(
                format!("[ {label} ]"),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ))
        };
        let hint = |text: &'static str| {
            Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
        };

        let (lines, border) = match session.phase() {
            Phase::Running => return None,
            Phase::Idle => (
                vec![
                    title("Welcome to Snake!", Color::Green),
                    Line::from(""),
                    hint("Use arrow keys to move"),
                    hint("Press Space to pause"),
                    Line::from(""),
                    button("Start Game"),
                ],
                Color::Green,
            ),
            Phase::Paused => (
                vec![
                    title("Paused", Color::Yellow),
                    Line::from(""),
                    hint("Press Space or Enter to continue"),
                    Line::from(""),
                    button("Resume"),
                ],
                Color::Yellow,
            ),
            Phase::Over => {
                let heading = match session.end_reason() {
                    Some(EndReason::BoardFilled) => title("You Win!", Color::Green),
                    _ => title("Game Over!", Color::Red),
                };
                (
                    vec![
                        heading,
                        Line::from(""),
                        Line::from(vec![
                            Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                            Span::styled(
                                session.score().to_string(),
                                Style::default()
                                    .fg(Color::White)
                                    .add_modifier(Modifier::BOLD),
                            ),
                        ]),
                        Line::from(""),
                        button("Play Again"),
                    ],
                    Color::Red,
                )
            }
        };

        Some(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(border)),
            ),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" select | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Replay the display list on a ratatui canvas
///
/// The canvas y axis points up, so every y is mirrored. Filled shapes are
/// rasterised into horizontal spans `step` surface pixels apart.
fn paint(ctx: &mut Context, commands: &[DrawCommand], extent: f64, step: f64) {
    let flip = |y: f64| extent - y;
    let mut painted_lines = false;

    for command in commands {
        match *command {
            // Applied as the canvas background color
            DrawCommand::FillBackground { .. } => {}
            DrawCommand::StrokeLine {
                x1,
                y1,
                x2,
                y2,
                color,
            } => {
                ctx.draw(&canvas::Line {
                    x1,
                    y1: flip(y1),
                    x2,
                    y2: flip(y2),
                    color: to_color(color),
                });
                painted_lines = true;
            }
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                if painted_lines {
                    // Keep shapes above the grid
                    ctx.layer();
                    painted_lines = false;
                }
                let mut row = y;
                while row < y + height {
                    ctx.draw(&canvas::Line {
                        x1: x,
                        y1: flip(row),
                        x2: x + width,
                        y2: flip(row),
                        color: to_color(color),
                    });
                    row += step;
                }
            }
            DrawCommand::FillCircle {
                cx,
                cy,
                radius,
                color,
            } => {
                let mut dy = -radius;
                while dy <= radius {
                    let half = (radius * radius - dy * dy).max(0.0).sqrt();
                    ctx.draw(&canvas::Line {
                        x1: cx - half,
                        y1: flip(cy + dy),
                        x2: cx + half,
                        y2: flip(cy + dy),
                        color: to_color(color),
                    });
                    dy += step;
                }
            }
        }
    }
}

fn to_color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

/// Largest area that shows a square board, centered in `area`
///
/// Terminal cells are about twice as tall as they are wide.
fn square_area(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2);
    let width = height * 2;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
