//! Board drawing as a list of immediate-mode primitives
//!
//! [`scene`] turns the board into [`DrawCommand`]s on a square surface of
//! `grid_size * cell_size` pixels, origin top-left, y pointing down. It has no
//! side effects, and the result always repaints the whole surface.

use crate::game::{Direction, GameState, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BACKGROUND: Rgb = Rgb(0x1a, 0x1a, 0x2e);
pub const GRID_LINE: Rgb = Rgb(0x16, 0x21, 0x3e);
pub const SNAKE_HEAD: Rgb = Rgb(0x4e, 0xcc, 0xa3);
pub const SNAKE_BODY: Rgb = Rgb(0x45, 0xb3, 0x93);
pub const EYE: Rgb = Rgb(0x1a, 0x1a, 0x2e);
pub const FOOD: Rgb = Rgb(0xff, 0x6b, 0x6b);

/// Side of one eye mark in surface pixels
pub const EYE_SIZE: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillBackground {
        color: Rgb,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    FillCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Rgb,
    },
    StrokeLine {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgb,
    },
}

/// Draw the full board
///
/// `heading` picks where the eyes sit on the head.
pub fn scene(state: &GameState, heading: Direction, cell_size: u32) -> Vec<DrawCommand> {
    let cell = cell_size as f64;
    let extent = state.grid_size as f64 * cell;
    let mut commands = Vec::with_capacity(2 * (state.grid_size + 1) + 2 * state.snake.len() + 4);

    commands.push(DrawCommand::FillBackground { color: BACKGROUND });

    for i in 0..=state.grid_size {
        let offset = i as f64 * cell;
        commands.push(DrawCommand::StrokeLine {
            x1: offset,
            y1: 0.0,
            x2: offset,
            y2: extent,
            color: GRID_LINE,
        });
        commands.push(DrawCommand::StrokeLine {
            x1: 0.0,
            y1: offset,
            x2: extent,
            y2: offset,
            color: GRID_LINE,
        });
    }

    for (index, segment) in state.snake.body.iter().enumerate() {
        let (left, top) = cell_origin(*segment, cell);
        commands.push(DrawCommand::FillRect {
            x: left + 1.0,
            y: top + 1.0,
            width: cell - 2.0,
            height: cell - 2.0,
            color: if index == 0 { SNAKE_HEAD } else { SNAKE_BODY },
        });

        if index == 0 {
            for (ex, ey) in eye_offsets(heading, cell) {
                commands.push(DrawCommand::FillRect {
                    x: left + ex,
                    y: top + ey,
                    width: EYE_SIZE,
                    height: EYE_SIZE,
                    color: EYE,
                });
            }
        }
    }

    if let Some(food) = state.food {
        let (left, top) = cell_origin(food, cell);
        commands.push(DrawCommand::FillCircle {
            cx: left + cell / 2.0,
            cy: top + cell / 2.0,
            radius: cell / 2.0 - 3.0,
            color: FOOD,
        });
    }

    commands
}

fn cell_origin(pos: Position, cell: f64) -> (f64, f64) {
    (pos.x as f64 * cell, pos.y as f64 * cell)
}

/// Top-left corners of the two eyes, relative to the head cell
pub fn eye_offsets(heading: Direction, cell: f64) -> [(f64, f64); 2] {
    match heading {
        Direction::Right => [(cell - 8.0, 6.0), (cell - 8.0, cell - 9.0)],
        Direction::Left => [(5.0, 6.0), (5.0, cell - 9.0)],
        Direction::Up => [(6.0, 5.0), (cell - 9.0, 5.0)],
        Direction::Down => [(6.0, cell - 8.0), (cell - 9.0, cell - 8.0)],
    }
}
