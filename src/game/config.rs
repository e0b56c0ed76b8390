use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

/// Smallest cell that still fits the eye marks and a visible food disc
pub const MIN_CELL_SIZE: u32 = 10;

/// Largest grid side; keeps coordinates in `i32` and the surface in `u32`
pub const MAX_GRID_SIZE: usize = 1000;

/// Configuration for the game
///
/// Every field has a default, so a JSON file only needs to name the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square game grid, in cells
    pub grid_size: usize,
    /// Side of one cell on the drawing surface, in surface pixels
    pub cell_size: u32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Period of the tick driver
    pub tick_interval_ms: u64,
    /// Points awarded per food eaten
    pub food_score: u32,
    /// How many direction changes can be buffered between two ticks
    pub max_queued_directions: usize,
    /// Seed for food placement; random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            cell_size: 25,
            initial_snake_length: 3,
            tick_interval_ms: 150,
            food_score: 10,
            max_queued_directions: 2,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Side of the drawing surface in surface pixels
    pub fn surface_size(&self) -> u32 {
        self.grid_size as u32 * self.cell_size
    }

    fn surface_size_checked(&self) -> Option<u32> {
        u32::try_from(self.grid_size)
            .ok()?
            .checked_mul(self.cell_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject configurations the engine cannot play on
    pub fn validate(&self) -> Result<()> {
        ensure!(self.grid_size >= 2, "grid size must be at least 2, got {}", self.grid_size);
        ensure!(
            self.grid_size <= MAX_GRID_SIZE,
            "grid size must be at most {MAX_GRID_SIZE}, got {}",
            self.grid_size
        );
        ensure!(
            self.initial_snake_length >= 1,
            "initial snake length must be at least 1"
        );
        // The snake starts at the center cell and trails to the left.
        ensure!(
            self.initial_snake_length <= self.grid_size / 2 + 1,
            "initial snake length {} does not fit on a {}x{} grid",
            self.initial_snake_length,
            self.grid_size,
            self.grid_size
        );
        ensure!(
            self.cell_size >= MIN_CELL_SIZE,
            "cell size must be at least {MIN_CELL_SIZE}, got {}",
            self.cell_size
        );
        ensure!(
            self.surface_size_checked().is_some(),
            "{} cells of {} pixels do not fit on a drawing surface",
            self.grid_size,
            self.cell_size
        );
        ensure!(self.tick_interval_ms > 0, "tick interval must be positive");
        ensure!(
            self.max_queued_directions > 0,
            "direction queue must hold at least one entry"
        );
        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create config file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .context("Failed to serialize config")?;
        Ok(())
    }
}
