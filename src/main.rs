use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::logging;
use grid_snake::modes::HumanMode;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Single-player grid snake game for the terminal")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells per side of the square grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Append diagnostic logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

impl Cli {
    /// Defaults, then the config file, then individual flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref())?;

    let config = cli.game_config()?;

    if cli.dump_config {
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{json}");
        return Ok(());
    }

    info!(?config, "starting game");

    let mut human_mode = HumanMode::new(config);
    human_mode.run().await?;

    Ok(())
}
