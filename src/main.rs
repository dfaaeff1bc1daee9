use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use snake_tui::game::GameConfig;
use snake_tui::modes::PlayMode;
use snake_tui::session::HighScoreStore;

#[derive(Parser)]
#[command(name = "snake_tui")]
#[command(version, about = "Classic grid snake for the terminal")]
struct Cli {
    /// Side length of the square game grid
    #[arg(long, default_value = "20")]
    grid_size: usize,

    /// Starting tick interval in milliseconds
    #[arg(long, default_value = "200")]
    tick_ms: u64,

    /// Where the high score is persisted
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is off unless RUST_LOG asks for it; stderr carries the TUI
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = GameConfig {
        grid_size: cli.grid_size,
        initial_tick_ms: cli.tick_ms,
        ..GameConfig::default()
    };
    let store = HighScoreStore::new(cli.high_score_file);

    let mut play_mode = PlayMode::new(config, store);
    play_mode.run().await?;

    Ok(())
}
