use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use set_app::config::GameFileConfig;
use set_app::logging::init_logging;
use set_app::runner::{RunOptions, run_game};
use std::time::Duration;

/// Real-time Set dealer with keyboard and synthetic players.
#[derive(Debug, Parser)]
#[command(name = "setgame", author, version, about = "Concurrent Set card game")]
struct Cli {
    /// Path to a YAML configuration file; built-in defaults apply without one.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the number of players (new seats get uniform computer players).
    #[arg(long, value_name = "COUNT")]
    players: Option<usize>,

    /// Override the RNG seed for the deck.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the turn timeout in milliseconds.
    #[arg(long, value_name = "MILLIS")]
    turn_timeout_ms: Option<u64>,

    /// Stop the game after this many milliseconds of wall-clock time.
    #[arg(long, value_name = "MILLIS")]
    time_limit_ms: Option<u64>,

    /// Write the final standings as JSON to this path.
    #[arg(long, value_name = "FILE")]
    summary_json: Option<PathBuf>,

    /// Exit after validating the configuration (no game is played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => GameFileConfig::from_path(path)?,
        None => GameFileConfig::default(),
    };

    if let Some(players) = cli.players {
        config.set_player_count(players);
    }

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if let Some(turn_timeout_ms) = cli.turn_timeout_ms {
        config.timing.turn_timeout_ms = turn_timeout_ms;
        config.timing.turn_timeout_warning_ms =
            config.timing.turn_timeout_warning_ms.min(turn_timeout_ms);
    }

    config.validate()?;

    let player_count = config.players.len();
    let humans = config.human_count();
    println!(
        "Loaded configuration with {player_count} player{} ({humans} human, {} card deck, {} slots)",
        if player_count == 1 { "" } else { "s" },
        config.table.deck_size,
        config.table.table_size
    );

    if cli.validate_only {
        println!("Validation-only mode: game skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging)?;
    let options = RunOptions {
        time_limit: cli.time_limit_ms.map(Duration::from_millis),
        keyboard: humans > 0,
    };
    let outcome = run_game(&config, &options)?;

    println!(
        "Game over after {} round{}: {} set{} collected, top score {}",
        outcome.rounds,
        if outcome.rounds == 1 { "" } else { "s" },
        outcome.sets_collected,
        if outcome.sets_collected == 1 { "" } else { "s" },
        outcome.top_score()
    );
    for entry in &outcome.scores {
        println!("  {}: {}", entry.player, entry.score);
    }

    if let Some(path) = cli.summary_json.as_ref() {
        let json = serde_json::to_string_pretty(&outcome)?;
        fs::write(path, json)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        println!("Summary: {}", path.display());
    }
    if let Some(log_path) = logging_guard.log_path.as_ref() {
        println!("Log: {}", log_path.display());
    }

    Ok(())
}
