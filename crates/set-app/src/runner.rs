use crate::config::{GameFileConfig, PlayerKind};
use crate::console::ConsoleView;
use crate::keyboard::{Keyboard, QUIT_COMMAND};
use anyhow::{Context, Result};
use set_bot::SyntheticInput;
use set_core::game::{Dealer, GameOutcome};
use set_core::model::PlayerId;
use set_core::oracle::{FeatureOracle, SetOracle};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Ask the game to stop once this much wall-clock time has passed.
    pub time_limit: Option<Duration>,
    /// Read human key presses from stdin.
    pub keyboard: bool,
}

/// Seats every configured player, plays the game to completion and returns
/// the standings.
pub fn run_game(config: &GameFileConfig, options: &RunOptions) -> Result<GameOutcome> {
    let feature_oracle =
        FeatureOracle::new(config.table.feature_count, config.table.feature_size as u32);
    let oracle: Arc<dyn SetOracle> = Arc::new(feature_oracle);
    let view = Arc::new(ConsoleView::new(feature_oracle));
    let game_config = config.game_config();
    let feature_size = game_config.feature_size;
    let base_seed = config.seed.unwrap_or_else(rand::random);

    let mut dealer = Dealer::new(game_config, Arc::clone(&oracle), view)
        .context("building the dealer")?;

    let mut keyboard = Keyboard::new();
    for (index, player) in config.players.iter().enumerate() {
        let id = PlayerId::new(index);
        match player.kind {
            PlayerKind::Computer => {
                let policy = player.strategy.build(
                    Arc::clone(&oracle),
                    feature_size,
                    base_seed.wrapping_add(index as u64 + 1),
                );
                let input = SyntheticInput::new(policy)
                    .with_delay(Duration::from_millis(player.press_delay_ms));
                dealer.attach_companion(id, Box::new(input));
            }
            PlayerKind::Human => {
                if let (Some(pad), Some(keys)) = (dealer.keypad(id), player.keys.as_deref()) {
                    keyboard.bind(pad, keys);
                }
            }
        }
    }

    let terminator = dealer.terminator();
    if options.keyboard && !keyboard.is_empty() {
        println!("Type the keys for your slots and press enter; '{QUIT_COMMAND}' ends the game.");
        keyboard
            .spawn_stdin(terminator.clone())
            .context("starting the keyboard reader")?;
    }

    let started = Instant::now();
    let game = dealer.spawn().context("starting the dealer thread")?;

    let (done, finished) = mpsc::channel::<()>();
    let watchdog = options.time_limit.map(|limit| {
        let terminator = terminator.clone();
        thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = finished.recv_timeout(limit) {
                info!(limit_ms = limit.as_millis() as u64, "time limit reached");
                terminator.request();
            }
        })
    });

    let outcome = game
        .join()
        .map_err(|_| anyhow::anyhow!("dealer thread panicked"))?;
    let _ = done.send(());
    if let Some(watchdog) = watchdog {
        let _ = watchdog.join();
    }

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        rounds = outcome.rounds,
        sets = outcome.sets_collected,
        "game finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::{RunOptions, run_game};
    use crate::config::{GameFileConfig, PlayerConfig};
    use set_bot::BotStrategy;
    use std::time::Duration;

    fn fast(players: Vec<PlayerConfig>) -> GameFileConfig {
        let mut config = GameFileConfig {
            players,
            seed: Some(3),
            ..GameFileConfig::default()
        };
        config.timing.turn_timeout_ms = 200;
        config.timing.turn_timeout_warning_ms = 50;
        config.timing.point_freeze_ms = 1;
        config.timing.penalty_freeze_ms = 5;
        config.validate().unwrap();
        config
    }

    #[test]
    fn seekers_finish_a_game() {
        let config = fast(vec![
            PlayerConfig::computer(BotStrategy::Seeker),
            PlayerConfig::computer(BotStrategy::Seeker),
        ]);
        let outcome = run_game(&config, &RunOptions::default()).unwrap();
        assert!(outcome.sets_collected > 0);
        assert_eq!(outcome.scores.len(), 2);
    }

    #[test]
    fn time_limit_stops_a_game_nobody_can_play() {
        let config = fast(vec![PlayerConfig::human("qwerasdfzxcv")]);
        let options = RunOptions {
            time_limit: Some(Duration::from_millis(300)),
            keyboard: false,
        };
        let outcome = run_game(&config, &options).unwrap();
        assert_eq!(outcome.sets_collected, 0);
        assert!(outcome.rounds >= 1);
    }
}
