use serde::{Deserialize, Serialize};
use set_bot::BotStrategy;
use set_core::config::GameConfig;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

const DEFAULT_FEATURE_COUNT: u32 = 4;
const DEFAULT_PRESS_DELAY_MS: u64 = 2;
/// Key rows for the first two human players on a twelve-slot table.
const DEFAULT_KEY_MAPS: [&str; 2] = ["qwerasdfzxcv", "uiopjkl;m,./"];

/// Root game configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GameFileConfig {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default = "default_players")]
    pub players: Vec<PlayerConfig>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GameFileConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            timing: TimingConfig::default(),
            players: default_players(),
            seed: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl GameFileConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: GameFileConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.table.validate()?;
        self.logging.normalize();
        self.assign_default_keys();
        validate_players(&self.players, self.table.table_size)?;
        self.game_config()
            .validate()
            .map_err(|err| ValidationError::InvalidField {
                field: section_of(err.field()).to_string(),
                message: err.to_string(),
            })
    }

    /// Runtime parameters for the dealer.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            deck_size: self.table.deck_size,
            table_size: self.table.table_size,
            feature_size: self.table.feature_size,
            turn_timeout: Duration::from_millis(self.timing.turn_timeout_ms),
            turn_timeout_warning: Duration::from_millis(self.timing.turn_timeout_warning_ms),
            point_freeze: Duration::from_millis(self.timing.point_freeze_ms),
            penalty_freeze: Duration::from_millis(self.timing.penalty_freeze_ms),
            human: self
                .players
                .iter()
                .map(|player| player.kind == PlayerKind::Human)
                .collect(),
            seed: self.seed,
        }
    }

    /// Resizes the roster, keeping existing entries and seating uniform
    /// computer players in any new seats.
    pub fn set_player_count(&mut self, count: usize) {
        self.players.truncate(count);
        while self.players.len() < count {
            self.players.push(PlayerConfig::computer(BotStrategy::Uniform));
        }
    }

    pub fn human_count(&self) -> usize {
        self.players
            .iter()
            .filter(|player| player.kind == PlayerKind::Human)
            .count()
    }

    fn assign_default_keys(&mut self) {
        if self.table.table_size != DEFAULT_KEY_MAPS[0].chars().count() {
            return;
        }
        let humans = self
            .players
            .iter_mut()
            .filter(|player| player.kind == PlayerKind::Human);
        for (player, keys) in humans.zip(DEFAULT_KEY_MAPS) {
            if player.keys.is_none() {
                player.keys = Some(keys.to_string());
            }
        }
    }
}

fn section_of(field: &str) -> &'static str {
    match field {
        "deck_size" => "table.deck_size",
        "table_size" => "table.table_size",
        "feature_size" => "table.feature_size",
        "turn_timeout" => "timing.turn_timeout_ms",
        "turn_timeout_warning" => "timing.turn_timeout_warning_ms",
        "players" => "players",
        _ => "config",
    }
}

fn default_players() -> Vec<PlayerConfig> {
    vec![
        PlayerConfig::computer(BotStrategy::Uniform),
        PlayerConfig::computer(BotStrategy::Uniform),
    ]
}

/// Deck and table dimensions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    pub deck_size: usize,
    pub table_size: usize,
    pub feature_count: u32,
    pub feature_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        let game = GameConfig::default();
        Self {
            deck_size: game.deck_size,
            table_size: game.table_size,
            feature_count: DEFAULT_FEATURE_COUNT,
            feature_size: game.feature_size,
        }
    }
}

impl TableConfig {
    /// Number of distinct cards the feature layout can describe.
    pub fn distinct_cards(&self) -> Option<usize> {
        self.feature_size.checked_pow(self.feature_count)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.feature_count == 0 {
            return Err(ValidationError::InvalidField {
                field: "table.feature_count".to_string(),
                message: "cards need at least one feature".to_string(),
            });
        }
        match self.distinct_cards() {
            Some(distinct) if self.deck_size <= distinct => Ok(()),
            Some(distinct) => Err(ValidationError::InvalidField {
                field: "table.deck_size".to_string(),
                message: format!(
                    "{} features of size {} describe only {distinct} cards",
                    self.feature_count, self.feature_size
                ),
            }),
            None => Err(ValidationError::InvalidField {
                field: "table.feature_count".to_string(),
                message: "feature layout is too large".to_string(),
            }),
        }
    }
}

/// Timers, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub turn_timeout_ms: u64,
    pub turn_timeout_warning_ms: u64,
    pub point_freeze_ms: u64,
    pub penalty_freeze_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let game = GameConfig::default();
        Self {
            turn_timeout_ms: game.turn_timeout.as_millis() as u64,
            turn_timeout_warning_ms: game.turn_timeout_warning.as_millis() as u64,
            point_freeze_ms: game.point_freeze.as_millis() as u64,
            penalty_freeze_ms: game.penalty_freeze.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Human,
    Computer,
}

/// One seat at the table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlayerConfig {
    pub kind: PlayerKind,
    #[serde(default)]
    pub strategy: BotStrategy,
    /// Characters mapped to slots `0..table_size`, in order. Humans only.
    #[serde(default)]
    pub keys: Option<String>,
    #[serde(default = "default_press_delay_ms")]
    pub press_delay_ms: u64,
}

impl PlayerConfig {
    pub fn computer(strategy: BotStrategy) -> Self {
        Self {
            kind: PlayerKind::Computer,
            strategy,
            keys: None,
            press_delay_ms: DEFAULT_PRESS_DELAY_MS,
        }
    }

    pub fn human(keys: impl Into<String>) -> Self {
        Self {
            kind: PlayerKind::Human,
            strategy: BotStrategy::default(),
            keys: Some(keys.into()),
            press_delay_ms: DEFAULT_PRESS_DELAY_MS,
        }
    }
}

fn default_press_delay_ms() -> u64 {
    DEFAULT_PRESS_DELAY_MS
}

fn validate_players(players: &[PlayerConfig], table_size: usize) -> Result<(), ValidationError> {
    if players.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "players".to_string(),
            message: "at least one player must be specified".to_string(),
        });
    }

    let mut claimed = HashSet::new();
    for (index, player) in players.iter().enumerate() {
        match (player.kind, player.keys.as_deref()) {
            (PlayerKind::Human, None) => {
                return Err(ValidationError::InvalidField {
                    field: format!("players[{index}].keys"),
                    message: "human players need a key map".to_string(),
                });
            }
            (PlayerKind::Human, Some(keys)) => {
                if keys.chars().count() != table_size {
                    return Err(ValidationError::InvalidField {
                        field: format!("players[{index}].keys"),
                        message: format!("expected {table_size} keys, one per slot"),
                    });
                }
                for key in keys.chars() {
                    if key.is_whitespace() || !claimed.insert(key) {
                        return Err(ValidationError::InvalidField {
                            field: format!("players[{index}].keys"),
                            message: format!("key {key:?} is unusable or already taken"),
                        });
                    }
                }
            }
            (PlayerKind::Computer, _) => {}
        }
    }

    Ok(())
}

/// Logging defaults to `info` on stderr with no file sink.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    /// JSON lines are written here when set.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            tracing_level: default_tracing_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
