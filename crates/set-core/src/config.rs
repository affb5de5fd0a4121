use std::time::Duration;
use thiserror::Error;

const DEFAULT_DECK_SIZE: usize = 81;
const DEFAULT_TABLE_SIZE: usize = 12;
const DEFAULT_FEATURE_SIZE: usize = 3;

/// Runtime parameters shared by the dealer and every participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub deck_size: usize,
    pub table_size: usize,
    /// Number of cards in a candidate.
    pub feature_size: usize,
    pub turn_timeout: Duration,
    /// Once this little time is left the countdown ticks below a second.
    pub turn_timeout_warning: Duration,
    pub point_freeze: Duration,
    pub penalty_freeze: Duration,
    /// Index `i` tells whether participant `i` is human.
    pub human: Vec<bool>,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            deck_size: DEFAULT_DECK_SIZE,
            table_size: DEFAULT_TABLE_SIZE,
            feature_size: DEFAULT_FEATURE_SIZE,
            turn_timeout: Duration::from_secs(60),
            turn_timeout_warning: Duration::from_secs(5),
            point_freeze: Duration::from_secs(1),
            penalty_freeze: Duration::from_secs(3),
            human: vec![false, false],
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn players(&self) -> usize {
        self.human.len()
    }

    pub fn is_human(&self, index: usize) -> bool {
        self.human.get(index).copied().unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feature_size < 2 {
            return Err(ConfigError::invalid(
                "feature_size",
                "a candidate needs at least two cards",
            ));
        }
        if self.table_size < self.feature_size {
            return Err(ConfigError::invalid(
                "table_size",
                format!(
                    "table of {} slots cannot hold a candidate of {}",
                    self.table_size, self.feature_size
                ),
            ));
        }
        if self.deck_size < self.table_size {
            return Err(ConfigError::invalid(
                "deck_size",
                format!(
                    "deck of {} cards cannot fill {} slots",
                    self.deck_size, self.table_size
                ),
            ));
        }
        if u32::try_from(self.deck_size).map_or(true, |size| size == u32::MAX) {
            return Err(ConfigError::invalid("deck_size", "deck is too large"));
        }
        if self.turn_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "turn_timeout",
                "turn timeout must be greater than zero",
            ));
        }
        if self.turn_timeout_warning > self.turn_timeout {
            return Err(ConfigError::invalid(
                "turn_timeout_warning",
                "warning window cannot exceed the turn timeout",
            ));
        }
        if self.human.is_empty() {
            return Err(ConfigError::invalid(
                "players",
                "at least one player must be seated",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            ConfigError::InvalidField { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GameConfig;
    use std::time::Duration;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.players(), 2);
        assert!(!config.is_human(0));
        assert!(!config.is_human(9));
    }

    #[test]
    fn rejects_table_smaller_than_candidate() {
        let config = GameConfig {
            table_size: 2,
            ..GameConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().field(), "table_size");
    }

    #[test]
    fn rejects_deck_smaller_than_table() {
        let config = GameConfig {
            deck_size: 6,
            ..GameConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().field(), "deck_size");
    }

    #[test]
    fn rejects_warning_longer_than_timeout() {
        let config = GameConfig {
            turn_timeout: Duration::from_secs(1),
            turn_timeout_warning: Duration::from_secs(2),
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err().field(),
            "turn_timeout_warning"
        );
    }

    #[test]
    fn rejects_empty_player_list() {
        let config = GameConfig {
            human: Vec::new(),
            ..GameConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().field(), "players");
    }
}
