use std::path::PathBuf;

use thiserror::Error;

use crate::quiz::{MAX_PLAYERS, QUESTIONS_PER_GAME};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {key} must be a positive integer, got {value:?}")]
    NotPositive { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub questions_path: PathBuf,
    pub question_count: usize,
    pub max_players: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from("questions.json"),
            question_count: QUESTIONS_PER_GAME,
            max_players: MAX_PLAYERS,
        }
    }
}

impl Settings {
    /// Reads `TRIVIA_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            questions_path: lookup("TRIVIA_QUESTIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.questions_path),
            question_count: positive(&lookup, "TRIVIA_QUESTION_COUNT")?
                .unwrap_or(defaults.question_count),
            max_players: positive(&lookup, "TRIVIA_MAX_PLAYERS")?.unwrap_or(defaults.max_players),
        })
    }
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<usize>, ConfigError> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::NotPositive { key, value }),
    }
}
