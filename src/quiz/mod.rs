pub mod render;
pub mod results;
pub mod session;
pub mod shuffle;
pub mod source;

/// How many questions one game draws from the pool.
pub const QUESTIONS_PER_GAME: usize = 12;
/// Largest player count offered during setup.
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect_explanation: Option<String>,
}
impl Question {
    pub fn new(text: impl Into<String>, options: Vec<String>, answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options,
            answer: answer.into(),
            correct_explanation: None,
            incorrect_explanation: None,
        }
    }

    pub fn with_explanations(
        mut self,
        correct: Option<String>,
        incorrect: Option<String>,
    ) -> Self {
        self.correct_explanation = correct;
        self.incorrect_explanation = incorrect;
        self
    }

    /// Exact, case-sensitive match against the correct answer.
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    pub fn has_valid_answer(&self) -> bool {
        self.options.iter().filter(|o| **o == self.answer).count() == 1
    }

    pub fn correct_feedback(&self) -> String {
        self.correct_explanation
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "Correct!".to_string())
    }

    pub fn incorrect_feedback(&self) -> String {
        self.incorrect_explanation
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| format!("Answer: {}", self.answer))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Player {
    pub name: String,
    pub score: u32,
}
impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
        }
    }
}

/// Builds the roster for a new game.
///
/// Blank names (empty or whitespace only) fall back to `Player N`, 1-based.
/// Names beyond `count` are ignored, missing ones count as blank.
pub fn build_roster(count: usize, names: &[String]) -> Vec<Player> {
    (0..count)
        .map(|i| {
            let name = names.get(i).map(|n| n.trim()).unwrap_or_default();
            if name.is_empty() {
                Player::new(format!("Player {}", i + 1))
            } else {
                Player::new(name)
            }
        })
        .collect()
}
