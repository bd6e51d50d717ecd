use crate::quiz::Player;

/// Winner percentage at or above which the game ends with a celebration.
pub const CELEBRATION_THRESHOLD: u32 = 80;
pub const ENCOURAGEMENT: &str = "Better luck next time!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub standings: Vec<Player>,
    pub question_count: usize,
    winner: Option<usize>,
}

impl GameSummary {
    pub fn new(players: &[Player], question_count: usize) -> Self {
        Self {
            standings: players.to_vec(),
            question_count,
            winner: find_winner(players),
        }
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|i| &self.standings[i])
    }

    pub fn percentage(&self) -> f64 {
        match self.winner() {
            Some(winner) if self.question_count > 0 => {
                winner.score as f64 / self.question_count as f64 * 100.0
            }
            _ => 0.0,
        }
    }

    pub fn should_celebrate(&self) -> bool {
        // Integer form of `percentage() >= 80`.
        match self.winner() {
            Some(winner) if self.question_count > 0 => {
                winner.score as u64 * 100
                    >= CELEBRATION_THRESHOLD as u64 * self.question_count as u64
            }
            _ => false,
        }
    }

    pub fn headline(&self) -> String {
        match self.winner() {
            Some(winner) => format!("Winner: {} with a score of {}", winner.name, winner.score),
            None => "No players took part".to_string(),
        }
    }

    /// One `name: score` line per player, plus the encouragement line when
    /// the winner fell short of the celebration threshold.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .standings
            .iter()
            .map(|p| format!("{}: {}", p.name, p.score))
            .collect();
        if !self.should_celebrate() {
            lines.push(ENCOURAGEMENT.to_string());
        }
        lines
    }
}

/// Strictly greatest score wins; on a tie the earliest player in roster
/// order keeps the lead.
pub fn find_winner(players: &[Player]) -> Option<usize> {
    let mut winner: Option<usize> = None;
    for (i, player) in players.iter().enumerate() {
        match winner {
            Some(w) if player.score <= players[w].score => {}
            _ => winner = Some(i),
        }
    }
    winner
}
