//! The presentation contract the game core draws through.
//!
//! The core never touches a concrete UI. Everything it shows goes through
//! [`Renderer`], so the turn logic can be driven by a chat front-end or by a
//! recording renderer in tests.

use crate::quiz::results::GameSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Setup,
    Question,
    Result,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionMark {
    #[default]
    Neutral,
    Selected,
    Correct,
    Incorrect,
}

/// What the single advance control does when pressed next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceAction {
    Reveal,
    Advance,
}
impl AdvanceAction {
    pub fn label(&self) -> &'static str {
        match self {
            AdvanceAction::Reveal => "Submit",
            AdvanceAction::Advance => "Next",
        }
    }
}

/// Parameters of the celebratory effect shown for a strong winner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confetti {
    pub particle_count: u32,
    pub spread: u32,
    pub origin_y: f32,
}
impl Default for Confetti {
    fn default() -> Self {
        Self {
            particle_count: 100,
            spread: 70,
            origin_y: 0.6,
        }
    }
}

pub trait Renderer {
    fn show_panel(&mut self, panel: Panel);
    /// Replaces the option list with fresh, neutral and enabled options.
    fn show_question(&mut self, heading: &str, options: &[String]);
    fn mark_option(&mut self, index: usize, mark: OptionMark);
    fn set_options_enabled(&mut self, enabled: bool);
    /// `None` hides the feedback region.
    fn set_feedback(&mut self, text: Option<&str>);
    /// `None` hides the counter, otherwise `(current, total)`, 1-based.
    fn set_counter(&mut self, counter: Option<(usize, usize)>);
    /// `None` hides the advance control.
    fn set_advance(&mut self, action: Option<AdvanceAction>);
    fn show_result(&mut self, summary: &GameSummary);
    fn celebrate(&mut self, confetti: Confetti);
}
