//! Telegram rendering of a game.
//!
//! [`ChatView`] keeps what the game core last drew and turns it into one
//! message plus a reply keyboard per update. Taps come back as plain message
//! text and are matched against the labels shown.

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove};
use teloxide::RequestError;

use crate::quiz::render::{AdvanceAction, Confetti, OptionMark, Panel, Renderer};
use crate::quiz::results::GameSummary;

pub const RESTART: &str = "Restart";

#[derive(Debug, Clone, Default)]
pub struct ChatView {
    panel: Panel,
    heading: String,
    options: Vec<String>,
    marks: Vec<OptionMark>,
    options_enabled: bool,
    feedback: Option<String>,
    counter: Option<(usize, usize)>,
    advance: Option<AdvanceAction>,
    result: Option<(String, Vec<String>)>,
    celebration: Option<Confetti>,
}

fn label(option: &str, mark: OptionMark) -> String {
    match mark {
        OptionMark::Neutral => option.to_string(),
        OptionMark::Selected => format!("▶ {}", option),
        OptionMark::Correct => format!("✅ {}", option),
        OptionMark::Incorrect => format!("❌ {}", option),
    }
}

impl ChatView {
    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// Index of the option a tap refers to, with or without its mark.
    pub fn option_at(&self, text: &str) -> Option<usize> {
        self.options
            .iter()
            .zip(&self.marks)
            .position(|(option, mark)| option == text || label(option, *mark) == text)
    }

    pub fn is_advance(&self, text: &str) -> bool {
        self.advance.is_some_and(|a| a.label() == text)
    }

    pub fn text(&self) -> String {
        match self.panel {
            Panel::Setup => "Let's set up a new game.".to_string(),
            Panel::Question => {
                let mut lines = Vec::new();
                if let Some((current, total)) = self.counter {
                    lines.push(format!("Question {} of {}", current, total));
                }
                lines.push(self.heading.clone());
                if !self.options_enabled {
                    lines.push(String::new());
                    lines.extend(
                        self.options
                            .iter()
                            .zip(&self.marks)
                            .map(|(option, mark)| label(option, *mark)),
                    );
                }
                if let Some(feedback) = &self.feedback {
                    lines.push(String::new());
                    lines.push(feedback.clone());
                }
                lines.join("\n")
            }
            Panel::Result => match &self.result {
                Some((headline, standings)) => {
                    format!("{}\n\n{}", headline, standings.join("\n"))
                }
                None => "Game over.".to_string(),
            },
        }
    }

    /// Button rows for the current screen. Options disappear once revealed.
    pub fn keyboard(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        match self.panel {
            Panel::Setup => {}
            Panel::Question => {
                if self.options_enabled {
                    rows.extend(
                        self.options
                            .iter()
                            .zip(&self.marks)
                            .map(|(option, mark)| vec![label(option, *mark)]),
                    );
                }
                if let Some(action) = self.advance {
                    rows.push(vec![action.label().to_string()]);
                }
            }
            Panel::Result => rows.push(vec![RESTART.to_string()]),
        }
        rows
    }

    /// A pending celebration, handed out once.
    pub fn take_celebration(&mut self) -> Option<String> {
        self.celebration.take().map(|confetti| {
            let bursts = (confetti.particle_count / 10).clamp(1, 20) as usize;
            "🎉".repeat(bursts)
        })
    }
}

impl Renderer for ChatView {
    fn show_panel(&mut self, panel: Panel) {
        self.panel = panel;
        if panel != Panel::Result {
            self.result = None;
        }
    }

    fn show_question(&mut self, heading: &str, options: &[String]) {
        self.heading = heading.to_string();
        self.options = options.to_vec();
        self.marks = vec![OptionMark::Neutral; options.len()];
        self.options_enabled = true;
    }

    fn mark_option(&mut self, index: usize, mark: OptionMark) {
        if let Some(slot) = self.marks.get_mut(index) {
            *slot = mark;
        }
    }

    fn set_options_enabled(&mut self, enabled: bool) {
        self.options_enabled = enabled;
    }

    fn set_feedback(&mut self, text: Option<&str>) {
        self.feedback = text.map(str::to_string);
    }

    fn set_counter(&mut self, counter: Option<(usize, usize)>) {
        self.counter = counter;
    }

    fn set_advance(&mut self, action: Option<AdvanceAction>) {
        self.advance = action;
    }

    fn show_result(&mut self, summary: &GameSummary) {
        self.result = Some((summary.headline(), summary.lines()));
    }

    fn celebrate(&mut self, confetti: Confetti) {
        self.celebration = Some(confetti);
    }
}

pub fn keyboard_markup(rows: Vec<Vec<String>>) -> KeyboardMarkup {
    KeyboardMarkup::new(
        rows.into_iter()
            .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>()),
    )
}

/// Sends the current screen, followed by any pending celebration.
pub async fn send_view(bot: &Bot, chat_id: ChatId, view: &mut ChatView) -> Result<(), RequestError> {
    let rows = view.keyboard();
    let request = bot.send_message(chat_id, view.text());
    if rows.is_empty() {
        request.reply_markup(KeyboardRemove::new()).await?;
    } else {
        request.reply_markup(keyboard_markup(rows)).await?;
    }

    if let Some(confetti) = view.take_celebration() {
        bot.send_message(chat_id, confetti).await?;
    }
    Ok(())
}
