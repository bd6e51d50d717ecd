//! One game from first question to result screen.
//!
//! [`GameSession`] owns the roster, the drawn questions and the turn phase.
//! Every transition goes through the methods here and is reflected to the
//! [`Renderer`] as it happens.

use log::debug;
use rand::Rng;

use crate::quiz::render::{AdvanceAction, Confetti, OptionMark, Panel, Renderer};
use crate::quiz::results::GameSummary;
use crate::quiz::shuffle::select_subset;
use crate::quiz::source::{QuestionSource, SourceError};
use crate::quiz::{Player, Question};

/// Where the current question stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnPhase {
    #[default]
    AwaitingSelection,
    Selected {
        choice: usize,
    },
    Revealed {
        choice: usize,
        correct: bool,
    },
    Finished,
}

impl TurnPhase {
    /// The action the advance control performs in this phase, if it is shown.
    pub fn advance_action(&self) -> Option<AdvanceAction> {
        match self {
            TurnPhase::Selected { .. } => Some(AdvanceAction::Reveal),
            TurnPhase::Revealed { .. } => Some(AdvanceAction::Advance),
            TurnPhase::AwaitingSelection | TurnPhase::Finished => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Nothing was selected yet, or the game is over.
    Ignored,
    Revealed { correct: bool },
    NextQuestion,
    Finished(GameSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    players: Vec<Player>,
    questions: Vec<Question>,
    question_index: usize,
    player_index: usize,
    phase: TurnPhase,
}

impl GameSession {
    /// Loads the pool, draws `count` questions and shows the first one.
    pub fn start<S, R, V>(
        players: Vec<Player>,
        source: &S,
        count: usize,
        rng: &mut R,
        renderer: &mut V,
    ) -> Result<Self, SourceError>
    where
        S: QuestionSource + ?Sized,
        R: Rng + ?Sized,
        V: Renderer + ?Sized,
    {
        let pool = source.load()?;
        let questions = select_subset(&pool, count, rng);
        debug!(
            "Drew {} of {} questions for {} players",
            questions.len(),
            pool.len(),
            players.len()
        );
        Ok(Self::with_questions(players, questions, renderer))
    }

    /// Starts a game over an already chosen question list.
    pub fn with_questions<V: Renderer + ?Sized>(
        players: Vec<Player>,
        questions: Vec<Question>,
        renderer: &mut V,
    ) -> Self {
        let mut session = Self {
            players,
            questions,
            question_index: 0,
            player_index: 0,
            phase: TurnPhase::AwaitingSelection,
        };
        if session.questions.is_empty() {
            session.finish(renderer);
        } else {
            session.show_current(renderer);
        }
        session
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn player_index(&self) -> usize {
        self.player_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.question_index)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.player_index)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TurnPhase::Finished
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary::new(&self.players, self.questions.len())
    }

    /// Records a choice for the current question. Re-selecting before the
    /// reveal is allowed; anything after it is ignored.
    pub fn select_answer<V: Renderer + ?Sized>(&mut self, choice: usize, renderer: &mut V) -> bool {
        let option_count = self.current_question().map_or(0, |q| q.options.len());
        if choice >= option_count {
            return false;
        }
        match self.phase {
            TurnPhase::AwaitingSelection => {}
            TurnPhase::Selected { choice: previous } => {
                if previous != choice {
                    renderer.mark_option(previous, OptionMark::Neutral);
                }
            }
            TurnPhase::Revealed { .. } | TurnPhase::Finished => return false,
        }

        self.phase = TurnPhase::Selected { choice };
        renderer.mark_option(choice, OptionMark::Selected);
        renderer.set_advance(self.phase.advance_action());
        true
    }

    /// Shows whether the selected option is right and scores it.
    /// Returns `None` when there is no selection to reveal.
    pub fn reveal<V: Renderer + ?Sized>(&mut self, renderer: &mut V) -> Option<bool> {
        let TurnPhase::Selected { choice } = self.phase else {
            return None;
        };
        let question = self.questions.get(self.question_index)?;
        let correct = question.is_correct(&question.options[choice]);

        if correct {
            if let Some(player) = self.players.get_mut(self.player_index) {
                player.score += 1;
            }
            renderer.mark_option(choice, OptionMark::Correct);
            renderer.set_feedback(Some(question.correct_feedback().as_str()));
        } else {
            renderer.mark_option(choice, OptionMark::Incorrect);
            renderer.set_feedback(Some(question.incorrect_feedback().as_str()));
        }
        self.phase = TurnPhase::Revealed { choice, correct };
        renderer.set_options_enabled(false);
        renderer.set_advance(self.phase.advance_action());

        debug!(
            "Question {} revealed for player {}: correct={}",
            self.question_index + 1,
            self.player_index,
            correct
        );
        Some(correct)
    }

    /// Moves on from a revealed question to the next turn or the result.
    pub fn advance<V: Renderer + ?Sized>(&mut self, renderer: &mut V) -> AdvanceOutcome {
        if !matches!(self.phase, TurnPhase::Revealed { .. }) {
            return AdvanceOutcome::Ignored;
        }

        if self.question_index + 1 < self.questions.len() {
            self.player_index = (self.player_index + 1) % self.players.len().max(1);
            self.question_index += 1;
            self.phase = TurnPhase::AwaitingSelection;
            self.show_current(renderer);
            AdvanceOutcome::NextQuestion
        } else {
            AdvanceOutcome::Finished(self.finish(renderer))
        }
    }

    /// The single advance control: reveals a selection, then moves on.
    pub fn press_advance<V: Renderer + ?Sized>(&mut self, renderer: &mut V) -> AdvanceOutcome {
        match self.phase {
            TurnPhase::Selected { .. } => match self.reveal(renderer) {
                Some(correct) => AdvanceOutcome::Revealed { correct },
                None => AdvanceOutcome::Ignored,
            },
            TurnPhase::Revealed { .. } => self.advance(renderer),
            TurnPhase::AwaitingSelection | TurnPhase::Finished => AdvanceOutcome::Ignored,
        }
    }

    /// Drops the game and puts the renderer back on a blank setup screen.
    pub fn restart<V: Renderer + ?Sized>(self, renderer: &mut V) {
        debug!("Restarting after {} questions", self.questions.len());
        show_setup(renderer);
    }

    fn show_current<V: Renderer + ?Sized>(&self, renderer: &mut V) {
        let (Some(question), Some(player)) = (self.current_question(), self.current_player()) else {
            return;
        };
        renderer.show_panel(Panel::Question);
        renderer.show_question(
            &format!("{}'s turn: {}", player.name, question.text),
            &question.options,
        );
        renderer.set_options_enabled(true);
        renderer.set_feedback(None);
        renderer.set_advance(self.phase.advance_action());
        renderer.set_counter(Some((self.question_index + 1, self.questions.len())));
    }

    fn finish<V: Renderer + ?Sized>(&mut self, renderer: &mut V) -> GameSummary {
        self.phase = TurnPhase::Finished;
        let summary = self.summary();

        renderer.set_advance(None);
        renderer.set_counter(None);
        renderer.set_feedback(None);
        renderer.show_panel(Panel::Result);
        renderer.show_result(&summary);
        if summary.should_celebrate() {
            renderer.celebrate(Confetti::default());
        }
        summary
    }
}

/// Neutral setup screen: no question, no counter, no feedback.
pub fn show_setup<V: Renderer + ?Sized>(renderer: &mut V) {
    renderer.set_advance(None);
    renderer.set_counter(None);
    renderer.set_feedback(None);
    renderer.show_panel(Panel::Setup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::build_roster;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Keeps the latest state of everything the core has drawn.
    #[derive(Debug, Default)]
    struct Recorder {
        panel: Panel,
        heading: String,
        marks: Vec<OptionMark>,
        options_enabled: bool,
        feedback: Option<String>,
        counter: Option<(usize, usize)>,
        advance: Option<AdvanceAction>,
        result: Option<GameSummary>,
        celebrations: Vec<Confetti>,
        headings: Vec<String>,
    }

    impl Renderer for Recorder {
        fn show_panel(&mut self, panel: Panel) {
            self.panel = panel;
        }
        fn show_question(&mut self, heading: &str, options: &[String]) {
            self.heading = heading.to_string();
            self.headings.push(heading.to_string());
            self.marks = vec![OptionMark::Neutral; options.len()];
        }
        fn mark_option(&mut self, index: usize, mark: OptionMark) {
            self.marks[index] = mark;
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
            self.result = Some(summary.clone());
        }
        fn celebrate(&mut self, confetti: Confetti) {
            self.celebrations.push(confetti);
        }
    }

    /// Question `i` has options `A{i}`, `B{i}`, `C{i}`; `B{i}` is right.
    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                Question::new(
                    format!("Q{i}"),
                    vec![format!("A{i}"), format!("B{i}"), format!("C{i}")],
                    format!("B{i}"),
                )
            })
            .collect()
    }

    fn new_game(players: usize, n: usize, r: &mut Recorder) -> GameSession {
        GameSession::with_questions(build_roster(players, &[]), questions(n), r)
    }

    fn answer(session: &mut GameSession, choice: usize, r: &mut Recorder) -> AdvanceOutcome {
        assert!(session.select_answer(choice, r));
        session.press_advance(r);
        session.press_advance(r)
    }

    #[test]
    fn first_question_is_shown_on_start() {
        let mut r = Recorder::default();
        let session = new_game(2, 3, &mut r);
        assert_eq!(session.phase(), TurnPhase::AwaitingSelection);
        assert_eq!(r.panel, Panel::Question);
        assert_eq!(r.heading, "Player 1's turn: Q0");
        assert_eq!(r.counter, Some((1, 3)));
        assert_eq!(r.advance, None);
        assert!(r.options_enabled);
    }

    #[test]
    fn advancing_without_selection_is_a_no_op() {
        let mut r = Recorder::default();
        let mut session = new_game(1, 2, &mut r);
        assert_eq!(session.press_advance(&mut r), AdvanceOutcome::Ignored);
        assert_eq!(session.advance(&mut r), AdvanceOutcome::Ignored);
        assert_eq!(session.reveal(&mut r), None);
        assert_eq!(session.question_index(), 0);
        assert_eq!(session.phase(), TurnPhase::AwaitingSelection);
    }

    #[test]
    fn reselecting_moves_the_single_selection() {
        let mut r = Recorder::default();
        let mut session = new_game(1, 1, &mut r);
        session.select_answer(0, &mut r);
        session.select_answer(2, &mut r);
        assert_eq!(
            r.marks,
            vec![OptionMark::Neutral, OptionMark::Neutral, OptionMark::Selected]
        );
        assert_eq!(session.phase(), TurnPhase::Selected { choice: 2 });
        assert_eq!(r.advance, Some(AdvanceAction::Reveal));
    }

    #[test]
    fn out_of_range_choice_is_ignored() {
        let mut r = Recorder::default();
        let mut session = new_game(1, 1, &mut r);
        assert!(!session.select_answer(3, &mut r));
        assert_eq!(session.phase(), TurnPhase::AwaitingSelection);
    }

    #[test]
    fn correct_reveal_scores_and_shows_default_feedback() {
        let mut r = Recorder::default();
        let mut session = new_game(2, 2, &mut r);
        session.select_answer(1, &mut r);
        assert_eq!(
            session.press_advance(&mut r),
            AdvanceOutcome::Revealed { correct: true }
        );
        assert_eq!(session.players()[0].score, 1);
        assert_eq!(r.marks[1], OptionMark::Correct);
        assert_eq!(r.feedback.as_deref(), Some("Correct!"));
        assert_eq!(r.advance, Some(AdvanceAction::Advance));
        assert!(!r.options_enabled);
    }

    #[test]
    fn wrong_reveal_keeps_score_and_names_the_answer() {
        let mut r = Recorder::default();
        let mut session = new_game(1, 2, &mut r);
        session.select_answer(0, &mut r);
        assert_eq!(session.reveal(&mut r), Some(false));
        assert_eq!(session.players()[0].score, 0);
        assert_eq!(r.marks[0], OptionMark::Incorrect);
        assert_eq!(r.feedback.as_deref(), Some("Answer: B0"));
    }

    #[test]
    fn explanations_replace_default_feedback() {
        let mut r = Recorder::default();
        let q = Question::new("Q", vec!["x".into(), "y".into()], "y")
            .with_explanations(Some("Yes, y.".into()), Some("No, y.".into()));
        let mut session = GameSession::with_questions(build_roster(1, &[]), vec![q], &mut r);
        session.select_answer(0, &mut r);
        session.reveal(&mut r);
        assert_eq!(r.feedback.as_deref(), Some("No, y."));
    }

    #[test]
    fn clicks_after_reveal_cannot_score() {
        let mut r = Recorder::default();
        let mut session = new_game(1, 2, &mut r);
        session.select_answer(0, &mut r);
        session.reveal(&mut r);

        assert!(!session.select_answer(1, &mut r));
        assert_eq!(session.reveal(&mut r), None);
        assert_eq!(session.players()[0].score, 0);
        assert_eq!(r.marks[0], OptionMark::Incorrect);
        assert_eq!(r.marks[1], OptionMark::Neutral);
    }

    #[test]
    fn next_question_clears_turn_state() {
        let mut r = Recorder::default();
        let mut session = new_game(2, 3, &mut r);
        assert_eq!(answer(&mut session, 1, &mut r), AdvanceOutcome::NextQuestion);
        assert_eq!(session.phase(), TurnPhase::AwaitingSelection);
        assert_eq!(r.heading, "Player 2's turn: Q1");
        assert_eq!(r.counter, Some((2, 3)));
        assert_eq!(r.feedback, None);
        assert_eq!(r.advance, None);
        assert!(r.marks.iter().all(|m| *m == OptionMark::Neutral));
        assert!(r.options_enabled);
    }

    #[test]
    fn players_rotate_round_robin() {
        let mut r = Recorder::default();
        let mut session = new_game(3, 7, &mut r);
        let mut order = vec![session.player_index()];
        while !session.is_finished() {
            answer(&mut session, 0, &mut r);
            if !session.is_finished() {
                order.push(session.player_index());
            }
        }
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn two_players_all_correct_split_the_points() {
        let mut r = Recorder::default();
        let mut session = new_game(2, 12, &mut r);
        let mut last = AdvanceOutcome::Ignored;
        while !session.is_finished() {
            last = answer(&mut session, 1, &mut r);
        }

        let AdvanceOutcome::Finished(summary) = last else {
            panic!("game did not finish");
        };
        let scores: Vec<u32> = session.players().iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![6, 6]);
        assert_eq!(summary.headline(), "Winner: Player 1 with a score of 6");
        assert_eq!(r.panel, Panel::Result);
        assert_eq!(r.counter, None);
        assert_eq!(r.result.as_ref(), Some(&summary));
        // Six of twelve is 50%.
        assert!(r.celebrations.is_empty());
        assert_eq!(summary.lines().last().map(String::as_str), Some("Better luck next time!"));
    }

    #[test]
    fn solo_perfect_game_celebrates() {
        let mut r = Recorder::default();
        let mut session = new_game(1, 12, &mut r);
        while !session.is_finished() {
            answer(&mut session, 1, &mut r);
        }
        assert_eq!(session.players()[0].score, 12);
        assert_eq!(r.celebrations, vec![Confetti::default()]);
        assert_eq!(session.press_advance(&mut r), AdvanceOutcome::Ignored);
        assert!(!session.select_answer(1, &mut r));
    }

    #[test]
    fn start_draws_at_most_the_requested_count() {
        let mut r = Recorder::default();
        let mut rng = StdRng::seed_from_u64(3);
        let pool = questions(20);
        let session =
            GameSession::start(build_roster(2, &[]), &pool, 12, &mut rng, &mut r).unwrap();
        assert_eq!(session.questions().len(), 12);
        assert!(session.questions().iter().all(|q| pool.contains(q)));

        let small = questions(5);
        let session =
            GameSession::start(build_roster(2, &[]), &small, 12, &mut rng, &mut r).unwrap();
        assert_eq!(session.questions().len(), 5);
        assert_eq!(r.counter, Some((1, 5)));
    }

    #[test]
    fn start_propagates_source_errors() {
        let mut r = Recorder::default();
        let mut rng = StdRng::seed_from_u64(3);
        let empty: Vec<Question> = Vec::new();
        let result = GameSession::start(build_roster(1, &[]), &empty, 12, &mut rng, &mut r);
        assert!(matches!(result, Err(SourceError::Empty)));
        assert_eq!(r.panel, Panel::Setup);
        assert!(r.headings.is_empty());
    }

    #[test]
    fn restart_returns_to_blank_setup() {
        let mut r = Recorder::default();
        let mut session = new_game(2, 2, &mut r);
        answer(&mut session, 1, &mut r);
        answer(&mut session, 1, &mut r);
        assert!(session.is_finished());

        session.restart(&mut r);
        assert_eq!(r.panel, Panel::Setup);
        assert_eq!(r.counter, None);
        assert_eq!(r.advance, None);
        assert_eq!(r.feedback, None);

        let fresh = new_game(2, 2, &mut r);
        assert!(fresh.players().iter().all(|p| p.score == 0));
        assert_eq!(fresh.phase(), TurnPhase::AwaitingSelection);
        assert_eq!(r.heading, "Player 1's turn: Q0");
    }

    proptest! {
        #[test]
        fn prop_scores_never_exceed_questions(
            players in 1usize..=4,
            picks in prop::collection::vec(0usize..3, 1..15),
        ) {
            let mut r = Recorder::default();
            let mut session = new_game(players, picks.len(), &mut r);
            let mut expected = vec![0u32; players];

            for (turn, pick) in picks.iter().enumerate() {
                prop_assert_eq!(session.player_index(), turn % players);
                session.select_answer(*pick, &mut r);
                let before = session.players()[session.player_index()].score;
                let correct = session.reveal(&mut r).unwrap();
                let after = session.players()[session.player_index()].score;
                prop_assert_eq!(after - before, u32::from(correct));
                prop_assert_eq!(correct, *pick == 1);
                if correct {
                    expected[turn % players] += 1;
                }
                session.advance(&mut r);
            }

            prop_assert!(session.is_finished());
            let scores: Vec<u32> = session.players().iter().map(|p| p.score).collect();
            prop_assert_eq!(&scores, &expected);
            prop_assert!(scores.iter().sum::<u32>() as usize <= picks.len());
        }
    }
}
