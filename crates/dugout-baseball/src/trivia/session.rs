// Lives/score state machine for one trivia session.
//
// Every transition takes the current state by reference and returns a new
// value; the caller decides when and where to persist it.

use anyhow::Result;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::question::{generate_question, TriviaQuestion};
use crate::source::TriviaSource;

pub const STARTING_LIVES: u8 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TriviaError {
    #[error("No question is waiting for an answer.")]
    NoPendingQuestion,

    #[error("Game over. Reset to play again.")]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    GameOver,
}

/// Externally owned session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaSessionState {
    pub lives: u8,
    pub score: u32,
    pub asked: u32,
    #[serde(default)]
    pub pending: Option<TriviaQuestion>,
}

impl Default for TriviaSessionState {
    fn default() -> Self {
        TriviaSessionState {
            lives: STARTING_LIVES,
            score: 0,
            asked: 0,
            pending: None,
        }
    }
}

impl TriviaSessionState {
    pub fn phase(&self) -> Phase {
        if self.lives == 0 {
            Phase::GameOver
        } else {
            Phase::Active
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase() == Phase::GameOver
    }
}

/// The only transition out of GameOver.
pub fn reset() -> TriviaSessionState {
    TriviaSessionState::default()
}

/// Result of [`next_question`].
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// A question to show. `state` carries it as the pending question and
    /// must be persisted before the answer arrives.
    Ask {
        state: TriviaSessionState,
        question: TriviaQuestion,
    },
    /// Lives are exhausted; nothing is generated until reset.
    GameOver,
    /// No eligible record could be sampled.
    NoQuestionAvailable,
}

/// Return the pending question if one exists, otherwise generate a new one.
///
/// A pending question is served again rather than replaced.
pub fn next_question(
    state: &TriviaSessionState,
    source: &dyn TriviaSource,
    rng: &mut dyn RngCore,
) -> Result<Turn> {
    if state.is_game_over() {
        return Ok(Turn::GameOver);
    }
    if let Some(question) = &state.pending {
        return Ok(Turn::Ask {
            state: state.clone(),
            question: question.clone(),
        });
    }

    let Some(question) = generate_question(source, rng)? else {
        return Ok(Turn::NoQuestionAvailable);
    };
    debug!("generated {:?} question", question.shape);

    let mut next = state.clone();
    next.pending = Some(question.clone());
    Ok(Turn::Ask {
        state: next,
        question,
    })
}

/// Result of [`submit_answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub state: TriviaSessionState,
    pub correct: bool,
    pub correct_label: String,
    /// Feedback line for the player; names the right answer after a miss.
    pub message: String,
}

/// Grade `chosen_id` against the pending question.
///
/// Rejections leave `state` untouched.
pub fn submit_answer(
    state: &TriviaSessionState,
    chosen_id: &str,
) -> std::result::Result<AnswerOutcome, TriviaError> {
    if state.is_game_over() {
        return Err(TriviaError::GameOver);
    }
    let question = state.pending.as_ref().ok_or(TriviaError::NoPendingQuestion)?;

    let correct = chosen_id == question.correct_id;
    let mut next = state.clone();
    next.asked += 1;
    next.pending = None;

    let message = if correct {
        next.score += 1;
        format!("Correct! {}", question.detail)
    } else {
        next.lives = next.lives.saturating_sub(1);
        format!(
            "Incorrect. The correct answer was {}. {}",
            question.correct_label, question.detail
        )
    };

    if next.is_game_over() {
        info!(
            "trivia game over: score {} after {} questions",
            next.score, next.asked
        );
    }

    Ok(AnswerOutcome {
        state: next,
        correct,
        correct_label: question.correct_label.clone(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TeamRef;
    use crate::trivia::question::{QuestionShape, TriviaOption, TriviaRecord};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn question() -> TriviaQuestion {
        TriviaQuestion {
            shape: QuestionShape::HomeRuns,
            prompt: "How many home runs did Barry Bonds hit for the San Francisco Giants in 2001?"
                .into(),
            options: ["61", "73", "64", "70"]
                .iter()
                .map(|v| TriviaOption {
                    id: v.to_string(),
                    label: format!("{v} home runs"),
                })
                .collect(),
            correct_id: "73".into(),
            correct_label: "73 home runs".into(),
            detail: "Barry Bonds had 73 home runs for the San Francisco Giants in 2001.".into(),
        }
    }

    fn pending(lives: u8) -> TriviaSessionState {
        TriviaSessionState {
            lives,
            score: 4,
            asked: 6,
            pending: Some(question()),
        }
    }

    struct OneRecord(Option<TriviaRecord>);

    impl TriviaSource for OneRecord {
        fn sample_record(&self, _rng: &mut dyn RngCore) -> Result<Option<TriviaRecord>> {
            Ok(self.0.clone())
        }

        fn other_teams(
            &self,
            _record: &TriviaRecord,
            _count: usize,
            _rng: &mut dyn RngCore,
        ) -> Result<Vec<TeamRef>> {
            Ok(["LAN", "SDN", "COL"]
                .iter()
                .map(|id| TeamRef {
                    team_id: id.to_string(),
                    name: format!("Team {id}"),
                })
                .collect())
        }
    }

    fn bonds() -> OneRecord {
        OneRecord(Some(TriviaRecord {
            player_id: "bondsba01".into(),
            player_name: "Barry Bonds".into(),
            year: 2001,
            team_id: "SFN".into(),
            team_name: "San Francisco Giants".into(),
            hits: 156,
            home_runs: 73,
            runs_batted_in: 137,
        }))
    }

    #[test]
    fn fresh_state() {
        let state = TriviaSessionState::default();
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.asked, 0);
        assert!(state.pending.is_none());
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(reset(), state);
    }

    #[test]
    fn correct_answer_scores() {
        let before = pending(2);
        let outcome = submit_answer(&before, "73").unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.state.score, 5);
        assert_eq!(outcome.state.lives, 2);
        assert_eq!(outcome.state.asked, 7);
        assert!(outcome.state.pending.is_none());
        assert!(outcome.message.starts_with("Correct!"));
    }

    #[test]
    fn wrong_answer_costs_a_life_and_names_the_answer() {
        let outcome = submit_answer(&pending(3), "61").unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.state.lives, 2);
        assert_eq!(outcome.state.score, 4);
        assert_eq!(outcome.state.asked, 7);
        assert!(outcome.state.pending.is_none());
        assert!(outcome.message.contains("The correct answer was 73 home runs."));
    }

    #[test]
    fn answer_without_pending_question_is_rejected() {
        let state = TriviaSessionState::default();
        assert_eq!(submit_answer(&state, "73"), Err(TriviaError::NoPendingQuestion));
    }

    #[test]
    fn answer_after_game_over_is_rejected() {
        let state = TriviaSessionState {
            lives: 0,
            ..pending(1)
        };
        assert_eq!(submit_answer(&state, "73"), Err(TriviaError::GameOver));
    }

    #[test]
    fn next_question_stores_pending() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let turn = next_question(&TriviaSessionState::default(), &bonds(), &mut rng).unwrap();
        let Turn::Ask { state, question } = turn else {
            panic!("expected a question, got {turn:?}");
        };
        assert_eq!(state.pending.as_ref(), Some(&question));
        assert_eq!(state.asked, 0);
        assert_eq!(question.options.len(), 4);
    }

    #[test]
    fn pending_question_is_served_again() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let state = pending(3);
        match next_question(&state, &bonds(), &mut rng).unwrap() {
            Turn::Ask { question: served, .. } => assert_eq!(served, question()),
            other => panic!("expected pending question, got {other:?}"),
        }
    }

    #[test]
    fn no_record_means_no_question() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let turn = next_question(&TriviaSessionState::default(), &OneRecord(None), &mut rng).unwrap();
        assert_eq!(turn, Turn::NoQuestionAvailable);
    }

    #[test]
    fn three_misses_end_the_game_until_reset() {
        let source = bonds();
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let mut state = TriviaSessionState::default();

        for _ in 0..STARTING_LIVES {
            let Turn::Ask { state: asked, question } =
                next_question(&state, &source, &mut rng).unwrap()
            else {
                panic!("expected a question while lives remain");
            };
            let wrong = question
                .options
                .iter()
                .find(|o| o.id != question.correct_id)
                .unwrap()
                .id
                .clone();
            state = submit_answer(&asked, &wrong).unwrap().state;
        }

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.asked, 3);
        assert_eq!(next_question(&state, &source, &mut rng).unwrap(), Turn::GameOver);

        let state = reset();
        assert!(matches!(
            next_question(&state, &source, &mut rng).unwrap(),
            Turn::Ask { .. }
        ));
    }

    #[test]
    fn lives_never_go_below_zero() {
        let state = TriviaSessionState {
            lives: 1,
            ..pending(1)
        };
        let outcome = submit_answer(&state, "wrong").unwrap();
        assert_eq!(outcome.state.lives, 0);
    }

    #[test]
    fn state_round_trips_through_json() {
        let state = pending(2);
        let json = serde_json::to_string(&state).unwrap();
        let back: TriviaSessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
