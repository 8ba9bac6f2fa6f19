// Randomized trivia: question generation and the session state machine.

pub mod question;
pub mod session;

pub use question::{generate_question, QuestionShape, TriviaOption, TriviaQuestion, TriviaRecord};
pub use session::{
    next_question, reset, submit_answer, AnswerOutcome, Phase, TriviaError, TriviaSessionState,
    Turn, STARTING_LIVES,
};
