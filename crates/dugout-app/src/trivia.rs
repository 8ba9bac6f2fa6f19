// Interactive trivia loop over a line-oriented terminal.
//
// Every state change is saved before the next prompt so an interrupted game
// resumes with the same pending question.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use dugout_baseball::source::{SessionStore, TriviaSource};
use dugout_baseball::trivia::{
    next_question, reset, submit_answer, TriviaQuestion, TriviaSessionState, Turn,
};
use rand::RngCore;
use tracing::{debug, info};

/// Map a typed choice to an option id. An exact option id wins, then a
/// `1`..`4` position, then a case-insensitive label.
fn resolve_choice(question: &TriviaQuestion, input: &str) -> Option<String> {
    let by_position = || {
        input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| question.options.get(i))
    };
    question
        .option(input)
        .or_else(by_position)
        .or_else(|| {
            question
                .options
                .iter()
                .find(|o| o.label.eq_ignore_ascii_case(input))
        })
        .map(|o| o.id.clone())
}

fn read_command<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    Ok((read > 0).then(|| line.trim().to_string()))
}

fn status<W: Write>(out: &mut W, state: &TriviaSessionState) -> Result<()> {
    writeln!(
        out,
        "Lives: {}  Score: {}  Asked: {}",
        state.lives, state.score, state.asked
    )?;
    Ok(())
}

/// Run the game for `session_id` until the player quits or input ends.
pub fn play<R: BufRead, W: Write>(
    store: &dyn SessionStore,
    source: &dyn TriviaSource,
    session_id: &str,
    rng: &mut dyn RngCore,
    mut input: R,
    mut out: W,
) -> Result<()> {
    let mut state = store.load_session(session_id)?.unwrap_or_default();
    info!("trivia session {session_id} resumed with {} lives", state.lives);

    loop {
        status(&mut out, &state)?;

        let (asked_state, question) = match next_question(&state, source, rng)? {
            Turn::Ask { state, question } => (state, question),
            Turn::GameOver => {
                writeln!(
                    out,
                    "Game over! Final score: {}. Type 'reset' to play again or 'quit' to exit.",
                    state.score
                )?;
                match read_command(&mut input)?.as_deref() {
                    Some("reset") => {
                        state = reset();
                        store.save_session(session_id, &state)?;
                        continue;
                    }
                    Some("quit") | None => break,
                    Some(_) => continue,
                }
            }
            Turn::NoQuestionAvailable => {
                writeln!(out, "No trivia question is available right now.")?;
                break;
            }
        };

        if asked_state != state {
            store.save_session(session_id, &asked_state)?;
            state = asked_state;
        }

        writeln!(out, "\n{}", question.prompt)?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, option.label)?;
        }
        write!(out, "> ")?;
        out.flush()?;

        let Some(command) = read_command(&mut input)? else {
            break;
        };
        match command.as_str() {
            "quit" => break,
            "reset" => {
                state = reset();
                store.save_session(session_id, &state)?;
                continue;
            }
            _ => {}
        }

        let Some(chosen) = resolve_choice(&question, &command) else {
            writeln!(out, "Choose 1-{} or type 'quit'.", question.options.len())?;
            continue;
        };
        debug!("answer {chosen} for {:?} question", question.shape);

        let outcome = submit_answer(&state, &chosen)?;
        store.save_session(session_id, &outcome.state)?;
        state = outcome.state;
        writeln!(out, "{}\n", outcome.message)?;
    }

    Ok(())
}
