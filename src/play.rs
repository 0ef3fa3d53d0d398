//! Terminal presentation layer.
//!
//! The engine has no notion of a "current question"; `TriviaSession` tracks
//! it here, accepts one answer per served question, and keeps the round
//! history for the final recap. `run` drives a whole game over any line
//! reader and writer.

use std::io::{self, BufRead, Write};

use tracing::{info, instrument};

use crate::config::GameSettings;
use crate::domain::Question;
use crate::engine::{SessionFilter, TriviaEngine};
use crate::error::SessionError;

#[derive(Clone, Debug, PartialEq)]
pub struct RoundRecord {
  pub question: Question,
  pub guess: String,
  pub correct: bool,
}

pub struct TriviaSession {
  engine: TriviaEngine,
  current: Option<Question>,
  verdict: Option<bool>,
  history: Vec<RoundRecord>,
}

impl TriviaSession {
  pub fn new(engine: TriviaEngine) -> Self {
    Self { engine, current: None, verdict: None, history: Vec::new() }
  }

  /// Start a fresh game and serve its first question. On error the previous
  /// game (if any) is kept as it was.
  pub fn start(&mut self, rounds: usize, filter: &SessionFilter) -> Result<(), SessionError> {
    self.engine.start_game(rounds, filter)?;
    self.history.clear();
    self.advance();
    Ok(())
  }

  pub fn advance(&mut self) -> Option<&Question> {
    self.current = self.engine.next_question();
    self.verdict = None;
    self.current.as_ref()
  }

  pub fn current(&self) -> Option<&Question> {
    self.current.as_ref()
  }

  /// Score `guess` against the current question. A second submission for the
  /// same question returns the recorded verdict without rescoring; `None`
  /// means there is nothing to answer.
  pub fn submit(&mut self, guess: &str) -> Option<bool> {
    let question = self.current.as_ref()?;
    if let Some(verdict) = self.verdict {
      return Some(verdict);
    }
    let correct = self.engine.answer_question(question, guess);
    self.verdict = Some(correct);
    self.history.push(RoundRecord { question: question.clone(), guess: guess.to_string(), correct });
    Some(correct)
  }

  /// Questions of this game that were never answered, the current one included.
  pub fn unplayed(&self) -> usize {
    let current_open = self.current.is_some() && self.verdict.is_none();
    self.engine.questions_remaining() + usize::from(current_open)
  }

  pub fn round_number(&self) -> usize { self.engine.asked_questions().len() }
  pub fn total_rounds(&self) -> usize { self.engine.total_rounds() }
  pub fn score(&self) -> u32 { self.engine.score() }
  pub fn history(&self) -> &[RoundRecord] { &self.history }
  pub fn engine(&self) -> &TriviaEngine { &self.engine }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
  /// The game could not be built (not enough questions).
  NotStarted,
  /// The player left before the last question.
  Quit { score: u32, answered: usize, total: usize },
  Completed { score: u32, total: usize },
}

/// Play one game: banner, every round, then the summary.
#[instrument(level = "info", skip_all, fields(rounds = settings.rounds))]
pub fn run<R: BufRead, W: Write>(
  session: &mut TriviaSession,
  settings: &GameSettings,
  mut input: R,
  mut out: W,
) -> io::Result<Outcome> {
  print_banner(&mut out, session.engine())?;
  if session.engine().bank().is_empty() {
    writeln!(out, "The question bank is empty; there is nothing to play.")?;
    return Ok(Outcome::NotStarted);
  }

  if let Err(e) = session.start(settings.rounds, &settings.filter()) {
    writeln!(out, "{}. Try reducing the number of rounds or broadening your filters.", e)?;
    return Ok(Outcome::NotStarted);
  }

  while let Some(question) = session.current().cloned() {
    print_question(&mut out, &question, session.round_number(), session.total_rounds())?;

    let guess = match read_guess(&mut input, &mut out, &question)? {
      Some(g) => g,
      None => {
        writeln!(out, "\nThanks for playing! {} question(s) left unplayed.", session.unplayed())?;
        print_summary(&mut out, session)?;
        return Ok(Outcome::Quit {
          score: session.score(),
          answered: session.history().len(),
          total: session.total_rounds(),
        });
      }
    };

    if session.submit(&guess) == Some(true) {
      writeln!(out, "Correct!")?;
    } else {
      writeln!(out, "Not quite. The answer was: {}", question.answer())?;
    }
    if let Some(explanation) = question.explanation() {
      writeln!(out, "  {}", explanation)?;
    }
    session.advance();
  }

  print_summary(&mut out, session)?;
  info!(
    target: "trivia",
    session_id = ?session.engine().session_id(),
    state = ?session.engine().state(),
    score = session.score(),
    total = session.total_rounds(),
    "Game completed"
  );
  Ok(Outcome::Completed { score: session.score(), total: session.total_rounds() })
}

fn print_banner<W: Write>(out: &mut W, engine: &TriviaEngine) -> io::Result<()> {
  let categories: Vec<_> = engine.available_categories().iter().map(|c| c.as_str()).collect();
  writeln!(out, "Trivia Pursuit")?;
  writeln!(out, "{} questions across: {}", engine.bank().len(), categories.join(", "))?;
  if let Some(seed) = engine.seed() {
    writeln!(out, "Seed {} (set TRIVIA_SEED to replay this order).", seed)?;
  }
  writeln!(out, "Answer with an option number or its text. Type 'quit' to leave.")
}

fn print_question<W: Write>(out: &mut W, question: &Question, round: usize, total: usize) -> io::Result<()> {
  writeln!(out, "\nQuestion {}/{} [{} · {}]", round, total, question.category(), question.difficulty())?;
  writeln!(out, "{}", question.prompt())?;
  for (i, option) in question.options().iter().enumerate() {
    writeln!(out, "  {}) {}", i + 1, option)?;
  }
  Ok(())
}

/// Read until a non-empty line. `None` on EOF, `quit` or `exit`.
/// A line equal to an option is taken as that option; otherwise a bare
/// option number selects that option's text.
fn read_guess<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &Question) -> io::Result<Option<String>> {
  loop {
    write!(out, "Answer> ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
      return Ok(None);
    }
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
      return Ok(None);
    }
    if question.options().iter().any(|o| o == line) {
      return Ok(Some(line.to_string()));
    }
    let picked = line
      .parse::<usize>()
      .ok()
      .and_then(|n| n.checked_sub(1))
      .and_then(|i| question.options().get(i));
    return Ok(Some(picked.cloned().unwrap_or_else(|| line.to_string())));
  }
}

fn print_summary<W: Write>(out: &mut W, session: &TriviaSession) -> io::Result<()> {
  writeln!(out, "\nFinal score: {}/{}", session.score(), session.total_rounds())?;
  for (i, record) in session.history().iter().enumerate() {
    let mark = if record.correct { "+" } else { "-" };
    writeln!(out, " {} {}. {} (you said: {})", mark, i + 1, record.question.preview(50), record.guess)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  use crate::seeds::default_bank;

  fn settings(rounds: usize) -> GameSettings {
    GameSettings { rounds, seed: Some(42), ..Default::default() }
  }

  fn session() -> TriviaSession {
    TriviaSession::new(TriviaEngine::new(default_bank(), Some(42)))
  }

  /// The answers the seeded engine will expect, in serving order.
  fn expected_answers(rounds: usize) -> Vec<Question> {
    let mut engine = TriviaEngine::new(default_bank(), Some(42));
    engine.start_game(rounds, &SessionFilter::any()).expect("enough questions");
    std::iter::from_fn(|| engine.next_question()).collect()
  }

  #[test]
  fn submit_scores_once_per_question() {
    let mut s = session();
    s.start(2, &SessionFilter::any()).expect("start");
    let answer = s.current().expect("first question").answer().to_string();
    assert_eq!(s.submit(&answer), Some(true));
    assert_eq!(s.submit("wrong"), Some(true));
    assert_eq!(s.score(), 1);
    assert_eq!(s.history().len(), 1);

    s.advance();
    assert_eq!(s.submit("wrong"), Some(false));
    assert!(s.advance().is_none());
    assert_eq!(s.submit("anything"), None);
    assert_eq!(s.history().len(), 2);
  }

  #[test]
  fn failed_restart_keeps_the_running_game() {
    let mut s = session();
    s.start(3, &SessionFilter::any()).expect("start");
    let before = s.current().cloned();
    let err = s.start(16, &SessionFilter::any()).expect_err("bank has 15");
    assert_eq!(err, SessionError::NotEnoughQuestions { required: 16, available: 15 });
    assert_eq!(s.current().cloned(), before);
  }

  #[test]
  fn full_game_by_text_and_number() {
    let questions = expected_answers(3);
    let mut input = String::new();
    input.push_str(&format!("  {}  \n", questions[0].answer().to_uppercase()));
    input.push('\n');
    let idx = questions[1].options().iter().position(|o| o == questions[1].answer()).expect("answer in options");
    input.push_str(&format!("{}\n", idx + 1));
    input.push_str("surely not this\n");

    let mut s = session();
    let mut out = Vec::new();
    let outcome = run(&mut s, &settings(3), Cursor::new(input), &mut out).expect("io");
    assert_eq!(outcome, Outcome::Completed { score: 2, total: 3 });

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Question 1/3"));
    assert!(text.contains("Question 3/3"));
    assert!(text.contains("Not quite. The answer was:"));
    assert!(text.contains("Final score: 2/3"));
  }

  #[test]
  fn quit_and_eof_end_early() {
    let mut s = session();
    let mut out = Vec::new();
    let outcome = run(&mut s, &settings(3), Cursor::new("quit\n"), &mut out).expect("io");
    assert_eq!(outcome, Outcome::Quit { score: 0, answered: 0, total: 3 });
    assert!(String::from_utf8(out).expect("utf8").contains("3 question(s) left unplayed"));

    let mut s = session();
    let outcome = run(&mut s, &settings(2), Cursor::new("1\n"), Vec::new()).expect("io");
    assert!(matches!(outcome, Outcome::Quit { answered: 1, total: 2, .. }));
  }

  #[test]
  fn unplayed_counts_the_open_question() {
    let mut s = session();
    s.start(3, &SessionFilter::any()).expect("start");
    assert_eq!(s.unplayed(), 3);
    s.submit("anything");
    assert_eq!(s.unplayed(), 2);
    s.advance();
    assert_eq!(s.unplayed(), 2);
    s.advance();
    s.advance();
    assert_eq!(s.unplayed(), 0);
  }

  #[test]
  fn numeric_option_text_wins_over_position() {
    let question = crate::domain::QuestionDraft::new("Science", "How many moons does Mars have?", ["3", "2", "1"], "2")
      .build()
      .expect("valid question");
    let mut out = Vec::new();
    let guess = read_guess(&mut Cursor::new("1\n"), &mut out, &question).expect("io");
    assert_eq!(guess.as_deref(), Some("1"));

    let question = crate::domain::QuestionDraft::new("Science", "Pick one", ["ten", "twenty"], "ten")
      .build()
      .expect("valid question");
    let guess = read_guess(&mut Cursor::new("2\n"), &mut out, &question).expect("io");
    assert_eq!(guess.as_deref(), Some("twenty"));
  }

  #[test]
  fn not_enough_questions_is_reported_to_the_player() {
    let mut s = session();
    let mut cfg = settings(3);
    cfg.categories = vec!["Art".into()];
    let mut out = Vec::new();
    let outcome = run(&mut s, &cfg, Cursor::new(""), &mut out).expect("io");
    assert_eq!(outcome, Outcome::NotStarted);
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("3 required, 1 available"));
    assert!(text.contains("broadening your filters"));
  }
}
