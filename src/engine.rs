//! Session selection and scoring engine.
//!
//! A session is built by filtering the bank, shuffling the survivors with the
//! engine's seeded random source and keeping the first `rounds` of them.
//! Questions are then served first-in first-out until the queue runs dry.
//!
//! Invariant: once started, `questions_remaining() + asked_questions().len()`
//! equals the round count fixed by `start_game`.

use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::domain::{Category, Question};
use crate::error::SessionError;

/// Category/difficulty restriction applied before a session is built.
/// Labels compare case-insensitively and are otherwise taken verbatim; an
/// empty set means "no restriction".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionFilter {
  categories: HashSet<String>,
  difficulties: HashSet<String>,
}

impl SessionFilter {
  pub fn any() -> Self {
    Self::default()
  }

  pub fn with_categories<I, S>(mut self, categories: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.categories = label_set(categories);
    self
  }

  pub fn with_difficulties<I, S>(mut self, difficulties: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.difficulties = label_set(difficulties);
    self
  }

  pub fn matches(&self, question: &Question) -> bool {
    let category_ok = self.categories.is_empty()
      || self.categories.contains(&question.category().as_str().to_lowercase());
    let difficulty_ok = self.difficulties.is_empty()
      || self.difficulties.contains(question.difficulty().as_str());
    category_ok && difficulty_ok
  }
}

fn label_set<I, S>(labels: I) -> HashSet<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  labels.into_iter().map(|s| s.as_ref().to_lowercase()).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
  Unstarted,
  InProgress,
  Exhausted,
}

/// Single-session trivia engine. Owns its bank and random source; not meant
/// to be shared between threads without external locking.
#[derive(Debug)]
pub struct TriviaEngine {
  bank: QuestionBank,
  seed: Option<u64>,
  rng: StdRng,
  session_id: Option<Uuid>,
  pending: VecDeque<Question>,
  asked: Vec<Question>,
  score: u32,
}

impl TriviaEngine {
  /// `seed = None` draws the shuffle order from system entropy.
  pub fn new(bank: QuestionBank, seed: Option<u64>) -> Self {
    let rng = match seed {
      Some(s) => StdRng::seed_from_u64(s),
      None => StdRng::from_entropy(),
    };
    Self {
      bank,
      seed,
      rng,
      session_id: None,
      pending: VecDeque::new(),
      asked: Vec::new(),
      score: 0,
    }
  }

  pub fn bank(&self) -> &QuestionBank { &self.bank }
  pub fn seed(&self) -> Option<u64> { self.seed }
  pub fn score(&self) -> u32 { self.score }
  pub fn asked_questions(&self) -> &[Question] { &self.asked }
  pub fn session_id(&self) -> Option<Uuid> { self.session_id }

  pub fn state(&self) -> SessionState {
    match self.session_id {
      None => SessionState::Unstarted,
      Some(_) if self.pending.is_empty() => SessionState::Exhausted,
      Some(_) => SessionState::InProgress,
    }
  }

  /// Distinct categories present in the bank, sorted by label.
  pub fn available_categories(&self) -> Vec<Category> {
    let mut cats = self.bank.categories();
    cats.sort_by_key(|c| c.as_str());
    cats
  }

  /// Build a fresh session of `rounds` questions. All-or-nothing: on
  /// `NotEnoughQuestions` the current session (if any) is left as it was.
  #[instrument(level = "info", skip(self, filter), fields(seed = ?self.seed))]
  pub fn start_game(&mut self, rounds: usize, filter: &SessionFilter) -> Result<(), SessionError> {
    let mut selected: Vec<Question> = self.bank.iter().filter(|q| filter.matches(q)).cloned().collect();

    if selected.len() < rounds {
      warn!(target: "trivia", rounds, available = selected.len(), ?filter, "Not enough questions for filters");
      return Err(SessionError::NotEnoughQuestions { required: rounds, available: selected.len() });
    }

    let available = selected.len();
    selected.shuffle(&mut self.rng);
    selected.truncate(rounds);

    let id = Uuid::new_v4();
    self.pending = selected.into();
    self.asked.clear();
    self.score = 0;
    self.session_id = Some(id);

    info!(target: "trivia", session_id = %id, rounds, available, "Session started");
    Ok(())
  }

  /// Serve the next queued question, or `None` once the session is exhausted.
  pub fn next_question(&mut self) -> Option<Question> {
    let question = self.pending.pop_front()?;
    self.asked.push(question.clone());
    debug!(
      target: "trivia",
      session_id = ?self.session_id,
      round = self.asked.len(),
      remaining = self.pending.len(),
      category = %question.category(),
      prompt = %question.preview(60),
      "Question served"
    );
    Some(question)
  }

  /// Score `guess` against `question`. Comparison trims and ignores case.
  /// The engine does not check that `question` is the one last served.
  pub fn answer_question(&mut self, question: &Question, guess: &str) -> bool {
    let correct = question.is_correct(guess);
    if correct {
      self.score += 1;
    }
    debug!(target: "trivia", session_id = ?self.session_id, correct, score = self.score, "Answer scored");
    correct
  }

  pub fn questions_remaining(&self) -> usize {
    self.pending.len()
  }

  pub fn total_rounds(&self) -> usize {
    self.pending.len() + self.asked.len()
  }
}
