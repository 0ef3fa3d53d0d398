//! Application state assembled at startup.
//!
//! This module owns:
//!   - the question bank (built-in seeds, then valid config-bank questions)
//!   - the session settings
//!   - the optional question generator
//!
//! The bank is owned per instance; nothing here is shared between sessions.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, instrument};

use crate::bank::QuestionBank;
use crate::config::{GameConfig, GameSettings};
use crate::engine::TriviaEngine;
use crate::error::GenerationError;
use crate::generator::enlarge_bank;
use crate::ollama::Ollama;
use crate::seeds::default_bank;

pub struct AppState {
  pub bank: QuestionBank,
  pub settings: GameSettings,
  pub generator: Option<Ollama>,
}

impl AppState {
  /// Build state from config: start from the seeds, add valid config-bank questions,
  /// log the inventory, and set up the generator if generation is requested.
  #[instrument(level = "info", skip_all)]
  pub fn new(cfg: GameConfig) -> Self {
    let mut bank = default_bank();
    let seeded = bank.len();

    for (index, draft) in cfg.questions.into_iter().enumerate() {
      let preview = draft.question.clone();
      match draft.build() {
        Ok(q) => bank.add(q),
        Err(e) => {
          error!(target: "trivia", index, question = %preview, problems = ?e.problems(), "Skipping invalid config bank question");
        }
      }
    }
    let from_config = bank.len() - seeded;

    let shares = bank.category_proportions();
    for (category, count) in bank.category_counts() {
      let share = shares.get(&category).copied().unwrap_or_default();
      info!(target: "trivia", %category, count, share = %format!("{:.2}", share), "Startup bank inventory");
    }
    for (difficulty, share) in bank.difficulty_proportions() {
      info!(target: "trivia", %difficulty, share = %format!("{:.2}", share), "Startup difficulty mix");
    }
    info!(target: "trivia", total = bank.len(), from_config, "Question bank ready");

    let generator = if cfg.game.generate > 0 {
      match Ollama::new(&cfg.generator, cfg.prompts) {
        Ok(client) => {
          info!(target: "trivia_engine", base_url = %client.base_url, model = %client.model, requested = cfg.game.generate, "Question generation enabled.");
          Some(client)
        }
        Err(e) => {
          error!(target: "trivia_engine", error = %e, "Question generation disabled: client setup failed");
          None
        }
      }
    } else {
      info!(target: "trivia_engine", "Question generation disabled. Using config and built-in questions.");
      None
    };

    Self { bank, settings: cfg.game, generator }
  }

  /// Ask the generator for `settings.generate` questions. No generator means
  /// nothing to do; a failure leaves the bank unchanged.
  pub async fn enlarge_bank(&mut self) -> Result<usize, GenerationError> {
    let Some(generator) = &self.generator else {
      return Ok(0);
    };
    let mut rng = match self.settings.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let request = self.settings.generation_request();
    enlarge_bank(generator, &mut self.bank, &request, &mut rng).await
  }

  pub fn into_engine(self) -> TriviaEngine {
    TriviaEngine::new(self.bank, self.settings.seed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QuestionDraft;

  #[test]
  fn valid_config_questions_follow_the_seeds() {
    let cfg = GameConfig {
      questions: vec![
        QuestionDraft::new("Art", "Who painted the Mona Lisa?", ["Leonardo da Vinci", "Raphael"], "Leonardo da Vinci"),
        QuestionDraft::new("Art", "", ["x"], "y"),
      ],
      ..Default::default()
    };
    let state = AppState::new(cfg);
    assert_eq!(state.bank.len(), 16);
    assert_eq!(state.bank.iter().last().map(|q| q.prompt()), Some("Who painted the Mona Lisa?"));
    assert!(state.generator.is_none());
  }

  #[test]
  fn generator_is_built_only_when_requested() {
    let mut cfg = GameConfig::default();
    cfg.game.generate = 2;
    let state = AppState::new(cfg);
    assert!(state.generator.is_some());
  }

  #[tokio::test]
  async fn enlarging_without_generator_is_a_no_op() {
    let mut state = AppState::new(GameConfig::default());
    assert_eq!(state.enlarge_bank().await.expect("no-op"), 0);
    assert_eq!(state.bank.len(), 15);
  }

  #[test]
  fn engine_inherits_bank_and_seed() {
    let mut cfg = GameConfig::default();
    cfg.game.seed = Some(99);
    let engine = AppState::new(cfg).into_engine();
    assert_eq!(engine.seed(), Some(99));
    assert_eq!(engine.bank().len(), 15);
  }
}
