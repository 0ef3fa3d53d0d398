//! Loading game configuration (session settings, generator, prompts and an
//! optional extra question bank) from TOML, plus environment overrides.
//!
//! See `GameConfig` for the expected schema.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::{Category, Difficulty, Question, QuestionDraft};
use crate::engine::SessionFilter;
use crate::error::ConfigError;
use crate::generator::GenerationRequest;
use crate::util::split_labels;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub game: GameSettings,
  #[serde(default)]
  pub generator: GeneratorSettings,
  #[serde(default)]
  pub prompts: Prompts,
  /// Extra hand-authored questions. Validated like any other question.
  #[serde(default)]
  pub questions: Vec<QuestionDraft>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameSettings {
  pub rounds: usize,
  pub seed: Option<u64>,
  pub categories: Vec<String>,
  pub difficulties: Vec<String>,
  /// Questions to request from the generator before the session starts.
  pub generate: usize,
}

impl Default for GameSettings {
  fn default() -> Self {
    Self { rounds: 5, seed: None, categories: Vec::new(), difficulties: Vec::new(), generate: 0 }
  }
}

impl GameSettings {
  /// Session filter from the configured labels. Surrounding whitespace is
  /// stripped and blank entries are dropped.
  pub fn filter(&self) -> SessionFilter {
    SessionFilter::any()
      .with_categories(clean_labels(&self.categories))
      .with_difficulties(clean_labels(&self.difficulties))
  }

  /// Generation follows the same filters; labels that name no category or
  /// difficulty are dropped.
  pub fn generation_request(&self) -> GenerationRequest {
    let categories = self
      .categories
      .iter()
      .filter_map(|label| {
        let found = Category::ALL.iter().copied().find(|c| c.as_str().eq_ignore_ascii_case(label.trim()));
        if found.is_none() {
          warn!(target: "trivia_engine", %label, "Ignoring unknown category for generation");
        }
        found
      })
      .collect();
    let difficulties = self
      .difficulties
      .iter()
      .filter(|label| !label.trim().is_empty())
      .filter_map(|label| label.parse::<Difficulty>().ok())
      .collect();
    GenerationRequest { count: self.generate, categories, difficulties }
  }
}

/// Where the local model runtime lives (OpenAI-compatible chat endpoint).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorSettings {
  pub base_url: String,
  pub model: String,
  pub timeout_secs: u64,
}

impl Default for GeneratorSettings {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:11434/v1".into(),
      model: "llama3.1:latest".into(),
      timeout_secs: 60,
    }
  }
}

/// Prompts used by the question generator. `{difficulty}` and `{category}`
/// are substituted in the user template.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub question_system: String,
  pub question_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      question_system: format!(
        "You are preparing questions for a Trivia game. \
         Respond with a single JSON object that adheres to this schema:\n{}\n\
         Guidelines:\n\
         - JSON only. No markdown, code fences, or explanations outside the object.\n\
         - Provide exactly four distinct answer options.\n\
         - Ensure the answer string matches one option verbatim.\n\
         - Explanations should be at most two sentences and factual.\n\
         - Avoid sensitive, political, or adult-only subject matter.\n",
        Question::schema_template()
      ),
      question_user_template: "Generate one {difficulty} difficulty trivia question about {category}. \
        Respond using the exact JSON schema described in the system prompt."
        .into(),
    }
  }
}

impl GameConfig {
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
  }

  /// Config from TRIVIA_CONFIG_PATH (if set and readable) with env overrides
  /// applied. Read/parse failures are logged and defaults are used instead.
  pub fn from_env() -> Self {
    let mut cfg = match std::env::var("TRIVIA_CONFIG_PATH") {
      Ok(path) => match GameConfig::load(&path) {
        Ok(cfg) => {
          info!(target: "trivia_engine", %path, questions = cfg.questions.len(), "Loaded game config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "trivia_engine", %path, error = %e, "Failed to load config; using defaults");
          GameConfig::default()
        }
      },
      Err(_) => GameConfig::default(),
    };
    cfg.apply_overrides(|key| std::env::var(key).ok());
    cfg
  }

  /// Apply `TRIVIA_*` / `OLLAMA_*` overrides from `lookup`. Unparsable
  /// numbers are logged and ignored.
  pub fn apply_overrides<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(n) = parse_var(&lookup, "TRIVIA_ROUNDS") {
      self.game.rounds = n;
    }
    if let Some(seed) = parse_var(&lookup, "TRIVIA_SEED") {
      self.game.seed = Some(seed);
    }
    if let Some(n) = parse_var(&lookup, "TRIVIA_GENERATE") {
      self.game.generate = n;
    }
    if let Some(v) = lookup("TRIVIA_CATEGORIES") {
      self.game.categories = split_labels(&v);
    }
    if let Some(v) = lookup("TRIVIA_DIFFICULTIES") {
      self.game.difficulties = split_labels(&v);
    }
    if let Some(v) = lookup("OLLAMA_BASE_URL") {
      self.generator.base_url = v;
    }
    if let Some(v) = lookup("OLLAMA_MODEL") {
      self.generator.model = v;
    }
  }
}

fn clean_labels(labels: &[String]) -> Vec<&str> {
  labels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect()
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
  F: Fn(&str) -> Option<String>,
  T: std::str::FromStr,
{
  let raw = lookup(key)?;
  match raw.trim().parse::<T>() {
    Ok(v) => Some(v),
    Err(_) => {
      warn!(target: "trivia_engine", %key, value = %raw, "Ignoring unparsable env override");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  const SAMPLE: &str = r#"
[game]
rounds = 3
seed = 42
categories = ["Science"]

[generator]
model = "mistral"

[[questions]]
category = "Science"
question = "What planet is known as the Red Planet?"
options = ["Mars", "Venus"]
answer = "Mars"
difficulty = "EASY"

[[questions]]
category = "Cooking"
question = "Best pasta?"
options = ["All"]
answer = "All"
"#;

  #[test]
  fn parses_sample_and_keeps_defaults() {
    let cfg: GameConfig = toml::from_str(SAMPLE).expect("parse");
    assert_eq!(cfg.game.rounds, 3);
    assert_eq!(cfg.game.seed, Some(42));
    assert_eq!(cfg.game.generate, 0);
    assert_eq!(cfg.generator.model, "mistral");
    assert_eq!(cfg.generator.base_url, GeneratorSettings::default().base_url);
    assert!(cfg.prompts.question_user_template.contains("{difficulty}"));
    assert_eq!(cfg.questions.len(), 2);
    assert!(cfg.questions[0].clone().build().is_ok());
    assert_eq!(cfg.questions[1].clone().build().expect_err("invalid").problems().len(), 2);
  }

  #[test]
  fn empty_file_is_all_defaults() {
    let cfg: GameConfig = toml::from_str("").expect("parse");
    assert_eq!(cfg.game, GameSettings::default());
    assert!(cfg.questions.is_empty());
  }

  #[test]
  fn env_overrides_win_and_bad_numbers_are_ignored() {
    let vars: HashMap<&str, &str> = [
      ("TRIVIA_ROUNDS", "not-a-number"),
      ("TRIVIA_SEED", " 7 "),
      ("TRIVIA_CATEGORIES", "Art, History"),
      ("TRIVIA_DIFFICULTIES", "hard"),
      ("OLLAMA_MODEL", "phi3"),
    ]
    .into_iter()
    .collect();
    let mut cfg = GameConfig::default();
    cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.game.rounds, 5);
    assert_eq!(cfg.game.seed, Some(7));
    assert_eq!(cfg.game.categories, vec!["Art".to_string(), "History".to_string()]);
    assert_eq!(cfg.game.difficulties, vec!["hard".to_string()]);
    assert_eq!(cfg.generator.model, "phi3");
  }

  #[test]
  fn generation_request_follows_filters() {
    let settings = GameSettings {
      categories: vec!["science".into(), "Cooking".into()],
      difficulties: vec!["Hard".into(), "bogus".into()],
      generate: 4,
      ..Default::default()
    };
    let req = settings.generation_request();
    assert_eq!(req.count, 4);
    assert_eq!(req.categories, vec![Category::Science]);
    assert_eq!(req.difficulties, vec![Difficulty::Hard]);
  }

  #[test]
  fn configured_labels_are_cleaned_before_filtering() {
    let settings = GameSettings {
      categories: vec![" Science ".into(), "".into()],
      difficulties: vec!["  ".into()],
      ..Default::default()
    };
    assert_eq!(settings.filter(), SessionFilter::any().with_categories(["science"]));
  }

  #[test]
  fn default_system_prompt_embeds_schema() {
    let prompts = Prompts::default();
    assert!(prompts.question_system.contains("Technology"));
    assert!(prompts.question_system.contains("easy|medium|hard"));
  }
}
