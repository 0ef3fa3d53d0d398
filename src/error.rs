//! Error taxonomy: question validation, session setup, the generation
//! collaborator and configuration loading.

use thiserror::Error;

/// A question failed validation. Every violated field is listed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
  #[error("invalid question: {}", problems.join("; "))]
  Invalid { problems: Vec<String> },
}

impl QuestionError {
  pub fn problems(&self) -> &[String] {
    match self {
      QuestionError::Invalid { problems } => problems,
    }
  }
}

/// Raised by `TriviaEngine::start_game`. Prior session state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
  #[error("not enough questions for the chosen filters: {required} required, {available} available")]
  NotEnoughQuestions { required: usize, available: usize },
}

/// Failures at the question-generator boundary. The engine never raises these.
#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("question generator unavailable: {0}")]
  Unavailable(String),
  #[error("generated question rejected: {0}")]
  InvalidGeneratedQuestion(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to parse TOML config: {0}")]
  Toml(#[from] toml::de::Error),
}
