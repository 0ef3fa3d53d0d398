//! Trivia Engine · terminal trivia game
//!
//! - Seeded, replayable question sessions over an in-memory bank
//! - Optional question generation through a local model runtime
//!
//! Important env variables:
//!   TRIVIA_CONFIG_PATH   : path to TOML config (game settings, prompts, extra questions)
//!   TRIVIA_ROUNDS        : rounds per game (default 5)
//!   TRIVIA_SEED          : u64 seed for a reproducible question order
//!   TRIVIA_CATEGORIES    : comma-separated category filter
//!   TRIVIA_DIFFICULTIES  : comma-separated difficulty filter
//!   TRIVIA_GENERATE      : questions to generate before playing (default 0)
//!   OLLAMA_BASE_URL      : default "http://localhost:11434/v1"
//!   OLLAMA_MODEL         : default "llama3.1:latest"
//!   TRIVIA_LIST_MODELS   : "1"/"true" prints the runtime's models and exits
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "json" for structured logs

mod telemetry;
mod util;
mod error;
mod domain;
mod bank;
mod seeds;
mod engine;
mod generator;
mod ollama;
mod config;
mod state;
mod play;

use std::io::{self, Write};

use tracing::{info, warn};

use crate::config::GameConfig;
use crate::ollama::Ollama;
use crate::play::{Outcome, TriviaSession};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = GameConfig::from_env();

  if list_models_requested() {
    return list_models(&cfg).await;
  }

  let mut state = AppState::new(cfg);

  if state.generator.is_some() {
    match state.enlarge_bank().await {
      Ok(added) => info!(target: "trivia_engine", added, "Generated questions added to the bank"),
      Err(e) => {
        warn!(target: "trivia_engine", error = %e, "Question generation failed");
        writeln!(io::stdout(), "Could not generate new questions ({}). Playing with the existing bank.", e)?;
      }
    }
  }

  let settings = state.settings.clone();
  let mut session = TriviaSession::new(state.into_engine());
  let outcome = play::run(&mut session, &settings, io::stdin().lock(), io::stdout().lock())?;
  info!(target: "trivia_engine", ?outcome, "Session finished");

  if outcome == Outcome::NotStarted {
    std::process::exit(1);
  }
  Ok(())
}

fn list_models_requested() -> bool {
  matches!(
    std::env::var("TRIVIA_LIST_MODELS").as_deref().map(str::trim),
    Ok("1") | Ok("true") | Ok("yes")
  )
}

async fn list_models(cfg: &GameConfig) -> Result<(), Box<dyn std::error::Error>> {
  let client = Ollama::new(&cfg.generator, cfg.prompts.clone())?;
  let mut out = io::stdout().lock();
  match client.list_models().await {
    Ok(models) if models.is_empty() => writeln!(out, "No models available at {}.", client.base_url)?,
    Ok(models) => {
      writeln!(out, "Models at {}:", client.base_url)?;
      for model in models {
        writeln!(out, "  {}", model)?;
      }
    }
    Err(e) => {
      warn!(target: "trivia_engine", error = %e, "Model listing failed");
      writeln!(out, "Could not list models ({}). Is the runtime running?", e)?;
      std::process::exit(1);
    }
  }
  Ok(())
}
