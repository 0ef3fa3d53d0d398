//! Question-generation collaborator.
//!
//! Model output is lenient text (code fences, chatter around the object); the
//! adapter here extracts the JSON object and then applies exactly the same
//! validation a hand-authored question goes through.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, instrument, warn};

use crate::bank::QuestionBank;
use crate::domain::{Category, Difficulty, Question, QuestionDraft};
use crate::error::GenerationError;
use crate::util::trunc_for_log;

/// Anything able to produce one validated question on request.
#[allow(async_fn_in_trait)]
pub trait QuestionGenerator {
  async fn generate(&self, category: Option<Category>, difficulty: Difficulty) -> Result<Question, GenerationError>;
}

/// How many questions to request and which labels to draw them from.
/// Empty sets draw from every category / difficulty.
#[derive(Clone, Debug, Default)]
pub struct GenerationRequest {
  pub count: usize,
  pub categories: Vec<Category>,
  pub difficulties: Vec<Difficulty>,
}

/// Generate `request.count` questions and append them to `bank`.
/// All-or-nothing: the first failure aborts and the bank is left unchanged.
#[instrument(level = "info", skip_all, fields(count = request.count))]
pub async fn enlarge_bank<G, R>(
  generator: &G,
  bank: &mut QuestionBank,
  request: &GenerationRequest,
  rng: &mut R,
) -> Result<usize, GenerationError>
where
  G: QuestionGenerator,
  R: Rng + ?Sized,
{
  let categories: &[Category] = if request.categories.is_empty() { &Category::ALL } else { &request.categories };
  let difficulties: &[Difficulty] = if request.difficulties.is_empty() { &Difficulty::ALL } else { &request.difficulties };

  let mut fresh = Vec::with_capacity(request.count);
  for _ in 0..request.count {
    let category = categories.choose(&mut *rng).copied();
    let difficulty = difficulties.choose(&mut *rng).copied().unwrap_or_default();
    let question = generator.generate(category, difficulty).await?;
    if Some(question.category()) != category {
      warn!(target: "generator", requested = ?category, got = %question.category(), "Generated question drifted from requested category");
    }
    fresh.push(question);
  }

  let added = fresh.len();
  bank.extend(fresh);
  info!(target: "generator", added, bank_size = bank.len(), "Bank enlarged with generated questions");
  Ok(added)
}

/// Turn raw model content into a validated question.
pub fn parse_generated(raw: &str) -> Result<Question, GenerationError> {
  let content = raw.trim();
  if content.is_empty() {
    return Err(GenerationError::InvalidGeneratedQuestion("empty content received from model".into()));
  }
  let blob = extract_json_blob(content)?;
  let draft: QuestionDraft = serde_json::from_str(blob).map_err(|e| {
    warn!(target: "generator", error = %e, payload = %trunc_for_log(blob, 200), "Malformed JSON from model");
    GenerationError::InvalidGeneratedQuestion(format!("malformed JSON payload: {}", e))
  })?;
  draft
    .build()
    .map_err(|e| GenerationError::InvalidGeneratedQuestion(e.to_string()))
}

/// Strip a surrounding markdown fence, then slice from the first `{` to the last `}`.
pub fn extract_json_blob(raw: &str) -> Result<&str, GenerationError> {
  let mut text = raw.trim();
  if let Some(rest) = text.strip_prefix("```") {
    // Drop the fence line (it may carry a language tag).
    text = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    if let Some(end) = text.trim_end().strip_suffix("```") {
      text = end;
    }
    text = text.trim();
  }

  match (text.find('{'), text.rfind('}')) {
    (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
    _ => Err(GenerationError::InvalidGeneratedQuestion("could not locate JSON object in response".into())),
  }
}
