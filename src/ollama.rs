//! Minimal client for a local model runtime exposing an OpenAI-compatible
//! `chat/completions` endpoint (Ollama serves one under `/v1`).
//!
//! Calls are instrumented and log model names, latencies and response sizes
//! (not contents).

use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::{GeneratorSettings, Prompts};
use crate::domain::{Category, Difficulty, Question};
use crate::error::GenerationError;
use crate::generator::{parse_generated, QuestionGenerator};
use crate::util::{fill_template, trunc_for_log};

#[derive(Clone)]
pub struct Ollama {
  pub client: reqwest::Client,
  pub base_url: String,
  pub model: String,
  pub prompts: Prompts,
}

impl Ollama {
  pub fn new(settings: &GeneratorSettings, prompts: Prompts) -> Result<Self, GenerationError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(settings.timeout_secs))
      .build()
      .map_err(|e| GenerationError::Unavailable(format!("HTTP client setup failed: {e}")))?;

    Ok(Self {
      client,
      base_url: settings.base_url.trim_end_matches('/').to_string(),
      model: settings.model.clone(),
      prompts,
    })
  }

  /// Names of the models the runtime has available (`GET {base_url}/models`).
  #[instrument(level = "info", skip(self), fields(base_url = %self.base_url))]
  pub async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
    let url = format!("{}/models", self.base_url);
    let res = self
      .client
      .get(&url)
      .header(USER_AGENT, "trivia-engine/0.1")
      .send()
      .await
      .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| GenerationError::Unavailable(e.to_string()))?;
    if !status.is_success() {
      let msg = extract_api_error(&body).unwrap_or(body);
      return Err(GenerationError::Unavailable(format!("HTTP {}: {}", status, msg)));
    }
    let models = parse_model_list(&body)?;
    info!(target: "generator", count = models.len(), "Listed runtime models");
    Ok(models)
  }

  /// JSON-mode chat completion; returns the raw message content.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_json_content(&self, system: &str, user: &str, temperature: f32) -> Result<String, GenerationError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "trivia-engine/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(&req)
      .send()
      .await
      .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_api_error(&body).unwrap_or(body);
      return Err(GenerationError::Unavailable(format!("HTTP {}: {}", status, msg)));
    }

    let body: ChatCompletionResponse = res
      .json()
      .await
      .map_err(|e| GenerationError::InvalidGeneratedQuestion(format!("unexpected response shape: {e}")))?;
    if let Some(usage) = &body.usage {
      info!(target: "generator", prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, "Model usage");
    }
    Ok(body
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .unwrap_or_default())
  }
}

impl QuestionGenerator for Ollama {
  #[instrument(level = "info", skip(self), fields(model = %self.model))]
  async fn generate(&self, category: Option<Category>, difficulty: Difficulty) -> Result<Question, GenerationError> {
    let topic = match category {
      Some(c) => c.as_str().to_string(),
      None => format!("any category among {}", Category::labels()),
    };
    let user = fill_template(
      &self.prompts.question_user_template,
      &[("difficulty", difficulty.as_str()), ("category", &topic)],
    );

    let start = Instant::now();
    let result = self.chat_json_content(&self.prompts.question_system, &user, 0.7).await;
    let elapsed = start.elapsed();

    let content = match result {
      Ok(c) => {
        info!(target: "generator", ?elapsed, content_len = c.len(), "Model response received");
        c
      }
      Err(e) => {
        error!(target: "generator", ?elapsed, error = %e, "Model call failed during question generation");
        return Err(e);
      }
    };

    let question = parse_generated(&content)?;
    info!(target: "generator", category = %question.category(), difficulty = %question.difficulty(), prompt = %question.preview(40), "Question generated");
    Ok(question)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ModelList { #[serde(default)] data: Vec<ModelEntry> }
#[derive(Deserialize)]
struct ModelEntry { #[serde(default)] id: String }

/// Model ids from an OpenAI-style `{"data":[{"id":..}]}` listing; blank ids are skipped.
fn parse_model_list(body: &str) -> Result<Vec<String>, GenerationError> {
  let list: ModelList = serde_json::from_str(body).map_err(|e| {
    GenerationError::Unavailable(format!("unexpected model list: {e}; body: {}", trunc_for_log(body, 200)))
  })?;
  Ok(list.data.into_iter().map(|m| m.id).filter(|id| !id.trim().is_empty()).collect())
}

/// Try to extract a clean error message from an API error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum EObj { Detailed { message: String }, Plain(String) }
  match serde_json::from_str::<EWrap>(body).ok()?.error {
    EObj::Detailed { message } => Some(message),
    EObj::Plain(message) => Some(message),
  }
}
