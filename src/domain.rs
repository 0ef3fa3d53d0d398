//! Domain models: categories, difficulty tiers, and the validated trivia question.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::QuestionError;

/// The fixed set of admissible question categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
  History,
  Science,
  Geography,
  Sports,
  Entertainment,
  Literature,
  Technology,
  Art,
}

impl Category {
  pub const ALL: [Category; 8] = [
    Category::History,
    Category::Science,
    Category::Geography,
    Category::Sports,
    Category::Entertainment,
    Category::Literature,
    Category::Technology,
    Category::Art,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Category::History => "History",
      Category::Science => "Science",
      Category::Geography => "Geography",
      Category::Sports => "Sports",
      Category::Entertainment => "Entertainment",
      Category::Literature => "Literature",
      Category::Technology => "Technology",
      Category::Art => "Art",
    }
  }

  /// Comma-separated labels, for prompts and error messages.
  pub fn labels() -> String {
    Category::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Exact match on the label; "science" is not a category.
impl FromStr for Category {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Category::ALL
      .iter()
      .copied()
      .find(|c| c.as_str() == s)
      .ok_or_else(|| format!("category '{}' is not admissible; expected one of {}", s, Category::labels()))
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

  pub fn as_str(self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Case-insensitive; an empty string means the default tier.
impl FromStr for Difficulty {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let value = s.trim().to_lowercase();
    if value.is_empty() {
      return Ok(Difficulty::default());
    }
    Difficulty::ALL
      .iter()
      .copied()
      .find(|d| d.as_str() == value)
      .ok_or_else(|| format!("invalid difficulty '{}'; expected one of easy, medium, hard", s))
  }
}

/// Unvalidated question fields, as authored in TOML or returned by a model.
/// Missing fields deserialize as empty so validation can report all of them at once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionDraft {
  #[serde(default)] pub category: String,
  #[serde(default)] pub question: String,
  #[serde(default)] pub options: Vec<String>,
  #[serde(default)] pub answer: String,
  #[serde(default)] pub explanation: Option<String>,
  #[serde(default)] pub difficulty: Option<String>,
}

impl QuestionDraft {
  pub fn new<I, S>(category: &str, question: &str, options: I, answer: &str) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      category: category.to_string(),
      question: question.to_string(),
      options: options.into_iter().map(Into::into).collect(),
      answer: answer.to_string(),
      explanation: None,
      difficulty: None,
    }
  }

  pub fn explanation(mut self, explanation: &str) -> Self {
    self.explanation = Some(explanation.to_string());
    self
  }

  pub fn difficulty(mut self, difficulty: &str) -> Self {
    self.difficulty = Some(difficulty.to_string());
    self
  }

  pub fn build(self) -> Result<Question, QuestionError> {
    Question::try_from(self)
  }
}

/// A validated, immutable trivia question. The only way to obtain one is
/// through `QuestionDraft` validation (directly or via deserialization).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft")]
pub struct Question {
  category: Category,
  #[serde(rename = "question")]
  prompt: String,
  options: Vec<String>,
  answer: String,
  explanation: Option<String>,
  difficulty: Difficulty,
}

impl TryFrom<QuestionDraft> for Question {
  type Error = QuestionError;

  fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
    let mut problems = Vec::new();

    let category = draft
      .category
      .trim()
      .parse::<Category>()
      .map_err(|e| problems.push(e))
      .ok();

    let prompt = draft.question.trim().to_string();
    if prompt.is_empty() {
      problems.push("question cannot be empty".to_string());
    }

    let options: Vec<String> = draft.options.iter().map(|o| o.trim().to_string()).collect();
    if options.len() < 2 {
      problems.push(format!("at least two options are required (got {})", options.len()));
    }
    if options.iter().any(|o| o.is_empty()) {
      problems.push("options cannot contain empty strings".to_string());
    }
    for (i, option) in options.iter().enumerate() {
      if !option.is_empty() && options[..i].contains(option) {
        problems.push(format!("options must be distinct ('{}' repeats)", option));
      }
    }

    let answer = draft.answer.trim().to_string();
    if answer.is_empty() {
      problems.push("answer cannot be empty".to_string());
    } else if !options.contains(&answer) {
      problems.push(format!("answer '{}' must exactly match one of the provided options", answer));
    }

    let difficulty = draft
      .difficulty
      .as_deref()
      .unwrap_or_default()
      .parse::<Difficulty>()
      .map_err(|e| problems.push(e))
      .ok();

    let explanation = draft
      .explanation
      .map(|e| e.trim().to_string())
      .filter(|e| !e.is_empty());

    match (category, difficulty) {
      (Some(category), Some(difficulty)) if problems.is_empty() => Ok(Question {
        category,
        prompt,
        options,
        answer,
        explanation,
        difficulty,
      }),
      _ => Err(QuestionError::Invalid { problems }),
    }
  }
}

impl Question {
  pub fn category(&self) -> Category { self.category }
  pub fn prompt(&self) -> &str { &self.prompt }
  pub fn options(&self) -> &[String] { &self.options }
  pub fn answer(&self) -> &str { &self.answer }
  pub fn explanation(&self) -> Option<&str> { self.explanation.as_deref() }
  pub fn difficulty(&self) -> Difficulty { self.difficulty }

  /// Lowercase, trimmed answer used for lenient comparison.
  pub fn normalized_answer(&self) -> String {
    normalize_guess(&self.answer)
  }

  pub fn is_correct(&self, guess: &str) -> bool {
    normalize_guess(guess) == self.normalized_answer()
  }

  /// Prompt shortened to `max` characters, for logs and listings.
  pub fn preview(&self, max: usize) -> String {
    if self.prompt.chars().count() <= max {
      return self.prompt.clone();
    }
    let head: String = self.prompt.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", head)
  }

  /// JSON skeleton describing the structured representation, shown to generators.
  pub fn schema_template() -> serde_json::Value {
    let difficulties = Difficulty::ALL.iter().map(|d| d.as_str()).collect::<Vec<_>>().join("|");
    json!({
      "category": format!("<one of: {}>", Category::labels()),
      "question": "<trivia question ending with a question mark>",
      "options": [
        "<answer option 1>",
        "<answer option 2>",
        "<answer option 3>",
        "<answer option 4>"
      ],
      "answer": "<must exactly match one of the options>",
      "explanation": "<short fact explaining why the answer is correct>",
      "difficulty": format!("<{}>", difficulties),
    })
  }
}

pub fn normalize_guess(s: &str) -> String {
  s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft() -> QuestionDraft {
    QuestionDraft::new("Science", "What is H2O?", ["Water", "Salt", "Sand"], "Water")
  }

  #[test]
  fn valid_draft_builds_with_default_difficulty() {
    let q = draft().build().expect("valid question");
    assert_eq!(q.category(), Category::Science);
    assert_eq!(q.difficulty(), Difficulty::Medium);
    assert_eq!(q.explanation(), None);
    assert_eq!(q.normalized_answer(), "water");
  }

  #[test]
  fn difficulty_is_case_insensitive_and_normalized() {
    let q = draft().difficulty("  HARD ").build().expect("valid question");
    assert_eq!(q.difficulty(), Difficulty::Hard);
    let q = draft().difficulty("").build().expect("empty means medium");
    assert_eq!(q.difficulty(), Difficulty::Medium);
  }

  #[test]
  fn every_invalid_field_is_reported() {
    let bad = QuestionDraft {
      category: "Cooking".into(),
      question: "   ".into(),
      options: vec!["only".into()],
      answer: "".into(),
      explanation: None,
      difficulty: Some("extreme".into()),
    };
    let err = bad.build().expect_err("must fail");
    let problems = err.problems();
    assert_eq!(problems.len(), 5, "{problems:?}");
    assert!(problems.iter().any(|p| p.contains("Cooking")));
    assert!(problems.iter().any(|p| p.contains("question cannot be empty")));
    assert!(problems.iter().any(|p| p.contains("at least two options")));
    assert!(problems.iter().any(|p| p.contains("answer cannot be empty")));
    assert!(problems.iter().any(|p| p.contains("extreme")));
  }

  #[test]
  fn answer_must_match_an_option_verbatim() {
    let err = QuestionDraft::new("Art", "Who?", ["Dalí", "Picasso"], "dalí")
      .build()
      .expect_err("case differs");
    assert!(err.to_string().contains("must exactly match"));

    let q = QuestionDraft::new("Art", "Who?", [" Dalí ", "Picasso"], "Dalí  ")
      .build()
      .expect("trimmed values match");
    assert_eq!(q.options()[0], "Dalí");
  }

  #[test]
  fn empty_and_duplicate_options_are_rejected() {
    let err = QuestionDraft::new("Art", "Who?", ["Dalí", ""], "Dalí").build().expect_err("empty option");
    assert!(err.problems().iter().any(|p| p.contains("empty strings")));

    let err = QuestionDraft::new("Art", "Who?", ["Dalí", "Dalí"], "Dalí").build().expect_err("duplicate");
    assert!(err.problems().iter().any(|p| p.contains("distinct")));
  }

  #[test]
  fn category_match_is_exact() {
    let err = QuestionDraft::new("science", "Q?", ["a", "b"], "a").build().expect_err("lowercase label");
    assert!(err.problems()[0].contains("not admissible"));
  }

  #[test]
  fn correctness_ignores_case_and_padding() {
    let q = draft().build().expect("valid question");
    assert!(q.is_correct("  wATer \n"));
    assert!(!q.is_correct("Salt"));
  }

  #[test]
  fn json_representation_reconstructs_the_same_question() {
    let q = draft().explanation("Two hydrogens, one oxygen.").difficulty("easy").build().expect("valid");
    let text = serde_json::to_string(&q).expect("serialize");
    assert!(text.contains("\"question\":\"What is H2O?\""));
    assert!(text.contains("\"difficulty\":\"easy\""));
    let back: Question = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(back, q);
  }

  #[test]
  fn deserialization_validates() {
    let raw = r#"{"category":"Science","question":"Q?","options":["a","b"],"answer":"c"}"#;
    let err = serde_json::from_str::<Question>(raw).expect_err("answer not in options");
    assert!(err.to_string().contains("must exactly match"));
  }

  #[test]
  fn preview_truncates_long_prompts() {
    let q = QuestionDraft::new("History", &"x".repeat(80), ["a", "b"], "a").build().expect("valid");
    let p = q.preview(60);
    assert_eq!(p.chars().count(), 60);
    assert!(p.ends_with("..."));
  }
}
