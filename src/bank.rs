//! The question bank: an owned, append-only collection with derived statistics.
//!
//! Statistics are recomputed on every read, so they always reflect prior writes.

use std::collections::BTreeMap;

use crate::domain::{Category, Difficulty, Question};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuestionBank {
  questions: Vec<Question>,
}

impl QuestionBank {
  pub fn add(&mut self, question: Question) {
    self.questions.push(question);
  }

  pub fn extend<I: IntoIterator<Item = Question>>(&mut self, questions: I) {
    self.questions.extend(questions);
  }

  pub fn len(&self) -> usize {
    self.questions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.questions.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Question> {
    self.questions.iter()
  }

  /// Distinct categories in first-seen order.
  pub fn categories(&self) -> Vec<Category> {
    let mut seen = Vec::new();
    for q in &self.questions {
      if !seen.contains(&q.category()) {
        seen.push(q.category());
      }
    }
    seen
  }

  pub fn category_counts(&self) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for q in &self.questions {
      *counts.entry(q.category()).or_insert(0) += 1;
    }
    counts
  }

  pub fn difficulty_counts(&self) -> BTreeMap<Difficulty, usize> {
    let mut counts = BTreeMap::new();
    for q in &self.questions {
      *counts.entry(q.difficulty()).or_insert(0) += 1;
    }
    counts
  }

  /// Fraction of the bank per category. Empty bank yields an empty map.
  pub fn category_proportions(&self) -> BTreeMap<Category, f64> {
    proportions(self.category_counts(), self.len())
  }

  /// Fraction of the bank per difficulty. Empty bank yields an empty map.
  pub fn difficulty_proportions(&self) -> BTreeMap<Difficulty, f64> {
    proportions(self.difficulty_counts(), self.len())
  }
}

fn proportions<K: Ord>(counts: BTreeMap<K, usize>, total: usize) -> BTreeMap<K, f64> {
  if total == 0 {
    return BTreeMap::new();
  }
  counts
    .into_iter()
    .map(|(k, n)| (k, n as f64 / total as f64))
    .collect()
}

impl FromIterator<Question> for QuestionBank {
  fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
    Self { questions: iter.into_iter().collect() }
  }
}

impl<'a> IntoIterator for &'a QuestionBank {
  type Item = &'a Question;
  type IntoIter = std::slice::Iter<'a, Question>;

  fn into_iter(self) -> Self::IntoIter {
    self.questions.iter()
  }
}
