//! Built-in default question bank.

use tracing::error;

use crate::bank::QuestionBank;
use crate::domain::{Question, QuestionDraft};

/// Hand-authored drafts backing the default bank.
fn seed_drafts() -> Vec<QuestionDraft> {
  vec![
    QuestionDraft::new(
      "History",
      "Which empire built the Machu Picchu complex in Peru?",
      ["Aztec Empire", "Inca Empire", "Maya Civilization", "Toltec Empire"],
      "Inca Empire",
    )
    .explanation("Machu Picchu was constructed by the Inca Empire in the 15th century."),
    QuestionDraft::new(
      "Science",
      "What is the heaviest naturally occurring element on Earth?",
      ["Uranium", "Osmium", "Plutonium", "Lead"],
      "Uranium",
    )
    .explanation("Uranium (atomic number 92) is the heaviest element found in significant quantities in nature."),
    QuestionDraft::new(
      "Geography",
      "Which African country has the largest population?",
      ["Nigeria", "Egypt", "Ethiopia", "South Africa"],
      "Nigeria",
    )
    .explanation("Nigeria has the largest population on the African continent, exceeding 200 million people."),
    QuestionDraft::new(
      "Sports",
      "How many players are on the field for one team in a standard rugby union match?",
      ["11", "13", "15", "18"],
      "15",
    )
    .explanation("Rugby union features 15 players per side on the field at any one time."),
    QuestionDraft::new(
      "Entertainment",
      "Who composed the film score for 'Star Wars: A New Hope'?",
      ["John Williams", "Hans Zimmer", "James Horner", "Danny Elfman"],
      "John Williams",
    )
    .explanation("John Williams composed the score, earning an Academy Award for Best Original Score."),
    QuestionDraft::new(
      "Literature",
      "Which novel begins with the line, 'Call me Ishmael'?",
      ["Moby-Dick", "Great Expectations", "Invisible Man", "The Old Man and the Sea"],
      "Moby-Dick",
    )
    .explanation("Herman Melville opens 'Moby-Dick' with the line 'Call me Ishmael.'"),
    QuestionDraft::new(
      "Technology",
      "What does the acronym 'HTTP' stand for?",
      [
        "HyperText Transfer Protocol",
        "High Transmission Text Process",
        "Hyperlink Transfer Program",
        "Host Transfer Text Protocol",
      ],
      "HyperText Transfer Protocol",
    )
    .explanation("HTTP is the HyperText Transfer Protocol, the foundation of data exchange on the web."),
    QuestionDraft::new(
      "Art",
      "Which painter created the artwork 'The Persistence of Memory'?",
      ["Salvador Dalí", "Pablo Picasso", "Frida Kahlo", "Henri Matisse"],
      "Salvador Dalí",
    )
    .explanation("Salvador Dalí painted 'The Persistence of Memory' in 1931, featuring melting clocks."),
    QuestionDraft::new(
      "Science",
      "What is the most abundant gas in Earth's atmosphere?",
      ["Oxygen", "Nitrogen", "Carbon Dioxide", "Argon"],
      "Nitrogen",
    )
    .explanation("Nitrogen makes up about 78% of Earth's atmosphere.")
    .difficulty("easy"),
    QuestionDraft::new(
      "History",
      "Who was the first woman to win a Nobel Prize?",
      ["Marie Curie", "Rosalind Franklin", "Jane Addams", "Ada Lovelace"],
      "Marie Curie",
    )
    .explanation("Marie Curie won the Nobel Prize in Physics in 1903 and in Chemistry in 1911.")
    .difficulty("easy"),
    QuestionDraft::new(
      "Geography",
      "Which river flows through the city of Paris?",
      ["Seine", "Danube", "Rhine", "Loire"],
      "Seine",
    )
    .explanation("Paris is situated on the banks of the River Seine.")
    .difficulty("easy"),
    QuestionDraft::new(
      "Entertainment",
      "Which actor played the character of Jack Dawson in 'Titanic'?",
      ["Leonardo DiCaprio", "Brad Pitt", "Matt Damon", "Johnny Depp"],
      "Leonardo DiCaprio",
    )
    .explanation("Leonardo DiCaprio portrayed Jack Dawson alongside Kate Winslet in the 1997 film.")
    .difficulty("easy"),
    QuestionDraft::new(
      "Sports",
      "What is the only country to have played in every FIFA World Cup tournament?",
      ["Brazil", "Germany", "Italy", "Argentina"],
      "Brazil",
    )
    .explanation("Brazil has qualified for every FIFA World Cup since the tournament began in 1930."),
    QuestionDraft::new(
      "Technology",
      "Which company developed the video game console 'Switch'?",
      ["Nintendo", "Sony", "Microsoft", "Sega"],
      "Nintendo",
    )
    .explanation("Nintendo launched the hybrid console 'Switch' in 2017."),
    QuestionDraft::new(
      "Literature",
      "Who wrote the fantasy series 'A Song of Ice and Fire'?",
      ["George R.R. Martin", "J.R.R. Tolkien", "Patrick Rothfuss", "C.S. Lewis"],
      "George R.R. Martin",
    )
    .explanation("George R.R. Martin authored the series that inspired HBO's 'Game of Thrones.'"),
  ]
}

/// Built-in questions that make the game playable without config or a model.
pub fn seed_questions() -> Vec<Question> {
  seed_drafts()
    .into_iter()
    .filter_map(|draft| {
      let preview = draft.question.clone();
      match draft.build() {
        Ok(q) => Some(q),
        Err(e) => {
          error!(target: "trivia", question = %preview, error = %e, "Skipping invalid seed question");
          None
        }
      }
    })
    .collect()
}

pub fn default_bank() -> QuestionBank {
  seed_questions().into_iter().collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Category, Difficulty};

  #[test]
  fn every_seed_is_valid() {
    for draft in seed_drafts() {
      let prompt = draft.question.clone();
      draft.build().unwrap_or_else(|e| panic!("seed '{prompt}' invalid: {e}"));
    }
  }

  #[test]
  fn default_bank_spans_all_categories_and_two_tiers() {
    let bank = default_bank();
    assert_eq!(bank.len(), 15);
    let mut cats = bank.categories();
    cats.sort();
    assert_eq!(cats, Category::ALL.to_vec());
    let diffs = bank.difficulty_counts();
    assert_eq!(diffs.get(&Difficulty::Easy), Some(&4));
    assert_eq!(diffs.get(&Difficulty::Medium), Some(&11));
    assert_eq!(bank.category_counts()[&Category::Science], 2);
  }
}
