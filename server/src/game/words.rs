use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use super::{error::GameError, similarity::normalize};

const COUNTRIES: &str = include_str!("../../resources/countries.json");

/// The dataset secret words are drawn from
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Rejects blanks and words that only differ by case or surrounding whitespace,
    /// so sampled words are always distinct to players
    pub fn new(words: Vec<String>) -> Result<Self, GameError> {
        let mut seen = HashSet::new();
        for word in &words {
            let normalized = normalize(word);
            if normalized.is_empty() {
                return Err(GameError::InvalidWordList("blank word".into()));
            }
            if !seen.insert(normalized) {
                return Err(GameError::InvalidWordList(format!("duplicate word '{}'", word)));
            }
        }

        Ok(WordList { words })
    }

    /// Parses a JSON array of strings, validated like [WordList::new]
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let words: Vec<String> =
            serde_json::from_str(json).map_err(|e| GameError::InvalidWordList(e.to_string()))?;

        Self::new(words)
    }

    /// The bundled list of countries
    pub fn countries() -> Result<Self, GameError> {
        Self::from_json(COUNTRIES)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Looks a word up ignoring case and surrounding whitespace, returning the dataset spelling
    pub fn find(&self, word: &str) -> Option<&str> {
        let needle = normalize(word);

        self.words
            .iter()
            .find(|candidate| normalize(candidate) == needle)
            .map(String::as_str)
    }

    /// Draws `count` pairwise distinct words, without replacement
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Result<Vec<String>, GameError> {
        if count > self.words.len() {
            return Err(GameError::NotEnoughWords {
                requested: count,
                available: self.words.len(),
            });
        }

        Ok(self.words.choose_multiple(rng, count).cloned().collect())
    }
}
