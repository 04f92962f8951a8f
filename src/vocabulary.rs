use crate::rules::Rules;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;

static WORDS_DIR: Dir = include_dir!("src/words");

/// An embedded word list as shipped: `{ name, size, words }`.
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    pub fn new(file_name: &str) -> Self {
        let file = WORDS_DIR
            .get_file(format!("{file_name}.json"))
            .expect("Word list file not found");

        let file_as_str = file
            .contents_utf8()
            .expect("Unable to interpret file as a string");

        from_str(file_as_str).expect("Unable to deserialize word list json")
    }
}

/// Candidate words for one session, already filtered to the configured
/// length bounds. May be empty; spawning degrades to a no-op then.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub name: String,
    words: Vec<String>,
}

impl Vocabulary {
    pub fn from_list(list: WordList, rules: &Rules) -> Self {
        let words = list
            .words
            .into_iter()
            .filter(|w| {
                let len = w.chars().count();
                len >= rules.min_word_length && len <= rules.max_word_length
            })
            .collect();
        Self {
            name: list.name,
            words,
        }
    }

    /// Test-friendly constructor taking the words as-is.
    pub fn from_words<I, S>(name: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Uniform random pick, with replacement across calls.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
