use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Words a Jotto game accepts, all of one length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    word_len: usize,
    words: HashSet<String>,
}

impl Dictionary {
    /// Reads one word per line, keeping only alphabetic words of `word_len` letters.
    pub fn parse(text: &str, word_len: usize) -> Self {
        let words = text
            .lines()
            .map(|line| line.trim().to_ascii_lowercase())
            .filter(|word| word.len() == word_len && word.bytes().all(|b| b.is_ascii_lowercase()))
            .collect();
        Self { word_len, words }
    }

    pub fn load(path: impl AsRef<std::path::Path>, word_len: usize) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            GameError::ResourceUnavailable(format!("{}: {}", path.display(), err))
        })?;
        let dictionary = Self::parse(&text, word_len);
        log::debug!("Loaded {} words from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    pub fn word_len(&self) -> usize {
        self.word_len
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Words in alphabetical order, handy for picking a secret reproducibly.
    pub fn sorted_words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

/// Letters two words share, counting repeated letters as often as both contain them.
pub fn letters_in_common(a: &str, b: &str) -> usize {
    let mut counts = [0usize; 26];
    for byte in a.bytes().filter(u8::is_ascii_lowercase) {
        counts[usize::from(byte - b'a')] += 1;
    }
    let mut common = 0;
    for byte in b.bytes().filter(u8::is_ascii_lowercase) {
        let slot = &mut counts[usize::from(byte - b'a')];
        if *slot > 0 {
            *slot -= 1;
            common += 1;
        }
    }
    common
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub word: String,
    pub common: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Scored(usize),
    Correct,
}

/// Word-guessing game: each guess is told how many letters it shares with the secret.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JottoGame {
    dictionary: Dictionary,
    secret: String,
    guesses: Vec<Guess>,
    won: bool,
}

impl JottoGame {
    pub fn new(dictionary: Dictionary, secret: &str) -> Result<Self> {
        let secret = secret.trim().to_ascii_lowercase();
        if !dictionary.contains(&secret) {
            return Err(GameError::NotInDictionary(secret));
        }
        Ok(Self {
            dictionary,
            secret,
            guesses: Vec::new(),
            won: false,
        })
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Validates and scores `word`. Rejected guesses leave the game untouched.
    pub fn guess(&mut self, word: &str) -> Result<GuessOutcome> {
        if self.won {
            return Err(GameError::AlreadyEnded);
        }

        let word = word.trim().to_ascii_lowercase();
        if !self.dictionary.contains(&word) {
            return Err(GameError::NotInDictionary(word));
        }
        if self.guesses.iter().any(|guess| guess.word == word) {
            return Err(GameError::DuplicateGuess(word));
        }

        let common = letters_in_common(&self.secret, &word);
        let correct = word == self.secret;
        log::trace!("Guess {:?} shares {} letters", word, common);
        self.guesses.push(Guess { word, common });

        if correct {
            self.won = true;
            Ok(GuessOutcome::Correct)
        } else {
            Ok(GuessOutcome::Scored(common))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &str = "crane\nSLATE\nghost\nshort\ntoo\nfive5\n";

    fn game() -> JottoGame {
        JottoGame::new(Dictionary::parse(WORDS, 5), "ghost").unwrap()
    }

    #[test]
    fn dictionary_keeps_words_of_the_right_length() {
        let dictionary = Dictionary::parse(WORDS, 5);
        assert_eq!(dictionary.sorted_words(), ["crane", "ghost", "short", "slate"]);
        assert!(!dictionary.contains("too"));
    }

    #[test]
    fn scores_letters_in_common() {
        assert_eq!(letters_in_common("ghost", "short"), 4);
        assert_eq!(letters_in_common("ghost", "crane"), 0);
        assert_eq!(letters_in_common("aab", "aaa"), 2);
    }

    #[test]
    fn long_words_count_every_shared_letter() {
        let word = "a".repeat(300);
        assert_eq!(letters_in_common(&word, &word), 300);
    }

    #[test]
    fn unknown_word_is_rejected_without_change() {
        let mut game = game();
        assert_eq!(
            game.guess("zzzzz"),
            Err(GameError::NotInDictionary("zzzzz".into()))
        );
        assert!(game.guesses().is_empty());
    }

    #[test]
    fn repeated_guess_is_rejected() {
        let mut game = game();
        assert_eq!(game.guess("Slate").unwrap(), GuessOutcome::Scored(2));
        assert_eq!(
            game.guess("slate"),
            Err(GameError::DuplicateGuess("slate".into()))
        );
        assert_eq!(game.guesses().len(), 1);
    }

    #[test]
    fn guessing_the_secret_wins() {
        let mut game = game();
        assert_eq!(game.guess("ghost").unwrap(), GuessOutcome::Correct);
        assert!(game.is_won());
        assert_eq!(game.guess("short"), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn secret_must_be_a_word() {
        let result = JottoGame::new(Dictionary::parse(WORDS, 5), "xxxxx");
        assert!(matches!(result, Err(GameError::NotInDictionary(_))));
    }
}
