use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::vocabulary::{EDGE_CONNECTORS, NUMBER_WORDS, number_word_digits};

static NUMBER_WORD_PATTERN: OnceLock<Regex> = OnceLock::new();
static EDGE_CONNECTOR_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn get_number_word_pattern() -> &'static Regex {
    NUMBER_WORD_PATTERN.get_or_init(|| {
        let words = NUMBER_WORDS
            .iter()
            .map(|(word, _)| *word)
            .collect::<Vec<&str>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b({words})\b")).expect("number word pattern is valid")
    })
}

fn get_edge_connector_words() -> &'static HashSet<&'static str> {
    EDGE_CONNECTOR_WORDS.get_or_init(|| EDGE_CONNECTORS.iter().copied().collect())
}

/// A character filter receives the original text as a whole and can transform it by adding,
/// removing, or changing characters. For instance, a character filter could be used to turn
/// the spoken "sixteen pack" into "16 pack" before any pattern matching happens.
pub trait CharacterFilter: Send + Sync {
    fn filter(&self, text: String) -> String;
}

/// Replaces whole-word spelled numbers ("one" to "twenty", "thirty", "forty", "fifty",
/// "hundred") with digits. Matching ignores case, the rest of the text keeps its casing.
/// "seventeen" is never read as "seven" followed by "teen".
#[derive(Debug, Default)]
pub struct SpelledNumberFilter;

impl CharacterFilter for SpelledNumberFilter {
    fn filter(&self, text: String) -> String {
        get_number_word_pattern()
            .replace_all(&text, |caps: &Captures| {
                number_word_digits(&caps[1])
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[1].to_string())
            })
            .into_owned()
    }
}

/// A tokenizer receives a stream of characters, breaks it up into individual tokens (usually individual words),
/// and outputs a stream of tokens.
/// For instance, a whitespace tokenizer breaks text into tokens whenever it sees any whitespace.
/// It would convert the text "16 pack  of AA" into the terms [16, pack, of, AA].
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: String) -> Vec<String>;
}

pub struct WhiteSpaceTokenizer;

impl Tokenizer for WhiteSpaceTokenizer {
    fn tokenize(&self, text: String) -> Vec<String> {
        text.split_whitespace()
            .map(|w| w.to_string())
            .collect::<Vec<String>>()
    }
}

/// A token filter receives the token stream and may add, remove, or change tokens.
/// For example, a lowercase token filter converts all tokens to lowercase, and an edge
/// connector filter drops the "of" left hanging in front of "AA batteries".
pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<TextToken>) -> Vec<TextToken>;
}

pub struct LowerCaseTokenFilter;

impl TokenFilter for LowerCaseTokenFilter {
    fn filter(&self, tokens: Vec<TextToken>) -> Vec<TextToken> {
        tokens
            .into_iter()
            .map(|mut t| {
                t.term = t.term.to_lowercase();
                t
            })
            .collect()
    }
}

/// Strips punctuation from tokens and filters out tokens that become empty or are too short
pub struct PunctuationStripFilter {
    min_length: usize,
}

impl PunctuationStripFilter {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Default for PunctuationStripFilter {
    fn default() -> Self {
        Self { min_length: 1 }
    }
}

impl TokenFilter for PunctuationStripFilter {
    fn filter(&self, tokens: Vec<TextToken>) -> Vec<TextToken> {
        tokens
            .into_iter()
            .filter_map(|mut token| {
                let trimmed: String = token
                    .term
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_string();

                if trimmed.len() >= self.min_length && trimmed.chars().any(|c| c.is_alphanumeric())
                {
                    token.term = trimmed;
                    Some(token)
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Drops connector words ("of", "a", "the", ...) from both ends of the token stream.
/// Tokens in the middle are left alone: "pack of cards" keeps its "of".
pub struct EdgeConnectorFilter;

impl EdgeConnectorFilter {
    fn is_connector(token: &TextToken) -> bool {
        get_edge_connector_words().contains(token.term.to_lowercase().as_str())
    }
}

impl TokenFilter for EdgeConnectorFilter {
    fn filter(&self, tokens: Vec<TextToken>) -> Vec<TextToken> {
        let start = tokens
            .iter()
            .position(|t| !Self::is_connector(t))
            .unwrap_or(tokens.len());
        let end = tokens
            .iter()
            .rposition(|t| !Self::is_connector(t))
            .map_or(start, |idx| idx + 1);

        tokens
            .into_iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }
}

/// Pure text analysis pipeline - no async, no I/O, just text transformations
pub struct TextAnalyzer {
    char_filters: Vec<Box<dyn CharacterFilter>>,
    tokenizer: Box<dyn Tokenizer>,
    token_filters: Vec<Box<dyn TokenFilter>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextToken {
    pub term: String,
    pub pos: usize,
}

impl std::ops::Deref for TextToken {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.term
    }
}

impl TextAnalyzer {
    pub fn new(
        char_filters: Vec<Box<dyn CharacterFilter>>,
        tokenizer: Box<dyn Tokenizer>,
        token_filters: Vec<Box<dyn TokenFilter>>,
    ) -> Self {
        Self {
            char_filters,
            tokenizer,
            token_filters,
        }
    }

    pub fn char_filter(&self, mut content: String) -> String {
        for filter in self.char_filters.iter() {
            content = filter.filter(content);
        }
        content
    }

    pub fn tokenize(&self, content: String) -> Vec<TextToken> {
        let tokens = self.tokenizer.tokenize(content);
        tokens
            .into_iter()
            .enumerate()
            .map(|(idx, term)| TextToken { term, pos: idx })
            .collect()
    }

    pub fn token_filter(&self, mut tokens: Vec<TextToken>) -> Vec<TextToken> {
        for filter in self.token_filters.iter() {
            tokens = filter.filter(tokens);
        }
        tokens
    }

    /// Analyzes raw content and returns a list of tokens
    pub fn analyze(&self, raw_content: String) -> Vec<TextToken> {
        let content = self.char_filter(raw_content);
        let tokens = self.tokenize(content);
        self.token_filter(tokens)
    }

    /// Joins analyzed tokens back into a single-spaced phrase.
    pub fn join_terms(tokens: &[TextToken]) -> String {
        tokens
            .iter()
            .map(|t| t.term.as_str())
            .collect::<Vec<&str>>()
            .join(" ")
    }
}
