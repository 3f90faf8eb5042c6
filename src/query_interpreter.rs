use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::sync::OnceLock;

use crate::analyzer::{
    EdgeConnectorFilter, LowerCaseTokenFilter, PunctuationStripFilter, SpelledNumberFilter,
    TextAnalyzer, TextToken, WhiteSpaceTokenizer,
};
use crate::vocabulary::PACK_INDICATORS;

static DEFAULT_INTERPRETER: OnceLock<QueryInterpreter> = OnceLock::new();

/// A requested multi-unit quantity ("16 pack") found in a search phrase.
///
/// Either absent, or present with a positive quantity. An absent intent turns
/// pack filtering off downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackIntent {
    present: bool,
    quantity: Option<u32>,
}

impl PackIntent {
    pub fn none() -> Self {
        Self {
            present: false,
            quantity: None,
        }
    }

    /// Returns `None` for a zero quantity.
    pub fn of(quantity: u32) -> Option<Self> {
        (quantity > 0).then_some(Self {
            present: true,
            quantity: Some(quantity),
        })
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn quantity(&self) -> Option<u32> {
        self.quantity
    }
}

impl Default for PackIntent {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretedQuery {
    pub original_phrase: String,
    pub api_query: String,
    pub pack_intent: PackIntent,
}

impl InterpretedQuery {
    fn pass_through(phrase: &str) -> Self {
        Self {
            original_phrase: phrase.to_string(),
            api_query: phrase.to_string(),
            pack_intent: PackIntent::none(),
        }
    }
}

/// Product-category rewrite applied to the base phrase once a pack intent is found.
///
/// `phrase_terms` are the lower-cased, punctuation-stripped words of the original phrase.
/// Returning `None` leaves the base phrase as it is.
pub trait Disambiguator: Send + Sync {
    fn disambiguate(&self, base_phrase: &str, phrase_terms: &[TextToken]) -> Option<String>;
}

/// Qualifies a bare "batteries" with the cell size mentioned in the phrase.
/// "aaa" wins over "aa" when both are mentioned.
pub struct BatterySizeDisambiguator;

impl BatterySizeDisambiguator {
    const CELL_SIZES: [(&'static str, &'static str); 2] =
        [("aaa", "AAA batteries"), ("aa", "AA batteries")];

    fn is_cell_size(word: &str) -> bool {
        Self::CELL_SIZES.iter().any(|(size, _)| *size == word)
    }
}

impl Disambiguator for BatterySizeDisambiguator {
    fn disambiguate(&self, base_phrase: &str, phrase_terms: &[TextToken]) -> Option<String> {
        // a size already sitting in the base phrase is folded into the rewrite
        let nouns = base_phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|w| !Self::is_cell_size(w))
            .collect::<Vec<String>>();
        if nouns != ["batteries"] {
            return None;
        }

        Self::CELL_SIZES
            .iter()
            .find(|(size, _)| phrase_terms.iter().any(|t| t.term == *size))
            .map(|(_, rewrite)| rewrite.to_string())
    }
}

/// Turns a spoken search phrase into an upstream keyword query and an optional pack intent.
pub struct QueryInterpreter {
    normalizer: TextAnalyzer,
    phrase_terms: TextAnalyzer,
    pack_pattern: Regex,
    disambiguators: Vec<Box<dyn Disambiguator>>,
}

impl QueryInterpreter {
    pub fn new(disambiguators: Vec<Box<dyn Disambiguator>>) -> Self {
        let indicators = PACK_INDICATORS.join("|");
        let pack_pattern = Regex::new(&format!(r"(?i)\b([0-9]+)\s*(?:{indicators})(?:s|es)?\b"))
            .expect("pack pattern is valid");

        Self {
            normalizer: TextAnalyzer::new(
                vec![Box::new(SpelledNumberFilter)],
                Box::new(WhiteSpaceTokenizer),
                vec![Box::new(EdgeConnectorFilter)],
            ),
            phrase_terms: TextAnalyzer::new(
                Vec::new(),
                Box::new(WhiteSpaceTokenizer),
                vec![
                    Box::new(PunctuationStripFilter::default()),
                    Box::new(LowerCaseTokenFilter),
                ],
            ),
            pack_pattern,
            disambiguators,
        }
    }

    pub fn with_disambiguator(mut self, disambiguator: Box<dyn Disambiguator>) -> Self {
        self.disambiguators.push(disambiguator);
        self
    }

    /// First pack phrase in `normalized`, with its byte span.
    fn detect_pack(&self, normalized: &str) -> Option<(PackIntent, Range<usize>)> {
        let caps = self.pack_pattern.captures(normalized)?;
        let span = caps.get(0)?.range();
        let quantity = caps.get(1)?.as_str().parse::<u32>().ok()?;
        Some((PackIntent::of(quantity)?, span))
    }

    pub fn interpret(&self, phrase: &str) -> InterpretedQuery {
        let normalized = self.normalizer.char_filter(phrase.to_string());

        let Some((pack_intent, span)) = self.detect_pack(&normalized) else {
            log::debug!("no pack phrase in {phrase:?}");
            return InterpretedQuery::pass_through(phrase);
        };

        let remainder = format!("{}{}", &normalized[..span.start], &normalized[span.end..]);
        let tokens = self
            .normalizer
            .token_filter(self.normalizer.tokenize(remainder));
        let base_phrase = TextAnalyzer::join_terms(&tokens);

        if base_phrase.is_empty() {
            log::debug!("bare pack size in {phrase:?}, passing phrase through");
            return InterpretedQuery::pass_through(phrase);
        }

        let terms = self.phrase_terms.analyze(phrase.to_string());
        let api_query = self
            .disambiguators
            .iter()
            .find_map(|d| d.disambiguate(&base_phrase, &terms))
            .unwrap_or(base_phrase);

        log::debug!(
            "pack of {:?} in {phrase:?}, api query {api_query:?}",
            pack_intent.quantity()
        );
        InterpretedQuery {
            original_phrase: phrase.to_string(),
            api_query,
            pack_intent,
        }
    }
}

impl Default for QueryInterpreter {
    fn default() -> Self {
        Self::new(vec![Box::new(BatterySizeDisambiguator)])
    }
}

/// Interprets `phrase` with the default vocabulary and disambiguation hooks.
pub fn interpret(phrase: &str) -> InterpretedQuery {
    DEFAULT_INTERPRETER
        .get_or_init(QueryInterpreter::default)
        .interpret(phrase)
}
