use crate::data_models::ListingSummary;
use crate::query_interpreter::PackIntent;
use crate::vocabulary::PACK_INDICATORS;

pub type FilteredResults = Vec<ListingSummary>;

/// Keeps the listings whose titles agree with a pack intent.
///
/// Quantities are matched as whole numbers ("16" never matches inside "160" or "1600"),
/// indicators as plain substrings of the lower-cased title so "16-Pk" and "16pcs" both pass.
pub struct ResultFilter {
    indicators: Vec<String>,
}

impl ResultFilter {
    pub fn new<I, S>(indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indicators: indicators
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .collect(),
        }
    }

    pub fn filter(&self, results: Vec<ListingSummary>, pack_intent: &PackIntent) -> FilteredResults {
        let total = results.len();
        let quantity = pack_intent
            .quantity()
            .filter(|_| pack_intent.is_present())
            .map(|q| q.to_string());

        let filtered: FilteredResults = results
            .into_iter()
            .filter(|listing| match &quantity {
                Some(quantity) => self.matches_pack(&listing.title, quantity),
                None => true,
            })
            .filter(ListingSummary::is_renderable)
            .collect();

        log::debug!(
            "kept {} of {} listings for pack intent {:?}",
            filtered.len(),
            total,
            pack_intent.quantity()
        );
        filtered
    }

    fn matches_pack(&self, title: &str, quantity: &str) -> bool {
        let title = title.to_lowercase();
        contains_whole_number(&title, quantity)
            && self.indicators.iter().any(|i| title.contains(i.as_str()))
    }
}

impl Default for ResultFilter {
    fn default() -> Self {
        Self::new(PACK_INDICATORS.iter().copied())
    }
}

fn is_decimal_separator(byte: u8) -> bool {
    byte == b'.' || byte == b','
}

/// True when `number` occurs in `text` as a number of its own: no ASCII digit directly
/// before or after it, and not one side of a decimal such as the "16" in "$16.99".
pub fn contains_whole_number(text: &str, number: &str) -> bool {
    if number.is_empty() {
        return false;
    }
    let bytes = text.as_bytes();
    let digit_at = |idx: usize| bytes.get(idx).is_some_and(u8::is_ascii_digit);
    text.match_indices(number).any(|(start, matched)| {
        let end = start + matched.len();
        let digit_before = start > 0 && digit_at(start - 1);
        let digit_after = digit_at(end);
        let decimal_before =
            start > 1 && is_decimal_separator(bytes[start - 1]) && digit_at(start - 2);
        let decimal_after =
            bytes.get(end).is_some_and(|b| is_decimal_separator(*b)) && digit_at(end + 1);
        !digit_before && !digit_after && !decimal_before && !decimal_after
    })
}

/// Filters `results` against `pack_intent` using the default pack-indicator vocabulary.
pub fn filter(results: Vec<ListingSummary>, pack_intent: &PackIntent) -> FilteredResults {
    ResultFilter::default().filter(results, pack_intent)
}

#[test]
fn test_contains_whole_number() {
    assert!(contains_whole_number("16 pack", "16"));
    assert!(contains_whole_number("pack of 16", "16"));
    assert!(contains_whole_number("16-pack", "16"));
    assert!(contains_whole_number("16pk", "16"));
    assert!(contains_whole_number("(16)", "16"));
    assert!(contains_whole_number("160 and 16 count", "16"));

    assert!(!contains_whole_number("160-pack", "16"));
    assert!(!contains_whole_number("116 ct", "16"));
    assert!(!contains_whole_number("1600", "16"));
    assert!(!contains_whole_number("no numbers", "16"));
    assert!(!contains_whole_number("16", ""));

    assert!(!contains_whole_number("8 pack $16.99", "16"));
    assert!(!contains_whole_number("1,16 eur", "16"));
    assert!(!contains_whole_number("$9.16", "16"));
    assert!(contains_whole_number("16, pack", "16"));
    assert!(contains_whole_number("pack of 16.", "16"));
    assert!(contains_whole_number("$9.99, 16 pack", "16"));
}
