/// Spelled-out English numbers recognised in search phrases, with their digit form.
pub const NUMBER_WORDS: &[(&str, &str)] = &[
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
    ("thirty", "30"),
    ("forty", "40"),
    ("fifty", "50"),
    ("hundred", "100"),
];

/// Tokens that mark an adjacent number as a unit count.
/// Shared by pack detection in phrases and pack matching in listing titles.
pub const PACK_INDICATORS: &[&str] = &[
    "pack", "pk", "pck", "count", "ct", "cnt", "pcs", "piece", "pc", "unit", "un", "x",
];

/// Words left dangling at the edges of a phrase once the pack phrase is cut out.
pub const EDGE_CONNECTORS: &[&str] = &["of", "a", "an", "the", "for"];

pub fn number_word_digits(word: &str) -> Option<&'static str> {
    let word = word.to_lowercase();
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, digits)| *digits)
}

#[test]
fn test_number_word_digits() {
    assert_eq!(number_word_digits("sixteen"), Some("16"));
    assert_eq!(number_word_digits("Twenty"), Some("20"));
    assert_eq!(number_word_digits("HUNDRED"), Some("100"));
    assert_eq!(number_word_digits("sixty"), None);
    assert_eq!(number_word_digits(""), None);
}
