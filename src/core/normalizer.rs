//! Text Normalization
//!
//! Cleans raw utterances before glyph mapping. Runs the grammar-correction
//! model, then deduplicates near-identical phrases from its output. The model
//! is prone to repeating or hallucinating phrases, so the similarity dedup and
//! the length-sanity guards here carry the output quality of the whole
//! service. Correction is best-effort: on any anomaly the original input is
//! returned unchanged.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use strsim::normalized_levenshtein;
use tracing::{debug, warn};

use crate::core::grammar::GrammarModel;

lazy_static! {
    /// Leading "Text:" label some models echo back
    static ref LABEL_RE: Regex = Regex::new(r"(?i)^(text:)\s*").unwrap();
    /// Runs of `=` the model emits as separators
    static ref EQUALS_RE: Regex = Regex::new(r"={2,}").unwrap();
    /// Whitespace runs
    static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    /// Sentence-ending punctuation (plus commas) delimiting phrases
    static ref PHRASE_SPLIT_RE: Regex = Regex::new(r"[.؟!?,]+").unwrap();
}

/// Similarity above which two phrases are considered the same
const DUPLICATE_SIMILARITY: f64 = 0.8;

/// Fraction of the shorter phrase's words that must be shared for a duplicate
const SHARED_WORD_FRACTION: f64 = 0.7;

/// Normalizes input text via grammar correction and phrase deduplication
pub struct Normalizer {
    grammar: Arc<dyn GrammarModel>,
    max_len: usize,
}

impl Normalizer {
    /// Create a normalizer over the given correction model
    pub fn new(grammar: Arc<dyn GrammarModel>, max_len: usize) -> Self {
        Self { grammar, max_len }
    }

    /// Normalize text, falling back to the input on any anomaly
    pub async fn normalize(&self, text: &str) -> String {
        let input = text.trim();

        // Short inputs are assumed already clean; running single words or
        // names through the model tends to mangle them.
        if is_short_clean(input) {
            return input.to_string();
        }

        let corrected = match self.grammar.correct(input, self.max_len).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Grammar correction failed: {}", e);
                return input.to_string();
            }
        };
        debug!("Model output: {:?}", corrected);

        // Runaway output: the model sometimes loops, repeating itself far
        // past the input length.
        if corrected.chars().count() > input.chars().count() * 3 {
            debug!("Model output too long, using original text");
            return input.to_string();
        }

        let cleaned = clean_model_output(&corrected);
        let phrases = split_phrases(&cleaned);
        let unique = dedup_phrases(phrases);

        let result = unique.join(". ");

        let input_words = input.split_whitespace().count();
        let result_words = result.split_whitespace().count();
        if result.is_empty() || result_words > input_words * 2 {
            return input.to_string();
        }

        result
    }
}

/// Whether the input is at most two tokens, each purely alphabetic
/// (punctuation-stripped) or purely numeric
fn is_short_clean(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > 2 {
        return false;
    }
    words.iter().all(|word| {
        let stripped: String = word.chars().filter(|c| *c != ',' && *c != '.').collect();
        let alphabetic = !stripped.is_empty() && stripped.chars().all(|c| c.is_alphabetic());
        let numeric = !word.is_empty() && word.chars().all(|c| c.is_numeric());
        alphabetic || numeric
    })
}

/// Strip model artifacts: leading "Text:" label, `=` separators, extra spaces
fn clean_model_output(text: &str) -> String {
    let text = LABEL_RE.replace(text, "");
    let text = EQUALS_RE.replace_all(&text, "");
    let text = SPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Split cleaned text into trimmed, non-empty phrases
fn split_phrases(text: &str) -> Vec<String> {
    PHRASE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Greedy in-order dedup: a phrase is dropped when it is near-identical to
/// any already-accepted phrase
fn dedup_phrases(phrases: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();

    for phrase in phrases {
        let is_duplicate = unique.iter().any(|kept| phrases_match(&phrase, kept));
        if !is_duplicate {
            unique.push(phrase);
        }
    }

    unique
}

/// Case-insensitive near-identity between two phrases
fn phrases_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if normalized_levenshtein(&a, &b) > DUPLICATE_SIMILARITY {
        return true;
    }

    if a.contains(&b) || b.contains(&a) {
        return true;
    }

    let a_words: std::collections::HashSet<&str> = a.split_whitespace().collect();
    let b_words: std::collections::HashSet<&str> = b.split_whitespace().collect();
    let shared = a_words.intersection(&b_words).count();
    let shorter = a_words.len().min(b_words.len());

    shorter > 0 && shared as f64 > shorter as f64 * SHARED_WORD_FRACTION
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    /// Grammar stub returning a fixed string
    struct FixedGrammar(String);

    #[async_trait]
    impl GrammarModel for FixedGrammar {
        async fn correct(&self, _text: &str, _max_len: usize) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    /// Grammar stub that always fails
    struct FailingGrammar;

    #[async_trait]
    impl GrammarModel for FailingGrammar {
        async fn correct(&self, _text: &str, _max_len: usize) -> Result<String> {
            Err(anyhow!("model unavailable"))
        }
    }

    fn normalizer(grammar: impl GrammarModel + 'static) -> Normalizer {
        Normalizer::new(Arc::new(grammar), 150)
    }

    #[tokio::test]
    async fn test_short_input_unchanged() {
        // The model would "correct" these, so it must never see them
        let n = normalizer(FixedGrammar("MANGLED".to_string()));
        assert_eq!(n.normalize("hello").await, "hello");
        assert_eq!(n.normalize("hello world").await, "hello world");
        assert_eq!(n.normalize("  route 66  ").await, "route 66");
        assert_eq!(n.normalize("yes,").await, "yes,");
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let n = normalizer(FailingGrammar);
        assert_eq!(
            n.normalize("this are a long broken sentence here").await,
            "this are a long broken sentence here"
        );
    }

    #[tokio::test]
    async fn test_repeated_phrases_deduplicated() {
        let n = normalizer(FixedGrammar(
            "the cat sat. the cat sat. dogs run".to_string(),
        ));
        let out = n.normalize("the cat sat the cat sat dogs run").await;
        assert_eq!(out, "the cat sat. dogs run");
    }

    #[tokio::test]
    async fn test_label_and_separators_stripped() {
        let n = normalizer(FixedGrammar("Text: she walks   home ===".to_string()));
        let out = n.normalize("she walk home today okay").await;
        assert_eq!(out, "she walks home");
    }

    #[tokio::test]
    async fn test_runaway_word_count_falls_back() {
        // Word count more than double the input triggers the sanity guard
        let n = normalizer(FixedGrammar(
            "one two three four five six seven".to_string(),
        ));
        assert_eq!(n.normalize("fix this mess").await, "fix this mess");
    }

    #[tokio::test]
    async fn test_runaway_char_length_falls_back() {
        // Over triple the input length in characters, even as a single word
        let n = normalizer(FixedGrammar(
            "abcdefghabcdefghabcdefghabcdefghabcdefgh".to_string(),
        ));
        assert_eq!(n.normalize("abc def ghi").await, "abc def ghi");
    }

    #[tokio::test]
    async fn test_runaway_guard_counts_chars_not_bytes() {
        // 17 chars but 32 bytes of output for a 9-char input: within the
        // triple-length bound, so it must be kept, not misjudged as runaway
        let n = normalizer(FixedGrammar("ééééé ééééé ééééé".to_string()));
        assert_eq!(n.normalize("ok fix me").await, "ééééé ééééé ééééé");
    }

    #[tokio::test]
    async fn test_empty_model_output_falls_back() {
        let n = normalizer(FixedGrammar("===".to_string()));
        assert_eq!(n.normalize("fix this text please now").await, "fix this text please now");
    }

    #[tokio::test]
    async fn test_never_empty_for_nonempty_input() {
        for stub in ["", ".", "...,,,", "== =="] {
            let n = normalizer(FixedGrammar(stub.to_string()));
            let out = n.normalize("some broken input text here").await;
            assert!(!out.is_empty(), "empty output for model stub {:?}", stub);
        }
    }

    #[test]
    fn test_is_short_clean() {
        assert!(is_short_clean("hello"));
        assert!(is_short_clean("hello world"));
        assert!(is_short_clean("hello, world."));
        assert!(is_short_clean("42"));
        assert!(!is_short_clean("one two three"));
        assert!(!is_short_clean("a1b"));
        assert!(!is_short_clean("..."));
    }

    #[test]
    fn test_split_phrases() {
        assert_eq!(
            split_phrases("the cat sat. dogs run! birds fly?"),
            vec!["the cat sat", "dogs run", "birds fly"]
        );
        assert_eq!(split_phrases("a,, b.. "), vec!["a", "b"]);
        assert!(split_phrases("...").is_empty());
    }

    #[test]
    fn test_dedup_retains_distinct() {
        let phrases = vec![
            "the cat sat".to_string(),
            "The cat sat".to_string(),
            "dogs run".to_string(),
        ];
        assert_eq!(dedup_phrases(phrases), vec!["the cat sat", "dogs run"]);
    }

    #[test]
    fn test_phrases_match_similarity() {
        assert!(phrases_match("the cat sat", "the cat sat"));
        assert!(phrases_match("the cat sat", "the cat sat down"));
        assert!(phrases_match("she walks home", "she walk home"));
        assert!(!phrases_match("dogs run", "the cat sat"));
    }

    #[test]
    fn test_phrases_match_shared_words() {
        // Different order, same vocabulary
        assert!(phrases_match("home she walks quickly", "walks quickly she home"));
    }
}
