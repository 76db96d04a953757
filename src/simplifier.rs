//! # Text Simplification Module
//!
//! ## Purpose
//! Rewrites a text unit (full document or single clause) into plainer
//! English by applying the registry's replacement table and a fixed set of
//! sentence-shortening heuristics.
//!
//! ## Input/Output Specification
//! - **Input**: A text unit
//! - **Output**: Simplified text; equals the input when nothing matches
//! - **Idempotence**: Re-running on already-simplified text that contains no
//!   further registry phrases returns it unchanged
//!
//! ## Key Features
//! - Longest-match-first, case-insensitive, whole-phrase replacement
//! - First-applied-wins span claiming, so replacement text is never
//!   re-matched by a shorter overlapping rule
//! - Over-long sentences split at coordinating-conjunction boundaries

use crate::config::SimplificationConfig;
use crate::registry::PatternRegistry;
use crate::utils::TextUtils;
use crate::Span;
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// Sentence terminator followed by whitespace, allowing closing quotes
static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?]+[)"']*\s+"#).expect("invalid sentence end pattern"));

/// Coordinating-conjunction boundaries usable as split points
static CONJUNCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s+(?:and|but|or)\s+|;\s+").expect("invalid conjunction pattern"));

/// Registry-driven plain-language rewriter
pub struct TextSimplifier {
    registry: Arc<PatternRegistry>,
    config: SimplificationConfig,
}

impl TextSimplifier {
    pub fn new(registry: Arc<PatternRegistry>, config: SimplificationConfig) -> Self {
        Self { registry, config }
    }

    /// Simplify one text unit. Never fails; returns the input unchanged when
    /// no rule or heuristic applies.
    pub fn simplify(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let replaced = self.apply_replacements(text);
        if self.config.enable_sentence_splitting {
            self.shorten_sentences(&replaced)
        } else {
            replaced
        }
    }

    /// Phrase pass: rules arrive longest-first from the registry; each match
    /// claims its span so later (shorter) rules cannot rewrite inside it.
    fn apply_replacements(&self, text: &str) -> String {
        let mut claimed: Vec<Span> = Vec::new();
        let mut edits: Vec<(Span, String)> = Vec::new();

        for rule in self.registry.replacements() {
            for m in rule.regex.find_iter(text) {
                let span = Span::new(m.start(), m.end());
                if claimed.iter().any(|c| c.overlaps(&span)) {
                    continue;
                }
                claimed.push(span);
                edits.push((span, preserve_leading_case(m.as_str(), &rule.plain)));
            }
        }

        if edits.is_empty() {
            return text.to_string();
        }

        edits.sort_by_key(|(span, _)| span.start);

        let mut out = String::with_capacity(text.len());
        let mut pos = 0;
        for (span, replacement) in edits {
            out.push_str(&text[pos..span.start]);
            out.push_str(&replacement);
            pos = span.end;
        }
        out.push_str(&text[pos..]);
        out
    }

    /// Shortening pass: sentences above the configured word count are split
    /// at conjunction boundaries.
    fn shorten_sentences(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut start = 0;

        for m in SENTENCE_END_RE.find_iter(text) {
            out.push_str(&self.shorten_one(&text[start..m.end()]));
            start = m.end();
        }
        out.push_str(&self.shorten_one(&text[start..]));
        out
    }

    fn shorten_one(&self, sentence: &str) -> String {
        if TextUtils::word_count(sentence) <= self.config.max_sentence_words {
            return sentence.to_string();
        }

        let mut out = String::with_capacity(sentence.len());
        let mut pos = 0;
        let mut capitalize_next = false;

        for m in CONJUNCTION_RE.find_iter(sentence) {
            push_chunk(&mut out, &sentence[pos..m.start()], capitalize_next);
            out.push_str(". ");
            capitalize_next = true;
            pos = m.end();
        }
        push_chunk(&mut out, &sentence[pos..], capitalize_next);
        out
    }
}

/// Append a chunk, optionally capitalizing its first alphabetic character
fn push_chunk(out: &mut String, chunk: &str, capitalize: bool) {
    if !capitalize {
        out.push_str(chunk);
        return;
    }
    let mut chars = chunk.chars();
    match chars.next() {
        Some(first) => {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
        None => {}
    }
}

/// Carry the matched surface's leading capitalization onto the replacement
fn preserve_leading_case(surface: &str, plain: &str) -> String {
    let surface_upper = surface
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(false);
    if !surface_upper {
        return plain.to_string();
    }

    let mut chars = plain.chars();
    match chars.next() {
        Some(first) => {
            let mut s: String = first.to_uppercase().collect();
            s.push_str(chars.as_str());
            s
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simplifier() -> TextSimplifier {
        TextSimplifier::new(
            Arc::new(PatternRegistry::builtin().unwrap()),
            SimplificationConfig::default(),
        )
    }

    #[test]
    fn test_empty_and_unmatched_input_unchanged() {
        let s = simplifier();
        assert_eq!(s.simplify(""), "");
        let plain = "The tenant pays rent monthly.";
        assert_eq!(s.simplify(plain), plain);
    }

    #[test]
    fn test_basic_replacement() {
        let s = simplifier();
        let out = s.simplify("Payment is due pursuant to the schedule.");
        assert_eq!(out, "Payment is due according to the schedule.");
    }

    #[test]
    fn test_leading_case_preserved() {
        let s = simplifier();
        let out = s.simplify("Whereas the parties wish to cooperate.");
        assert_eq!(out, "Since the parties wish to cooperate.");
    }

    #[test]
    fn test_compound_phrase_wins_over_substrings() {
        let s = simplifier();
        let out = s.simplify("The vendor shall indemnify and hold harmless the client.");
        assert_eq!(
            out,
            "The vendor shall protect the other side from legal claims and losses the client."
        );
        // Neither substring rule fired inside the compound span
        assert!(!out.contains("protect from legal claims"));
        assert!(!out.contains("protect from responsibility"));
    }

    #[test]
    fn test_single_rules_fire_outside_compound() {
        let s = simplifier();
        let out = s.simplify("One party may indemnify the other.");
        assert_eq!(out, "One party may protect from legal claims the other.");
    }

    #[test]
    fn test_idempotent_on_simplified_text() {
        let s = simplifier();
        let once = s.simplify(
            "Notwithstanding the foregoing, the licensee shall be entitled to retain copies \
             pursuant to the records policy.",
        );
        let twice = s.simplify(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_long_sentence_split_at_conjunction() {
        let s = simplifier();
        let text = "The supplier delivers all goods to the warehouse on the first business day \
                    of every calendar month without exception, and the buyer inspects each \
                    delivery within five days of its arrival at the dock.";
        let out = s.simplify(text);

        assert!(out.contains(". The buyer inspects"));
        assert!(!out.contains(", and the buyer"));
        // Splitting is itself idempotent
        assert_eq!(s.simplify(&out), out);
    }

    #[test]
    fn test_short_sentences_untouched() {
        let s = simplifier();
        let text = "The buyer pays promptly, and the seller delivers quickly.";
        assert_eq!(s.simplify(text), text);
    }

    #[test]
    fn test_splitting_can_be_disabled() {
        let config = SimplificationConfig {
            max_sentence_words: 5,
            enable_sentence_splitting: false,
        };
        let s = TextSimplifier::new(Arc::new(PatternRegistry::builtin().unwrap()), config);
        let text = "Alpha beta gamma delta epsilon zeta eta, and theta iota kappa.";
        assert_eq!(s.simplify(text), text);
    }
}
