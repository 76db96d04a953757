//! # Clause Segmentation Module
//!
//! ## Purpose
//! Splits raw document text into an ordered sequence of clause units using
//! structural delimiters, with paragraph and sentence fallbacks.
//!
//! ## Input/Output Specification
//! - **Input**: Raw document text
//! - **Output**: Ordered `ClauseUnit` sequence covering the entire text
//! - **Invariant**: Unit spans are contiguous; concatenating all unit texts
//!   reconstructs the input exactly, no character lost or duplicated
//!
//! ## Key Features
//! - Structural pass over enumerated/headed section markers at line starts
//! - Paragraph-boundary fallback, then sentence-boundary fallback with an
//!   abbreviation guard
//! - Whitespace-only remainders merge into the preceding unit instead of
//!   producing an empty trailing clause

use crate::config::SegmentationConfig;
use crate::Span;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// One clause: a contiguous, human-meaningful segment of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseUnit {
    /// 0-based position in document order
    pub index: usize,
    /// Exact source slice for this unit
    pub text: String,
    /// Plain-language rewrite, populated by the orchestrator
    pub simplified: Option<String>,
    /// Location in the source text
    pub span: Span,
}

/// Enumerated/headed section markers at line starts: "1.", "1.2", "(a)",
/// "A.", "Section 3", "Article IV"
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:(?:Section|SECTION|Article|ARTICLE)\s+(?:\d+|[IVXLC]+)|\d+(?:\.\d+)*[.)]|\([a-z0-9]{1,3}\)|[A-Z][.)])\s+",
    )
    .expect("invalid section marker pattern")
});

/// Paragraph gap: a blank (possibly whitespace-carrying) line
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n+").expect("invalid paragraph gap pattern"));

/// Sentence terminator followed by whitespace, allowing closing quotes
static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?]+[)"']*\s+"#).expect("invalid sentence end pattern"));

/// Tokens that end with a period without ending a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "inc", "ltd", "corp", "co", "no", "u.s", "e.g", "i.e", "etc", "vs",
    "sec", "art", "para",
];

/// Structural clause segmenter
pub struct ClauseSegmenter {
    config: SegmentationConfig,
}

impl ClauseSegmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Segment the text into clause units covering every input character.
    ///
    /// Empty input yields exactly one empty unit.
    pub fn segment(&self, text: &str) -> Vec<ClauseUnit> {
        if text.is_empty() {
            return vec![ClauseUnit {
                index: 0,
                text: String::new(),
                simplified: None,
                span: Span::new(0, 0),
            }];
        }

        let cuts = self
            .structural_cuts(text)
            .or_else(|| self.paragraph_cuts(text))
            .or_else(|| self.sentence_cuts(text))
            .unwrap_or_default();

        units_from_cuts(text, &cuts)
    }

    /// Cut points at structural section markers, when enough are present
    fn structural_cuts(&self, text: &str) -> Option<Vec<usize>> {
        let marker_starts: Vec<usize> = MARKER_RE.find_iter(text).map(|m| m.start()).collect();
        if marker_starts.len() < self.config.min_structural_markers {
            return None;
        }

        let mut cuts = marker_starts;
        // A whitespace-only preamble belongs to the first section; real
        // preamble text becomes its own leading unit.
        if cuts[0] != 0 && text[..cuts[0]].trim().is_empty() {
            cuts[0] = 0;
        }
        cuts.retain(|&c| c != 0);
        Some(cuts)
    }

    /// Cut points after paragraph gaps; the gap stays with the preceding unit
    fn paragraph_cuts(&self, text: &str) -> Option<Vec<usize>> {
        let cuts: Vec<usize> = PARAGRAPH_RE
            .find_iter(text)
            .map(|m| m.end())
            .filter(|&end| end < text.len() && !text[end..].trim().is_empty())
            .collect();

        if cuts.is_empty() {
            None
        } else {
            Some(cuts)
        }
    }

    /// Cut points at sentence boundaries, grouped into minimum-size units
    fn sentence_cuts(&self, text: &str) -> Option<Vec<usize>> {
        let mut cuts = Vec::new();
        let mut unit_start = 0usize;

        for m in SENTENCE_RE.find_iter(text) {
            if is_abbreviation_boundary(text, m.start()) {
                continue;
            }
            let end = m.end();
            if end >= text.len() || text[end..].trim().is_empty() {
                break;
            }
            // Group short sentences together until the unit is substantial
            if end - unit_start >= self.config.min_clause_chars {
                cuts.push(end);
                unit_start = end;
            }
        }

        if cuts.is_empty() {
            None
        } else {
            Some(cuts)
        }
    }
}

/// Whether the sentence terminator at `punct_start` actually ends an
/// abbreviation or a numbered label rather than a sentence
fn is_abbreviation_boundary(text: &str, punct_start: usize) -> bool {
    let before = &text[..punct_start];
    let token = before
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    if token.is_empty() {
        return false;
    }

    let lowered = token.trim_matches('.').to_lowercase();
    if ABBREVIATIONS.contains(&lowered.as_str()) {
        return true;
    }
    // Single letters ("A.") and bare numbers ("3.") are labels, not endings
    token.len() == 1 || token.chars().all(|c| c.is_ascii_digit())
}

/// Build contiguous units from ascending interior cut points
fn units_from_cuts(text: &str, cuts: &[usize]) -> Vec<ClauseUnit> {
    let mut boundaries = Vec::with_capacity(cuts.len() + 2);
    boundaries.push(0);
    boundaries.extend(cuts.iter().copied().filter(|&c| c > 0 && c < text.len()));
    boundaries.push(text.len());
    boundaries.dedup();

    boundaries
        .windows(2)
        .enumerate()
        .map(|(index, w)| ClauseUnit {
            index,
            text: text[w[0]..w[1]].to_string(),
            simplified: None,
            span: Span::new(w[0], w[1]),
        })
        .collect()
}
