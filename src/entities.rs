//! # Entity Extraction Module
//!
//! ## Purpose
//! Scans raw text against the registry's entity patterns, producing typed,
//! deduplicated entity records: parties, dates, monetary amounts, defined
//! legal terms.
//!
//! ## Input/Output Specification
//! - **Input**: Raw document text
//! - **Output**: Ordered sequence of `EntityRecord`
//! - **Determinism**: Patterns run in fixed claiming order; a span claimed
//!   by an earlier match is never reassigned to a later pattern
//!
//! ## Key Features
//! - First-match-wins, overlap-free span claiming across kinds and patterns
//! - Canonical normalization (ISO dates, numeric monetary amounts)
//! - Normalization failures degrade to a raw-surface record, never an error
//! - Deduplication by (kind, normalized-or-raw value), first-seen order

use crate::registry::{EntityKind, Normalizer, PatternRegistry};
use crate::utils::TextUtils;
use crate::Span;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// One extracted entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Entity kind
    pub kind: EntityKind,
    /// Matched surface text
    pub surface: String,
    /// Canonical value, when normalization succeeded
    pub normalized: Option<String>,
    /// Location in the source text
    pub span: Span,
}

/// Registry-driven entity extractor
pub struct EntityExtractor {
    registry: Arc<PatternRegistry>,
}

impl EntityExtractor {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }

    /// Extract all entities from the text.
    ///
    /// Empty input yields an empty result, not an error.
    pub fn extract(&self, text: &str) -> Vec<EntityRecord> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut claimed: Vec<Span> = Vec::new();
        let mut records: Vec<EntityRecord> = Vec::new();

        // Patterns arrive pre-sorted: kind claiming order, then per-kind
        // priority. First match over a span wins.
        for pattern in self.registry.entity_patterns() {
            for caps in pattern.regex.captures_iter(text) {
                let full = match caps.get(0) {
                    Some(m) => m,
                    None => continue,
                };
                let span = Span::new(full.start(), full.end());
                if claimed.iter().any(|c| c.overlaps(&span)) {
                    continue;
                }
                claimed.push(span);

                // A capture group narrows the surface (e.g. the quoted term
                // inside a defined-term parenthetical); the claim still
                // covers the full match.
                let surface = caps
                    .get(1)
                    .map(|g| g.as_str())
                    .unwrap_or(full.as_str())
                    .to_string();

                let normalized = normalize(pattern.normalizer, &surface);
                if normalized.is_none() && pattern.normalizer != Normalizer::None {
                    tracing::debug!(
                        kind = %pattern.kind,
                        surface = %surface,
                        "entity normalization failed, keeping raw surface"
                    );
                }

                records.push(EntityRecord {
                    kind: pattern.kind,
                    surface,
                    normalized,
                    span,
                });
            }
        }

        dedup_records(records)
    }
}

/// Deduplicate by (kind, normalized-or-raw value), preserving first-seen order
fn dedup_records(records: Vec<EntityRecord>) -> Vec<EntityRecord> {
    let mut seen: HashSet<(EntityKind, String)> = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let key = (
                r.kind,
                r.normalized.clone().unwrap_or_else(|| r.surface.clone()),
            );
            seen.insert(key)
        })
        .collect()
}

/// Apply a normalizer tag to a matched surface. `None` means the surface
/// could not be brought to canonical form; the record is kept regardless.
fn normalize(normalizer: Normalizer, surface: &str) -> Option<String> {
    match normalizer {
        Normalizer::IsoDate => normalize_date(surface),
        Normalizer::Money => normalize_money(surface),
        Normalizer::CollapseWhitespace => Some(TextUtils::collapse_whitespace(surface)),
        Normalizer::LowerCase => Some(TextUtils::collapse_whitespace(surface).to_lowercase()),
        Normalizer::None => None,
    }
}

/// Canonical Y-M-D form for written-month and numeric date surfaces
fn normalize_date(surface: &str) -> Option<String> {
    let cleaned = TextUtils::collapse_whitespace(surface);

    // Written month: January 5, 2024 (comma optional)
    for format in ["%B %d, %Y", "%B %d %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    // Numeric month/day/year with / or - separators
    let parts: Vec<&str> = cleaned.split(['/', '-']).collect();
    if parts.len() == 3 {
        let month: u32 = parts[0].parse().ok()?;
        let day: u32 = parts[1].parse().ok()?;
        let mut year: i32 = parts[2].parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        return Some(date.format("%Y-%m-%d").to_string());
    }

    None
}

/// Canonical `<amount> <currency>` form with separators stripped
fn normalize_money(surface: &str) -> Option<String> {
    let cleaned = surface
        .replace('$', " ")
        .replace(',', "")
        .to_lowercase()
        .replace("usd", " ")
        .replace("dollars", " ")
        .replace("dollar", " ");
    let amount = cleaned.trim();

    // Reject anything that is not a plain decimal number
    let _: f64 = amount.parse().ok()?;

    Some(format!("{} USD", amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(Arc::new(PatternRegistry::builtin().unwrap()))
    }

    #[test]
    fn test_empty_input() {
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn test_nda_scenario_entities() {
        let text = "This Non-Disclosure Agreement is entered into by ABC Corp and \
                    XYZ LLC on January 5, 2024 for $50,000.";
        let records = extractor().extract(text);

        let parties: Vec<&str> = records
            .iter()
            .filter(|r| r.kind == EntityKind::Party)
            .map(|r| r.surface.as_str())
            .collect();
        assert!(parties.contains(&"ABC Corp"));
        assert!(parties.contains(&"XYZ LLC"));

        let dates: Vec<&EntityRecord> = records
            .iter()
            .filter(|r| r.kind == EntityKind::Date)
            .collect();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].normalized.as_deref(), Some("2024-01-05"));

        let amounts: Vec<&EntityRecord> = records
            .iter()
            .filter(|r| r.kind == EntityKind::MonetaryAmount)
            .collect();
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts[0].normalized.as_deref(), Some("50000 USD"));
    }

    #[test]
    fn test_dedup_by_normalized_value() {
        // Same date in two surface forms plus an exact repeat
        let text = "Effective January 5, 2024. Signed 1/5/2024. \
                    Renewed January 5, 2024.";
        let records = extractor().extract(text);

        let dates: Vec<&EntityRecord> = records
            .iter()
            .filter(|r| r.kind == EntityKind::Date)
            .collect();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].surface, "January 5, 2024");
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let text = "ABC Corp agrees to pay $1,000. ABC Corp agrees again to pay $1,000.";
        let first = extractor().extract(text);
        let second = extractor().extract(text);
        assert_eq!(first, second);
        assert_eq!(
            first
                .iter()
                .filter(|r| r.kind == EntityKind::Party)
                .count(),
            1
        );
    }

    #[test]
    fn test_normalization_failure_keeps_record() {
        // Matches the numeric date pattern but is not a real date
        let text = "Delivered on 13/45/2024 at the warehouse.";
        let records = extractor().extract(text);

        let dates: Vec<&EntityRecord> = records
            .iter()
            .filter(|r| r.kind == EntityKind::Date)
            .collect();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].surface, "13/45/2024");
        assert!(dates[0].normalized.is_none());
    }

    #[test]
    fn test_span_claiming_blocks_overlap() {
        // The dollar-sign pattern claims "$50,000" first; the written-amount
        // pattern would overlap ("50,000 dollars") and must be skipped.
        let text = "A fee of $50,000 dollars is due.";
        let records = extractor().extract(text);

        let amounts: Vec<&EntityRecord> = records
            .iter()
            .filter(|r| r.kind == EntityKind::MonetaryAmount)
            .collect();
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts[0].surface, "$50,000");
    }

    #[test]
    fn test_quoted_defined_term() {
        let text = "All materials (the \"Confidential Information\") must be protected.";
        let records = extractor().extract(text);

        let terms: Vec<&EntityRecord> = records
            .iter()
            .filter(|r| r.kind == EntityKind::DefinedTerm)
            .collect();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].surface, "Confidential Information");
    }

    #[test]
    fn test_two_digit_year() {
        let text = "Signed 1/5/24.";
        let records = extractor().extract(text);
        let date = records
            .iter()
            .find(|r| r.kind == EntityKind::Date)
            .unwrap();
        assert_eq!(date.normalized.as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn test_honorific_party() {
        let text = "Mr. John Smith shall serve as guarantor.";
        let records = extractor().extract(text);
        assert!(records
            .iter()
            .any(|r| r.kind == EntityKind::Party && r.surface == "Mr. John Smith"));
    }
}
