//! # Document Classification Module
//!
//! ## Purpose
//! Scores the whole document against each known document type's weighted
//! keyword set and selects the best match with a fixed tie-break order and a
//! minimum-confidence fallback.
//!
//! ## Input/Output Specification
//! - **Input**: Raw document text
//! - **Output**: `ClassificationResult` with the winning type, a confidence
//!   in [0, 1], and the per-candidate score breakdown
//! - **Fallback**: Below the confidence floor the result is forced to
//!   "Other Legal Document"
//!
//! ## Key Features
//! - Case-insensitive whole-phrase occurrence counting
//! - Scores normalized by document length so long documents are not favored
//! - Candidates within the tie tolerance resolve by the fixed type priority
//!   order (NDA > Employment > Service > Lease > Purchase > Partnership >
//!   License > Other)

use crate::config::ClassificationConfig;
use crate::registry::{DocumentType, PatternRegistry};
use crate::utils::TextUtils;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Score row for one candidate type, retained for explainability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeScore {
    /// Candidate type
    pub doc_type: DocumentType,
    /// Weighted occurrence count
    pub raw_score: f64,
    /// Raw score divided by document word count
    pub normalized_score: f64,
    /// Total keyword occurrences counted
    pub keyword_hits: usize,
}

/// Classification outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning type after tie-break and confidence floor
    pub doc_type: DocumentType,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// All candidate scores, in the fixed priority order
    pub breakdown: Vec<TypeScore>,
}

/// Keyword-driven document classifier
pub struct DocumentClassifier {
    registry: Arc<PatternRegistry>,
    config: ClassificationConfig,
}

impl DocumentClassifier {
    pub fn new(registry: Arc<PatternRegistry>, config: ClassificationConfig) -> Self {
        Self { registry, config }
    }

    /// Classify the document text.
    ///
    /// Empty text scores zero everywhere and resolves to
    /// "Other Legal Document" with confidence 0.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let word_count = TextUtils::word_count(text).max(1) as f64;

        let breakdown: Vec<TypeScore> = DocumentType::PRIORITY
            .iter()
            .map(|&doc_type| self.score_type(doc_type, text, word_count))
            .collect();

        // Priority-order scan: a later type must beat the incumbent by more
        // than the tie tolerance to take the lead, which makes the fixed
        // ordering the tie-break.
        let mut best = &breakdown[0];
        for candidate in &breakdown[1..] {
            if candidate.normalized_score > best.normalized_score + self.config.tie_tolerance {
                best = candidate;
            }
        }

        let confidence =
            (best.normalized_score / self.config.confidence_saturation).clamp(0.0, 1.0);

        let doc_type = if best.normalized_score < self.config.min_confidence_density {
            DocumentType::Other
        } else {
            best.doc_type
        };

        tracing::debug!(
            doc_type = %doc_type,
            confidence,
            "document classified"
        );

        ClassificationResult {
            doc_type,
            confidence,
            breakdown,
        }
    }

    fn score_type(&self, doc_type: DocumentType, text: &str, word_count: f64) -> TypeScore {
        let mut raw_score = 0.0;
        let mut keyword_hits = 0;

        for keyword in self.registry.keywords_for(doc_type) {
            let occurrences = keyword.regex.find_iter(text).count();
            keyword_hits += occurrences;
            raw_score += keyword.weight * occurrences as f64;
        }

        TypeScore {
            doc_type,
            raw_score,
            normalized_score: raw_score / word_count,
            keyword_hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{builtin_data, DocumentKeywords, KeywordSpec};

    fn classifier() -> DocumentClassifier {
        DocumentClassifier::new(
            Arc::new(PatternRegistry::builtin().unwrap()),
            ClassificationConfig::default(),
        )
    }

    #[test]
    fn test_nda_scenario() {
        let text = "This Non-Disclosure Agreement is entered into by ABC Corp and \
                    XYZ LLC on January 5, 2024 for $50,000.";
        let result = classifier().classify(text);

        assert_eq!(result.doc_type, DocumentType::Nda);
        assert!(result.confidence > 0.0);
        assert_eq!(result.breakdown.len(), DocumentType::PRIORITY.len());
    }

    #[test]
    fn test_empty_text_is_other_with_zero_confidence() {
        let result = classifier().classify("");
        assert_eq!(result.doc_type, DocumentType::Other);
        assert_eq!(result.confidence, 0.0);
        assert!(result.breakdown.iter().all(|ts| ts.raw_score == 0.0));
    }

    #[test]
    fn test_below_floor_forces_other() {
        // One weak keyword in a long document
        let mut text = "lorem ipsum ".repeat(3000);
        text.push_str("employee");
        let result = classifier().classify(&text);
        assert_eq!(result.doc_type, DocumentType::Other);
    }

    #[test]
    fn test_breakdown_is_priority_ordered() {
        let result = classifier().classify("lease tenant landlord");
        let types: Vec<DocumentType> = result.breakdown.iter().map(|ts| ts.doc_type).collect();
        assert_eq!(types, DocumentType::PRIORITY.to_vec());
    }

    #[test]
    fn test_tie_prefers_earlier_priority() {
        // Two types with identical single-keyword tables and identical hits
        let mut data = builtin_data();
        data.document_types = vec![
            DocumentKeywords {
                doc_type: DocumentType::Lease,
                keywords: vec![KeywordSpec {
                    phrase: "premises".into(),
                    weight: 1.0,
                }],
            },
            DocumentKeywords {
                doc_type: DocumentType::License,
                keywords: vec![KeywordSpec {
                    phrase: "royalty".into(),
                    weight: 1.0,
                }],
            },
        ];
        let registry = Arc::new(PatternRegistry::from_data(data).unwrap());
        let c = DocumentClassifier::new(registry, ClassificationConfig::default());

        let result = c.classify("The premises and the royalty are both mentioned once.");
        assert_eq!(result.doc_type, DocumentType::Lease);
    }

    #[test]
    fn test_score_monotonicity() {
        let c = classifier();
        let base = "This agreement covers general obligations between the parties. ".repeat(5);

        let mut previous = c
            .classify(&base)
            .breakdown
            .iter()
            .find(|ts| ts.doc_type == DocumentType::Nda)
            .unwrap()
            .normalized_score;

        let mut text = base;
        for _ in 0..5 {
            text.push_str("confidential information trade secret ");
            let score = c
                .classify(&text)
                .breakdown
                .iter()
                .find(|ts| ts.doc_type == DocumentType::Nda)
                .unwrap()
                .normalized_score;
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_length_normalization() {
        let c = classifier();
        let short = "lease tenant landlord rent premises";
        let mut long = String::from(short);
        long.push_str(&" filler words without any signal".repeat(200));

        let score_of = |text: &str| {
            c.classify(text)
                .breakdown
                .iter()
                .find(|ts| ts.doc_type == DocumentType::Lease)
                .unwrap()
                .normalized_score
        };
        assert!(score_of(short) > score_of(&long));
    }
}
