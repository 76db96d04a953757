//! # Analysis Orchestrator Module
//!
//! ## Purpose
//! The engine's single public entry point. Composes the classifier, entity
//! extractor, clause segmenter, and simplifier into one pass over a document
//! and assembles the final structured result.
//!
//! ## Input/Output Specification
//! - **Input**: `RawDocument` (decoded text plus loader metadata)
//! - **Output**: `AnalysisResult` owned exclusively by the caller
//! - **Guarantees**: Pure and deterministic per call; no retries, no I/O,
//!   no state shared between calls beyond the immutable registry
//!
//! ## Key Features
//! - Fails fast with `InvalidInput` on binary residue; empty text is valid
//!   and produces a minimal, non-erroring result
//! - Per-clause simplification alongside the full-document rewrite
//! - Summary metrics (clause/entity counts, word-count delta)
//! - Phase timing via `tracing`

use crate::classifier::{ClassificationResult, DocumentClassifier};
use crate::config::Config;
use crate::entities::{EntityExtractor, EntityRecord};
use crate::errors::{AnalyzerError, Result};
use crate::registry::PatternRegistry;
use crate::segmenter::{ClauseSegmenter, ClauseUnit};
use crate::simplifier::TextSimplifier;
use crate::utils::{TextUtils, Timer, ValidationUtils};
use crate::{DocumentId, RawDocument};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Summary metrics over one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Number of clause units
    pub clause_count: usize,
    /// Number of deduplicated entities
    pub entity_count: usize,
    /// Word count of the original text
    pub original_word_count: usize,
    /// Word count of the simplified full text
    pub simplified_word_count: usize,
    /// Simplified minus original word count
    pub word_count_delta: i64,
}

/// Complete analysis output, serializable to a plain nested mapping for any
/// downstream renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Identifier of the analyzed document
    pub document_id: DocumentId,
    /// Document-type classification with score breakdown
    pub classification: ClassificationResult,
    /// Extracted entities, first-seen order
    pub entities: Vec<EntityRecord>,
    /// Clause units in document order, each with its rewrite
    pub clauses: Vec<ClauseUnit>,
    /// Plain-language rewrite of the full text
    pub simplified_text: String,
    /// Summary metrics
    pub metrics: SummaryMetrics,
}

/// The analysis engine: immutable registry plus per-phase components.
///
/// Safe to share across threads; concurrent `analyze` calls for different
/// documents need no coordination.
pub struct AnalysisEngine {
    config: Config,
    registry: Arc<PatternRegistry>,
    classifier: DocumentClassifier,
    extractor: EntityExtractor,
    segmenter: ClauseSegmenter,
    simplifier: TextSimplifier,
}

impl AnalysisEngine {
    /// Build an engine from configuration, loading the registry bundle named
    /// in the config or falling back to the compiled-in tables.
    pub fn new(config: Config) -> Result<Self> {
        let registry = match &config.registry_path {
            Some(path) => PatternRegistry::from_file(path)?,
            None => PatternRegistry::builtin()?,
        };
        Self::with_registry(config, registry)
    }

    /// Build an engine around an injected registry (tests, custom bundles)
    pub fn with_registry(config: Config, registry: PatternRegistry) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(registry);

        tracing::info!(
            registry_version = registry.version(),
            "analysis engine initialized"
        );

        Ok(Self {
            classifier: DocumentClassifier::new(registry.clone(), config.classification.clone()),
            extractor: EntityExtractor::new(registry.clone()),
            segmenter: ClauseSegmenter::new(config.segmentation.clone()),
            simplifier: TextSimplifier::new(registry.clone(), config.simplification.clone()),
            registry,
            config,
        })
    }

    /// The engine's configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The immutable pattern registry
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Run one full analysis pass over a document.
    ///
    /// Rejects non-text input with `InvalidInput`; an empty string is valid
    /// and yields a minimal result (zero entities, one empty clause,
    /// "Other Legal Document" at confidence 0).
    pub fn analyze(&self, document: &RawDocument) -> Result<AnalysisResult> {
        if let Some(offender) = ValidationUtils::binary_residue(&document.text) {
            return Err(AnalyzerError::InvalidInput {
                reason: format!(
                    "text contains control character U+{:04X}",
                    offender as u32
                ),
            });
        }

        let timer = Timer::new("analyze");
        let text = document.text.as_str();
        tracing::debug!(
            document_id = %document.metadata.id,
            chars = text.len(),
            "starting analysis"
        );

        let classification = self.classifier.classify(text);
        let entities = self.extractor.extract(text);
        let mut clauses = self.segmenter.segment(text);
        let simplified_text = self.simplifier.simplify(text);

        for clause in &mut clauses {
            clause.simplified = Some(self.simplifier.simplify(&clause.text));
        }

        let original_word_count = TextUtils::word_count(text);
        let simplified_word_count = TextUtils::word_count(&simplified_text);
        let metrics = SummaryMetrics {
            clause_count: clauses.len(),
            entity_count: entities.len(),
            original_word_count,
            simplified_word_count,
            word_count_delta: simplified_word_count as i64 - original_word_count as i64,
        };

        let elapsed = timer.stop();
        tracing::info!(
            document_id = %document.metadata.id,
            doc_type = %classification.doc_type,
            clauses = metrics.clause_count,
            entities = metrics.entity_count,
            elapsed_ms = elapsed,
            "analysis complete"
        );

        Ok(AnalysisResult {
            document_id: document.metadata.id,
            classification,
            entities,
            clauses,
            simplified_text,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DocumentType, EntityKind};

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(Config::default()).unwrap()
    }

    const NDA_TEXT: &str = "This Non-Disclosure Agreement is entered into by ABC Corp and \
                            XYZ LLC on January 5, 2024 for $50,000.";

    #[test]
    fn test_nda_scenario_end_to_end() {
        let result = engine().analyze(&RawDocument::new(NDA_TEXT)).unwrap();

        assert_eq!(result.classification.doc_type, DocumentType::Nda);

        let parties: Vec<&str> = result
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Party)
            .map(|e| e.surface.as_str())
            .collect();
        assert_eq!(parties, vec!["ABC Corp", "XYZ LLC"]);

        assert!(result
            .entities
            .iter()
            .any(|e| e.kind == EntityKind::Date && e.normalized.as_deref() == Some("2024-01-05")));
        assert!(result.entities.iter().any(|e| {
            e.kind == EntityKind::MonetaryAmount && e.normalized.as_deref() == Some("50000 USD")
        }));

        assert!(!result.clauses.is_empty());
        assert!(result.clauses.iter().all(|c| c.simplified.is_some()));
        assert_eq!(result.metrics.entity_count, result.entities.len());
    }

    #[test]
    fn test_empty_string_minimal_result() {
        let result = engine().analyze(&RawDocument::new("")).unwrap();

        assert_eq!(result.classification.doc_type, DocumentType::Other);
        assert_eq!(result.classification.confidence, 0.0);
        assert!(result.entities.is_empty());
        assert_eq!(result.clauses.len(), 1);
        assert_eq!(result.clauses[0].text, "");
        assert_eq!(result.simplified_text, "");
        assert_eq!(result.metrics.word_count_delta, 0);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let err = engine()
            .analyze(&RawDocument::new("binary\u{0}garbage"))
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidInput { .. }));
    }

    #[test]
    fn test_clause_coverage_reconstructs_text() {
        let text = "1. The tenant pays rent monthly without fail.\n\
                    2. The landlord maintains the premises in good order.\n\
                    3. Either side may end the lease with sixty days notice.\n";
        let result = engine().analyze(&RawDocument::new(text)).unwrap();

        let reconstructed: String = result
            .clauses
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(reconstructed, text);
    }

    #[test]
    fn test_determinism_byte_identical() {
        let doc = RawDocument::new(NDA_TEXT);
        let e = engine();
        let first = serde_json::to_string(&e.analyze(&doc).unwrap()).unwrap();
        let second = serde_json::to_string(&e.analyze(&doc).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_indemnify_replacement_in_clause() {
        let text = "The contractor shall indemnify and hold harmless the owner from all claims.";
        let result = engine().analyze(&RawDocument::new(text)).unwrap();

        assert!(result
            .simplified_text
            .contains("protect the other side from legal claims and losses"));
        let clause = &result.clauses[0];
        assert!(clause
            .simplified
            .as_deref()
            .unwrap()
            .contains("protect the other side from legal claims and losses"));
    }

    #[test]
    fn test_injected_registry() {
        let registry = PatternRegistry::builtin().unwrap();
        let e = AnalysisEngine::with_registry(Config::default(), registry).unwrap();
        assert!(e.analyze(&RawDocument::new("plain text")).is_ok());
    }

    #[test]
    fn test_bad_config_rejected_at_startup() {
        let mut config = Config::default();
        config.classification.confidence_saturation = 0.0;
        assert!(AnalysisEngine::new(config).is_err());
    }
}
