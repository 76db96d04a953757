//! # Legal Document Analysis Engine
//!
//! ## Overview
//! This library implements a deterministic, rule- and pattern-driven analysis
//! engine for legal documents. Given plain text (extracted upstream from
//! PDF/DOCX/TXT by a document loader), it produces a document-type
//! classification, an ordered list of clauses with plain-language rewrites,
//! and a set of extracted typed entities.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `registry`: Static, versioned pattern tables (keywords, entity patterns,
//!   replacement pairs)
//! - `entities`: Typed entity extraction with first-match-wins span claiming
//! - `segmenter`: Clause segmentation with structural and sentence fallbacks
//! - `simplifier`: Plain-language rewriting via the replacement table
//! - `classifier`: Weighted keyword scoring over document types
//! - `analyzer`: The orchestrator composing one analysis pass
//! - `config`: Configuration management and tuning constants
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: A single decoded text string plus optional loader metadata
//! - **Output**: A structured `AnalysisResult`, serializable to plain JSON
//! - **Guarantees**: Identical input always yields a byte-identical result;
//!   no state is shared between analysis calls beyond the immutable registry
//!
//! ## Usage
//! ```rust
//! use legal_doc_analyzer::{AnalysisEngine, Config, RawDocument};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = AnalysisEngine::new(Config::default())?;
//!     let doc = RawDocument::new("This Non-Disclosure Agreement is entered into by ABC Corp.");
//!     let result = engine.analyze(&doc)?;
//!     println!("type: {}", result.classification.doc_type.label());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod entities;
pub mod errors;
pub mod registry;
pub mod segmenter;
pub mod simplifier;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use analyzer::{AnalysisEngine, AnalysisResult, SummaryMetrics};
pub use classifier::{ClassificationResult, TypeScore};
pub use config::Config;
pub use entities::EntityRecord;
pub use errors::{AnalyzerError, Result};
pub use registry::{DocumentType, EntityKind, PatternRegistry};
pub use segmenter::ClauseUnit;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for documents, assigned by the upstream loader
pub type DocumentId = Uuid;

/// Half-open byte range into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Loader-supplied metadata accompanying the raw text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Document identifier
    pub id: DocumentId,
    /// Page count reported by the loader, when known
    pub page_count: Option<usize>,
    /// Word count reported by the loader, when known
    pub word_count: Option<usize>,
    /// Original file name or source label
    pub source_name: Option<String>,
}

impl SourceMetadata {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            page_count: None,
            word_count: None,
            source_name: None,
        }
    }
}

impl Default for SourceMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable input document: full text plus optional source metadata.
/// Produced by the upstream loader, consumed once per analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// Full decoded text
    pub text: String,
    /// Loader metadata
    pub metadata: SourceMetadata,
}

impl RawDocument {
    /// Wrap a text string with fresh metadata
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: SourceMetadata::new(),
        }
    }

    /// Wrap a text string with loader-supplied metadata
    pub fn with_metadata(text: impl Into<String>, metadata: SourceMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_overlap() {
        assert!(Span::new(0, 5).overlaps(&Span::new(4, 8)));
        assert!(!Span::new(0, 5).overlaps(&Span::new(5, 8)));
        assert!(Span::new(2, 3).overlaps(&Span::new(0, 10)));
    }
}
