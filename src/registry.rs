//! # Pattern Registry Module
//!
//! ## Purpose
//! Static, versioned pattern tables driving every decision the engine makes:
//! weighted keyword sets per document type, entity matching patterns with
//! their normalizers, and the legal-phrase to plain-English replacement
//! table. Read-only after construction.
//!
//! ## Input/Output Specification
//! - **Input**: Compiled-in defaults or a TOML pattern bundle
//! - **Output**: Compiled, validated lookup tables
//! - **Failure**: Any malformed entry fails construction; the engine must
//!   never run on a partially loaded registry
//!
//! ## Key Features
//! - Closed document-type and entity-kind enumerations with a fixed
//!   priority ordering
//! - Replacement rules sorted longest-phrase-first at construction so
//!   substring rules never preempt whole phrases
//! - Entity patterns carry an explicit priority and normalizer tag,
//!   evaluated in fixed order by the extractor

use crate::errors::{AnalyzerError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Version tag of the compiled-in tables
pub const BUILTIN_REGISTRY_VERSION: &str = "builtin-1";

/// Closed set of recognized document types.
///
/// Declaration order is the classifier's tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Nda,
    Employment,
    Service,
    Lease,
    Purchase,
    Partnership,
    License,
    Other,
}

impl DocumentType {
    /// All types in tie-break priority order (highest first)
    pub const PRIORITY: [DocumentType; 8] = [
        DocumentType::Nda,
        DocumentType::Employment,
        DocumentType::Service,
        DocumentType::Lease,
        DocumentType::Purchase,
        DocumentType::Partnership,
        DocumentType::License,
        DocumentType::Other,
    ];

    /// Human-readable label for display and reports
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Nda => "NDA (Non-Disclosure Agreement)",
            DocumentType::Employment => "Employment Contract",
            DocumentType::Service => "Service Agreement",
            DocumentType::Lease => "Lease Agreement",
            DocumentType::Purchase => "Purchase Agreement",
            DocumentType::Partnership => "Partnership Agreement",
            DocumentType::License => "License Agreement",
            DocumentType::Other => "Other Legal Document",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Closed set of extractable entity kinds.
///
/// Declaration order is the extractor's span-claiming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Party,
    Date,
    MonetaryAmount,
    DefinedTerm,
    Other,
}

impl EntityKind {
    /// All kinds in span-claiming order
    pub const CLAIM_ORDER: [EntityKind; 5] = [
        EntityKind::Party,
        EntityKind::Date,
        EntityKind::MonetaryAmount,
        EntityKind::DefinedTerm,
        EntityKind::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Party => "Party",
            EntityKind::Date => "Date",
            EntityKind::MonetaryAmount => "Monetary Amount",
            EntityKind::DefinedTerm => "Defined Term",
            EntityKind::Other => "Other",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Normalization strategy attached to an entity pattern. The registry is
/// pure data; the extractor interprets these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalizer {
    /// Canonical Y-M-D date form
    IsoDate,
    /// Canonical `<amount> <currency>` form with separators stripped
    Money,
    /// Collapse internal whitespace, preserve casing
    CollapseWhitespace,
    /// Collapse whitespace and lowercase (dictionary-term dedup)
    LowerCase,
    /// Keep the surface text as the value
    None,
}

/// One weighted keyword or phrase for a document type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSpec {
    pub phrase: String,
    pub weight: f64,
}

/// One entity matching pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPatternSpec {
    pub kind: EntityKind,
    pub pattern: String,
    pub priority: u32,
    pub normalizer: Normalizer,
}

/// One legal-phrase replacement pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementSpec {
    pub phrase: String,
    pub plain: String,
}

/// Keyword list for one document type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentKeywords {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub keywords: Vec<KeywordSpec>,
}

/// Uncompiled registry bundle, the serialization surface for TOML files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryData {
    #[serde(default)]
    pub version: Option<String>,
    pub document_types: Vec<DocumentKeywords>,
    pub entity_patterns: Vec<EntityPatternSpec>,
    pub replacements: Vec<ReplacementSpec>,
}

/// Compiled keyword with its whole-phrase matcher
#[derive(Debug, Clone)]
pub struct CompiledKeyword {
    pub phrase: String,
    pub weight: f64,
    pub regex: Regex,
}

/// Compiled entity pattern
#[derive(Debug, Clone)]
pub struct CompiledEntityPattern {
    pub kind: EntityKind,
    pub regex: Regex,
    pub priority: u32,
    pub normalizer: Normalizer,
}

/// Compiled replacement rule
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    pub phrase: String,
    pub plain: String,
    pub regex: Regex,
}

/// Immutable, compiled pattern tables. Initialized once at startup and
/// shared read-only across analysis calls.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    version: String,
    keywords: Vec<(DocumentType, Vec<CompiledKeyword>)>,
    entity_patterns: Vec<CompiledEntityPattern>,
    replacements: Vec<ReplacementRule>,
}

impl PatternRegistry {
    /// Compiled-in default tables
    pub fn builtin() -> Result<Self> {
        Self::from_data(builtin_data())
    }

    /// Load and compile a registry bundle from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AnalyzerError::RegistryLoad {
            details: format!("Failed to read registry bundle {:?}: {}", path, e),
        })?;

        let data: RegistryData =
            toml::from_str(&content).map_err(|e| AnalyzerError::RegistryLoad {
                details: format!("Failed to parse registry bundle {:?}: {}", path, e),
            })?;

        Self::from_data(data)
    }

    /// Compile and validate an uncompiled bundle
    pub fn from_data(data: RegistryData) -> Result<Self> {
        if data.document_types.iter().all(|d| d.keywords.is_empty()) {
            return Err(AnalyzerError::RegistryLoad {
                details: "No document-type keywords defined".to_string(),
            });
        }
        if data.entity_patterns.is_empty() {
            return Err(AnalyzerError::RegistryLoad {
                details: "No entity patterns defined".to_string(),
            });
        }
        if data.replacements.is_empty() {
            return Err(AnalyzerError::RegistryLoad {
                details: "No replacement rules defined".to_string(),
            });
        }

        // Keyword tables, ordered by the fixed type priority so downstream
        // iteration is deterministic. Types absent from the bundle get an
        // empty list.
        let mut keywords = Vec::with_capacity(DocumentType::PRIORITY.len());
        for doc_type in DocumentType::PRIORITY {
            let mut compiled = Vec::new();
            for entry in data.document_types.iter().filter(|d| d.doc_type == doc_type) {
                for spec in &entry.keywords {
                    compiled.push(compile_keyword(doc_type, spec)?);
                }
            }
            keywords.push((doc_type, compiled));
        }

        // Entity patterns in claiming order: kind order first, then the
        // explicit per-kind priority, then bundle order.
        let mut entity_patterns = Vec::with_capacity(data.entity_patterns.len());
        for kind in EntityKind::CLAIM_ORDER {
            let mut for_kind: Vec<&EntityPatternSpec> = data
                .entity_patterns
                .iter()
                .filter(|p| p.kind == kind)
                .collect();
            for_kind.sort_by_key(|p| p.priority);
            for spec in for_kind {
                let regex =
                    Regex::new(&spec.pattern).map_err(|e| AnalyzerError::RegistryLoad {
                        details: format!("Invalid {} pattern '{}': {}", kind, spec.pattern, e),
                    })?;
                entity_patterns.push(CompiledEntityPattern {
                    kind,
                    regex,
                    priority: spec.priority,
                    normalizer: spec.normalizer,
                });
            }
        }

        // Replacement rules, longest phrase first so a substring rule can
        // never corrupt a longer phrase it is contained in.
        let mut replacements = Vec::with_capacity(data.replacements.len());
        for spec in &data.replacements {
            replacements.push(compile_replacement(spec)?);
        }
        replacements.sort_by(|a, b| {
            b.phrase
                .len()
                .cmp(&a.phrase.len())
                .then_with(|| a.phrase.cmp(&b.phrase))
        });

        Ok(Self {
            version: data
                .version
                .unwrap_or_else(|| BUILTIN_REGISTRY_VERSION.to_string()),
            keywords,
            entity_patterns,
            replacements,
        })
    }

    /// Registry version tag
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Weighted keywords for one document type
    pub fn keywords_for(&self, doc_type: DocumentType) -> &[CompiledKeyword] {
        self.keywords
            .iter()
            .find(|(t, _)| *t == doc_type)
            .map(|(_, k)| k.as_slice())
            .unwrap_or(&[])
    }

    /// All entity patterns in claiming order
    pub fn entity_patterns(&self) -> &[CompiledEntityPattern] {
        &self.entity_patterns
    }

    /// All replacement rules, longest phrase first
    pub fn replacements(&self) -> &[ReplacementRule] {
        &self.replacements
    }
}

fn compile_keyword(doc_type: DocumentType, spec: &KeywordSpec) -> Result<CompiledKeyword> {
    if spec.phrase.trim().is_empty() {
        return Err(AnalyzerError::RegistryLoad {
            details: format!("Empty keyword phrase for {}", doc_type),
        });
    }
    if spec.weight <= 0.0 || !spec.weight.is_finite() {
        return Err(AnalyzerError::RegistryLoad {
            details: format!(
                "Keyword '{}' for {} has non-positive weight {}",
                spec.phrase, doc_type, spec.weight
            ),
        });
    }

    let regex = whole_phrase_regex(&spec.phrase)?;
    Ok(CompiledKeyword {
        phrase: spec.phrase.clone(),
        weight: spec.weight,
        regex,
    })
}

fn compile_replacement(spec: &ReplacementSpec) -> Result<ReplacementRule> {
    if spec.phrase.trim().is_empty() || spec.plain.trim().is_empty() {
        return Err(AnalyzerError::RegistryLoad {
            details: format!(
                "Replacement rule '{}' -> '{}' has an empty side",
                spec.phrase, spec.plain
            ),
        });
    }

    let regex = whole_phrase_regex(&spec.phrase)?;
    Ok(ReplacementRule {
        phrase: spec.phrase.clone(),
        plain: spec.plain.clone(),
        regex,
    })
}

/// Case-insensitive whole-phrase matcher for a literal phrase
fn whole_phrase_regex(phrase: &str) -> Result<Regex> {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(phrase.trim()));
    Regex::new(&pattern).map_err(|e| AnalyzerError::RegistryLoad {
        details: format!("Invalid phrase '{}': {}", phrase, e),
    })
}

fn keyword(phrase: &str, weight: f64) -> KeywordSpec {
    KeywordSpec {
        phrase: phrase.to_string(),
        weight,
    }
}

fn entity(kind: EntityKind, pattern: &str, priority: u32, normalizer: Normalizer) -> EntityPatternSpec {
    EntityPatternSpec {
        kind,
        pattern: pattern.to_string(),
        priority,
        normalizer,
    }
}

fn replacement(phrase: &str, plain: &str) -> ReplacementSpec {
    ReplacementSpec {
        phrase: phrase.to_string(),
        plain: plain.to_string(),
    }
}

/// The compiled-in tables. Kept as data so tests and custom bundles can
/// start from the same shape.
pub fn builtin_data() -> RegistryData {
    let document_types = vec![
        DocumentKeywords {
            doc_type: DocumentType::Nda,
            keywords: vec![
                keyword("non-disclosure agreement", 3.0),
                keyword("non-disclosure", 2.5),
                keyword("confidential information", 2.0),
                keyword("trade secret", 2.0),
                keyword("disclosing party", 2.0),
                keyword("receiving party", 2.0),
                keyword("confidentiality", 1.5),
                keyword("confidential", 1.5),
                keyword("proprietary", 1.0),
            ],
        },
        DocumentKeywords {
            doc_type: DocumentType::Employment,
            keywords: vec![
                keyword("employment agreement", 3.0),
                keyword("job duties", 2.0),
                keyword("employment", 1.5),
                keyword("salary", 1.5),
                keyword("wages", 1.5),
                keyword("employee", 1.0),
                keyword("employer", 1.0),
                keyword("benefits", 1.0),
                keyword("termination", 0.5),
            ],
        },
        DocumentKeywords {
            doc_type: DocumentType::Service,
            keywords: vec![
                keyword("statement of work", 2.5),
                keyword("scope of work", 2.5),
                keyword("service provider", 2.5),
                keyword("deliverables", 2.0),
                keyword("client", 1.0),
                keyword("services", 0.5),
            ],
        },
        DocumentKeywords {
            doc_type: DocumentType::Lease,
            keywords: vec![
                keyword("security deposit", 2.0),
                keyword("landlord", 2.0),
                keyword("tenant", 2.0),
                keyword("lease", 2.0),
                keyword("rent", 1.5),
                keyword("premises", 1.5),
                keyword("property", 0.5),
            ],
        },
        DocumentKeywords {
            doc_type: DocumentType::Purchase,
            keywords: vec![
                keyword("purchase price", 2.5),
                keyword("closing date", 1.5),
                keyword("buyer", 1.5),
                keyword("seller", 1.5),
                keyword("purchase", 1.0),
                keyword("sale", 1.0),
                keyword("goods", 1.0),
            ],
        },
        DocumentKeywords {
            doc_type: DocumentType::Partnership,
            keywords: vec![
                keyword("capital contribution", 2.5),
                keyword("general partner", 2.0),
                keyword("partnership", 2.0),
                keyword("partners", 1.0),
                keyword("profit", 1.0),
                keyword("loss", 0.5),
            ],
        },
        DocumentKeywords {
            doc_type: DocumentType::License,
            keywords: vec![
                keyword("licensor", 2.5),
                keyword("licensee", 2.5),
                keyword("royalty", 2.0),
                keyword("intellectual property", 1.5),
                keyword("license", 1.5),
            ],
        },
        DocumentKeywords {
            doc_type: DocumentType::Other,
            keywords: vec![],
        },
    ];

    let entity_patterns = vec![
        // Corporate parties: capitalized name followed by an entity suffix
        entity(
            EntityKind::Party,
            r"\b[A-Z][A-Za-z&'\-]*(?:\s+[A-Z][A-Za-z&'\-]*){0,4}\s+(?:Inc\.?|LLC|L\.L\.C\.|Ltd\.?|Corporation|Corp\.?|Company|Co\.|L\.P\.|LP|PLLC)\b",
            1,
            Normalizer::CollapseWhitespace,
        ),
        // Natural persons introduced with an honorific
        entity(
            EntityKind::Party,
            r"\b(?:Mr|Mrs|Ms|Dr)\.\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,2}\b",
            2,
            Normalizer::CollapseWhitespace,
        ),
        // Written-month dates: January 5, 2024
        entity(
            EntityKind::Date,
            r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
            1,
            Normalizer::IsoDate,
        ),
        // Numeric dates: 1/5/2024, 01-05-24
        entity(
            EntityKind::Date,
            r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
            2,
            Normalizer::IsoDate,
        ),
        // Dollar-sign amounts: $50,000 or $1,234.56
        entity(
            EntityKind::MonetaryAmount,
            r"\$\s?\d[\d,]*(?:\.\d{1,2})?",
            1,
            Normalizer::Money,
        ),
        // Currency-code amounts: USD 50,000
        entity(
            EntityKind::MonetaryAmount,
            r"\bUSD\s?\d[\d,]*(?:\.\d{1,2})?\b",
            2,
            Normalizer::Money,
        ),
        // Written amounts: 50,000 dollars
        entity(
            EntityKind::MonetaryAmount,
            r"\b\d[\d,]*(?:\.\d{1,2})?\s+dollars?\b",
            3,
            Normalizer::Money,
        ),
        // Quoted defined terms: (the "Confidential Information")
        entity(
            EntityKind::DefinedTerm,
            "\\(\\s*(?:the\\s+|hereinafter\\s+)?[\"\u{201C}]([A-Z][^\"\u{201D}]{1,60})[\"\u{201D}]\\s*\\)",
            1,
            Normalizer::CollapseWhitespace,
        ),
        // Dictionary of standing legal terms
        entity(
            EntityKind::DefinedTerm,
            r"(?i)\b(?:indemnification|force majeure|arbitration|governing law|severability|injunctive relief|liquidated damages|warranty|assignment|jurisdiction)\b",
            2,
            Normalizer::LowerCase,
        ),
    ];

    let replacements = vec![
        replacement(
            "indemnify and hold harmless",
            "protect the other side from legal claims and losses",
        ),
        replacement("force majeure", "unexpected events beyond control"),
        replacement("shall not be liable", "is not responsible"),
        replacement("shall be deemed", "will be considered"),
        replacement("shall have the right", "may"),
        replacement("shall be entitled", "has the right"),
        replacement("in consideration of", "in exchange for"),
        replacement("in witness whereof", "as confirmation"),
        replacement("in the event that", "if"),
        replacement("null and void", "invalid"),
        replacement("pursuant to", "according to"),
        replacement("notwithstanding", "despite"),
        replacement("hereinafter", "from now on"),
        replacement("heretofore", "before this"),
        replacement("indemnify", "protect from legal claims"),
        replacement("hold harmless", "protect from responsibility"),
        replacement("forthwith", "immediately"),
        replacement("inter alia", "among other things"),
        replacement("prior to", "before"),
        replacement("whereas", "since"),
        replacement("herein", "in this document"),
    ];

    RegistryData {
        version: Some(BUILTIN_REGISTRY_VERSION.to_string()),
        document_types,
        entity_patterns,
        replacements,
    }
}
