//! # Legal Document Analyzer Driver
//!
//! ## Purpose
//! Command-line entry point for the analysis engine. Loads configuration and
//! the pattern registry, reads plain-text documents, and emits structured
//! analysis results as JSON.
//!
//! ## Input/Output Specification
//! - **Input**: UTF-8 text files (binary formats are extracted upstream),
//!   configuration file, command line arguments, environment variables
//! - **Output**: `AnalysisResult` JSON on stdout or to a file
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Build the analysis engine (fatal if the registry is malformed)
//! 4. Read and normalize input documents
//! 5. Analyze independent documents in parallel
//! 6. Serialize results

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unicode_normalization::UnicodeNormalization;

use legal_doc_analyzer::{
    AnalysisEngine, AnalysisResult, Config, PatternRegistry, RawDocument, SourceMetadata,
};

fn main() -> anyhow::Result<()> {
    let matches = Command::new("legal-analyzer")
        .version("0.1.0")
        .author("Legal Analysis Team")
        .about("Rule-based legal document analysis: classification, clauses, plain language")
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .help("Plain-text documents to analyze")
                .num_args(1..)
                .required_unless_present("check-registry"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("registry")
                .long("registry")
                .value_name("FILE")
                .help("Pattern registry bundle (overrides the configured path)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write JSON results to a file instead of stdout"),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print the JSON output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check-registry")
                .long("check-registry")
                .help("Validate the pattern registry and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    if let Some(registry_path) = matches.get_one::<String>("registry") {
        config.registry_path = Some(registry_path.into());
    }

    init_logging(&config)?;
    info!("Starting legal document analyzer v0.1.0");
    info!("Configuration loaded from: {}", config_path);

    if matches.get_flag("check-registry") {
        return check_registry(&config);
    }

    let engine = AnalysisEngine::new(config)?;

    let inputs: Vec<&String> = matches.get_many::<String>("input").unwrap().collect();
    let documents = load_documents(&inputs)?;

    info!("Analyzing {} document(s)", documents.len());

    // Analysis calls for different documents are independent; fan out
    let results: Vec<AnalysisResult> = documents
        .par_iter()
        .map(|doc| engine.analyze(doc))
        .collect::<Result<_, _>>()?;

    let json = if matches.get_flag("pretty") {
        if results.len() == 1 {
            serde_json::to_string_pretty(&results[0])?
        } else {
            serde_json::to_string_pretty(&results)?
        }
    } else if results.len() == 1 {
        serde_json::to_string(&results[0])?
    } else {
        serde_json::to_string(&results)?
    };

    match matches.get_one::<String>("output") {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing results to {}", path))?;
            info!("Results written to {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone()));

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .json(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true),
            )
            .init();
    }

    Ok(())
}

/// Validate the pattern registry and exit
fn check_registry(config: &Config) -> anyhow::Result<()> {
    let registry = match &config.registry_path {
        Some(path) => PatternRegistry::from_file(path)?,
        None => PatternRegistry::builtin()?,
    };

    info!("Registry '{}' is valid", registry.version());
    info!("  entity patterns: {}", registry.entity_patterns().len());
    info!("  replacement rules: {}", registry.replacements().len());
    println!("registry ok: {}", registry.version());
    Ok(())
}

/// Read input files into raw documents, normalizing to NFC on the way in —
/// the engine expects already-decoded, normalized text.
fn load_documents(paths: &[&String]) -> anyhow::Result<Vec<RawDocument>> {
    let mut documents = Vec::with_capacity(paths.len());

    for path in paths {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading input file {}", path))?;
        let text: String = raw.nfc().collect();

        if text.trim().is_empty() {
            warn!("Input {} is empty or whitespace-only", path);
        }

        let metadata = SourceMetadata {
            word_count: Some(text.split_whitespace().count()),
            source_name: Some(path.to_string()),
            ..SourceMetadata::new()
        };
        documents.push(RawDocument::with_metadata(text, metadata));
    }

    Ok(documents)
}
