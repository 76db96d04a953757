//! # Utilities Module
//!
//! ## Purpose
//! Common helpers used throughout the analysis engine for text measurement,
//! input validation, and timing instrumentation.
//!
//! ## Input/Output Specification
//! - **Input**: Text slices requiring common operations
//! - **Output**: Counts, previews, validation verdicts, timing logs
//! - **Functions**: Text utilities, validation helpers, a tracing timer

use std::time::Instant;

/// Performance timer for measuring operation duration
pub struct Timer {
    start: Instant,
    name: String,
}

/// Text processing utilities
pub struct TextUtils;

/// Validation utilities
pub struct ValidationUtils;

impl Timer {
    /// Start a new timer with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Stop timer and log duration
    pub fn stop(self) -> u64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("Timer '{}' completed in {}ms", self.name, elapsed);
        elapsed
    }
}

impl TextUtils {
    /// Count whitespace-separated words
    pub fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }

    /// Truncate text to specified length with ellipsis
    pub fn truncate(text: &str, max_length: usize) -> String {
        if text.len() <= max_length {
            text.to_string()
        } else {
            let cut = max_length.saturating_sub(3);
            let mut end = cut;
            while end > 0 && !text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &text[..end])
        }
    }

    /// Extract preview text from longer content
    pub fn extract_preview(text: &str, max_words: usize) -> String {
        let words: Vec<&str> = text.split_whitespace().take(max_words).collect();
        let preview = words.join(" ");

        if words.len() >= max_words {
            format!("{}...", preview)
        } else {
            preview
        }
    }

    /// Collapse runs of internal whitespace into single spaces
    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl ValidationUtils {
    /// Find binary residue in supposedly decoded text: a NUL byte or any
    /// C0 control character other than tab, newline, carriage return.
    /// Returns the first offending character, if any.
    pub fn binary_residue(text: &str) -> Option<char> {
        text.chars()
            .find(|&c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    }
}

/// Macro for timing code blocks
#[macro_export]
macro_rules! time_block {
    ($name:expr, $block:block) => {{
        let timer = $crate::utils::Timer::new($name);
        let result = $block;
        timer.stop();
        result
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(TextUtils::word_count("the quick brown fox"), 4);
        assert_eq!(TextUtils::word_count("   "), 0);
        assert_eq!(TextUtils::word_count(""), 0);
    }

    #[test]
    fn test_text_truncate() {
        assert_eq!(TextUtils::truncate("Hello world", 20), "Hello world");
        assert_eq!(
            TextUtils::truncate("This is a very long text", 10),
            "This is..."
        );
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            TextUtils::collapse_whitespace("ABC   Corp\n Inc."),
            "ABC Corp Inc."
        );
    }

    #[test]
    fn test_binary_residue() {
        assert!(ValidationUtils::binary_residue("plain text\nwith lines\t").is_none());
        assert_eq!(ValidationUtils::binary_residue("bad\u{0}byte"), Some('\u{0}'));
        assert_eq!(ValidationUtils::binary_residue("bell\u{7}"), Some('\u{7}'));
    }
}
