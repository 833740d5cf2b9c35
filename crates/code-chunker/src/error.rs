use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur during chunking
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// Tree-sitter returned no tree for the content
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Parsing exceeded the configured time budget
    #[error("Parse timed out after {micros}us")]
    ParseTimeout { micros: u64 },

    /// Content looks like binary data rather than text
    #[error("Binary content: NUL byte at offset {offset}")]
    BinaryContent { offset: usize },

    /// Language has no syntax grammar
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A grammar could not be loaded at startup
    #[error("Grammar unavailable for {language}: {reason}")]
    GrammarUnavailable { language: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ChunkerError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a grammar loading error
    pub fn grammar(language: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GrammarUnavailable {
            language: language.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error must abort startup instead of being folded per file
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::GrammarUnavailable { .. } | Self::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_flagged() {
        assert!(ChunkerError::grammar("go", "abi mismatch").is_configuration());
        assert!(ChunkerError::invalid_config("zero budget").is_configuration());
        assert!(!ChunkerError::parse("no tree").is_configuration());
        assert!(!ChunkerError::BinaryContent { offset: 3 }.is_configuration());
    }

    #[test]
    fn messages_are_human_readable() {
        let err = ChunkerError::grammar("rust", "incompatible ABI");
        assert_eq!(
            err.to_string(),
            "Grammar unavailable for rust: incompatible ABI"
        );
        let err = ChunkerError::BinaryContent { offset: 7 };
        assert_eq!(err.to_string(), "Binary content: NUL byte at offset 7");
    }
}
