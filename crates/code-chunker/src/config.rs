use serde::{Deserialize, Serialize};

/// Configuration for chunking behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Word budget for a markdown chunk
    pub markdown_max_words: usize,

    /// Lines per plain-text block
    pub text_lines_per_block: usize,

    /// Characters of raw content kept in an error fallback chunk
    pub error_preview_chars: usize,

    /// Parse time budget per file in microseconds (0 = unlimited)
    pub parse_timeout_micros: u64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            markdown_max_words: 400,
            text_lines_per_block: 80,
            error_preview_chars: 2000,
            parse_timeout_micros: 5_000_000,
        }
    }
}

impl ChunkerConfig {
    /// Create config optimized for embeddings (smaller, focused chunks)
    pub fn for_embeddings() -> Self {
        Self {
            markdown_max_words: 256,
            text_lines_per_block: 50,
            ..Default::default()
        }
    }

    /// Create config optimized for LLM context (larger, comprehensive chunks)
    pub fn for_llm_context() -> Self {
        Self {
            markdown_max_words: 800,
            text_lines_per_block: 160,
            ..Default::default()
        }
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(raw).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.markdown_max_words == 0 {
            return Err("markdown_max_words must be > 0".to_string());
        }

        if self.text_lines_per_block == 0 {
            return Err("text_lines_per_block must be > 0".to_string());
        }

        if self.error_preview_chars == 0 {
            return Err("error_preview_chars must be > 0".to_string());
        }

        Ok(())
    }
}
