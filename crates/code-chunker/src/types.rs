use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Node type of a whole-file syntax fallback chunk
pub const NODE_TYPE_FILE: &str = "file";
/// Node type of markdown section chunks
pub const NODE_TYPE_SECTION: &str = "section";
/// Node type of plain-text block chunks
pub const NODE_TYPE_BLOCK: &str = "block";
/// Node type of chunks standing in for a file that failed to chunk
pub const NODE_TYPE_ERROR_FALLBACK: &str = "error_fallback";

/// A chunk of source text with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// The text this chunk represents
    pub content: String,

    /// Metadata about this chunk
    pub metadata: ChunkMetadata,
}

impl Chunk {
    #[must_use]
    pub const fn new(content: String, metadata: ChunkMetadata) -> Self {
        Self { content, metadata }
    }

    /// Start and end line (1-indexed, inclusive) for code chunks
    #[must_use]
    pub const fn line_range(&self) -> Option<(usize, usize)> {
        match self.metadata.position {
            ChunkPosition::Lines {
                start_line,
                end_line,
            } => Some((start_line, end_line)),
            _ => None,
        }
    }

    /// Check if this chunk stands in for a file that could not be chunked
    #[must_use]
    pub fn is_error_fallback(&self) -> bool {
        self.metadata.node_type == NODE_TYPE_ERROR_FALLBACK
    }

    /// Metadata rendered as scalar string pairs, as vector stores expect
    #[must_use]
    pub fn flat_metadata(&self) -> BTreeMap<String, String> {
        let meta = &self.metadata;
        let mut flat = BTreeMap::new();
        flat.insert("file_path".to_string(), meta.file_path.clone());
        flat.insert("language".to_string(), meta.language.as_str().to_string());
        flat.insert("node_type".to_string(), meta.node_type.clone());
        flat.insert("chunk_id".to_string(), meta.chunk_id.clone());
        if let Some(symbol) = &meta.symbol_name {
            flat.insert("symbol_name".to_string(), symbol.clone());
        }
        match meta.position {
            ChunkPosition::Lines {
                start_line,
                end_line,
            } => {
                flat.insert("start_line".to_string(), start_line.to_string());
                flat.insert("end_line".to_string(), end_line.to_string());
            }
            ChunkPosition::Section { section_id } => {
                flat.insert("section_id".to_string(), section_id.to_string());
            }
            ChunkPosition::Block { block_id } => {
                flat.insert("block_id".to_string(), block_id.to_string());
            }
            ChunkPosition::None => {}
        }
        let deps: Vec<&String> = meta.dependencies.iter().collect();
        flat.insert(
            "dependencies".to_string(),
            serde_json::to_string(&deps).unwrap_or_else(|_| "[]".to_string()),
        );
        if let Some(error) = &meta.error {
            flat.insert("error".to_string(), error.clone());
        }
        flat
    }
}

/// Metadata about a chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Origin file identifier
    pub file_path: String,

    /// Language tag assigned by the classifier
    pub language: Language,

    /// Grammar node kind, or file/section/block/error_fallback
    pub node_type: String,

    /// Best-effort symbol name
    pub symbol_name: Option<String>,

    /// Chunker-specific position
    pub position: ChunkPosition,

    /// Imports/includes of the whole file
    #[serde(default)]
    pub dependencies: BTreeSet<String>,

    /// `<file_path>::chunk<seq>`, assigned by the assembler
    #[serde(default)]
    pub chunk_id: String,

    /// Why the file could not be chunked (error fallback only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChunkMetadata {
    pub fn new(
        file_path: impl Into<String>,
        language: Language,
        node_type: impl Into<String>,
        position: ChunkPosition,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            language,
            node_type: node_type.into(),
            symbol_name: None,
            position,
            dependencies: BTreeSet::new(),
            chunk_id: String::new(),
            error: None,
        }
    }

    /// Builder: set symbol name
    #[must_use]
    pub fn symbol_name(mut self, name: Option<String>) -> Self {
        self.symbol_name = name;
        self
    }
}

/// Where a chunk sits in its file; each chunker uses its own scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChunkPosition {
    /// 1-indexed inclusive line span (syntax chunks)
    Lines { start_line: usize, end_line: usize },
    /// Markdown section sequence number
    Section { section_id: usize },
    /// Text window index
    Block { block_id: usize },
    /// No position (error fallback)
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_chunk() -> Chunk {
        let mut metadata = ChunkMetadata::new(
            "src/lib.rs",
            Language::Rust,
            "function_item",
            ChunkPosition::Lines {
                start_line: 3,
                end_line: 7,
            },
        )
        .symbol_name(Some("run".to_string()));
        metadata.dependencies = ["std::fmt".to_string(), "serde".to_string()]
            .into_iter()
            .collect();
        metadata.chunk_id = "src/lib.rs::chunk0".to_string();
        Chunk::new("fn run() {}".to_string(), metadata)
    }

    #[test]
    fn test_line_range() {
        assert_eq!(code_chunk().line_range(), Some((3, 7)));

        let section = Chunk::new(
            "# Title".to_string(),
            ChunkMetadata::new(
                "README.md",
                Language::Markdown,
                NODE_TYPE_SECTION,
                ChunkPosition::Section { section_id: 0 },
            ),
        );
        assert_eq!(section.line_range(), None);
        assert!(!section.is_error_fallback());
    }

    #[test]
    fn test_flat_metadata() {
        let flat = code_chunk().flat_metadata();
        assert_eq!(flat["file_path"], "src/lib.rs");
        assert_eq!(flat["language"], "rust");
        assert_eq!(flat["node_type"], "function_item");
        assert_eq!(flat["symbol_name"], "run");
        assert_eq!(flat["start_line"], "3");
        assert_eq!(flat["end_line"], "7");
        assert_eq!(flat["dependencies"], r#"["serde","std::fmt"]"#);
        assert_eq!(flat["chunk_id"], "src/lib.rs::chunk0");
        assert!(!flat.contains_key("error"));
        assert!(!flat.contains_key("section_id"));
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(code_chunk()).unwrap();
        assert_eq!(value["metadata"]["language"], "rust");
        assert_eq!(value["metadata"]["position"]["kind"], "lines");
        assert_eq!(value["metadata"]["position"]["start_line"], 3);
        assert_eq!(
            value["metadata"]["dependencies"],
            serde_json::json!(["serde", "std::fmt"])
        );
        assert!(value["metadata"].get("error").is_none());

        let back: Chunk = serde_json::from_value(value).unwrap();
        assert_eq!(back, code_chunk());
    }
}
