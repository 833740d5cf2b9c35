use crate::error::{ChunkerError, Result};
use crate::grammar::GrammarProfile;
use crate::types::{Chunk, ChunkMetadata, ChunkPosition, NODE_TYPE_FILE};
use std::path::Path;
use tree_sitter::Node;

/// Syntax-tree chunker: one chunk per definition node
pub struct AstAnalyzer<'g> {
    profile: &'g GrammarProfile,
    parse_timeout_micros: u64,
}

impl<'g> AstAnalyzer<'g> {
    pub const fn new(profile: &'g GrammarProfile, parse_timeout_micros: u64) -> Self {
        Self {
            profile,
            parse_timeout_micros,
        }
    }

    /// Parse and chunk code using the syntax tree
    pub fn chunk(&self, content: &str, file_path: &str) -> Result<Vec<Chunk>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut parser = self.profile.parser()?;
        if self.parse_timeout_micros > 0 {
            parser.set_timeout_micros(self.parse_timeout_micros);
        }

        let tree = parser.parse(content, None).ok_or_else(|| {
            if self.parse_timeout_micros > 0 {
                ChunkerError::ParseTimeout {
                    micros: self.parse_timeout_micros,
                }
            } else {
                ChunkerError::parse("Failed to parse source code")
            }
        })?;

        let root = tree.root_node();
        if root.has_error() {
            log::debug!("{file_path}: syntax errors, walking best-effort tree");
        }

        let mut chunks = Vec::new();
        self.extract_chunks(content, file_path, root, &mut chunks)?;

        if chunks.is_empty() {
            log::debug!("{file_path}: no definitions, emitting whole-file chunk");
            chunks.push(self.fallback_chunk(content, file_path));
        }

        Ok(chunks)
    }

    /// Pre-order walk over every node; siblings stay in document order
    fn extract_chunks(
        &self,
        content: &str,
        file_path: &str,
        root: Node,
        chunks: &mut Vec<Chunk>,
    ) -> Result<()> {
        let mut cursor = root.walk();

        'walk: loop {
            let node = cursor.node();
            if self.profile.is_definition(node.kind()) && node.end_byte() > node.start_byte() {
                chunks.push(self.node_to_chunk(content, file_path, node)?);
            }

            if cursor.goto_first_child() {
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        Ok(())
    }

    /// Convert a definition node to a chunk
    fn node_to_chunk(&self, content: &str, file_path: &str, node: Node) -> Result<Chunk> {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();
        let text = content.get(start_byte..end_byte).ok_or_else(|| {
            ChunkerError::parse(format!(
                "node {} spans invalid byte range {start_byte}..{end_byte}",
                node.kind()
            ))
        })?;

        let position = ChunkPosition::Lines {
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
        };

        let kind = node.kind();
        let metadata = ChunkMetadata::new(file_path, self.profile.language(), kind, position)
            .symbol_name(self.profile.symbol_name(kind, text));

        Ok(Chunk::new(text.to_string(), metadata))
    }

    /// Whole-file chunk when the tree holds no definitions
    fn fallback_chunk(&self, content: &str, file_path: &str) -> Chunk {
        let base_name = Path::new(file_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(file_path)
            .to_string();

        let position = ChunkPosition::Lines {
            start_line: 1,
            end_line: content.lines().count().max(1),
        };

        let metadata =
            ChunkMetadata::new(file_path, self.profile.language(), NODE_TYPE_FILE, position)
                .symbol_name(Some(base_name));

        Chunk::new(content.to_string(), metadata)
    }
}
