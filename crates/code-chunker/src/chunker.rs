use crate::ast_analyzer::AstAnalyzer;
use crate::config::ChunkerConfig;
use crate::dependencies::DependencyExtractor;
use crate::error::{ChunkerError, Result};
use crate::grammar::GrammarRegistry;
use crate::language::Language;
use crate::markdown::MarkdownChunker;
use crate::text::TextChunker;
use crate::types::{Chunk, ChunkMetadata, ChunkPosition, NODE_TYPE_ERROR_FALLBACK};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Main chunker interface for processing files
pub struct Chunker {
    config: ChunkerConfig,
    grammars: GrammarRegistry,
    dependencies: DependencyExtractor,
}

impl Chunker {
    /// Create a chunker, loading every grammar up front
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        let grammars = GrammarRegistry::load()?;
        Self::with_grammars(config, grammars)
    }

    /// Create a chunker from an already loaded grammar registry
    pub fn with_grammars(config: ChunkerConfig, grammars: GrammarRegistry) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self {
            config,
            grammars,
            dependencies: DependencyExtractor::new()?,
        })
    }

    /// Sorted, deduplicated imports/includes declared in `content`
    pub fn extract_dependencies(&self, language: Language, content: &str) -> BTreeSet<String> {
        self.dependencies.extract(language, content)
    }

    /// Chunk code by definition nodes of its syntax tree
    pub fn chunk_code(
        &self,
        file_path: &str,
        content: &str,
        language: Language,
    ) -> Result<Vec<Chunk>> {
        let profile = self.grammars.get(language)?;
        AstAnalyzer::new(profile, self.config.parse_timeout_micros).chunk(content, file_path)
    }

    /// Chunk markdown by headings and word budget
    pub fn chunk_markdown(&self, file_path: &str, content: &str) -> Vec<Chunk> {
        MarkdownChunker::new(self.config.markdown_max_words).chunk(file_path, content)
    }

    /// Chunk plain text into fixed line blocks
    pub fn chunk_text(&self, file_path: &str, content: &str) -> Vec<Chunk> {
        TextChunker::new(self.config.text_lines_per_block).chunk(file_path, content)
    }

    /// Chunk a single file and stamp dependencies and chunk ids
    pub fn chunk_file(&self, file_path: &str, content: &str) -> Result<Vec<Chunk>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        if let Some(offset) = content.find('\0') {
            return Err(ChunkerError::BinaryContent { offset });
        }

        let language = Language::from_path(file_path);
        let dependencies = self.extract_dependencies(language, content);

        let mut chunks = match language {
            code if code.supports_ast() => self.chunk_code(file_path, content, code)?,
            Language::Markdown => self.chunk_markdown(file_path, content),
            _ => self.chunk_text(file_path, content),
        };

        for (idx, chunk) in chunks.iter_mut().enumerate() {
            chunk.metadata.dependencies = dependencies.clone();
            chunk.metadata.chunk_id = format!("{file_path}::chunk{idx}");
        }

        log::debug!(
            "{file_path}: {language}, {} chunks, {} dependencies",
            chunks.len(),
            dependencies.len()
        );
        Ok(chunks)
    }

    /// Chunk a file set; a failing file becomes one error fallback chunk
    pub fn chunk_codebase(&self, files: &[(String, String)]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = files
            .iter()
            .flat_map(|(path, content)| self.chunk_file_or_fallback(path, content))
            .collect();
        log_summary(files.len(), &chunks);
        chunks
    }

    /// Same output as [`Chunker::chunk_codebase`], files processed in parallel
    pub fn chunk_codebase_parallel(&self, files: &[(String, String)]) -> Vec<Chunk> {
        let per_file: Vec<Vec<Chunk>> = files
            .par_iter()
            .map(|(path, content)| self.chunk_file_or_fallback(path, content))
            .collect();
        let chunks: Vec<Chunk> = per_file.into_iter().flatten().collect();
        log_summary(files.len(), &chunks);
        chunks
    }

    fn chunk_file_or_fallback(&self, file_path: &str, content: &str) -> Vec<Chunk> {
        match self.chunk_file(file_path, content) {
            Ok(chunks) => chunks,
            Err(err) => {
                log::warn!("Chunking {file_path} failed, keeping a preview: {err}");
                vec![self.error_fallback(file_path, content, &err)]
            }
        }
    }

    fn error_fallback(&self, file_path: &str, content: &str, err: &ChunkerError) -> Chunk {
        let preview: String = content.chars().take(self.config.error_preview_chars).collect();
        let mut metadata = ChunkMetadata::new(
            file_path,
            Language::Text,
            NODE_TYPE_ERROR_FALLBACK,
            ChunkPosition::None,
        );
        metadata.chunk_id = format!("{file_path}::error0");
        metadata.error = Some(err.to_string());
        Chunk::new(preview, metadata)
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Get loaded grammars
    #[must_use]
    pub const fn grammars(&self) -> &GrammarRegistry {
        &self.grammars
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(chunks: &[Chunk]) -> ChunkingStats {
        ChunkingStats::from_chunks(chunks)
    }
}

fn log_summary(files: usize, chunks: &[Chunk]) {
    let stats = ChunkingStats::from_chunks(chunks);
    log::info!("Chunked {files} files: {stats}");
}

/// Statistics about chunking results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub files: usize,
    pub error_fallbacks: usize,
    pub by_node_type: BTreeMap<String, usize>,
}

impl ChunkingStats {
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let mut files = BTreeSet::new();
        let mut by_node_type = BTreeMap::new();
        let mut error_fallbacks = 0;

        for chunk in chunks {
            files.insert(chunk.metadata.file_path.as_str());
            *by_node_type
                .entry(chunk.metadata.node_type.clone())
                .or_insert(0) += 1;
            if chunk.is_error_fallback() {
                error_fallbacks += 1;
            }
        }

        Self {
            total_chunks: chunks.len(),
            files: files.len(),
            error_fallbacks,
            by_node_type,
        }
    }
}

impl fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunks: {} | Files: {} | Errors: {}",
            self.total_chunks, self.files, self.error_fallbacks
        )?;
        for (node_type, count) in &self.by_node_type {
            write!(f, " | {node_type}: {count}")?;
        }
        Ok(())
    }
}
