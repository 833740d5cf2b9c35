//! # Code RAG Chunker
//!
//! Splits source code and documentation into chunks for embedding and
//! retrieval.
//!
//! ## Architecture
//!
//! ```text
//! (path, content)
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> Dependency Extraction (imports, includes, links)
//!     │
//!     ├──> Chunking by tag
//!     │    ├─> code:     Tree-sitter parse → one chunk per definition
//!     │    ├─> markdown: heading sections → word-budget packing
//!     │    └─> text:     fixed line windows
//!     │
//!     └──> Assembly
//!          ├─> Stamp dependencies and chunk ids
//!          └─> Fold per-file failures into error fallback chunks
//! ```
//!
//! ## Example
//!
//! ```rust
//! use code_rag_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
//!
//! let code = "def a():\n    pass\n\ndef b():\n    pass\n";
//! let chunks = chunker.chunk_file("foo.py", code).unwrap();
//! for chunk in &chunks {
//!     println!("{} {:?} {:?}",
//!              chunk.metadata.chunk_id, chunk.metadata.symbol_name, chunk.line_range());
//! }
//! assert_eq!(chunks.len(), 2);
//! ```

mod ast_analyzer;
mod chunker;
mod config;
mod dependencies;
mod error;
mod grammar;
mod language;
mod markdown;
mod text;
mod types;

pub use chunker::{Chunker, ChunkingStats};
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use grammar::{GrammarProfile, GrammarRegistry};
pub use language::{detect_language, Language};
pub use types::{
    Chunk, ChunkMetadata, ChunkPosition, NODE_TYPE_BLOCK, NODE_TYPE_ERROR_FALLBACK,
    NODE_TYPE_FILE, NODE_TYPE_SECTION,
};
