use crate::language::Language;
use crate::types::{Chunk, ChunkMetadata, ChunkPosition, NODE_TYPE_BLOCK};

/// Fixed line-window chunker for plain text
pub struct TextChunker {
    lines_per_block: usize,
}

impl TextChunker {
    pub const fn new(lines_per_block: usize) -> Self {
        Self { lines_per_block }
    }

    /// Windows are trimmed; blank windows are dropped without renumbering
    pub fn chunk(&self, file_path: &str, content: &str) -> Vec<Chunk> {
        let lines: Vec<&str> = content.lines().collect();

        lines
            .chunks(self.lines_per_block.max(1))
            .enumerate()
            .filter_map(|(block_id, window)| {
                let block = window.join("\n");
                let block = block.trim();
                if block.is_empty() {
                    return None;
                }
                Some(Chunk::new(
                    block.to_string(),
                    ChunkMetadata::new(
                        file_path,
                        Language::Text,
                        NODE_TYPE_BLOCK,
                        ChunkPosition::Block { block_id },
                    ),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_content(lines: usize) -> String {
        (0..lines)
            .map(|i| format!("line number {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn block_ids(chunks: &[Chunk]) -> Vec<usize> {
        chunks
            .iter()
            .map(|c| match c.metadata.position {
                ChunkPosition::Block { block_id } => block_id,
                other => panic!("unexpected position {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_windows_of_eighty_lines() {
        let content = create_test_content(200);
        let chunks = TextChunker::new(80).chunk("notes.txt", &content);

        assert_eq!(chunks.len(), 3);
        assert_eq!(block_ids(&chunks), vec![0, 1, 2]);
        assert_eq!(chunks[0].content.lines().count(), 80);
        assert_eq!(chunks[2].content.lines().count(), 40);
        assert!(chunks[1].content.starts_with("line number 80"));
        for chunk in &chunks {
            assert_eq!(chunk.metadata.node_type, "block");
            assert_eq!(chunk.metadata.language, Language::Text);
            assert_eq!(chunk.metadata.symbol_name, None);
        }
    }

    #[test]
    fn test_short_file_is_one_trimmed_block() {
        let chunks = TextChunker::new(80).chunk("short.txt", "\n  hello\nworld  \n\n");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "hello\nworld");
        assert_eq!(block_ids(&chunks), vec![0]);
    }

    #[test]
    fn test_blank_windows_leave_gaps() {
        let mut content = create_test_content(80);
        content.push('\n');
        content.push_str(&"   \n".repeat(80));
        content.push_str("tail");
        let chunks = TextChunker::new(80).chunk("gaps.txt", &content);

        assert_eq!(block_ids(&chunks), vec![0, 2]);
        assert_eq!(chunks[1].content, "tail");
    }

    #[test]
    fn test_blank_file_yields_nothing() {
        assert!(TextChunker::new(80).chunk("empty.txt", "").is_empty());
        assert!(TextChunker::new(80).chunk("blank.txt", " \n\n\t").is_empty());
    }
}
