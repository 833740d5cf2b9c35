use crate::language::Language;
use crate::types::{Chunk, ChunkMetadata, ChunkPosition, NODE_TYPE_SECTION};

/// Heading-aware markdown chunker with a word budget
pub struct MarkdownChunker {
    max_words: usize,
}

impl MarkdownChunker {
    pub const fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    pub fn chunk(&self, file_path: &str, content: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut section_id = 0;

        for section in split_sections(content) {
            if word_count(section) <= self.max_words {
                chunks.push(section_chunk(file_path, section.to_string(), section_id));
                section_id += 1;
                continue;
            }

            for packed in self.pack_paragraphs(section) {
                chunks.push(section_chunk(file_path, packed, section_id));
                section_id += 1;
            }
        }

        chunks
    }

    /// Greedily pack paragraphs while the word budget holds.
    /// A paragraph larger than the budget is emitted on its own.
    fn pack_paragraphs(&self, section: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut buffer: Vec<String> = Vec::new();
        let mut buffer_words = 0;

        for paragraph in split_paragraphs(section) {
            let words = word_count(&paragraph);
            if !buffer.is_empty() && buffer_words + words > self.max_words {
                out.push(buffer.join("\n\n"));
                buffer.clear();
                buffer_words = 0;
            }
            buffer_words += words;
            buffer.push(paragraph);
        }

        if !buffer.is_empty() {
            out.push(buffer.join("\n\n"));
        }

        out
    }
}

fn section_chunk(file_path: &str, content: String, section_id: usize) -> Chunk {
    Chunk::new(
        content,
        ChunkMetadata::new(
            file_path,
            Language::Markdown,
            NODE_TYPE_SECTION,
            ChunkPosition::Section { section_id },
        ),
    )
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split at ATX headings outside fenced code; sections are trimmed and
/// blank ones dropped. Text before the first heading is its own section.
fn split_sections(content: &str) -> Vec<&str> {
    let mut boundaries = vec![0];
    let mut fence: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
        } else if let Some(marker) = fence_marker(trimmed) {
            fence = Some(marker);
        } else if offset > 0 && is_atx_heading(line) {
            boundaries.push(offset);
        }
        offset += line.len();
    }
    boundaries.push(content.len());

    boundaries
        .windows(2)
        .map(|w| content[w[0]..w[1]].trim())
        .filter(|section| !section.is_empty())
        .collect()
}

fn fence_marker(line: &str) -> Option<&'static str> {
    if line.starts_with("```") {
        Some("```")
    } else if line.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// `#` to `######` at line start, followed by whitespace or end of line
fn is_atx_heading(line: &str) -> bool {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&level) {
        return false;
    }
    let rest = &line[level..];
    rest.is_empty() || rest.starts_with(char::is_whitespace)
}

fn split_paragraphs(section: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in section.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n").trim().to_string());
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n").trim().to_string());
    }

    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(n: usize, word: &str) -> String {
        vec![word; n].join(" ")
    }

    fn section_ids(chunks: &[Chunk]) -> Vec<usize> {
        chunks
            .iter()
            .map(|c| match c.metadata.position {
                ChunkPosition::Section { section_id } => section_id,
                other => panic!("unexpected position {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_sections_follow_headings() {
        let doc = "Intro text.\n\n# One\nalpha\n\n## Two\nbeta\n";
        let chunks = MarkdownChunker::new(400).chunk("README.md", doc);
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["Intro text.", "# One\nalpha", "## Two\nbeta"]);
        assert_eq!(section_ids(&chunks), vec![0, 1, 2]);
        for chunk in &chunks {
            assert_eq!(chunk.metadata.node_type, "section");
            assert_eq!(chunk.metadata.symbol_name, None);
            assert_eq!(chunk.metadata.language, Language::Markdown);
        }
    }

    #[test]
    fn test_no_headings_is_one_section() {
        let doc = "just some notes\nacross lines\n";
        let chunks = MarkdownChunker::new(400).chunk("notes.md", doc);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "just some notes\nacross lines");
    }

    #[test]
    fn test_hashes_without_space_and_fenced_code_are_not_headings() {
        let doc = "# Setup\n#hashtag stays\n```bash\n# install deps\nmake\n```\n####### seven\n";
        let chunks = MarkdownChunker::new(400).chunk("setup.md", doc);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].content.ends_with("####### seven"));
    }

    #[test]
    fn test_oversized_section_splits_on_budget() {
        let doc = format!("# Title\n\n{}\n", words(500, "word"));
        let chunks = MarkdownChunker::new(400).chunk("big.md", &doc);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "# Title");
        assert_eq!(word_count(&chunks[1].content), 500);
        assert_eq!(section_ids(&chunks), vec![0, 1]);
    }

    #[test]
    fn test_paragraph_packing() {
        let doc = format!(
            "# Title\n\n{}\n\n{}\n\n{}\n",
            words(150, "a"),
            words(150, "b"),
            words(150, "c")
        );
        let chunks = MarkdownChunker::new(400).chunk("pack.md", &doc);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].content.starts_with("# Title\n\na a"));
        assert!(chunks[0].content.contains("\n\nb b"));
        assert!(chunks[1].content.starts_with("c c"));
        for chunk in &chunks {
            assert!(word_count(&chunk.content) <= 400);
        }
    }

    #[test]
    fn test_section_ids_continue_across_sections() {
        let doc = format!("# A\n\n{}\n\n{}\n# B\nshort\n", words(300, "x"), words(300, "y"));
        let chunks = MarkdownChunker::new(400).chunk("ids.md", &doc);
        assert_eq!(chunks.len(), 3);
        assert_eq!(section_ids(&chunks), vec![0, 1, 2]);
        assert_eq!(chunks[2].content, "# B\nshort");
    }

    #[test]
    fn test_blank_document_yields_nothing() {
        assert!(MarkdownChunker::new(400).chunk("empty.md", "").is_empty());
        assert!(MarkdownChunker::new(400).chunk("blank.md", "\n  \n").is_empty());
    }

    #[test]
    fn test_concatenation_preserves_words() {
        let doc = format!(
            "Preface\n\n# H1\n{}\n\n{}\n\n## H2\ntail words here\n",
            words(250, "p"),
            words(250, "q")
        );
        let chunks = MarkdownChunker::new(400).chunk("round.md", &doc);
        let rebuilt: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.content.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect();
        let original: Vec<String> = doc.split_whitespace().map(str::to_string).collect();
        assert_eq!(rebuilt, original);
    }
}
