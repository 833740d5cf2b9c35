use anyhow::Result;
use clap::ValueEnum;
use code_rag_chunker::Chunk;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of chunks
    #[default]
    Json,
    /// One chunk per line
    Jsonl,
    /// One `{id, document, metadata}` record per line with string-only metadata
    Flat,
}

/// Record shape accepted by vector stores that only take scalar metadata.
#[derive(Debug, Serialize)]
struct FlatRecord<'a> {
    id: &'a str,
    document: &'a str,
    metadata: BTreeMap<String, String>,
}

pub fn render(chunks: &[Chunk], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(chunks)?,
        OutputFormat::Jsonl => chunks
            .iter()
            .map(serde_json::to_string)
            .collect::<serde_json::Result<Vec<_>>>()?
            .join("\n"),
        OutputFormat::Flat => chunks
            .iter()
            .map(|chunk| {
                serde_json::to_string(&FlatRecord {
                    id: &chunk.metadata.chunk_id,
                    document: &chunk.content,
                    metadata: chunk.flat_metadata(),
                })
            })
            .collect::<serde_json::Result<Vec<_>>>()?
            .join("\n"),
    };
    Ok(rendered)
}

/// Write to stdout, treating a closed pipe (`| head`) as success.
pub fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use code_rag_chunker::{ChunkMetadata, ChunkPosition, Language};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn sample() -> Vec<Chunk> {
        let mut metadata = ChunkMetadata::new(
            "a.py",
            Language::Python,
            "function_definition",
            ChunkPosition::Lines {
                start_line: 1,
                end_line: 2,
            },
        )
        .symbol_name(Some("f".to_string()));
        metadata.chunk_id = "a.py::chunk0".to_string();
        metadata.dependencies.insert("os".to_string());
        vec![Chunk::new("def f():\n    pass".to_string(), metadata)]
    }

    #[test]
    fn jsonl_emits_one_object_per_line() {
        let mut chunks = sample();
        chunks.extend(sample());
        let rendered = render(&chunks, OutputFormat::Jsonl).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["metadata"]["symbol_name"], "f");
    }

    #[test]
    fn flat_records_carry_string_metadata() {
        let rendered = render(&sample(), OutputFormat::Flat).unwrap();
        let record: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(record["id"], "a.py::chunk0");
        assert_eq!(record["document"], "def f():\n    pass");
        let metadata = record["metadata"].as_object().unwrap();
        assert!(metadata.values().all(Value::is_string));
        assert_eq!(metadata["dependencies"], "[\"os\"]");
    }

    #[test]
    fn empty_json_is_an_empty_array() {
        assert_eq!(render(&[], OutputFormat::Json).unwrap(), "[]");
    }
}
