use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Default per-file cap; larger files are skipped before reading.
pub const MAX_FILE_SIZE_BYTES: u64 = 1_048_576;

/// Extensions picked up by a directory walk (compared case-insensitively).
const INGEST_EXTENSIONS: &[&str] = &[
    // Code
    "py", "pyi", "pyw", "js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts", "java", "c", "h",
    "cc", "cpp", "cxx", "hh", "hpp", "hxx", "go", "rs",
    // Documentation
    "md", "markdown", "txt",
    // Data / config, chunked as plain text
    "json", "yaml", "yml", "toml",
];

/// Directory names never descended into, on top of hidden and gitignored paths.
const IGNORED_SCOPES: &[&str] = &[
    "node_modules",
    "target",
    "build",
    "dist",
    "vendor",
    "__pycache__",
    "venv",
    ".venv",
    ".git",
];

/// Walks a project tree and yields `(relative_path, content)` pairs for chunking.
pub struct FileSource {
    root: PathBuf,
    max_file_bytes: u64,
}

impl FileSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_file_bytes: MAX_FILE_SIZE_BYTES,
        }
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    /// Scan for ingestible files (.gitignore aware), sorted by path.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(move |entry| !is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !is_ingestible(path) {
                        continue;
                    }

                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > self.max_file_bytes {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                self.max_file_bytes
                            );
                            continue;
                        }
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} files under {}", files.len(), self.root.display());
        files
    }

    /// Read every scanned file. Unreadable files are logged and skipped;
    /// invalid UTF-8 is replaced rather than rejected.
    pub fn load(&self) -> Result<Vec<(String, String)>> {
        if self.root.is_file() {
            let content = read_lossy(&self.root)
                .with_context(|| format!("Failed to read {}", self.root.display()))?;
            let name = self
                .root
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.root.display().to_string());
            return Ok(vec![(name, content)]);
        }

        if !self.root.is_dir() {
            anyhow::bail!("Path does not exist: {}", self.root.display());
        }

        let mut loaded = Vec::new();
        for path in self.scan() {
            match read_lossy(&path) {
                Ok(content) => loaded.push((self.relative_path(&path), content)),
                Err(e) => log::warn!("Skipping unreadable file {}: {e}", path.display()),
            }
        }
        Ok(loaded)
    }

    fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn is_ingestible(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .is_some_and(|ext| INGEST_EXTENSIONS.iter().any(|candidate| *candidate == ext))
}

fn is_ignored_scope(path: &Path, root: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|component| match component {
        Component::Normal(name) => {
            let lowered = name.to_string_lossy().to_lowercase();
            IGNORED_SCOPES.iter().any(|ignored| *ignored == lowered)
        }
        _ => false,
    })
}
