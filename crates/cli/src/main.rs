use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use code_rag_chunker::{detect_language, Chunker, ChunkerConfig, Language};
use output::{print_stdout, render, OutputFormat};
use scanner::{FileSource, MAX_FILE_SIZE_BYTES};
use std::fs;
use std::path::{Path, PathBuf};

mod output;
mod scanner;

#[derive(Parser)]
#[command(name = "code-rag")]
#[command(about = "Split source trees into retrieval-ready chunks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a file or directory tree and print the chunks
    Chunk(ChunkArgs),

    /// Print detected language and dependencies for each file
    Detect {
        /// Files to classify
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List languages with a loaded syntax grammar
    Grammars,
}

#[derive(Args)]
struct ChunkArgs {
    /// File or directory to chunk
    path: PathBuf,

    /// TOML file with chunker settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in chunk size profile
    #[arg(long, value_enum, conflicts_with = "config")]
    preset: Option<Preset>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Word budget per markdown chunk
    #[arg(long)]
    markdown_max_words: Option<usize>,

    /// Lines per plain-text block
    #[arg(long)]
    text_lines: Option<usize>,

    /// Parse timeout per file in milliseconds (0 disables)
    #[arg(long)]
    parse_timeout_ms: Option<u64>,

    /// Skip files larger than this many bytes
    #[arg(long, default_value_t = MAX_FILE_SIZE_BYTES)]
    max_file_bytes: u64,

    /// Chunk files on all cores
    #[arg(long)]
    parallel: bool,

    /// Print chunk statistics to stderr when done
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Default budgets
    Default,
    /// Smaller chunks for embedding models
    Embeddings,
    /// Larger chunks for prompt context
    LlmContext,
}

impl Preset {
    fn config(self) -> ChunkerConfig {
        match self {
            Preset::Default => ChunkerConfig::default(),
            Preset::Embeddings => ChunkerConfig::for_embeddings(),
            Preset::LlmContext => ChunkerConfig::for_llm_context(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Chunk(args) => run_chunk(args),
        Commands::Detect { files } => run_detect(&files),
        Commands::Grammars => run_grammars(),
    }
}

fn run_chunk(args: ChunkArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let chunker = Chunker::new(config).context("Failed to initialize chunker")?;

    let files = FileSource::new(&args.path)
        .with_max_file_bytes(args.max_file_bytes)
        .load()?;

    let chunks = if args.parallel {
        chunker.chunk_codebase_parallel(&files)
    } else {
        chunker.chunk_codebase(&files)
    };

    if args.stats {
        eprintln!("{}", Chunker::get_stats(&chunks));
    }
    print_stdout(&render(&chunks, args.format)?)
}

fn resolve_config(args: &ChunkArgs) -> Result<ChunkerConfig> {
    let mut config = match (&args.config, args.preset) {
        (Some(path), _) => load_config(path)?,
        (None, Some(preset)) => preset.config(),
        (None, None) => ChunkerConfig::default(),
    };
    if let Some(words) = args.markdown_max_words {
        config.markdown_max_words = words;
    }
    if let Some(lines) = args.text_lines {
        config.text_lines_per_block = lines;
    }
    if let Some(ms) = args.parse_timeout_ms {
        config.parse_timeout_micros = ms.saturating_mul(1_000);
    }
    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

fn load_config(path: &Path) -> Result<ChunkerConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    ChunkerConfig::from_toml_str(&raw)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn run_detect(files: &[PathBuf]) -> Result<()> {
    let chunker = Chunker::new(ChunkerConfig::default())?;
    let mut lines = Vec::with_capacity(files.len());
    for path in files {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let content = String::from_utf8_lossy(&bytes);
        let language = detect_language(path);
        let deps: Vec<String> = chunker
            .extract_dependencies(language, &content)
            .into_iter()
            .collect();
        lines.push(format!("{}\t{}\t{}", path.display(), language, deps.join(",")));
    }
    print_stdout(&lines.join("\n"))
}

fn run_grammars() -> Result<()> {
    let chunker = Chunker::new(ChunkerConfig::default())?;
    let mut lines = Vec::new();
    for language in Language::CODE {
        let profile = chunker.grammars().get(language)?;
        lines.push(format!(
            "{}\t{}",
            profile.language(),
            language.definition_kinds().join(",")
        ));
    }
    print_stdout(&lines.join("\n"))
}
