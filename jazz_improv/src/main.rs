// jazz_improv CLI.
//
// Usage:
//   cargo run -p jazz_improv -- vocab --corpus data/corpus.txt [--output vocab.json]
//   cargo run -p jazz_improv -- sample --corpus data/corpus.txt [--config cfg.json]
//     [--seed N] [--batch-size M] [--window-length TX] [--output batch.json]
//   cargo run -p jazz_improv -- render --vocab vocab.json --indices "3 0 7"
//     [--config cfg.json]
//
// Log verbosity follows RUST_LOG (default `jazz_improv=info`).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jazz_improv::config::JazzConfig;
use jazz_improv::corpus::Corpus;
use jazz_improv::tones::render_tones;
use jazz_improv::vocab::Vocabulary;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "jazz_improv",
    version,
    about = "Build training tensors from a grammar corpus and render model output."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the vocabulary of a corpus
    Vocab(VocabArgs),
    /// Draw a batch of encoded windows
    Sample(SampleArgs),
    /// Render predicted indices as a tone string
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct VocabArgs {
    /// Corpus file, one abstract grammar per line
    #[arg(long)]
    corpus: PathBuf,
    /// Write the vocabulary here as JSON instead of printing it
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[arg(long)]
    corpus: PathBuf,
    /// JSON config; flags below override its sampler section
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    batch_size: Option<usize>,
    #[arg(long)]
    window_length: Option<usize>,
    /// Write the batch here as JSON instead of printing a summary
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Vocabulary JSON written by `vocab --output`
    #[arg(long)]
    vocab: PathBuf,
    /// Space-separated predicted indices
    #[arg(long)]
    indices: String,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jazz_improv=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match Cli::parse().command {
        Command::Vocab(args) => run_vocab(args),
        Command::Sample(args) => run_sample(args),
        Command::Render(args) => run_render(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<JazzConfig> {
    match path {
        Some(path) => JazzConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(JazzConfig::default()),
    }
}

fn load_corpus(path: &Path) -> Result<Corpus> {
    let corpus =
        Corpus::load(path).with_context(|| format!("loading corpus {}", path.display()))?;
    tracing::info!(
        symbols = corpus.len(),
        distinct = corpus.distinct_count(),
        "loaded corpus from {}",
        path.display()
    );
    Ok(corpus)
}

fn run_vocab(args: VocabArgs) -> Result<()> {
    let corpus = load_corpus(&args.corpus)?;
    let vocab = Vocabulary::from_corpus(&corpus);
    match args.output {
        Some(path) => {
            vocab
                .save(&path)
                .with_context(|| format!("writing vocabulary {}", path.display()))?;
            tracing::info!(size = vocab.len(), "wrote vocabulary to {}", path.display());
        }
        None => {
            for (i, symbol) in vocab.symbols().iter().enumerate() {
                println!("{i}\t{symbol}");
            }
        }
    }
    Ok(())
}

fn run_sample(args: SampleArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?.sampler;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(window_length) = args.window_length {
        config.window_length = window_length;
    }

    let corpus = load_corpus(&args.corpus)?;
    let vocab = Vocabulary::from_corpus(&corpus);
    let mut rng = config.rng();
    let batch = config
        .sampler()?
        .sample(&corpus, &vocab, &mut rng)
        .context("sampling corpus windows")?;

    match args.output {
        Some(path) => {
            let json = serde_json::to_vec(&batch)?;
            std::fs::write(&path, json)
                .with_context(|| format!("writing batch {}", path.display()))?;
            tracing::info!("wrote batch to {}", path.display());
        }
        None => {
            println!("inputs:  {:?}", batch.inputs.dim());
            println!("targets: {:?}", batch.targets.dim());
            println!("vocab:   {}", batch.vocab_size);
        }
    }
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?.render;
    let vocab = Vocabulary::load(&args.vocab)
        .with_context(|| format!("loading vocabulary {}", args.vocab.display()))?;
    let indices = args
        .indices
        .split_whitespace()
        .map(|tok| {
            tok.parse::<usize>()
                .with_context(|| format!("bad index {tok:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    println!("{}", render_tones(&indices, &vocab, &config)?);
    Ok(())
}
