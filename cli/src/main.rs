use anyhow::Result;
use chatmatch_core::{load_knowledge, CorpusModel};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "chatmatch")]
#[command(about = "Match messages against a trigger/response knowledge base", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reply for a message
    Ask {
        /// Knowledge base file (.json / .jsonl) or directory
        #[arg(long)]
        kb: PathBuf,
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Print the top scored entries for a message as JSON lines
    Rank {
        #[arg(long)]
        kb: PathBuf,
        /// Number of entries to print
        #[arg(long, default_value_t = 5)]
        k: usize,
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Load a knowledge base and report its size
    Check {
        #[arg(long)]
        kb: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { kb, message } => {
            println!("{}", ask(&kb, &message.join(" "))?);
        }
        Commands::Rank { kb, k, message } => {
            for line in rank_lines(&kb, &message.join(" "), k)? {
                println!("{line}");
            }
        }
        Commands::Check { kb } => {
            let (entries, vocabulary) = check(&kb)?;
            tracing::info!(entries, vocabulary, "knowledge base ok");
        }
    }
    Ok(())
}

fn ask(kb: &Path, message: &str) -> Result<String> {
    let kb = load_knowledge(kb)?;
    let model = CorpusModel::build(&kb.entries);
    Ok(model.best_match(message).reply().to_string())
}

fn rank_lines(kb: &Path, message: &str, k: usize) -> Result<Vec<String>> {
    let kb = load_knowledge(kb)?;
    let model = CorpusModel::build(&kb.entries);
    model
        .rank(message)
        .into_iter()
        .take(k.max(1))
        .map(|entry| Ok::<_, anyhow::Error>(serde_json::to_string(&entry)?))
        .collect()
}

fn check(kb: &Path) -> Result<(usize, usize)> {
    let kb = load_knowledge(kb)?;
    let model = CorpusModel::build(&kb.entries);
    Ok((model.len(), model.vocabulary_size()))
}
