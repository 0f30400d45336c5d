// aitranslator - translate text or detect its language with an LLM

use aitranslator::config::{ProviderConfig, TranslatorConfig};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model identifier (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// API key (overrides config and environment)
    #[arg(long)]
    api_key: Option<String>,

    /// Maximum chunk length in characters (overrides config)
    #[arg(long)]
    max_chunk_length: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate text into another language
    Translate {
        /// Target language as an ISO 639-1 code
        #[arg(short, long)]
        to: String,

        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Detect the language of a text
    Detect {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = TranslatorConfig::load(args.config.as_deref())?;

    // Apply CLI overrides
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(length) = args.max_chunk_length {
        config.max_chunk_length = length;
    }
    if let Some(key) = args.api_key {
        match &mut config.provider {
            ProviderConfig::OpenAi { api_key, .. } | ProviderConfig::Azure { api_key, .. } => {
                *api_key = Some(key);
            }
        }
    }

    let translator = config
        .with_env_fallbacks()
        .build()
        .context("failed to configure translator")?;

    match args.command {
        Command::Translate { to, file } => {
            let text = read_input(file.as_ref())?;
            let translated = translator.translate(&text, &to).await?;
            println!("{}", translated);
        }
        Command::Detect { file } => {
            let text = read_input(file.as_ref())?;
            let detected = translator.detect_language(&text).await?;
            println!("{}\t{}", detected.iso_code, detected.display_name);
        }
    }

    Ok(())
}
