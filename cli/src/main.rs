//! MedCheck runner.
//!
//! Walks a processed medical article sentence by sentence, verifies each
//! checkable claim against the indexed guideline corpus, and prints the
//! resulting transcript as JSON.
//!
//! Usage:
//!   medcheck --article input/processed_article.json \
//!            --index-host https://medical-guidelines.example.pinecone.io \
//!            --namespace asthma
//!
//! Keys come from the environment: OPENAI_API_KEY for chat/embeddings,
//! INDEX_API_KEY for the vector index.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use medcheck_ai::chat::openai_chat::OpenAiChat;
use medcheck_ai::config::AgentConfig;
use medcheck_ai::embeddings::openai_embed::OpenAiEmbedder;
use medcheck_ai::retrieve::RemoteGuidelineIndex;
use medcheck_ai::walk::Walker;
use medcheck_core::article::load_article;
use medcheck_core::error::AppError;

/// Verify a medical article against an indexed guideline corpus.
#[derive(Parser)]
#[command(name = "medcheck", about = "Sentence-level guideline verification of medical articles")]
struct Cli {
    /// Path to the processed article JSON (preprocessing output).
    #[arg(long)]
    article: PathBuf,

    /// Vector index host for the guideline corpus.
    #[arg(long)]
    index_host: String,

    /// Corpus namespace within the index (e.g. "asthma").
    #[arg(long)]
    namespace: String,

    /// OpenAI-compatible base URL for chat and embeddings.
    #[arg(long, default_value = "https://api.openai.com")]
    chat_base_url: String,

    /// Chat model for sentence classification.
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Chat model for the verdict reasoning step.
    #[arg(long, default_value = "deepseek-chat")]
    reasoning_model: String,

    /// Embedding model for guideline queries.
    #[arg(long, default_value = "text-embedding-3-small")]
    embed_model: String,

    /// Passages requested per guideline search.
    #[arg(long, default_value_t = 3)]
    top_k: u32,

    /// Override the system prompt framing the verification conversation.
    #[arg(long)]
    system_prompt: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("medcheck: {e}");
            if let Some(details) = &e.details {
                eprintln!("  {details}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    // The article load is the only fatal step; everything after degrades
    // in place and still yields a full transcript.
    let article = load_article(&cli.article)?;
    tracing::info!(
        title = %article.metadata.title,
        language = %article.metadata.language,
        sentences = article.len(),
        "article loaded"
    );

    let openai_key = require_env("OPENAI_API_KEY")?;
    let index_key = require_env("INDEX_API_KEY")?;

    let chat = OpenAiChat::new(&cli.chat_base_url, openai_key.clone());
    let embedder = OpenAiEmbedder::new(&cli.chat_base_url, openai_key);
    let index = RemoteGuidelineIndex::new(
        &cli.index_host,
        index_key,
        cli.namespace,
        cli.embed_model.clone(),
        Box::new(embedder),
    );

    let mut config = AgentConfig {
        model: cli.model,
        reasoning_model: cli.reasoning_model,
        embed_model: cli.embed_model,
        top_k: cli.top_k,
        ..AgentConfig::default()
    };
    if let Some(prompt) = cli.system_prompt {
        config.system_prompt = prompt;
    }

    let transcript = Walker::new(&article, &chat, &index, &config).run();

    let out = serde_json::to_string_pretty(&transcript).map_err(|e| {
        AppError::new("TRANSCRIPT_ENCODE_FAILED", "Failed to encode transcript")
            .with_details(e.to_string())
    })?;
    println!("{out}");
    Ok(())
}

fn require_env(name: &str) -> Result<String, AppError> {
    std::env::var(name).map_err(|_| {
        AppError::new("MISSING_ENV", "Required environment variable is not set")
            .with_details(format!("var={name}"))
    })
}
