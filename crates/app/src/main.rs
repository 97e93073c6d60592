use clap::{Parser, Subcommand};
use chrono::Utc;
use doc_qa_core::{
    build_collections_best_effort, AnswerCoordinator, AnsweringService, CharacterNgramEmbedder,
    CollectionSpec, Embedder, FinalAnswer, OpenAiChatModel, OpenAiConfig, OpenAiEmbedder,
    QaOptions, RetrievalAgent, Retriever, DEFAULT_API_BASE, NOT_FOUND_MESSAGE,
};
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "doc-qa", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Document collection as NAME=path.pdf; repeat for multiple collections.
    #[arg(long = "collection", value_name = "NAME=PATH", required = true)]
    collections: Vec<String>,

    /// Number of chunks retrieved per collection.
    #[arg(long, default_value = "4")]
    top_k: usize,

    /// Maximum chunk length in characters.
    #[arg(long, default_value = "500")]
    chunk_size: usize,

    /// Overlap between neighboring chunks in characters.
    #[arg(long, default_value = "50")]
    chunk_overlap: usize,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// API key; prompted for interactively when absent.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Embedding model name.
    #[arg(long, default_value = "text-embedding-3-small")]
    embedding_model: String,

    /// Embedding vector dimension emitted by the embedding model.
    #[arg(long, default_value = "1536")]
    embedding_dimensions: usize,

    /// Chat model used for summarization.
    #[arg(long, default_value = "gpt-4o-mini")]
    chat_model: String,

    /// Timeout in seconds for each embedding/model call.
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Embed with the deterministic local character-ngram embedder instead
    /// of the remote embedding endpoint.
    #[arg(long, default_value_t = false)]
    local_embeddings: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a single question and exit.
    Ask {
        /// The question to answer.
        #[arg(long)]
        query: String,
    },
    /// Interactive question loop; type 'exit' to quit.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let specs = cli
        .collections
        .iter()
        .map(|raw| CollectionSpec::parse(raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    let api_key = match cli.api_key.clone() {
        Some(key) if !key.trim().is_empty() => key.trim().to_string(),
        _ => prompt_api_key()?,
    };

    let service_config = OpenAiConfig::new(
        cli.api_base.clone(),
        api_key,
        Duration::from_secs(cli.timeout_secs),
    );

    let embedder: Arc<dyn Embedder + Send + Sync> = if cli.local_embeddings {
        Arc::new(CharacterNgramEmbedder::default())
    } else {
        Arc::new(
            OpenAiEmbedder::new(
                service_config.clone(),
                &cli.embedding_model,
                cli.embedding_dimensions,
            )
            .map_err(|error| anyhow::anyhow!(error.to_string()))?,
        )
    };

    let options = QaOptions {
        chunk_max_chars: cli.chunk_size,
        chunk_overlap_chars: cli.chunk_overlap,
        top_k: cli.top_k,
    };

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        collections = specs.len(),
        "doc-qa boot"
    );

    let report = build_collections_best_effort(&specs, &options, embedder)
        .await
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    for skipped in &report.skipped {
        warn!(
            collection = %skipped.name,
            path = %skipped.path,
            reason = %skipped.reason,
            "collection excluded at startup"
        );
    }

    if report.collections.is_empty() {
        anyhow::bail!("no usable collections: every configured document failed to load");
    }

    let retrievers: Vec<Box<dyn Retriever + Send + Sync>> = report
        .collections
        .into_iter()
        .map(|collection| {
            info!(
                collection = %collection.fingerprint.name,
                chunks = collection.fingerprint.chunk_count,
                checksum = %collection.fingerprint.checksum,
                "collection ready"
            );
            Box::new(RetrievalAgent::new(
                collection.fingerprint.name,
                collection.index,
                options.top_k,
            )) as Box<dyn Retriever + Send + Sync>
        })
        .collect();

    let chat_model = OpenAiChatModel::new(service_config, &cli.chat_model)
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;
    let coordinator = AnswerCoordinator::new(retrievers, AnsweringService::new(chat_model));

    match cli.command {
        Command::Ask { query } => {
            let answer = coordinator.answer(&query).await;
            println!("{}", render(&answer));
        }
        Command::Chat => {
            println!("Ask a question about the loaded documents. Type 'exit' to quit.");
            let stdin = std::io::stdin();
            loop {
                print!("> ");
                std::io::stdout().flush()?;

                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }

                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                if query.eq_ignore_ascii_case("exit") {
                    break;
                }

                let answer = coordinator.answer(query).await;
                println!("{}\n", render(&answer));
            }
        }
    }

    Ok(())
}

/// Reads the API key from the terminal when it is not in the environment.
/// The key stays in memory; it is never logged.
fn prompt_api_key() -> anyhow::Result<String> {
    eprint!("Enter API key: ");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let key = line.trim().to_string();
    if key.is_empty() {
        anyhow::bail!("an API key is required (flag, OPENAI_API_KEY, or prompt)");
    }
    Ok(key)
}

fn render(answer: &FinalAnswer) -> String {
    match answer {
        FinalAnswer::Answered { source, answer } => {
            format!("Source: {source}\n\nAnswer:\n{answer}")
        }
        FinalAnswer::NotFound => NOT_FOUND_MESSAGE.to_string(),
        FinalAnswer::Unavailable { reason } => {
            format!("Could not produce an answer: {reason}")
        }
    }
}
