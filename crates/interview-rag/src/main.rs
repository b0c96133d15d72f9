mod chat;
mod config;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use interview_rag_catalog::{format_context, search, CatalogStore};
use interview_rag_core::ConversationController;
use interview_rag_logging::{init_tracing, LogEvent, LogFormat, Logger};
use interview_rag_synthesis::{GeminiClient, GeminiConfig, Synthesizer, API_KEY_ENV};

use crate::config::{AssistantConfig, Overrides, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "interview-rag",
    about = "Ask about tech interview questions, grounded in a curated catalog",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to a config file (default: ./interview-rag.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gemini model to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Maximum keyword matches per company
    #[arg(long, global = true)]
    max_matches: Option<usize>,

    /// Seconds to wait for the model before giving up
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatChoice,

    /// Diagnostic log level (RUST_LOG overrides)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Output the transcript as JSON
        #[arg(long)]
        json_output: bool,
    },
    /// Show which catalog entries a query retrieves, without calling the model
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Output the matches as JSON
        #[arg(long)]
        json_output: bool,
    },
    /// List the companies in the catalog
    Companies,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.into();
    init_tracing(&cli.log_level, log_format);

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let file = AssistantConfig::discover(cli.config.as_deref(), &working_dir)?;
    if let Some((ref path, _)) = file {
        tracing::debug!(path = %path.display(), "Loaded config file");
    }
    let overrides = Overrides {
        model: cli.model.clone(),
        max_matches: cli.max_matches,
        timeout_secs: cli.timeout_secs,
    };
    let settings = Settings::resolve(&overrides, file.as_ref().map(|(_, config)| config));

    let store = Arc::new(CatalogStore::builtin().context("Failed to load the built-in catalog")?);

    match cli.command.unwrap_or(Command::Chat) {
        Command::Companies => {
            render::print_companies(&store);
            Ok(())
        }
        Command::Search { query, json_output } => {
            let query = query.join(" ");
            let groups = search(&query, &store, settings.max_matches);
            if json_output {
                let json = serde_json::json!({
                    "query": query,
                    "groups": groups,
                    "context": format_context(&groups),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else if groups.is_empty() {
                println!("No catalog entries matched.");
            } else {
                for group in &groups {
                    render::print_group(group);
                }
            }
            Ok(())
        }
        Command::Ask { query, json_output } => {
            let controller = build_controller(store, &settings, log_format)?;
            let outcome = controller.submit(&query.join(" ")).await;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&controller.turns())?);
            } else if let Some(turn) = controller.turns().last() {
                render::print_answer(turn);
            }

            std::process::exit(outcome.exit_code());
        }
        Command::Chat => {
            let controller = build_controller(store, &settings, log_format)?;
            let input = chat::spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
            chat::run(controller, input).await
        }
    }
}

/// Wire the Gemini client into a controller and install the Ctrl+C handler
fn build_controller(
    store: Arc<CatalogStore>,
    settings: &Settings,
    log_format: LogFormat,
) -> Result<Arc<ConversationController>> {
    let client = GeminiClient::new(settings.apply(GeminiConfig::from_env()));
    if !client.is_configured() {
        tracing::warn!(
            "{} is not set; questions will be answered with a configuration notice",
            API_KEY_ENV
        );
    }

    let logger = Arc::new(Logger::new(log_format));
    logger.log(&LogEvent::SessionStarted {
        companies: store.len(),
        questions: store.question_count(),
        synthesizer: client.name().to_string(),
        configured: client.is_configured(),
    });

    let controller = Arc::new(
        ConversationController::new(store, Arc::new(client), logger).with_max_matches(settings.max_matches),
    );

    let shutdown = controller.shutdown_token();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted. Cancelling...");
        shutdown.cancel();
    })
    .context("Failed to set Ctrl+C handler")?;

    Ok(controller)
}
