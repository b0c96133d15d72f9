use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use interview_rag_core::ConversationController;

use crate::render::{self, SUGGESTIONS};

/// One line of REPL input
#[derive(Debug, PartialEq, Eq)]
pub enum ChatInput {
    Help,
    Companies,
    /// `/suggest` lists starters; `/suggest N` asks the Nth one
    Suggest(Option<usize>),
    Quit,
    Unknown(String),
    Query(String),
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Self::Query(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match parts.next().unwrap_or_default() {
            "help" | "h" => Self::Help,
            "companies" => Self::Companies,
            "suggest" => Self::Suggest(parts.next().and_then(|n| n.parse().ok())),
            "quit" | "exit" | "q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Read lines on a plain OS thread so a blocked read never holds up runtime
/// shutdown. The channel closes at end of input.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in reader.lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run the interactive session until `/quit`, end of input or Ctrl+C
pub async fn run(
    controller: Arc<ConversationController>,
    mut input: mpsc::Receiver<std::io::Result<String>>,
) -> Result<()> {
    let shutdown = controller.shutdown_token();

    render::print_welcome(controller.store());

    loop {
        prompt().await?;

        let line = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            line = input.recv() => line,
        };
        let Some(line) = line else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        let query = match ChatInput::parse(&line) {
            ChatInput::Query(query) => query,
            ChatInput::Help => {
                render::print_help();
                continue;
            }
            ChatInput::Companies => {
                render::print_companies(controller.store());
                continue;
            }
            ChatInput::Suggest(None) => {
                render::print_suggestions();
                continue;
            }
            ChatInput::Suggest(Some(n)) => match n.checked_sub(1).and_then(|i| SUGGESTIONS.get(i)) {
                Some(suggestion) => {
                    eprintln!("{} {}", ">".dimmed(), suggestion);
                    suggestion.to_string()
                }
                None => {
                    eprintln!("No suggestion {}; pick 1-{}", n, SUGGESTIONS.len());
                    continue;
                }
            },
            ChatInput::Quit => break,
            ChatInput::Unknown(command) => {
                eprintln!("Unknown command /{} (try /help)", command);
                continue;
            }
        };

        let outcome = controller.submit(&query).await;
        if outcome.is_skipped() {
            continue;
        }
        if let Some(turn) = controller.turns().last() {
            render::print_answer(turn);
        }
        if shutdown.is_cancelled() {
            break;
        }
    }

    Ok(())
}

async fn prompt() -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{} ", "you>".bright_blue().bold()).as_bytes())
        .await
        .context("Failed to write prompt")?;
    stdout.flush().await.context("Failed to flush stdout")
}
