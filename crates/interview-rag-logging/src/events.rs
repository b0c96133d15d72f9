use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Structured log events for a conversation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    SessionStarted {
        companies: usize,
        questions: usize,
        synthesizer: String,
        configured: bool,
    },
    TurnSubmitted {
        turn: usize,
        query: String,
    },
    /// A submission that was dropped without creating turns
    TurnSkipped {
        reason: String,
    },
    RetrievalCompleted {
        turn: usize,
        companies: Vec<String>,
        matches: usize,
    },
    SynthesisStarted {
        turn: usize,
        has_context: bool,
        context_chars: usize,
    },
    SynthesisCompleted {
        turn: usize,
        response_chars: usize,
        duration_secs: f64,
    },
    SynthesisFailed {
        turn: usize,
        kind: String,
        error: String,
        duration_secs: f64,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors and visual structure
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for session events, written to stderr
pub struct Logger {
    format: LogFormat,
    enabled: bool,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            enabled: true,
        }
    }

    /// A logger that drops every event
    pub fn silent() -> Self {
        Self {
            format: LogFormat::Compact,
            enabled: false,
        }
    }

    pub fn log(&self, event: &LogEvent) {
        if !self.enabled {
            return;
        }

        let mut stderr = std::io::stderr();
        let line = match self.format {
            LogFormat::Json => Some(event.with_timestamp().to_string()),
            LogFormat::Pretty => Self::render_pretty(event),
            LogFormat::Compact => Some(Self::render_compact(event)),
        };
        if let Some(line) = line {
            let _ = writeln!(stderr, "{}", line);
        }
    }

    fn render_pretty(event: &LogEvent) -> Option<String> {
        let line = match event {
            LogEvent::SessionStarted { configured, .. } => {
                if *configured {
                    return None;
                }
                format!(
                    "{} {}",
                    "⚠".bright_yellow(),
                    "API key missing: answers are disabled until GEMINI_API_KEY is set".yellow()
                )
            }
            LogEvent::TurnSubmitted { .. } => return None,
            LogEvent::TurnSkipped { reason } => {
                format!("  {} {}", "·".dimmed(), format!("Skipped: {}", reason).dimmed())
            }
            LogEvent::RetrievalCompleted {
                companies, matches, ..
            } => {
                if companies.is_empty() {
                    format!(
                        "  {} {} {}",
                        "▶".bright_cyan(),
                        "RETRIEVAL".bright_cyan().bold(),
                        "no matching questions".dimmed()
                    )
                } else {
                    format!(
                        "  {} {} {} {} from {}",
                        "▶".bright_cyan(),
                        "RETRIEVAL".bright_cyan().bold(),
                        matches,
                        if *matches == 1 { "question" } else { "questions" },
                        companies.join(", ")
                    )
                }
            }
            LogEvent::SynthesisStarted { .. } => format!(
                "  {} {}",
                "▶".bright_magenta(),
                "SYNTHESIS".bright_magenta().bold()
            ),
            LogEvent::SynthesisCompleted { duration_secs, .. } => {
                format!("    {} Done ({:.1}s)", "✓".bright_green(), duration_secs)
            }
            LogEvent::SynthesisFailed {
                kind,
                duration_secs,
                ..
            } => format!(
                "    {} {} ({:.1}s)",
                "✗".bright_red(),
                format!("Failed: {}", kind).bright_red(),
                duration_secs
            ),
        };
        Some(line)
    }

    fn render_compact(event: &LogEvent) -> String {
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        match event {
            LogEvent::SessionStarted {
                companies,
                questions,
                synthesizer,
                configured,
            } => format!(
                "[{}] session:start {}c {}q {} configured={}",
                timestamp, companies, questions, synthesizer, configured
            ),
            LogEvent::TurnSubmitted { turn, query } => {
                format!("[{}] turn:start:{} {}", timestamp, turn, Self::truncate(query, 60))
            }
            LogEvent::TurnSkipped { reason } => format!("[{}] turn:skip {}", timestamp, reason),
            LogEvent::RetrievalCompleted {
                turn,
                companies,
                matches,
            } => format!(
                "[{}] retrieval:{} {}c {}q",
                timestamp,
                turn,
                companies.len(),
                matches
            ),
            LogEvent::SynthesisStarted {
                turn,
                has_context,
                context_chars,
            } => format!(
                "[{}] synthesis:start:{} context={} {}ch",
                timestamp, turn, has_context, context_chars
            ),
            LogEvent::SynthesisCompleted {
                turn,
                response_chars,
                duration_secs,
            } => format!(
                "[{}] synthesis:done:{} {}ch {:.1}s",
                timestamp, turn, response_chars, duration_secs
            ),
            LogEvent::SynthesisFailed {
                turn,
                kind,
                error,
                duration_secs,
            } => format!(
                "[{}] synthesis:fail:{} {} {:.1}s {}",
                timestamp, turn, kind, duration_secs, error
            ),
        }
    }

    /// Truncate on a character boundary
    fn truncate(s: &str, max_chars: usize) -> String {
        if s.chars().count() > max_chars {
            let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{}...", head)
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = LogEvent::SynthesisFailed {
            turn: 2,
            kind: "upstream".to_string(),
            error: "Gemini API error (503): overloaded".to_string(),
            duration_secs: 0.5,
        };

        let value = event.with_timestamp();
        assert_eq!(value["event"], "synthesis_failed");
        assert_eq!(value["turn"], 2);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_compact_line_truncates_long_queries() {
        let event = LogEvent::TurnSubmitted {
            turn: 1,
            query: "é".repeat(100),
        };

        let line = Logger::render_compact(&event);
        assert!(line.contains("turn:start:1"));
        assert!(line.ends_with("..."));
    }

    #[test]
    fn test_pretty_hides_configured_session_start() {
        let event = LogEvent::SessionStarted {
            companies: 20,
            questions: 546,
            synthesizer: "Gemini".to_string(),
            configured: true,
        };
        assert!(Logger::render_pretty(&event).is_none());
    }
}
