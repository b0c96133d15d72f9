use colored::{ColoredString, Colorize};

use interview_rag_catalog::{CatalogStore, MatchGroup};
use interview_rag_core::ConversationTurn;

/// How many questions of a citation group are printed before eliding
const CITATION_PREVIEW: usize = 5;

/// Starter queries offered by `/suggest`
pub const SUGGESTIONS: [&str; 6] = [
    "What system design questions does Google ask?",
    "What behavioral questions does Amazon focus on?",
    "What are Netflix's streaming architecture questions?",
    "Compare algorithm questions across all companies",
    "What security questions does Apple ask?",
    "What ML questions does Meta ask?",
];

pub fn print_welcome(store: &CatalogStore) {
    let rule = "=".repeat(60);
    eprintln!();
    eprintln!("{}", rule.bright_blue());
    eprintln!("{}", "  INTERVIEW RAG".bright_blue().bold());
    eprintln!(
        "  {} companies, {} curated questions",
        store.len(),
        store.question_count()
    );
    eprintln!("{}", rule.bright_blue());
    eprintln!("  {}", store.company_names().collect::<Vec<_>>().join(", ").dimmed());
    eprintln!();
    eprintln!(
        "  Ask about interview questions, or type {} for commands.",
        "/help".bold()
    );
    eprintln!();
}

pub fn print_help() {
    eprintln!("  {}       show this help", "/help".bold());
    eprintln!("  {}  list the companies in the catalog", "/companies".bold());
    eprintln!("  {}    list starter queries; {} asks one", "/suggest".bold(), "/suggest N".bold());
    eprintln!("  {}       end the session", "/quit".bold());
}

pub fn print_suggestions() {
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        eprintln!("  {} {}", format!("{}.", i + 1).dimmed(), suggestion);
    }
}

pub fn print_companies(store: &CatalogStore) {
    for company in store.all() {
        println!(
            "{} {:<12} {:>3} questions",
            glyph(&company.icon),
            accented(&company.name, &company.accent_color).bold(),
            company.questions.len()
        );
    }
}

/// Print an assistant turn followed by its citation cards
pub fn print_answer(turn: &ConversationTurn) {
    println!();
    println!("{}", turn.content);
    if !turn.citations.is_empty() {
        println!();
        println!("{}", "Sources".dimmed());
        for group in &turn.citations {
            print_group(group);
        }
    }
    println!();
}

pub fn print_group(group: &MatchGroup) {
    let count = group.matches.len();
    let mut header = format!(
        "{} {} {}",
        glyph(&group.icon),
        accented(&group.company, &group.accent_color).bold(),
        format!("· {} {}", count, if count == 1 { "match" } else { "matches" }).dimmed()
    );
    if group.direct_mention {
        header.push_str(&format!(" {}", "(mentioned)".dimmed()));
    }
    println!("  {}", header);

    for entry in group.matches.iter().take(CITATION_PREVIEW) {
        if entry.tags.is_empty() {
            println!("    • {}", entry.text);
        } else {
            println!("    • {} {}", entry.text, format!("[{}]", entry.tags.join(", ")).dimmed());
        }
    }
    if count > CITATION_PREVIEW {
        println!("    {}", format!("… and {} more", count - CITATION_PREVIEW).dimmed());
    }
}

fn glyph(icon: &str) -> &str {
    if icon.is_empty() {
        "•"
    } else {
        icon
    }
}

fn accented(text: &str, accent_color: &str) -> ColoredString {
    match parse_hex(accent_color) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Parse a `#RRGGBB` color
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
