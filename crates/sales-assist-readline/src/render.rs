//! Terminal output.

use colored::Colorize;
use sales_assist_application::{TurnOutcome, TurnStatus};
use sales_assist_core::gateway::HistoryResponse;
use sales_assist_core::session::{Message, MessageRole};
use sales_assist_core::{AssistError, ChatState, Domain, MAX_SELECTED_FILES};

use crate::command::COMMANDS;

pub fn banner() {
    println!("{}", "=== Sales Assistant ===".bright_magenta().bold());
    println!(
        "{}",
        "Pick a domain with '/domain <name>', type '/help' for commands, or 'quit' to exit."
            .bright_black()
    );
    println!();
}

pub fn help() {
    for (name, about) in COMMANDS {
        println!("  {:<10} {}", name.bright_cyan(), about);
    }
    println!("  {:<10} {}", "<n>".bright_cyan(), "Send suggestion number n");
    println!("  {:<10} {}", "quit".bright_cyan(), "Exit");
}

pub fn domains(active: Option<Domain>) {
    for domain in Domain::all() {
        let marker = if Some(domain) == active { "*" } else { " " };
        println!(
            "{} {:<9} {} - {}",
            marker,
            domain.as_str().bright_cyan(),
            domain.label().bold(),
            domain.description().bright_black()
        );
    }
}

pub fn message(message: &Message) {
    match message.role {
        MessageRole::User => {
            for line in message.text.lines() {
                println!("{}", format!("> {}", line).green());
            }
        }
        MessageRole::Model => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

pub fn files(state: &ChatState) {
    let Some(domain) = state.active_domain() else {
        println!("{}", "Select a domain first.".yellow());
        return;
    };
    if !domain.allows_file_actions() {
        println!(
            "{}",
            format!("File actions are disabled in the {} domain.", domain.label()).yellow()
        );
        return;
    }

    let entries = state.selection.file_entries();
    if entries.is_empty() {
        println!("{}", "No files yet. Use '/attach <path>' to upload one.".bright_black());
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        let check = if entry.selected { "[x]" } else { "[ ]" };
        let line = format!(
            "{:>2}. {} {} ({})",
            i + 1,
            check,
            entry.meta.filename,
            entry.meta.status()
        );
        if entry.actionable {
            println!("{}", line);
        } else {
            println!("{}", line.bright_black());
        }
    }
    println!(
        "{}",
        format!(
            "{}/{} selected",
            state.selection.selected_count(),
            MAX_SELECTED_FILES
        )
        .bright_black()
    );
}

/// Prints the resolved reply, its sources, warnings and the new suggestions.
pub fn outcome(state: &ChatState, outcome: &TurnOutcome) {
    for warning in &outcome.warnings {
        warn(warning);
    }
    if let Some(reply) = state.conversation.message(&outcome.reply_message_id) {
        message(reply);
    }

    match &outcome.status {
        TurnStatus::Answered {
            sources,
            confidence_score,
            latency_ms,
        } => {
            for source in sources {
                let name = source.file_id.as_deref().unwrap_or("unknown");
                let preview = source.text_preview.as_deref().unwrap_or_default();
                println!("{}", format!("  source {}: {}", name, preview).bright_black());
            }
            tracing::debug!(
                "Answer confidence {:.2}, latency {:.0}ms",
                confidence_score,
                latency_ms
            );
        }
        TurnStatus::Failed { error } => {
            println!("{}", format!("({})", error).red());
        }
    }

    suggestions(state.conversation.suggestions());
}

pub fn suggestions(suggestions: &[String]) {
    if suggestions.is_empty() {
        return;
    }
    println!("{}", "Suggestions:".bright_yellow());
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("  {}", format!("{}. {}", i + 1, suggestion).yellow());
    }
}

pub fn history(history: &HistoryResponse) {
    if history.messages.is_empty() {
        println!("{}", "No stored messages for this domain.".bright_black());
        return;
    }
    for record in &history.messages {
        let stamp = record
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{} {}",
            format!("[{} {}]", stamp, record.role).bright_magenta(),
            record.content
        );
    }
}

pub fn warn(error: &AssistError) {
    println!("{}", format!("Warning: {}", error).yellow());
}

pub fn error(error: &AssistError) {
    eprintln!("{}", format!("Error: {}", error).red());
}
