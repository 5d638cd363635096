use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use sales_assist_core::Domain;

use crate::command::COMMANDS;

pub const PLACEHOLDER_NO_DOMAIN: &str = "Select a domain to start chatting";
pub const PLACEHOLDER_READY: &str = "Type or speak...";

/// Inline hint. Only command and domain hints can be accepted into the line;
/// the placeholder is display-only.
pub struct CliHint {
    text: String,
    completable: bool,
}

impl CliHint {
    fn accepting(text: String) -> Self {
        Self {
            text,
            completable: true,
        }
    }

    fn placeholder(text: &str) -> Self {
        Self {
            text: text.to_string(),
            completable: false,
        }
    }
}

impl Hint for CliHint {
    fn display(&self) -> &str {
        &self.text
    }

    fn completion(&self) -> Option<&str> {
        self.completable.then_some(self.text.as_str())
    }
}

/// Rustyline helper: completes slash commands and domain names, highlights
/// commands, and shows a placeholder hint on an empty line.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
    domains: Vec<String>,
    placeholder: &'static str,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|(name, _)| name.to_string()).collect(),
            domains: Domain::all().iter().map(|d| d.to_string()).collect(),
            placeholder: PLACEHOLDER_NO_DOMAIN,
        }
    }

    pub fn set_domain_selected(&mut self, selected: bool) {
        self.placeholder = if selected {
            PLACEHOLDER_READY
        } else {
            PLACEHOLDER_NO_DOMAIN
        };
    }

    fn candidates(&self, line: &str) -> (usize, Vec<&String>) {
        if let Some(partial) = line.strip_prefix("/domain ") {
            let start = line.len() - partial.len();
            let matches = self
                .domains
                .iter()
                .filter(|d| d.starts_with(partial))
                .collect();
            return (start, matches);
        }
        if line.starts_with('/') && !line.contains(' ') {
            let matches = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .collect();
            return (0, matches);
        }
        (0, Vec::new())
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = CliHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<CliHint> {
        if line.is_empty() {
            return Some(CliHint::placeholder(self.placeholder));
        }
        if pos < line.len() {
            return None;
        }
        let (start, matches) = self.candidates(line);
        let typed = &line[start..];
        matches
            .into_iter()
            .find(|candidate| candidate.len() > typed.len())
            .map(|candidate| CliHint::accepting(candidate[typed.len()..].to_string()))
    }
}

impl Validator for CliHelper {}
