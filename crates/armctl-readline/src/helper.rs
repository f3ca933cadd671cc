use std::borrow::Cow::{self, Borrowed, Owned};

use armctl_core::command::alias::{is_repeat_run, resolve};
use armctl_core::command::alias_entries;
use armctl_core::command::parser::CHAIN_SEPARATOR;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Words the REPL handles itself, outside the interpreter.
pub const REPL_COMMANDS: &[&str] = &["help"];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<&'static str>,
}

impl CliHelper {
    pub fn new() -> Self {
        let mut commands: Vec<&'static str> = alias_entries()
            .iter()
            .flat_map(|entry| entry.aliases.iter().copied())
            .chain(REPL_COMMANDS.iter().copied())
            .collect();
        commands.sort_unstable();
        Self { commands }
    }

    /// The keyword being typed, if the cursor is still on the first word of
    /// the current chain part.
    fn current_keyword(line: &str) -> Option<&str> {
        let part_start = line
            .rfind(CHAIN_SEPARATOR)
            .map(|i| i + CHAIN_SEPARATOR.len())
            .unwrap_or(0);
        let word = line[part_start..].trim_start();
        if word.is_empty() || word.contains(char::is_whitespace) {
            None
        } else {
            Some(word)
        }
    }

    fn matches<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        let word = word.to_lowercase();
        self.commands
            .iter()
            .copied()
            .filter(move |cmd| cmd.starts_with(&word))
    }

    fn is_known(word: &str) -> bool {
        let word = word.to_lowercase();
        resolve(&word).is_some() || is_repeat_run(&word) || REPL_COMMANDS.contains(&word.as_str())
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
        let line = &line[..pos];

        match Self::current_keyword(line) {
            Some(word) => {
                let candidates = self
                    .matches(word)
                    .map(|cmd| Pair {
                        display: cmd.to_string(),
                        replacement: cmd.to_string(),
                    })
                    .collect();
                Ok((pos - word.len(), candidates))
            }
            None => Ok((pos, vec![])),
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let keywords: Vec<&str> = line
            .split(CHAIN_SEPARATOR)
            .filter_map(|part| part.split_whitespace().next())
            .collect();
        if !keywords.is_empty() && keywords.iter().all(|word| Self::is_known(word)) {
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
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let word = Self::current_keyword(&line[..pos])?;
        self.matches(word)
            .find(|cmd| cmd.len() > word.len())
            .map(|cmd| cmd[word.len()..].to_string())
    }
}

impl Validator for CliHelper {}

/// Help table built from the alias table.
pub fn help_text() -> String {
    let mut text = String::new();
    for entry in alias_entries() {
        text.push_str(&format!(
            "{:<44} {:<28} {}\n",
            entry.usage,
            entry.aliases.join(", "),
            entry.description
        ));
    }
    text.push_str(&format!(
        "{:<44} {:<28} {}\n",
        "r, rr, rrr, ...", "", "Repeat the command 1, 2, 3, ... entries back"
    ));
    text.push_str(&format!(
        "Chain commands with '{}'; each runs after the previous one finishes.",
        CHAIN_SEPARATOR
    ));
    text
}
