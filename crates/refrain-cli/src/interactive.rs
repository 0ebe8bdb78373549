//! Interactive mode
//!
//! A line-oriented loop over stdin. Each line is one command; `add` walks
//! through a few prompts and then reads markdown until a blank line.
//! End of input ends the session.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::debug;

use refrain_core::{Store, DEFAULT_KIND};

use crate::commands::add::normalize_key;
use crate::output::{format_collections, format_history, format_progress};

const COMMAND_LIST: &str =
    "'next', 'random', 'collections', 'history', 'progress', 'add', or 'quit'";

/// A command typed at the interactive prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Next,
    Random,
    Collections,
    History,
    Progress,
    Add,
    Quit,
}

impl ReplCommand {
    /// Parse a command or one of its aliases; empty input means `next`
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "next" | "n" | "" => Some(ReplCommand::Next),
            "random" | "r" => Some(ReplCommand::Random),
            "collections" | "c" => Some(ReplCommand::Collections),
            "history" | "h" => Some(ReplCommand::History),
            "progress" | "p" => Some(ReplCommand::Progress),
            "add" | "a" => Some(ReplCommand::Add),
            "quit" | "exit" | "q" => Some(ReplCommand::Quit),
            _ => None,
        }
    }
}

/// An interactive session over any reader and writer
pub struct Session<'a, R, W> {
    store: &'a mut Store,
    input: R,
    out: W,
    history_count: usize,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(store: &'a mut Store, input: R, out: W) -> Self {
        let history_count = store.config().history_count;
        Self {
            store,
            input,
            out,
            history_count,
        }
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Welcome to your Refrain library!")?;
        writeln!(self.out, "Commands: {}", COMMAND_LIST)?;

        loop {
            write!(self.out, "\nWhat would you like to do? ")?;
            self.out.flush()?;

            let Some(input) = self.read_line()? else {
                writeln!(self.out)?;
                break;
            };

            let Some(command) = ReplCommand::parse(&input) else {
                writeln!(self.out, "Unknown command. Try: {}", COMMAND_LIST)?;
                continue;
            };

            debug!("Interactive command: {:?}", command);
            if !self.dispatch(command)? {
                break;
            }
        }

        Ok(())
    }

    /// Execute one command; `false` ends the session
    fn dispatch(&mut self, command: ReplCommand) -> Result<bool> {
        match command {
            ReplCommand::Quit => {
                writeln!(self.out, "Stay positive! See you next time!")?;
                return Ok(false);
            }
            ReplCommand::Next => {
                let line = self.store.next_line()?;
                self.show_line(line)?;
            }
            ReplCommand::Random => {
                let line = self.store.random_line()?;
                self.show_line(line)?;
            }
            ReplCommand::Collections => {
                let collections: Vec<_> = self.store.collections().collect();
                let text = format_collections(&collections);
                write!(self.out, "\n{}", text)?;
            }
            ReplCommand::History => {
                let text = format_history(
                    self.store.recent_history(self.history_count),
                    self.history_count,
                );
                write!(self.out, "\n{}", text)?;
            }
            ReplCommand::Progress => {
                let text = format_progress(self.store.progress().as_ref());
                write!(self.out, "\n{}", text)?;
            }
            ReplCommand::Add => return self.add_flow(),
        }
        Ok(true)
    }

    fn show_line(&mut self, line: Option<String>) -> Result<()> {
        match line {
            Some(line) => writeln!(self.out, "\n{}", line)?,
            None => writeln!(self.out, "No affirmations available yet. Try adding some!")?,
        }
        Ok(())
    }

    /// Prompt for a new collection; running out of input ends the session
    fn add_flow(&mut self) -> Result<bool> {
        writeln!(self.out, "\nAdd a new collection:")?;

        let key = loop {
            let Some(raw) = self.prompt("Collection ID (no spaces): ")? else {
                return Ok(false);
            };
            let key = normalize_key(&raw);
            if !key.is_empty() {
                break key;
            }
            writeln!(self.out, "Collection ID cannot be empty.")?;
        };
        let Some(title) = self.prompt("Collection title: ")? else {
            return Ok(false);
        };
        let Some(kind) = self.prompt("Type (affirmations/song_lyrics/poem): ")? else {
            return Ok(false);
        };

        let title = title.trim().to_string();
        let kind = match kind.trim() {
            "" => DEFAULT_KIND.to_string(),
            other => other.to_string(),
        };

        writeln!(self.out, "\nPaste your markdown content (end with empty line):")?;
        self.out.flush()?;

        // End of input closes the content like a blank line would
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }

        let count = self
            .store
            .add_collection_from_markdown(&lines.join("\n"), &key, &title, &kind)?;
        writeln!(self.out, "✓ Added collection '{}' with {} lines!", title, count)?;
        Ok(true)
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;
        self.read_line()
    }

    /// Read one line without its terminator; `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }
}
