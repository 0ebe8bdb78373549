//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! The `format_*` helpers build the human-readable text and are shared with
//! the interactive session.

use refrain_core::{Collection, HistoryEntry, Progress};

/// Shown when there is nothing to serve
pub const NOTHING_AVAILABLE: &str = "No affirmations available yet.";

/// Characters of the upcoming line shown in progress output
const PREVIEW_CHARS: usize = 50;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a served line, or the "nothing available" notice
    pub fn print_line(&self, line: Option<&str>, mode: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", line.unwrap_or(NOTHING_AVAILABLE)),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"mode": mode, "line": line}));
            }
            OutputFormat::Quiet => {
                if let Some(line) = line {
                    println!("{}", line);
                }
            }
        }
    }

    /// Print the collection listing
    pub fn print_collections(&self, collections: &[(&str, &Collection)]) {
        match self.format {
            OutputFormat::Human => {
                println!();
                print!("{}", format_collections(collections));
                println!();
            }
            OutputFormat::Json => {
                let json: Vec<_> = collections
                    .iter()
                    .map(|(id, c)| {
                        serde_json::json!({
                            "id": id,
                            "title": c.title,
                            "type": c.kind,
                            "description": c.description,
                            "line_count": c.len(),
                        })
                    })
                    .collect();
                println!("{}", to_pretty(&json));
            }
            OutputFormat::Quiet => {
                for (id, _) in collections {
                    println!("{}", id);
                }
            }
        }
    }

    /// Print recent history entries, oldest first
    pub fn print_history(&self, entries: &[HistoryEntry], requested: usize) {
        match self.format {
            OutputFormat::Human => {
                println!();
                print!("{}", format_history(entries, requested));
                println!();
            }
            OutputFormat::Json => println!("{}", to_pretty(&entries)),
            OutputFormat::Quiet => {
                for entry in entries {
                    println!("{}", entry.line);
                }
            }
        }
    }

    /// Print progress through the current collection
    pub fn print_progress(&self, progress: Option<&Progress>) {
        match self.format {
            OutputFormat::Human => {
                println!();
                print!("{}", format_progress(progress));
                println!();
            }
            OutputFormat::Json => println!("{}", to_pretty(&progress)),
            OutputFormat::Quiet => {
                if let Some(p) = progress {
                    println!("{}/{}", p.position, p.total);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Collection listing, one bullet per collection with its description below
pub fn format_collections(collections: &[(&str, &Collection)]) -> String {
    let mut out = String::from("=== Available Collections ===\n");
    for (_, collection) in collections {
        out.push_str(&format!(
            "• {} ({}) - {} lines\n  {}\n",
            collection.title,
            collection.kind,
            collection.len(),
            collection.description
        ));
    }
    out
}

/// Numbered history listing
pub fn format_history(entries: &[HistoryEntry], requested: usize) -> String {
    let mut out = format!("=== Last {} Affirmations ===\n", requested);
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!("{}. [{}] {}\n", i + 1, entry.title, entry.line));
    }
    out
}

/// Progress block for the current collection
pub fn format_progress(progress: Option<&Progress>) -> String {
    let Some(progress) = progress else {
        return "No current collection selected.\n".to_string();
    };

    let mut out = String::from("=== Current Progress ===\n");
    out.push_str(&format!("Collection: {}\n", progress.title));
    out.push_str(&format!(
        "Progress: {}/{} lines\n",
        progress.position, progress.total
    ));
    match &progress.next_line {
        Some(next) => out.push_str(&format!("Next line: \"{}...\"\n", preview(next))),
        None => out.push_str("Collection completed! Moving to next collection.\n"),
    }
    out
}

/// First PREVIEW_CHARS characters of a line
fn preview(line: &str) -> String {
    line.chars().take(PREVIEW_CHARS).collect()
}

fn to_pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
