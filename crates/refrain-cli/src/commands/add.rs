//! Add command handler
//!
//! Reads markdown from a file or stdin and stores it as a collection.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use refrain_core::Store;

use crate::output::Output;

/// Create or replace a collection from markdown
pub fn run(
    store: &mut Store,
    key: String,
    title: Option<String>,
    kind: String,
    file: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let key = normalize_key(&key);
    if key.is_empty() {
        bail!("Collection ID cannot be empty");
    }

    let text = match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read markdown file: {:?}", path))?,
        None => read_stdin(output)?,
    };

    let title = title.unwrap_or_else(|| key.clone());
    let count = store
        .add_collection_from_markdown(&text, &key, &title, &kind)
        .context("Failed to add collection")?;

    output.success(&format!("Added collection '{}' with {} lines!", title, count));
    if count == 0 {
        output.message("No lines were long enough to keep; each needs more than 10 characters.");
    }
    Ok(())
}

/// Collection IDs have no spaces; they become underscores
pub fn normalize_key(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

fn read_stdin(output: &Output) -> Result<String> {
    if atty::is(atty::Stream::Stdin) && !output.is_quiet() {
        eprintln!("Paste your markdown content, then press Ctrl-D:");
    }

    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read markdown from stdin")?;
    Ok(text)
}
