//! Read-only views: collections, history, progress

use anyhow::Result;

use refrain_core::Store;

use crate::output::Output;

/// List all collections in rotation order
pub fn collections(store: &Store, output: &Output) -> Result<()> {
    let collections: Vec<_> = store.collections().collect();
    output.print_collections(&collections);
    Ok(())
}

/// Show the last `count` served lines
pub fn history(store: &Store, count: usize, output: &Output) -> Result<()> {
    output.print_history(store.recent_history(count), count);
    Ok(())
}

/// Show progress through the current collection
pub fn progress(store: &Store, output: &Output) -> Result<()> {
    output.print_progress(store.progress().as_ref());
    Ok(())
}
