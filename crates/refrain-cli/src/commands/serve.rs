//! Serving lines: next in sequence, or random

use anyhow::Result;

use refrain_core::Store;

use crate::output::Output;

/// Print the next line in sequence
pub fn next(store: &mut Store, output: &Output) -> Result<()> {
    let line = store.next_line()?;
    output.print_line(line.as_deref(), "sequential");
    Ok(())
}

/// Print a random line
pub fn random(store: &mut Store, output: &Output) -> Result<()> {
    let line = store.random_line()?;
    output.print_line(line.as_deref(), "random");
    Ok(())
}
