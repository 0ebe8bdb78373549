//! Built-in collection
//!
//! Every library starts with one collection so a fresh install has
//! something to serve.

use crate::models::Collection;

/// Reserved key of the built-in collection
pub const SEED_KEY: &str = "jimmy_cliff_harder_they_come";

const SEED_TITLE: &str = "The Harder They Come - Jimmy Cliff";
const SEED_KIND: &str = "song_lyrics";
const SEED_DESCRIPTION: &str = "Empowering lyrics about perseverance and fighting for justice";

const SEED_LINES: [&str; 8] = [
    "As sure as the sun will shine, I'm gonna get my share now, what's mine",
    "The harder they come, the harder they fall, one and all",
    "I'd rather be a free man in my grave than living as a puppet or a slave",
    "I keep on fighting for the things I want",
    "Forgive them Lord, they know not what they've done",
    "They tell me of a pie up in the sky, waiting for me when I die",
    "The oppressors are trying to keep me down, trying to drive me underground",
    "They think that they have got the battle won",
];

/// Build the built-in collection
pub fn seed_collection() -> Collection {
    Collection::new(
        SEED_TITLE,
        SEED_KIND,
        SEED_LINES.iter().map(|line| line.to_string()).collect(),
    )
    .with_description(SEED_DESCRIPTION)
}
