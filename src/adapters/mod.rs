//! Adapters - Deck writers and report readers over the core model

pub mod deck;
pub mod report;
