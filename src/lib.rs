//! # Serpent Deck
//!
//! Write Serpent input decks from a typed reactor model, and read the
//! fission matrix back out of the result report.
//!
//! ## Overview
//!
//! A `Deck` gathers pins, lattices, the root universe, materials, run
//! settings and optional tallies. `DeckWriter` renders it section by section
//! into the solver's text format. `FissionMatrixReader` parses the tally the
//! solver produces for the fission-matrix mesh into dense matrices.
//!
//! ## Key Features
//!
//! - **Typed model**: lattice, root shape and detector kinds are enums
//! - **Validated up front**: an invalid model never reaches the output file
//! - **Pluggable boundary encodings**: per-axis or either legacy table
//! - **Byte-stable output**: identical models write identical decks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use serpent_deck::core::{Deck, FissionMatrixSpec, Mesh};
//! use serpent_deck::adapters::deck::DeckWriter;
//! use serpent_deck::adapters::report::FissionMatrixReader;
//!
//! let deck = Deck::from_json(&std::fs::read_to_string("core.json")?)?
//!     .with_fission_matrix(FissionMatrixSpec::cartesian(Mesh::radial(182.07, 17)?));
//! DeckWriter::new().write("core.i", &deck)?;
//!
//! // after the solver has run
//! let fm = FissionMatrixReader::new().read("core.i_res.m")?;
//! println!("order {}", fm.order());
//! ```

pub mod core;
pub mod ports;
pub mod adapters;

// Re-exports for convenience
pub use core::{Deck, DeckError, DeckResult};
pub use adapters::deck::DeckWriter;
pub use adapters::report::{FissionMatrix, FissionMatrixReader};
