//! # Deck Writer
//!
//! Renders a `Deck` into solver input, one section writer at a time.
//!
//! Section order is fixed:
//! 1. title line
//! 2. materials, geometry, settings
//! 3. detectors, cross-sections, fission matrix, each only when present
//!
//! ## Usage
//!
//! ```rust,ignore
//! let writer = DeckWriter::new();
//! writer.write("miniCore.i", &deck)?;
//! ```

mod cross_sections;
mod detectors;
mod fission_matrix;
mod geometry;
mod materials;
mod settings;

pub use cross_sections::CrossSectionWriter;
pub use detectors::DetectorWriter;
pub use fission_matrix::FissionMatrixWriter;
pub use geometry::GeometryWriter;
pub use materials::MaterialsWriter;
pub use settings::SettingsWriter;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::{BcEncoding, Deck, DeckError, DeckResult, PerAxis};
use crate::ports::SectionWriter;

/// Orchestrates the section writers over one sink
#[derive(Clone)]
pub struct DeckWriter {
    bc_encoding: Arc<dyn BcEncoding>,
}

impl DeckWriter {
    /// Writer with the per-axis boundary encoding
    pub fn new() -> Self {
        Self {
            bc_encoding: Arc::new(PerAxis),
        }
    }

    /// Set a custom boundary condition encoding
    pub fn with_bc_encoding<E: BcEncoding + 'static>(mut self, encoding: E) -> Self {
        self.bc_encoding = Arc::new(encoding);
        self
    }

    /// Name of the active boundary encoding
    pub fn bc_encoding_name(&self) -> &'static str {
        self.bc_encoding.name()
    }

    /// Write the deck to `path`, truncating any existing file
    ///
    /// The deck is checked before the file is touched, so an invalid model,
    /// an unsupported fission-matrix kind or an unencodable boundary pair
    /// leaves any existing file as it was. An I/O failure mid-write may
    /// leave a truncated file behind.
    pub fn write(&self, path: impl AsRef<Path>, deck: &Deck) -> DeckResult<()> {
        let path = path.as_ref();
        self.preflight(deck)?;

        let mut sink = BufWriter::new(File::create(path)?);
        self.write_to(&mut sink, deck)?;
        sink.flush()?;

        info!(path = %path.display(), title = %deck.title, "deck written");
        Ok(())
    }

    /// Render the deck into any sink
    ///
    /// Nothing reaches the sink unless the whole deck passes `preflight`.
    pub fn write_to(&self, sink: &mut dyn Write, deck: &Deck) -> DeckResult<()> {
        self.preflight(deck)?;

        writeln!(sink, "set title \"{}\"", deck.title)?;
        writeln!(sink)?;

        for section in self.sections(deck) {
            debug!(section = %section.section(), "writing section");
            section.write(sink)?;
        }
        Ok(())
    }

    /// Every check a section writer could fail on, run with no I/O
    pub fn preflight(&self, deck: &Deck) -> DeckResult<()> {
        deck.validate()?;
        if let Some(fm) = &deck.fission_matrix {
            if fm.kind.mode_flag().is_none() {
                return Err(DeckError::unsupported("fission matrix kind", fm.kind.to_string()));
            }
        }
        if let Some(root) = &deck.geometry.root {
            let (radial, axial) = root.bc;
            self.bc_encoding.encode(radial, axial)?;
        }
        Ok(())
    }

    /// Render the deck into a string
    pub fn render(&self, deck: &Deck) -> DeckResult<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, deck)?;
        String::from_utf8(buf).map_err(|e| DeckError::Validation(e.to_string()))
    }

    fn sections<'a>(&self, deck: &'a Deck) -> Vec<Box<dyn SectionWriter + 'a>> {
        let mut sections: Vec<Box<dyn SectionWriter + 'a>> = vec![
            Box::new(MaterialsWriter::new(&deck.materials)),
            Box::new(
                GeometryWriter::new(&deck.geometry).with_bc_encoding(Arc::clone(&self.bc_encoding)),
            ),
            Box::new(SettingsWriter::new(&deck.settings)),
        ];
        if !deck.detectors.is_empty() {
            sections.push(Box::new(DetectorWriter::new(&deck.detectors)));
        }
        if let Some(xs) = &deck.cross_sections {
            sections.push(Box::new(CrossSectionWriter::new(xs)));
        }
        if let Some(fm) = &deck.fission_matrix {
            sections.push(Box::new(FissionMatrixWriter::new(fm)));
        }
        sections
    }
}

impl Default for DeckWriter {
    fn default() -> Self {
        Self::new()
    }
}
