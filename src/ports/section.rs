//! # Section Port
//!
//! Trait for appending one section of a deck to an open sink.
//!
//! A deck is a sequence of sections, each opened by a three-line `%`
//! comment banner. Writers append; they never open, flush or close the
//! sink. That is the orchestrator's job.

use std::fmt;
use std::io::Write;

use crate::core::DeckResult;

/// Deck sections, in the order the deck writer emits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Materials,
    Geometry,
    Settings,
    Detectors,
    CrossSections,
    FissionMatrix,
}

impl Section {
    /// Banner title
    pub fn title(&self) -> &'static str {
        match self {
            Section::Materials => "MATERIALS",
            Section::Geometry => "GEOMETRY",
            Section::Settings => "SETTINGS",
            Section::Detectors => "DETECTORS",
            Section::CrossSections => "CROSS-SECTIONS",
            Section::FissionMatrix => "FISSION MATRIX",
        }
    }

    /// Cross-section banners start on a fresh paragraph
    fn leading_blank(&self) -> bool {
        matches!(self, Section::CrossSections)
    }

    /// Write the three-line comment banner plus its trailing blank line
    pub fn write_banner(&self, sink: &mut dyn Write) -> DeckResult<()> {
        if self.leading_blank() {
            writeln!(sink)?;
        }
        writeln!(sink, "{}", BANNER_RULE)?;
        writeln!(sink, "%\t\t {}", self.title())?;
        writeln!(sink, "{}", BANNER_RULE)?;
        writeln!(sink)?;
        Ok(())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Banner rule line
pub const BANNER_RULE: &str = "% %%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%";

/// Trait for section writers
///
/// Implementors validate their model objects before appending anything,
/// so a rejected model leaves the sink untouched.
pub trait SectionWriter {
    /// Which section this writer produces
    fn section(&self) -> Section;

    /// Append the complete section, banner included
    fn write(&self, sink: &mut dyn Write) -> DeckResult<()>;
}
