//! Cross-section generation section: group structure and collapse universes.

use std::io::Write;

use crate::core::format::repr;
use crate::core::{CrossSectionSpec, DeckResult};
use crate::ports::{Section, SectionWriter};

pub struct CrossSectionWriter<'a> {
    spec: &'a CrossSectionSpec,
}

impl<'a> CrossSectionWriter<'a> {
    pub fn new(spec: &'a CrossSectionSpec) -> Self {
        Self { spec }
    }
}

impl SectionWriter for CrossSectionWriter<'_> {
    fn section(&self) -> Section {
        Section::CrossSections
    }

    fn write(&self, sink: &mut dyn Write) -> DeckResult<()> {
        let xs = self.spec;
        xs.validate()?;

        self.section().write_banner(sink)?;
        writeln!(sink, "set nfg {}", xs.group_name)?;
        if let Some(bounds) = xs.group_boundaries.as_deref().filter(|b| !b.is_empty()) {
            let bounds: Vec<String> = bounds.iter().map(|&b| repr(b)).collect();
            writeln!(sink, "ene {} 1 {}", xs.group_name, bounds.join(" "))?;
        }
        if let Some(universes) = xs.universes.as_deref().filter(|u| !u.is_empty()) {
            writeln!(sink, "set gcu {} ", universes.join("\n"))?;
            writeln!(sink)?;
        }
        Ok(())
    }
}
