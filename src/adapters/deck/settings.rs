//! Settings section: population, cross-section library, upscattering.

use std::io::Write;

use crate::core::format::repr;
use crate::core::{DeckResult, Settings};
use crate::ports::{Section, SectionWriter};

pub struct SettingsWriter<'a> {
    settings: &'a Settings,
}

impl<'a> SettingsWriter<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }
}

impl SectionWriter for SettingsWriter<'_> {
    fn section(&self) -> Section {
        Section::Settings
    }

    fn write(&self, sink: &mut dyn Write) -> DeckResult<()> {
        let s = self.settings;
        s.validate()?;

        self.section().write_banner(sink)?;
        writeln!(
            sink,
            "set pop {} {} {} {} ",
            s.population_size,
            s.active_cycles,
            s.inactive_cycles,
            repr(s.k_guess)
        )?;
        writeln!(sink, "% -- Cross-sections")?;
        writeln!(sink, "set acelib \"{}\"", s.cross_section_library_path)?;
        if let Some(nuclide) = s.upscatter() {
            writeln!(sink, "set ures 1 3 {} ", nuclide)?;
        }
        Ok(())
    }
}
