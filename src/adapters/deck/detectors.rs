//! Detectors section: one mesh detector card per detector.

use std::io::Write;

use crate::core::format::fixed;
use crate::core::{DeckResult, Detector, Mesh};
use crate::ports::{Section, SectionWriter};

pub struct DetectorWriter<'a> {
    detectors: &'a [Detector],
}

impl<'a> DetectorWriter<'a> {
    pub fn new(detectors: &'a [Detector]) -> Self {
        Self { detectors }
    }
}

impl SectionWriter for DetectorWriter<'_> {
    fn section(&self) -> Section {
        Section::Detectors
    }

    fn write(&self, sink: &mut dyn Write) -> DeckResult<()> {
        self.detectors.iter().try_for_each(Detector::validate)?;

        self.section().write_banner(sink)?;
        for det in self.detectors {
            let void = if det.void { " void" } else { "" };
            writeln!(
                sink,
                "det {} dr {}{} {}",
                det.name,
                det.kind.code(),
                void,
                axis_bins(&det.mesh)
            )?;
        }
        Ok(())
    }
}

/// `dx X0 X1 NX dy Y0 Y1 NY dz Z0 Z1 NZ`
fn axis_bins(mesh: &Mesh) -> String {
    ["dx", "dy", "dz"]
        .iter()
        .enumerate()
        .map(|(axis, label)| {
            let (lo, hi, n) = mesh.axis(axis);
            format!("{} {} {} {}", label, fixed(lo, 2), fixed(hi, 2), n)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
