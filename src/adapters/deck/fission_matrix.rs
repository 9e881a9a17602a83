//! Fission-matrix section: the `set fmtx` mesh card.
//!
//! Only Cartesian meshes can be written. Other kinds are refused before
//! anything reaches the sink.

use std::io::Write;

use tracing::debug;

use crate::core::format::{fixed, sci};
use crate::core::{DeckError, DeckResult, FissionMatrixSpec};
use crate::ports::{Section, SectionWriter};

pub struct FissionMatrixWriter<'a> {
    spec: &'a FissionMatrixSpec,
}

impl<'a> FissionMatrixWriter<'a> {
    pub fn new(spec: &'a FissionMatrixSpec) -> Self {
        Self { spec }
    }

    /// Mode flag for the tally kind, or `UnsupportedKind`
    fn mode_flag(&self) -> DeckResult<u8> {
        self.spec
            .kind
            .mode_flag()
            .ok_or_else(|| DeckError::unsupported("fission matrix kind", self.spec.kind.to_string()))
    }
}

impl SectionWriter for FissionMatrixWriter<'_> {
    fn section(&self) -> Section {
        Section::FissionMatrix
    }

    fn write(&self, sink: &mut dyn Write) -> DeckResult<()> {
        let flag = self.mode_flag()?;
        self.spec.validate()?;

        let mesh = &self.spec.mesh;
        let (x0, x1, nx) = mesh.axis(0);
        let (y0, y1, ny) = mesh.axis(1);
        let (z0, z1, nz) = mesh.axis(2);
        debug!(order = self.spec.order(), "writing fission matrix mesh");

        self.section().write_banner(sink)?;
        writeln!(
            sink,
            "set fmtx {} {} {} {} {} {} {} {} {} {}",
            flag,
            fixed(x0, 2),
            fixed(x1, 2),
            nx,
            fixed(y0, 2),
            fixed(y1, 2),
            ny,
            sci(z0, 2),
            sci(z1, 2),
            nz
        )?;
        Ok(())
    }
}
