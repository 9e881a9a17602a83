//! Materials section: `therm`/`mat` headers and composition lines.

use std::io::Write;

use tracing::debug;

use crate::core::format::{fixed, repr};
use crate::core::{DeckResult, Density, FractionKind, Material};
use crate::ports::{Section, SectionWriter};

/// Writes every material in order
pub struct MaterialsWriter<'a> {
    materials: &'a [Material],
}

impl<'a> MaterialsWriter<'a> {
    pub fn new(materials: &'a [Material]) -> Self {
        Self { materials }
    }

    fn write_header(&self, sink: &mut dyn Write, m: &Material) -> DeckResult<()> {
        match (&m.moderator, m.density) {
            (None, Density::Value(d)) => {
                writeln!(sink, "mat {} {}", m.name, repr(d))?;
            }
            (Some(moder), Density::Value(d)) => {
                writeln!(sink, "therm {} {}", moder.name, moder.library)?;
                writeln!(
                    sink,
                    "mat {} {} moder {} {}",
                    m.name,
                    fixed(d, 3),
                    moder.name,
                    moder.za
                )?;
            }
            (None, Density::Sum) => {
                writeln!(sink, "mat {} sum", m.name)?;
            }
            (Some(moder), Density::Sum) => {
                writeln!(sink, "therm {} {}", moder.name, moder.library)?;
                writeln!(sink, "mat {} sum moder {} {}", m.name, moder.name, moder.za)?;
            }
        }
        Ok(())
    }

    fn write_composition(&self, sink: &mut dyn Write, m: &Material) -> DeckResult<()> {
        let sign = match m.fraction_kind {
            FractionKind::Mass => "-",
            FractionKind::Molar => "",
        };
        for nuclide in &m.composition {
            writeln!(sink, "{} {}{}", nuclide.id, sign, repr(nuclide.fraction))?;
        }
        Ok(())
    }
}

impl SectionWriter for MaterialsWriter<'_> {
    fn section(&self) -> Section {
        Section::Materials
    }

    fn write(&self, sink: &mut dyn Write) -> DeckResult<()> {
        self.materials.iter().try_for_each(Material::validate)?;

        self.section().write_banner(sink)?;
        for m in self.materials {
            debug!(material = %m.name, nuclides = m.composition.len(), "writing material");
            self.write_header(sink, m)?;
            self.write_composition(sink, m)?;
            writeln!(sink)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Moderator, Nuclide};
    use crate::ports::BANNER_RULE;

    fn body(materials: &[Material]) -> String {
        let mut out = Vec::new();
        MaterialsWriter::new(materials).write(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let banner = format!("{rule}\n%\t\t MATERIALS\n{rule}\n\n", rule = BANNER_RULE);
        text.strip_prefix(&banner).expect("banner first").to_string()
    }

    fn water() -> Material {
        Material::from_pairs(
            "water",
            Density::Value(-0.700452),
            600.0,
            vec![("1001.06c", 0.6666667), ("8016.06c", 0.3333333)],
        )
        .unwrap()
    }

    #[test]
    fn test_plain_mass_material() {
        let fuel = Material::from_pairs(
            "fuel",
            Density::Value(-10.9),
            900.0,
            vec![("92235.09c", 1.0), ("92238.09c", 1.0)],
        )
        .unwrap();
        assert_eq!(
            body(&[fuel]),
            "mat fuel -10.9\n92235.09c -1.0\n92238.09c -1.0\n\n"
        );
    }

    #[test]
    fn test_molar_fractions_are_unsigned() {
        let m = water().with_fraction_kind(FractionKind::Molar);
        assert_eq!(
            body(&[m]),
            "mat water -0.700452\n1001.06c 0.6666667\n8016.06c 0.3333333\n\n"
        );
    }

    #[test]
    fn test_density_with_moderator() {
        let m = water()
            .with_fraction_kind(FractionKind::Molar)
            .with_moderator(Moderator::new("lwtr", "lwj3.11t"));
        let text = body(&[m]);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("therm lwtr lwj3.11t"));
        assert_eq!(lines.next(), Some("mat water -0.700 moder lwtr 1001"));
        assert_eq!(lines.next(), Some("1001.06c 0.6666667"));
    }

    #[test]
    fn test_sum_headers() {
        let plain = Material::new("mix", Density::Sum, 600.0, vec![Nuclide::new("40000.06c", 1.0)]).unwrap();
        assert!(body(&[plain.clone()]).starts_with("mat mix sum\n40000.06c -1.0\n"));

        let moderated = plain.with_moderator(Moderator::new("lwtr", "lwj3.11t"));
        assert!(body(&[moderated]).starts_with("therm lwtr lwj3.11t\nmat mix sum moder lwtr 1001\n"));
    }

    #[test]
    fn test_materials_keep_order() {
        let fuel = Material::from_pairs("fuel", Density::Value(-10.9), 900.0, vec![("92235.09c", 1.0)]).unwrap();
        let text = body(&[fuel, water()]);
        let fuel_at = text.find("mat fuel").unwrap();
        let water_at = text.find("mat water").unwrap();
        assert!(fuel_at < water_at);
    }

    #[test]
    fn test_invalid_material_writes_nothing() {
        let mut bad = water();
        bad.composition.clear();
        let mut out = Vec::new();
        assert!(MaterialsWriter::new(&[bad]).write(&mut out).is_err());
        assert!(out.is_empty());
    }
}
