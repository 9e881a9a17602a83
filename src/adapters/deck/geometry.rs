//! # Geometry Section
//!
//! Pins, lattices and the root universe.
//!
//! ```text
//! %--- Pins
//! pin ff
//! fuel   0.4100
//! water
//!
//! %--- Assemblies
//! lat a1 1 0.0 0.0 17 17 1.260
//! ff ff ff ...
//!
//! %--- Root universe
//! surf 1000 cuboid -10.710 10.710 -10.710 10.710 0.000 366.00
//! cell 110  0  fill core    -1000
//! cell 112  0  outside     1000
//! set bc 2 2 1
//! ```
//!
//! When neither groups nor a root are defined, the first pin is closed by
//! a square surface and reflective boundaries.

use std::io::Write;
use std::sync::Arc;

use tracing::debug;

use crate::core::format::fixed;
use crate::core::geometry::map_shape;
use crate::core::{BcEncoding, DeckResult, Geometry, Group, Lattice, PerAxis, Pin, Root, RootShape};
use crate::ports::{Section, SectionWriter};

/// Writes pins, groups and the root universe
pub struct GeometryWriter<'a> {
    geometry: &'a Geometry,
    bc_encoding: Arc<dyn BcEncoding>,
}

impl<'a> GeometryWriter<'a> {
    /// Writer with the default per-axis boundary encoding
    pub fn new(geometry: &'a Geometry) -> Self {
        Self {
            geometry,
            bc_encoding: Arc::new(PerAxis),
        }
    }

    /// Replace the boundary condition encoding
    pub fn with_bc_encoding(mut self, encoding: Arc<dyn BcEncoding>) -> Self {
        self.bc_encoding = encoding;
        self
    }

    fn write_pins(&self, sink: &mut dyn Write) -> DeckResult<()> {
        writeln!(sink, "%--- Pins")?;
        for pin in &self.geometry.pins {
            write_pin(sink, pin)?;
        }

        if self.geometry.is_pin_only() {
            if let Some(pin) = self.geometry.pins.first() {
                debug!(pin = %pin.name, "closing pin-only geometry");
                writeln!(sink)?;
                writeln!(sink, "surf s1 sqc 0.0 0.0 {}", fixed(pin.outer_radius(), 2))?;
                writeln!(sink, "cell 98  0 fill {}   -s1", pin.name)?;
                writeln!(sink, "cell 99  0 outside   s1")?;
                writeln!(sink, "set bc 2")?;
                writeln!(sink)?;
            }
        }
        Ok(())
    }

    fn write_groups(&self, sink: &mut dyn Write) -> DeckResult<()> {
        writeln!(sink, "%--- Assemblies")?;
        for group in &self.geometry.groups {
            write_group(sink, group)?;
        }
        Ok(())
    }

    fn write_root(&self, sink: &mut dyn Write, root: &Root) -> DeckResult<()> {
        let (radial, axial) = root.bc;
        let bc = self.bc_encoding.encode(radial, axial)?;
        debug!(root = %root.name, encoding = self.bc_encoding.name(), bc = %bc, "writing root universe");

        writeln!(sink, "%--- Root universe")?;
        match &root.shape {
            RootShape::Cuboid { dimensions } => {
                let [x, y, z] = *dimensions;
                writeln!(
                    sink,
                    "surf 1000 cuboid -{} {} -{} {} 0.000 {}",
                    fixed(x / 2.0, 3),
                    fixed(x / 2.0, 3),
                    fixed(y / 2.0, 3),
                    fixed(y / 2.0, 3),
                    fixed(z, 2)
                )?;
                writeln!(sink, "cell 110  0  fill {}    -1000", root.name)?;
                writeln!(sink, "cell 112  0  outside     1000")?;
            }
            RootShape::Map { pitch, map } => {
                let (rows, cols) = write_square_lattice(sink, &root.name, *pitch, map, 2)?;
                // x spans columns, matching NX in the lattice header
                let half_x = pitch * cols as f64 / 2.0;
                let half_y = pitch * rows as f64 / 2.0;
                writeln!(sink)?;
                writeln!(
                    sink,
                    "surf s1 rect {} {} {} {}",
                    fixed(-half_x, 2),
                    fixed(half_x, 2),
                    fixed(-half_y, 2),
                    fixed(half_y, 2)
                )?;
                writeln!(sink, "cell 98  0 fill {}   -s1", root.name)?;
                writeln!(sink, "cell 99  0 outside   s1")?;
            }
        }
        writeln!(sink, "set bc {}", bc)?;
        writeln!(sink)?;
        Ok(())
    }
}

impl SectionWriter for GeometryWriter<'_> {
    fn section(&self) -> Section {
        Section::Geometry
    }

    fn write(&self, sink: &mut dyn Write) -> DeckResult<()> {
        self.geometry.validate()?;
        // Resolve the boundary encoding before anything is appended
        if let Some(root) = &self.geometry.root {
            self.bc_encoding.encode(root.bc.0, root.bc.1)?;
        }

        self.section().write_banner(sink)?;
        if !self.geometry.pins.is_empty() {
            self.write_pins(sink)?;
        }
        if !self.geometry.groups.is_empty() {
            self.write_groups(sink)?;
        }
        if let Some(root) = &self.geometry.root {
            self.write_root(sink, root)?;
        }
        Ok(())
    }
}

/// One `pin` record: a line per bounded region, then the outer material
fn write_pin(sink: &mut dyn Write, pin: &Pin) -> DeckResult<()> {
    debug!(pin = %pin.name, regions = pin.radii.len(), "writing pin");
    writeln!(sink, "pin {} ", pin.name)?;
    for (material, radius) in pin.materials.iter().zip(&pin.radii).take(pin.bounded_regions()) {
        writeln!(sink, "{}   {} ", material, fixed(*radius, 4))?;
    }
    if let Some(outer) = pin.materials.last() {
        writeln!(sink, "{}  ", outer)?;
    }
    writeln!(sink)?;
    Ok(())
}

fn write_group(sink: &mut dyn Write, group: &Group) -> DeckResult<()> {
    debug!(group = %group.name, kind = group.lattice.kind(), "writing lattice");
    match &group.lattice {
        Lattice::Square { pitch, map } => {
            write_square_lattice(sink, &group.name, *pitch, map, 3)?;
        }
        Lattice::Stack { layers } => {
            writeln!(sink, "lat {} 9 0.0 0.0 {}", group.name, layers.len())?;
            for layer in layers {
                writeln!(sink, "{} {}", fixed(layer.pitch, 3), layer.universe)?;
            }
        }
    }
    writeln!(sink)?;
    Ok(())
}

/// Square lattice header and rows; returns (rows, columns)
///
/// The header carries NX (columns) before NY (rows).
fn write_square_lattice(
    sink: &mut dyn Write,
    name: &str,
    pitch: f64,
    map: &[Vec<String>],
    pitch_precision: usize,
) -> DeckResult<(usize, usize)> {
    let (rows, cols) = map_shape(name, map)?;
    writeln!(
        sink,
        "lat {} 1 0.0 0.0 {} {} {}",
        name,
        cols,
        rows,
        fixed(pitch, pitch_precision)
    )?;
    for row in map {
        for universe in row {
            write!(sink, "{} ", universe)?;
        }
        writeln!(sink)?;
    }
    Ok((rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoundaryCondition::*, CuboidLegacy, DeckError, MapLegacy};

    fn render(writer: &GeometryWriter<'_>) -> String {
        let mut out = Vec::new();
        writer.write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn fuel_pin() -> Pin {
        Pin::new("ff", vec![0.41, 0.475, 1.26], vec!["fuel", "clad", "water"]).unwrap()
    }

    #[test]
    fn test_pin_region_lines() {
        let geo = Geometry::new("g").with_pin(fuel_pin());
        let text = render(&GeometryWriter::new(&geo));
        assert!(text.contains("%--- Pins\npin ff \nfuel   0.4100 \nclad   0.4750 \nwater  \n\n"));
    }

    #[test]
    fn test_pin_line_count_matches_regions() {
        for radii in [vec![1.0], vec![0.5, 1.0], vec![0.1, 0.2, 0.3, 0.4]] {
            let materials: Vec<String> = (0..radii.len()).map(|i| format!("m{}", i)).collect();
            let pin = Pin::new("p", radii.clone(), materials).unwrap();
            let mut out = Vec::new();
            write_pin(&mut out, &pin).unwrap();
            let text = String::from_utf8(out).unwrap();
            let lines: Vec<&str> = text.lines().collect();
            // header + bounded regions + outer region + blank
            assert_eq!(lines.len(), 1 + (radii.len() - 1) + 1 + 1);
            let bounded = lines.iter().filter(|l| l.split_whitespace().count() == 2 && !l.starts_with("pin")).count();
            assert_eq!(bounded, radii.len() - 1);
        }
    }

    #[test]
    fn test_pin_only_fallback() {
        let geo = Geometry::new("g").with_pin(fuel_pin());
        let text = render(&GeometryWriter::new(&geo));
        assert!(text.ends_with(
            "\nsurf s1 sqc 0.0 0.0 1.26\ncell 98  0 fill ff   -s1\ncell 99  0 outside   s1\nset bc 2\n\n"
        ));
        assert!(!text.contains("%--- Assemblies"));
    }

    #[test]
    fn test_square_lattice_header_matches_map() {
        let map = vec![vec!["ff", "ff", "ff"], vec!["ff", "gt", "ff"]];
        let geo = Geometry::new("g")
            .with_pin(fuel_pin())
            .with_group(Group::square("a1", map, 1.26).unwrap());
        let text = render(&GeometryWriter::new(&geo));

        let header = text.lines().find(|l| l.starts_with("lat a1")).unwrap();
        assert_eq!(header, "lat a1 1 0.0 0.0 3 2 1.260");
        let fields: Vec<&str> = header.split_whitespace().collect();
        let (nx, ny): (usize, usize) = (fields[5].parse().unwrap(), fields[6].parse().unwrap());
        assert_eq!((nx, ny), (3, 2));

        assert!(text.contains("lat a1 1 0.0 0.0 3 2 1.260\nff ff ff \nff gt ff \n\n"));
        let rows_after_header = text
            .lines()
            .skip_while(|l| !l.starts_with("lat a1"))
            .skip(1)
            .take_while(|l| !l.is_empty())
            .count();
        assert_eq!(rows_after_header, ny);
        assert!(!text.contains("sqc"));
    }

    #[test]
    fn test_stack_lattice() {
        let geo = Geometry::new("g").with_group(
            Group::stack("ax", vec!["refl", "core", "refl"], vec![-20.0, 0.0, 366.0]).unwrap(),
        );
        let text = render(&GeometryWriter::new(&geo));
        assert!(text.contains("%--- Assemblies\nlat ax 9 0.0 0.0 3\n-20.000 refl\n0.000 core\n366.000 refl\n\n"));
        assert!(!text.contains("%--- Pins"));
    }

    #[test]
    fn test_cuboid_root() {
        let geo = Geometry::new("g")
            .with_pin(fuel_pin())
            .with_root(Root::cuboid("core", [21.42, 21.42, 366.0], (Reflective, Vacuum)).unwrap());
        let text = render(&GeometryWriter::new(&geo));
        assert!(text.ends_with(
            "%--- Root universe\n\
             surf 1000 cuboid -10.710 10.710 -10.710 10.710 0.000 366.00\n\
             cell 110  0  fill core    -1000\n\
             cell 112  0  outside     1000\n\
             set bc 2 2 1\n\n"
        ));
        assert!(!text.contains("sqc"));
    }

    #[test]
    fn test_map_root() {
        let root = Root::map("sc", vec![vec!["a1", "a2"], vec!["a2", "a1"]], 21.42, (Vacuum, Vacuum)).unwrap();
        let geo = Geometry::new("g").with_root(root);
        let text = render(&GeometryWriter::new(&geo).with_bc_encoding(Arc::new(MapLegacy)));
        assert!(text.ends_with(
            "%--- Root universe\n\
             lat sc 1 0.0 0.0 2 2 21.42\n\
             a1 a2 \n\
             a2 a1 \n\
             \n\
             surf s1 rect -21.42 21.42 -21.42 21.42\n\
             cell 98  0 fill sc   -s1\n\
             cell 99  0 outside   s1\n\
             set bc 1\n\n"
        ));
    }

    #[test]
    fn test_rectangular_map_root_sizes_x_by_columns() {
        let root = Root::map("sc", vec![vec!["a1", "a2", "a1"]], 10.0, (Reflective, Reflective)).unwrap();
        let geo = Geometry::new("g").with_root(root);
        let text = render(&GeometryWriter::new(&geo));
        assert!(text.contains("lat sc 1 0.0 0.0 3 1 10.00\n"));
        assert!(text.contains("surf s1 rect -15.00 15.00 -5.00 5.00\n"));
    }

    #[test]
    fn test_root_without_groups_skips_pin_fallback() {
        let root = Root::map("sc", vec![vec!["ff", "ff"], vec!["ff", "ff"]], 1.26, (Reflective, Reflective)).unwrap();
        let geo = Geometry::new("g").with_pin(fuel_pin()).with_root(root);
        let text = render(&GeometryWriter::new(&geo));
        assert!(!text.contains("sqc"));
        assert_eq!(text.matches("set bc").count(), 1);
        assert!(text.ends_with("cell 99  0 outside   s1\nset bc 2\n\n"));
    }

    #[test]
    fn test_bc_encoding_is_pluggable() {
        let geo = Geometry::new("g").with_root(Root::cuboid("core", [1.0, 1.0, 1.0], (Vacuum, Vacuum)).unwrap());
        assert!(render(&GeometryWriter::new(&geo)).contains("set bc 1\n"));
        assert!(render(&GeometryWriter::new(&geo).with_bc_encoding(Arc::new(CuboidLegacy))).contains("set bc 1 1 1\n"));
    }

    #[test]
    fn test_unsupported_bc_writes_nothing() {
        let geo = Geometry::new("g").with_root(Root::cuboid("core", [1.0, 1.0, 1.0], (Periodic, Vacuum)).unwrap());
        let writer = GeometryWriter::new(&geo).with_bc_encoding(Arc::new(CuboidLegacy));
        let mut out = Vec::new();
        let err = writer.write(&mut out).unwrap_err();
        assert!(matches!(err, DeckError::UnsupportedKind { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_ragged_map_is_rejected() {
        let mut geo = Geometry::new("g").with_group(Group::square("a1", vec![vec!["ff"]], 1.0).unwrap());
        if let Lattice::Square { map, .. } = &mut geo.groups[0].lattice {
            map.push(vec!["ff".into(), "ff".into()]);
        }
        let mut out = Vec::new();
        assert!(matches!(GeometryWriter::new(&geo).write(&mut out), Err(DeckError::Validation(_))));
        assert!(out.is_empty());
    }
}
