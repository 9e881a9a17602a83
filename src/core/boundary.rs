//! # Boundary Conditions
//!
//! Boundary condition kinds and their encodings on the solver's `set bc` card.
//!
//! The solver understands one code per axis:
//!
//! | condition  | code |
//! |------------|------|
//! | vacuum     | `1`  |
//! | reflective | `2`  |
//! | periodic   | `3`  |
//!
//! Two legacy generators disagreed on how a mixed radial/axial pair is
//! spelled, so the encoding is pluggable. `PerAxis` is the default,
//! `CuboidLegacy` and `MapLegacy` reproduce the two historical tables,
//! and `BcTable` takes an explicit mapping.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{DeckError, DeckResult};

/// Behavior of particles at the outer surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryCondition {
    Reflective,
    Vacuum,
    Periodic,
}

impl BoundaryCondition {
    /// Solver code for a single axis
    pub fn code(&self) -> u8 {
        match self {
            BoundaryCondition::Vacuum => 1,
            BoundaryCondition::Reflective => 2,
            BoundaryCondition::Periodic => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoundaryCondition::Reflective => "reflective",
            BoundaryCondition::Vacuum => "vacuum",
            BoundaryCondition::Periodic => "periodic",
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Trait for turning a (radial, axial) pair into `set bc` tokens
pub trait BcEncoding: Send + Sync {
    /// Tokens following `set bc`, space separated
    fn encode(&self, radial: BoundaryCondition, axial: BoundaryCondition) -> DeckResult<String>;

    /// Name of this encoding (for debugging/config)
    fn name(&self) -> &'static str;
}

fn unsupported_pair(radial: BoundaryCondition, axial: BoundaryCondition) -> DeckError {
    DeckError::unsupported("boundary condition pair", format!("({}, {})", radial, axial))
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

/// Code-per-axis encoding
///
/// A uniform condition collapses to a single code (`2`). Mixed conditions
/// spell out x, y and z: the radial code twice, then the axial code
/// (`2 2 1`).
#[derive(Clone, Copy, Debug, Default)]
pub struct PerAxis;

impl BcEncoding for PerAxis {
    fn encode(&self, radial: BoundaryCondition, axial: BoundaryCondition) -> DeckResult<String> {
        if radial == axial {
            Ok(radial.code().to_string())
        } else {
            Ok(format!("{} {} {}", radial.code(), radial.code(), axial.code()))
        }
    }

    fn name(&self) -> &'static str {
        "per-axis"
    }
}

/// Table used by the cuboid-root generator
///
/// Reflective/vacuum only, periodic is rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct CuboidLegacy;

impl BcEncoding for CuboidLegacy {
    fn encode(&self, radial: BoundaryCondition, axial: BoundaryCondition) -> DeckResult<String> {
        use BoundaryCondition::*;
        let tokens = match (radial, axial) {
            (Reflective, Reflective) => "2",
            (Reflective, Vacuum) => "2 2 1",
            (Vacuum, Reflective) => "1 1 2",
            (Vacuum, Vacuum) => "1 1 1",
            _ => return Err(unsupported_pair(radial, axial)),
        };
        Ok(tokens.to_string())
    }

    fn name(&self) -> &'static str {
        "cuboid-legacy"
    }
}

/// Table used by the super-cell (map root) generator
///
/// Both mixed pairs share the same tokens; periodic is rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapLegacy;

impl BcEncoding for MapLegacy {
    fn encode(&self, radial: BoundaryCondition, axial: BoundaryCondition) -> DeckResult<String> {
        use BoundaryCondition::*;
        let tokens = match (radial, axial) {
            (Reflective, Reflective) => "2",
            (Reflective, Vacuum) | (Vacuum, Reflective) => "2 1",
            (Vacuum, Vacuum) => "1",
            _ => return Err(unsupported_pair(radial, axial)),
        };
        Ok(tokens.to_string())
    }

    fn name(&self) -> &'static str {
        "map-legacy"
    }
}

/// Explicit (radial, axial) -> tokens mapping
///
/// Pairs missing from the table are rejected.
#[derive(Clone, Debug, Default)]
pub struct BcTable {
    entries: BTreeMap<(BoundaryCondition, BoundaryCondition), String>,
}

impl BcTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one entry
    pub fn with_entry(
        mut self,
        radial: BoundaryCondition,
        axial: BoundaryCondition,
        tokens: impl Into<String>,
    ) -> Self {
        self.entries.insert((radial, axial), tokens.into());
        self
    }

    /// Snapshot another encoding over every pair it accepts
    pub fn from_encoding(encoding: &dyn BcEncoding) -> Self {
        let mut table = Self::new();
        for radial in ALL_CONDITIONS {
            for axial in ALL_CONDITIONS {
                if let Ok(tokens) = encoding.encode(radial, axial) {
                    table.entries.insert((radial, axial), tokens);
                }
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in (radial, axial) order
    pub fn iter(&self) -> impl Iterator<Item = (BoundaryCondition, BoundaryCondition, &str)> {
        self.entries.iter().map(|(&(r, a), t)| (r, a, t.as_str()))
    }
}

impl BcEncoding for BcTable {
    fn encode(&self, radial: BoundaryCondition, axial: BoundaryCondition) -> DeckResult<String> {
        self.entries
            .get(&(radial, axial))
            .cloned()
            .ok_or_else(|| unsupported_pair(radial, axial))
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

/// Every condition, in declaration order
pub const ALL_CONDITIONS: [BoundaryCondition; 3] = [
    BoundaryCondition::Reflective,
    BoundaryCondition::Vacuum,
    BoundaryCondition::Periodic,
];

#[cfg(test)]
mod tests {
    use super::*;
    use BoundaryCondition::*;

    #[test]
    fn test_codes() {
        assert_eq!(Vacuum.code(), 1);
        assert_eq!(Reflective.code(), 2);
        assert_eq!(Periodic.code(), 3);
    }

    #[test]
    fn test_per_axis() {
        let enc = PerAxis;
        assert_eq!(enc.encode(Reflective, Reflective).unwrap(), "2");
        assert_eq!(enc.encode(Vacuum, Vacuum).unwrap(), "1");
        assert_eq!(enc.encode(Periodic, Periodic).unwrap(), "3");
        assert_eq!(enc.encode(Reflective, Vacuum).unwrap(), "2 2 1");
        assert_eq!(enc.encode(Vacuum, Reflective).unwrap(), "1 1 2");
        assert_eq!(enc.encode(Periodic, Vacuum).unwrap(), "3 3 1");
    }

    #[test]
    fn test_cuboid_legacy_table() {
        let enc = CuboidLegacy;
        assert_eq!(enc.encode(Reflective, Reflective).unwrap(), "2");
        assert_eq!(enc.encode(Reflective, Vacuum).unwrap(), "2 2 1");
        assert_eq!(enc.encode(Vacuum, Reflective).unwrap(), "1 1 2");
        assert_eq!(enc.encode(Vacuum, Vacuum).unwrap(), "1 1 1");
        assert!(matches!(
            enc.encode(Periodic, Reflective),
            Err(DeckError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn test_map_legacy_table() {
        let enc = MapLegacy;
        assert_eq!(enc.encode(Reflective, Reflective).unwrap(), "2");
        assert_eq!(enc.encode(Reflective, Vacuum).unwrap(), "2 1");
        assert_eq!(enc.encode(Vacuum, Reflective).unwrap(), "2 1");
        assert_eq!(enc.encode(Vacuum, Vacuum).unwrap(), "1");
        assert!(enc.encode(Vacuum, Periodic).is_err());
    }

    #[test]
    fn test_legacy_tables_disagree_on_mixed_pairs() {
        // The two historical generators only agree on uniform conditions
        for (r, a) in [(Reflective, Vacuum), (Vacuum, Reflective), (Vacuum, Vacuum)] {
            assert_ne!(
                CuboidLegacy.encode(r, a).unwrap(),
                MapLegacy.encode(r, a).unwrap()
            );
        }
        assert_eq!(
            CuboidLegacy.encode(Reflective, Reflective).unwrap(),
            MapLegacy.encode(Reflective, Reflective).unwrap()
        );
    }

    #[test]
    fn test_custom_table() {
        let table = BcTable::new()
            .with_entry(Reflective, Vacuum, "2 2 1")
            .with_entry(Vacuum, Reflective, "2 2 1");
        assert_eq!(table.len(), 2);
        assert_eq!(table.encode(Vacuum, Reflective).unwrap(), "2 2 1");
        assert!(table.encode(Reflective, Reflective).is_err());
    }

    #[test]
    fn test_table_snapshot() {
        let table = BcTable::from_encoding(&CuboidLegacy);
        assert_eq!(table.len(), 4);
        let per_axis = BcTable::from_encoding(&PerAxis);
        assert_eq!(per_axis.len(), 9);
        assert_eq!(per_axis.iter().next(), Some((Reflective, Reflective, "2")));
    }

    #[test]
    fn test_serde_names() {
        let bc: BoundaryCondition = serde_json::from_str("\"vacuum\"").unwrap();
        assert_eq!(bc, Vacuum);
        assert!(serde_json::from_str::<BoundaryCondition>("\"mirror\"").is_err());
    }
}
