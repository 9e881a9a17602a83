//! # Detectors and Fission-Matrix Meshes
//!
//! Cartesian tally meshes shared by detector cards and the fission-matrix
//! card. Kind-to-code lookups are fixed `match` tables owned here.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{DeckError, DeckResult};
use super::geometry::check_name;

/// Extent the solver treats as unbounded
pub const UNBOUNDED: f64 = 1e37;

/// Cartesian tally mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// xmin, xmax, ymin, ymax, zmin, zmax
    pub dimensions: [f64; 6],
    /// Nx, Ny, Nz
    pub cell_counts: [u32; 3],
}

impl Mesh {
    pub fn new(dimensions: [f64; 6], cell_counts: [u32; 3]) -> DeckResult<Self> {
        let mesh = Self {
            dimensions,
            cell_counts,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Square x-y mesh centred on the origin, one unbounded axial bin
    pub fn radial(half_width: f64, cells_per_side: u32) -> DeckResult<Self> {
        Self::new(
            [
                -half_width,
                half_width,
                -half_width,
                half_width,
                -UNBOUNDED,
                UNBOUNDED,
            ],
            [cells_per_side, cells_per_side, 1],
        )
    }

    /// (min, max, count) for axis 0 = x, 1 = y, 2 = z
    pub fn axis(&self, axis: usize) -> (f64, f64, u32) {
        (
            self.dimensions[2 * axis],
            self.dimensions[2 * axis + 1],
            self.cell_counts[axis],
        )
    }

    /// Total number of mesh cells, the order of the resulting fission matrix
    ///
    /// Saturates at `usize::MAX`; `validate` rejects such meshes.
    pub fn cell_total(&self) -> usize {
        self.checked_cell_total().unwrap_or(usize::MAX)
    }

    fn checked_cell_total(&self) -> Option<usize> {
        self.cell_counts
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n as usize))
    }

    pub fn validate(&self) -> DeckResult<()> {
        for (axis, label) in ["x", "y", "z"].iter().enumerate() {
            let (lo, hi, n) = self.axis(axis);
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(DeckError::validation(format!(
                    "mesh {} bounds must be finite with min < max, got ({}, {})",
                    label, lo, hi
                )));
            }
            if n == 0 {
                return Err(DeckError::validation(format!(
                    "mesh {} cell count must be positive",
                    label
                )));
            }
        }
        if self.checked_cell_total().is_none() {
            return Err(DeckError::validation(format!(
                "mesh cell counts {:?} overflow the total cell count",
                self.cell_counts
            )));
        }
        Ok(())
    }
}

/// Detector response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetectorKind {
    /// Fission neutron production
    FissionSource,
    /// Fission energy deposition
    Power,
}

impl DetectorKind {
    /// Response number on the `dr` entry
    pub fn code(&self) -> i32 {
        match self {
            DetectorKind::FissionSource => -7,
            DetectorKind::Power => -8,
        }
    }
}

/// Mesh detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub name: String,
    pub kind: DetectorKind,
    /// Tally over the void material as well
    #[serde(default = "default_void")]
    pub void: bool,
    pub mesh: Mesh,
}

fn default_void() -> bool {
    true
}

impl Detector {
    pub fn new(name: impl Into<String>, kind: DetectorKind, mesh: Mesh) -> DeckResult<Self> {
        let detector = Self {
            name: name.into(),
            kind,
            void: true,
            mesh,
        };
        detector.validate()?;
        Ok(detector)
    }

    pub fn with_void(mut self, void: bool) -> Self {
        self.void = void;
        self
    }

    pub fn validate(&self) -> DeckResult<()> {
        check_name("detector", &self.name)?;
        self.mesh.validate()
    }
}

/// Fission-matrix mesh type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FissionMatrixKind {
    Cartesian,
    Cylindrical,
    Hexagonal,
}

impl FissionMatrixKind {
    /// Mode flag on the `set fmtx` card, if the writer supports the kind
    pub fn mode_flag(&self) -> Option<u8> {
        match self {
            FissionMatrixKind::Cartesian => Some(4),
            FissionMatrixKind::Cylindrical | FissionMatrixKind::Hexagonal => None,
        }
    }
}

impl fmt::Display for FissionMatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FissionMatrixKind::Cartesian => "cartesian",
            FissionMatrixKind::Cylindrical => "cylindrical",
            FissionMatrixKind::Hexagonal => "hexagonal",
        };
        f.write_str(name)
    }
}

/// Fission-matrix tally definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FissionMatrixSpec {
    pub kind: FissionMatrixKind,
    pub mesh: Mesh,
}

impl FissionMatrixSpec {
    pub fn cartesian(mesh: Mesh) -> Self {
        Self {
            kind: FissionMatrixKind::Cartesian,
            mesh,
        }
    }

    /// Order of the matrix the solver will report
    pub fn order(&self) -> usize {
        self.mesh.cell_total()
    }

    pub fn validate(&self) -> DeckResult<()> {
        self.mesh.validate()
    }
}
