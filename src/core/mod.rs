//! # Core Domain
//!
//! Plain data, no I/O. The reactor model the deck writer consumes.
//!
//! This module contains the fundamental types and checks:
//! - `Pin`, `Group`, `Root`, `Geometry` - spatial model
//! - `Material` - compositions and thermal scattering
//! - `Detector`, `FissionMatrixSpec` - tally meshes
//! - `CrossSectionSpec` - group constant generation
//! - `Settings` - run configuration
//! - `BcEncoding` - boundary condition encodings
//! - `DeckError` - the error taxonomy
//!
//! ## Design Principles
//!
//! - Records validate on construction and expose `validate()` for
//!   deserialized values
//! - Kinds are enums, never strings
//! - Nothing here touches the filesystem

pub mod boundary;
pub mod config;
pub mod cross_section;
pub mod detector;
mod error;
pub mod format;
pub mod geometry;
pub mod material;
pub mod numeric;

// Re-exports
pub use boundary::{BcEncoding, BcTable, BoundaryCondition, CuboidLegacy, MapLegacy, PerAxis};
pub use config::Settings;
pub use cross_section::CrossSectionSpec;
pub use detector::{Detector, DetectorKind, FissionMatrixKind, FissionMatrixSpec, Mesh, UNBOUNDED};
pub use error::{DeckError, DeckResult};
pub use geometry::{Geometry, Group, Lattice, Pin, Root, RootShape, StackLayer};
pub use material::{Density, FractionKind, Material, Moderator, Nuclide};

use serde::{Deserialize, Serialize};

/// Everything one deck is written from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Value of `set title`
    pub title: String,
    pub geometry: Geometry,
    pub materials: Vec<Material>,
    pub settings: Settings,
    #[serde(default)]
    pub detectors: Vec<Detector>,
    #[serde(default)]
    pub cross_sections: Option<CrossSectionSpec>,
    #[serde(default)]
    pub fission_matrix: Option<FissionMatrixSpec>,
}

impl Deck {
    /// Create a deck with the mandatory sections
    pub fn new(
        title: impl Into<String>,
        geometry: Geometry,
        materials: Vec<Material>,
        settings: Settings,
    ) -> Self {
        Self {
            title: title.into(),
            geometry,
            materials,
            settings,
            detectors: Vec::new(),
            cross_sections: None,
            fission_matrix: None,
        }
    }

    pub fn with_detector(mut self, detector: Detector) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn with_cross_sections(mut self, xs: CrossSectionSpec) -> Self {
        self.cross_sections = Some(xs);
        self
    }

    pub fn with_fission_matrix(mut self, fm: FissionMatrixSpec) -> Self {
        self.fission_matrix = Some(fm);
        self
    }

    /// Load a deck description from JSON and validate it
    pub fn from_json(json: &str) -> DeckResult<Self> {
        let deck: Deck = serde_json::from_str(json)?;
        deck.validate()?;
        Ok(deck)
    }

    /// Validate every model object
    pub fn validate(&self) -> DeckResult<()> {
        if self.title.contains('"') || self.title.contains('\n') {
            return Err(DeckError::Validation(format!(
                "title '{}' must not contain quotes or newlines",
                self.title
            )));
        }
        self.materials.iter().try_for_each(Material::validate)?;
        self.geometry.validate()?;
        self.settings.validate()?;
        self.detectors.iter().try_for_each(Detector::validate)?;
        if let Some(xs) = &self.cross_sections {
            xs.validate()?;
        }
        if let Some(fm) = &self.fission_matrix {
            fm.validate()?;
        }
        Ok(())
    }
}
