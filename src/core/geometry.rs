//! # Geometry Model
//!
//! Pins, lattices and the root universe that closes the geometry.
//!
//! Hierarchy:
//! - `Pin` - concentric annular regions of one rod
//! - `Group` - a square or stacked lattice of pins or other groups
//! - `Root` - the outermost universe, carrying the boundary conditions

use serde::{Deserialize, Serialize};

use super::boundary::BoundaryCondition;
use super::error::{DeckError, DeckResult};
use super::numeric::{increasing_check, lim_check};

/// A radially layered rod
///
/// `materials[i]` fills the annulus bounded by `radii[i]`. The last
/// material is written as the unbounded outer region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub name: String,
    pub radii: Vec<f64>,
    pub materials: Vec<String>,
}

impl Pin {
    /// Create a validated pin
    ///
    /// # Example
    /// ```
    /// use serpent_deck::core::Pin;
    /// let pin = Pin::new("ff", vec![0.41, 0.475, 1.26], vec!["fuel", "clad", "water"]).unwrap();
    /// assert_eq!(pin.outer_radius(), 1.26);
    /// ```
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        radii: Vec<f64>,
        materials: Vec<S>,
    ) -> DeckResult<Self> {
        let pin = Self {
            name: name.into(),
            radii,
            materials: materials.into_iter().map(Into::into).collect(),
        };
        pin.validate()?;
        Ok(pin)
    }

    pub fn validate(&self) -> DeckResult<()> {
        check_name("pin", &self.name)?;
        if self.radii.is_empty() {
            return Err(DeckError::validation(format!("pin '{}' has no regions", self.name)));
        }
        if self.radii.len() != self.materials.len() {
            return Err(DeckError::validation(format!(
                "pin '{}' has {} radii but {} materials",
                self.name,
                self.radii.len(),
                self.materials.len()
            )));
        }
        lim_check(
            &self.radii,
            f64::MIN_POSITIVE,
            f64::MAX,
            &format!("pin '{}' radii must be positive", self.name),
        )?;
        increasing_check(
            &self.radii,
            &format!("pin '{}' radii must be strictly increasing", self.name),
        )
    }

    /// Outer boundary of the pin
    pub fn outer_radius(&self) -> f64 {
        self.radii.last().copied().unwrap_or(0.0)
    }

    /// Number of bounded (inner) regions
    pub fn bounded_regions(&self) -> usize {
        self.radii.len().saturating_sub(1)
    }
}

/// One layer of a stack lattice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackLayer {
    pub pitch: f64,
    pub universe: String,
}

/// Lattice arrangement of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Lattice {
    /// 2-D grid of universe names, rows top to bottom
    Square { pitch: f64, map: Vec<Vec<String>> },
    /// Axial stack of universes
    Stack { layers: Vec<StackLayer> },
}

impl Lattice {
    pub fn kind(&self) -> &'static str {
        match self {
            Lattice::Square { .. } => "square",
            Lattice::Stack { .. } => "stack",
        }
    }
}

/// Assembly or lattice universe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub lattice: Lattice,
}

impl Group {
    /// Square lattice from rows of universe names
    pub fn square<S: Into<String>>(
        name: impl Into<String>,
        map: Vec<Vec<S>>,
        pitch: f64,
    ) -> DeckResult<Self> {
        let group = Self {
            name: name.into(),
            lattice: Lattice::Square {
                pitch,
                map: to_string_map(map),
            },
        };
        group.validate()?;
        Ok(group)
    }

    /// Stack lattice from parallel universe and pitch sequences
    pub fn stack<S: Into<String>>(
        name: impl Into<String>,
        universes: Vec<S>,
        pitches: Vec<f64>,
    ) -> DeckResult<Self> {
        let name = name.into();
        if universes.len() != pitches.len() {
            return Err(DeckError::validation(format!(
                "stack '{}' has {} universes but {} pitches",
                name,
                universes.len(),
                pitches.len()
            )));
        }
        let layers = universes
            .into_iter()
            .zip(pitches)
            .map(|(u, pitch)| StackLayer {
                pitch,
                universe: u.into(),
            })
            .collect();
        let group = Self {
            name,
            lattice: Lattice::Stack { layers },
        };
        group.validate()?;
        Ok(group)
    }

    pub fn validate(&self) -> DeckResult<()> {
        check_name("group", &self.name)?;
        match &self.lattice {
            Lattice::Square { pitch, map } => {
                check_pitch(&self.name, *pitch)?;
                map_shape(&self.name, map).map(|_| ())
            }
            Lattice::Stack { layers } => {
                if layers.is_empty() {
                    return Err(DeckError::validation(format!(
                        "stack '{}' has no layers",
                        self.name
                    )));
                }
                let pitches: Vec<f64> = layers.iter().map(|l| l.pitch).collect();
                lim_check(
                    &pitches,
                    f64::MIN,
                    f64::MAX,
                    &format!("stack '{}' pitches must be finite", self.name),
                )
            }
        }
    }
}

/// Shape of the root universe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RootShape {
    /// Box of x, y, z extents filled with the universe `name`
    Cuboid { dimensions: [f64; 3] },
    /// Square lattice named after the root, closed by a rectangle
    Map { pitch: f64, map: Vec<Vec<String>> },
}

/// Outermost universe with global boundary conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub name: String,
    pub shape: RootShape,
    /// (radial, axial)
    pub bc: (BoundaryCondition, BoundaryCondition),
}

impl Root {
    pub fn cuboid(
        name: impl Into<String>,
        dimensions: [f64; 3],
        bc: (BoundaryCondition, BoundaryCondition),
    ) -> DeckResult<Self> {
        let root = Self {
            name: name.into(),
            shape: RootShape::Cuboid { dimensions },
            bc,
        };
        root.validate()?;
        Ok(root)
    }

    pub fn map<S: Into<String>>(
        name: impl Into<String>,
        map: Vec<Vec<S>>,
        pitch: f64,
        bc: (BoundaryCondition, BoundaryCondition),
    ) -> DeckResult<Self> {
        let root = Self {
            name: name.into(),
            shape: RootShape::Map {
                pitch,
                map: to_string_map(map),
            },
            bc,
        };
        root.validate()?;
        Ok(root)
    }

    pub fn validate(&self) -> DeckResult<()> {
        check_name("root", &self.name)?;
        match &self.shape {
            RootShape::Cuboid { dimensions } => lim_check(
                dimensions,
                f64::MIN_POSITIVE,
                f64::MAX,
                &format!("root '{}' dimensions must be positive", self.name),
            ),
            RootShape::Map { pitch, map } => {
                check_pitch(&self.name, *pitch)?;
                map_shape(&self.name, map).map(|_| ())
            }
        }
    }
}

/// The full geometry: pins, groups and an optional root
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub root: Option<Root>,
}

impl Geometry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_pin(mut self, pin: Pin) -> Self {
        self.pins.push(pin);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_root(mut self, root: Root) -> Self {
        self.root = Some(root);
        self
    }

    /// True when only pins are defined and the first pin closes the geometry
    pub fn is_pin_only(&self) -> bool {
        self.groups.is_empty() && self.root.is_none()
    }

    pub fn validate(&self) -> DeckResult<()> {
        self.pins.iter().try_for_each(Pin::validate)?;
        self.groups.iter().try_for_each(Group::validate)?;
        if let Some(root) = &self.root {
            root.validate()?;
        }
        if self.is_pin_only() && self.pins.is_empty() {
            return Err(DeckError::validation(format!(
                "geometry '{}' defines no pins, groups or root",
                self.name
            )));
        }
        Ok(())
    }
}

/// (rows, columns) of a rectangular map
pub fn map_shape(owner: &str, map: &[Vec<String>]) -> DeckResult<(usize, usize)> {
    let rows = map.len();
    let cols = map.first().map(Vec::len).unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(DeckError::validation(format!("lattice '{}' map is empty", owner)));
    }
    if let Some(bad) = map.iter().position(|row| row.len() != cols) {
        return Err(DeckError::validation(format!(
            "lattice '{}' map is not rectangular: row {} has {} entries, expected {}",
            owner,
            bad,
            map[bad].len(),
            cols
        )));
    }
    Ok((rows, cols))
}

fn to_string_map<S: Into<String>>(map: Vec<Vec<S>>) -> Vec<Vec<String>> {
    map.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

fn check_pitch(owner: &str, pitch: f64) -> DeckResult<()> {
    lim_check(
        &[pitch],
        f64::MIN_POSITIVE,
        f64::MAX,
        &format!("lattice '{}' pitch must be positive", owner),
    )
}

pub(crate) fn check_name(what: &str, name: &str) -> DeckResult<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(DeckError::validation(format!(
            "{} name '{}' must be a single non-empty token",
            what, name
        )));
    }
    Ok(())
}
