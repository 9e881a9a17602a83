//! # Material Model
//!
//! Nuclide compositions, densities and optional thermal-scattering data.

use serde::{Deserialize, Serialize};

use super::error::{DeckError, DeckResult};
use super::geometry::check_name;
use super::numeric::lim_check;

/// Material density
///
/// `Value` is written verbatim, so the solver's sign convention applies
/// (negative = mass density in g/cm3, positive = atomic density).
/// `Sum` lets the solver add up the composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DensityRepr", into = "DensityRepr")]
pub enum Density {
    Value(f64),
    Sum,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DensityRepr {
    Number(f64),
    Keyword(String),
}

impl TryFrom<DensityRepr> for Density {
    type Error = String;

    fn try_from(repr: DensityRepr) -> Result<Self, Self::Error> {
        match repr {
            DensityRepr::Number(v) => Ok(Density::Value(v)),
            DensityRepr::Keyword(k) if k == "sum" => Ok(Density::Sum),
            DensityRepr::Keyword(k) => Err(format!("unknown density keyword '{}'", k)),
        }
    }
}

impl From<Density> for DensityRepr {
    fn from(d: Density) -> Self {
        match d {
            Density::Value(v) => DensityRepr::Number(v),
            Density::Sum => DensityRepr::Keyword("sum".to_string()),
        }
    }
}

/// How composition fractions are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractionKind {
    /// Mass fractions, written with a leading '-'
    #[default]
    Mass,
    /// Atomic (molar) fractions, written unsigned
    Molar,
}

/// One composition entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nuclide {
    /// Library id, e.g. `92235.09c`
    pub id: String,
    pub fraction: f64,
}

impl Nuclide {
    pub fn new(id: impl Into<String>, fraction: f64) -> Self {
        Self {
            id: id.into(),
            fraction,
        }
    }
}

/// Thermal-scattering library bound to a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moderator {
    /// Alias used on the `therm` and `moder` cards, e.g. `lwtr`
    pub name: String,
    /// Library id, e.g. `lwj3.11t`
    pub library: String,
    /// Bound nuclide
    #[serde(default = "default_za")]
    pub za: u32,
}

fn default_za() -> u32 {
    1001
}

impl Moderator {
    pub fn new(name: impl Into<String>, library: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            library: library.into(),
            za: default_za(),
        }
    }

    pub fn with_za(mut self, za: u32) -> Self {
        self.za = za;
        self
    }
}

/// A material definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub density: Density,
    /// Kelvin
    pub temperature: f64,
    pub composition: Vec<Nuclide>,
    #[serde(default)]
    pub fraction_kind: FractionKind,
    #[serde(default)]
    pub moderator: Option<Moderator>,
}

impl Material {
    /// Create a validated material with mass fractions and no moderator
    pub fn new(
        name: impl Into<String>,
        density: Density,
        temperature: f64,
        composition: Vec<Nuclide>,
    ) -> DeckResult<Self> {
        let material = Self {
            name: name.into(),
            density,
            temperature,
            composition,
            fraction_kind: FractionKind::Mass,
            moderator: None,
        };
        material.validate()?;
        Ok(material)
    }

    /// Build from (id, fraction) pairs
    pub fn from_pairs<S: Into<String>>(
        name: impl Into<String>,
        density: Density,
        temperature: f64,
        pairs: Vec<(S, f64)>,
    ) -> DeckResult<Self> {
        let composition = pairs
            .into_iter()
            .map(|(id, f)| Nuclide::new(id, f))
            .collect();
        Self::new(name, density, temperature, composition)
    }

    pub fn with_fraction_kind(mut self, kind: FractionKind) -> Self {
        self.fraction_kind = kind;
        self
    }

    pub fn with_moderator(mut self, moderator: Moderator) -> Self {
        self.moderator = Some(moderator);
        self
    }

    pub fn validate(&self) -> DeckResult<()> {
        check_name("material", &self.name)?;
        if self.composition.is_empty() {
            return Err(DeckError::validation(format!(
                "material '{}' has an empty composition",
                self.name
            )));
        }
        if let Density::Value(d) = self.density {
            if !d.is_finite() || d == 0.0 {
                return Err(DeckError::validation(format!(
                    "material '{}' density must be finite and non-zero",
                    self.name
                )));
            }
        }
        lim_check(
            &[self.temperature],
            f64::MIN_POSITIVE,
            f64::MAX,
            &format!("material '{}' temperature must be positive", self.name),
        )?;
        for nuclide in &self.composition {
            check_name("nuclide", &nuclide.id)?;
        }
        let fractions: Vec<f64> = self.composition.iter().map(|n| n.fraction).collect();
        lim_check(
            &fractions,
            0.0,
            f64::MAX,
            &format!("material '{}' fractions must be non-negative", self.name),
        )?;
        if let Some(moder) = &self.moderator {
            check_name("moderator", &moder.name)?;
            check_name("moderator library", &moder.library)?;
        }
        Ok(())
    }
}
