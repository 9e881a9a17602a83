//! # Configuration
//!
//! Run settings for a criticality calculation.
//!
//! Every knob is a named field with a documented default. Only the
//! cross-section library has to be supplied.

use serde::{Deserialize, Serialize};

use super::error::{DeckError, DeckResult};
use super::numeric::lim_check;

/// Default neutrons per cycle
pub const DEFAULT_POPULATION: u64 = 100_000;
/// Default number of active cycles
pub const DEFAULT_ACTIVE_CYCLES: u32 = 100;
/// Default number of inactive (source convergence) cycles
pub const DEFAULT_INACTIVE_CYCLES: u32 = 50;
/// Default initial multiplication factor guess
pub const DEFAULT_K_GUESS: f64 = 1.0;

/// k-eigenvalue run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Neutrons per cycle
    #[serde(default = "default_population")]
    pub population_size: u64,

    /// Cycles that contribute to tallies
    #[serde(default = "default_active")]
    pub active_cycles: u32,

    /// Cycles skipped while the source converges
    #[serde(default = "default_inactive")]
    pub inactive_cycles: u32,

    /// Initial k-eff guess
    #[serde(default = "default_k_guess")]
    pub k_guess: f64,

    /// Path to the ACE cross-section directory file
    pub cross_section_library_path: String,

    /// Nuclide treated with resonance upscattering, if any
    #[serde(default)]
    pub resonance_upscatter_nuclide: Option<String>,
}

fn default_population() -> u64 {
    DEFAULT_POPULATION
}

fn default_active() -> u32 {
    DEFAULT_ACTIVE_CYCLES
}

fn default_inactive() -> u32 {
    DEFAULT_INACTIVE_CYCLES
}

fn default_k_guess() -> f64 {
    DEFAULT_K_GUESS
}

impl Settings {
    /// Create settings for a cross-section library
    ///
    /// Uses default population, cycle counts and k guess.
    pub fn new(cross_section_library_path: impl Into<String>) -> Self {
        Self {
            population_size: DEFAULT_POPULATION,
            active_cycles: DEFAULT_ACTIVE_CYCLES,
            inactive_cycles: DEFAULT_INACTIVE_CYCLES,
            k_guess: DEFAULT_K_GUESS,
            cross_section_library_path: cross_section_library_path.into(),
            resonance_upscatter_nuclide: None,
        }
    }

    /// Set neutrons per cycle
    pub fn with_population(mut self, population_size: u64) -> Self {
        self.population_size = population_size;
        self
    }

    /// Set active and inactive cycle counts
    pub fn with_cycles(mut self, active: u32, inactive: u32) -> Self {
        self.active_cycles = active;
        self.inactive_cycles = inactive;
        self
    }

    /// Set the initial k-eff guess
    pub fn with_k_guess(mut self, k_guess: f64) -> Self {
        self.k_guess = k_guess;
        self
    }

    /// Enable resonance upscattering for a nuclide
    pub fn with_upscatter(mut self, nuclide: impl Into<String>) -> Self {
        self.resonance_upscatter_nuclide = Some(nuclide.into());
        self
    }

    /// Upscatter nuclide, if set to something meaningful
    ///
    /// Empty and `"0"` both mean disabled.
    pub fn upscatter(&self) -> Option<&str> {
        self.resonance_upscatter_nuclide
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != "0")
    }

    pub fn validate(&self) -> DeckResult<()> {
        if self.population_size == 0 {
            return Err(DeckError::validation("population size must be positive"));
        }
        if self.active_cycles == 0 {
            return Err(DeckError::validation("active cycle count must be positive"));
        }
        lim_check(
            &[self.k_guess],
            f64::MIN_POSITIVE,
            f64::MAX,
            "initial k guess must be positive",
        )?;
        let path = &self.cross_section_library_path;
        if path.trim().is_empty() || path.contains('"') {
            return Err(DeckError::validation(format!(
                "cross-section library path '{}' is empty or contains quotes",
                path
            )));
        }
        Ok(())
    }
}
