//! # Cross-Section Generation
//!
//! Few-group constant generation request: group structure plus the
//! universes to homogenize.

use serde::{Deserialize, Serialize};

use super::error::{DeckError, DeckResult};
use super::geometry::check_name;
use super::numeric::increasing_check;

/// Group constant generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionSpec {
    /// Energy group structure name
    pub group_name: String,
    /// G + 1 boundaries in MeV, ascending
    #[serde(default)]
    pub group_boundaries: Option<Vec<f64>>,
    /// Universes to collapse cross-sections over
    #[serde(default)]
    pub universes: Option<Vec<String>>,
}

impl CrossSectionSpec {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            group_boundaries: None,
            universes: None,
        }
    }

    pub fn with_boundaries(mut self, boundaries: Vec<f64>) -> Self {
        self.group_boundaries = Some(boundaries);
        self
    }

    pub fn with_universes<S: Into<String>>(mut self, universes: Vec<S>) -> Self {
        self.universes = Some(universes.into_iter().map(Into::into).collect());
        self
    }

    /// Number of energy groups, if boundaries are given
    pub fn group_count(&self) -> Option<usize> {
        self.group_boundaries
            .as_ref()
            .map(|b| b.len().saturating_sub(1))
    }

    pub fn validate(&self) -> DeckResult<()> {
        check_name("energy group structure", &self.group_name)?;
        if let Some(bounds) = &self.group_boundaries {
            if bounds.len() < 2 {
                return Err(DeckError::validation(format!(
                    "group structure '{}' needs at least two boundaries",
                    self.group_name
                )));
            }
            increasing_check(
                bounds,
                &format!(
                    "group structure '{}' boundaries must be strictly increasing",
                    self.group_name
                ),
            )?;
        }
        if let Some(universes) = &self.universes {
            universes.iter().try_for_each(|u| check_name("universe", u))?;
        }
        Ok(())
    }
}
