//! # Ports
//!
//! Trait definitions for adapters. Contracts only, no implementations.
//!
//! - Ports define WHAT a deck section must do
//! - Adapters define HOW each section is rendered
//!
//! The CORE doesn't know about adapters.

mod section;

pub use section::{Section, SectionWriter, BANNER_RULE};
