//! # Workflows Module
//!
//! This module provides the highest-level, user-facing entry points of the
//! library. It ties the chemical models and the grid engine together to
//! execute complete screening procedures.
//!
//! - [`optimize`] - Design a two-axis optimization screen around one
//!   cocktail's reagents
//! - [`params`] - Optional chemistry-parameter overrides loaded from a TOML
//!   file

pub mod optimize;
pub mod params;
