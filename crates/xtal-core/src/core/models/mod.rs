//! # Chemical Models Module
//!
//! Data structures representing the chemistry of a screening experiment.
//!
//! - [`formula`] - Chemical-formula text parsing and the named-compound
//!   molecular-weight table
//! - [`reagent`] - A single chemical species at a concentration, with
//!   molarity and dilution operations
//! - [`cocktail`] - An ordered reagent collection with plate metadata and a
//!   pairwise similarity metric
//! - [`menu`] - The cocktail-to-well mapping for one screening plate

pub mod cocktail;
pub mod formula;
pub mod menu;
pub mod reagent;
