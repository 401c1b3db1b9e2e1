//! # File I/O Module
//!
//! Readers for the external file formats the core consumes. Only the
//! cocktail menu format lives here; run persistence and report output belong
//! to external collaborators.

pub mod menu;
