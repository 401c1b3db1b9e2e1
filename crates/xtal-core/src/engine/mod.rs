//! # Engine Module
//!
//! The screening-grid generator. Given two axis reagents and optional
//! constant reagents, the engine produces a matrix of per-well target
//! concentrations and the stock/diluent volumes needed to realize them.
//!
//! One generation call is a pure function of its configuration: structural
//! validation happens up front and is fatal; per-well overflow is recovered
//! locally as a cell-scoped marker so a screening design with a few
//! unreachable corner concentrations is still returned whole. The per-well
//! computation has no cross-well data dependency and runs in parallel when
//! the `parallel` feature is enabled.

pub mod config;
pub mod error;
pub mod grid;
