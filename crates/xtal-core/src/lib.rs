//! # xtalgrid Core Library
//!
//! A chemistry/unit model and optimization-grid generator for crystallization
//! screening. The library parses free-form chemical quantity strings into typed
//! values, models screening cocktails as collections of reagents, computes a
//! similarity metric between cocktails, and generates two-axis concentration
//! gradients across a well plate subject to stock-concentration and volume
//! constraints.
//!
//! ## Architectural Philosophy
//!
//! The library is organized into three layers with a strict one-way data flow:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`SignedValue`,
//!   `Reagent`, `Cocktail`), the process-wide read-only unit table, and menu
//!   file I/O.
//!
//! - **[`engine`]: The Logic Core.** The screening-grid generator: per-well
//!   dilution arithmetic with cell-scoped overflow reporting.
//!
//! - **[`workflows`]: The Public API.** High-level entry points that tie the
//!   `core` and `engine` together to design an optimization screen around a
//!   cocktail and to rank chemically similar cocktails.

pub mod core;
pub mod engine;
pub mod workflows;
