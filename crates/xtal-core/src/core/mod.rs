//! # Core Module
//!
//! This module provides the fundamental building blocks for modeling
//! crystallization-screening chemistry, serving as the computational core of
//! the library.
//!
//! ## Overview
//!
//! The core module implements the data structures and parsing routines
//! required to turn free-form chemistry notation into typed, unit-checked
//! values, and to represent screening cocktails and their reagents.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules:
//!
//! - **Units** ([`units`]) - The static unit table and signed, unit-tagged
//!   quantities with conversion and formatting operations
//! - **Chemical Models** ([`models`]) - Reagents, cocktails, and cocktail
//!   menus with their dilution and similarity operations
//! - **File I/O** ([`io`]) - Reading cocktail menu files
//!
//! All operations here are synchronous, pure functions over immutable inputs;
//! the only process-wide state is the read-only unit table, which is safe for
//! unsynchronized concurrent reads.

pub mod io;
pub mod models;
pub mod units;
