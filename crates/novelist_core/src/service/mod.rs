//! Core use-case services.
//!
//! # Responsibility
//! - Hold the project list and the active-project selection.
//! - Derive progress projections for display.
//!
//! # Invariants
//! - The active project is always read through the registry's index; no
//!   second reference is cached.

pub mod progress;
pub mod registry;
