//! Manuscript domain model.
//!
//! # Responsibility
//! - Define the project -> chapter -> episode hierarchy and reference notes.
//! - Keep cursor, word-count cache, and version-history invariants inside
//!   the types that own the data.
//!
//! # Invariants
//! - Cursors are either unset or point at an existing element.
//! - An episode's cached count always equals the trimmed length of its body.
//! - Version history is append-only and follows its episode across deletes.

pub mod document;
pub mod error;
pub mod project;
pub mod tree;
pub mod version;
