//! Shared test utilities for the folder-mirror workspace.
//!
//! This crate is a dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`tree`] — [`TestTree`] fixture holding a source and a replica folder

pub mod tree;

pub use tree::TestTree;
