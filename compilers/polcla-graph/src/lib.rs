//! Dependency graph of a sentence, its normalization passes and the
//! multi-word expression matcher that runs on the normalized graph.

pub mod conjunction;
pub mod graph;
pub mod mwe;
pub mod normalize;
pub mod passive;

pub use graph::{DependencyGraph, Edge};
pub use mwe::{remove_distant_duplicates, MweMatcher};
pub use normalize::NormalizeReport;
