//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, shell completion and the
//! top-level load/parse/run sequence.

pub mod app;

// Re-export main types
pub use app::*;
